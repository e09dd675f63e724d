//! Configuration module for listing scrapes
//!
//! This module provides the `ScrapeConfig` struct and its builder for
//! configuring session timing and browser identity with sensible defaults.

// Sub-modules
pub mod builder;
pub mod types;

// Re-exports for public API
pub use builder::ScrapeConfigBuilder;
pub use types::ScrapeConfig;
