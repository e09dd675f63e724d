//! End-to-end listing scrapes against the in-memory automation layer

mod common;

use common::{ClickFault, Counters, FakeCard, FakeLauncher, FakeSite, fast_config};
use kodegen_tools_pricescout::{
    ListingScraper, Platform, ScrapeStatus, SearchQuery, SiteProfile, assemble,
    utils::MAX_PRODUCTS,
};
use std::time::Duration;

fn amazon_site(cards: Vec<FakeCard>) -> FakeSite {
    FakeSite::with_cards(&SiteProfile::amazon().strategy.card, cards)
}

fn distinct_amazon_cards(n: usize) -> Vec<FakeCard> {
    (0..n)
        .map(|i| FakeCard::amazon(&format!("Product {i}"), &format!("/dp/B{i:04}"), "₹1,299"))
        .collect()
}

fn query(raw: &str) -> SearchQuery {
    SearchQuery::parse(raw).unwrap()
}

fn assert_torn_down_once(counters: &Counters) {
    assert_eq!(Counters::get(&counters.launches), 1);
    assert_eq!(Counters::get(&counters.pages_closed), Counters::get(&counters.pages_opened));
    assert_eq!(Counters::get(&counters.sessions_closed), 1);
}

#[tokio::test]
async fn caps_at_twenty_products() {
    let (launcher, counters) = FakeLauncher::new(amazon_site(distinct_amazon_cards(25)));
    let scraper = ListingScraper::new(launcher, SiteProfile::amazon(), fast_config());

    let result = scraper.scrape(&query("iphone 15")).await;

    assert_eq!(result.status(), ScrapeStatus::Ok);
    assert_eq!(result.count(), Some(MAX_PRODUCTS));
    assert_eq!(result.products().len(), MAX_PRODUCTS);
    assert_eq!(result.products()[0].title, "Product 0");
    assert_eq!(result.products()[19].title, "Product 19");
    assert_torn_down_once(&counters);
}

#[tokio::test]
async fn normalizes_card_fields() {
    let (launcher, _) = FakeLauncher::new(amazon_site(vec![FakeCard::amazon(
        "Kettle",
        "/dp/B0KETTLE?ref=sr_1",
        "₹1,23,456.50",
    )]));
    let scraper = ListingScraper::new(launcher, SiteProfile::amazon(), fast_config());

    let result = scraper.scrape(&query("kettle")).await;
    let product = &result.products()[0];

    assert_eq!(product.platform, Platform::Amazon);
    assert_eq!(product.price, Some(123_456));
    assert_eq!(product.rating, Some(4.3));
    assert_eq!(
        product.url.as_deref(),
        Some("https://www.amazon.in/dp/B0KETTLE?ref=sr_1")
    );
    assert_eq!(product.coupon, "Unavailable");
}

#[tokio::test]
async fn robot_check_page_is_blocked_even_with_cards() {
    let mut site = amazon_site(distinct_amazon_cards(5));
    site.body_text = "Robot Check\nEnter the characters you see below".to_string();
    let (launcher, counters) = FakeLauncher::new(site);
    let scraper = ListingScraper::new(launcher, SiteProfile::amazon(), fast_config());

    let result = scraper.scrape(&query("iphone 15")).await;

    assert_eq!(result.status(), ScrapeStatus::Blocked);
    assert!(result.products().is_empty());
    assert_eq!(
        result.message(),
        Some("Amazon blocked the request (captcha/robot check). No false data returned.")
    );
    assert_eq!(assemble(result).status_code, 429);
    assert_torn_down_once(&counters);
}

#[tokio::test]
async fn captcha_form_is_blocked() {
    let mut site = amazon_site(Vec::new());
    site.results_appear = false;
    site.element_counts
        .insert(r#"form[action*="validateCaptcha"]"#.to_string(), 1);
    let (launcher, counters) = FakeLauncher::new(site);
    let scraper = ListingScraper::new(launcher, SiteProfile::amazon(), fast_config());

    let result = scraper.scrape(&query("tv")).await;

    assert_eq!(result.status(), ScrapeStatus::Blocked);
    assert_torn_down_once(&counters);
}

#[tokio::test]
async fn cards_without_title_or_link_are_unavailable() {
    let cards = vec![
        FakeCard::new().attr("h2 a", "href", "/dp/NOTITLE"),
        FakeCard::new().text("h2 span", "No link"),
        FakeCard::new().text("h2 span", "   ").attr("h2 a", "href", "/dp/BLANK"),
    ];
    let (launcher, counters) = FakeLauncher::new(amazon_site(cards));
    let scraper = ListingScraper::new(launcher, SiteProfile::amazon(), fast_config());

    let result = scraper.scrape(&query("mixer")).await;

    assert_eq!(result.status(), ScrapeStatus::Unavailable);
    assert!(result.products().is_empty());
    assert_eq!(
        result.message(),
        Some("No Amazon product listings found for this query at this time.")
    );
    assert_eq!(assemble(result).status_code, 200);
    assert_torn_down_once(&counters);
}

#[tokio::test]
async fn duplicate_urls_keep_first_card() {
    let cards = vec![
        FakeCard::amazon("First", "/dp/SAME", "₹100"),
        FakeCard::amazon("Other", "/dp/OTHER", "₹200"),
        FakeCard::amazon("Second", "https://www.amazon.in/dp/SAME", "₹300"),
    ];
    let (launcher, _) = FakeLauncher::new(amazon_site(cards));
    let scraper = ListingScraper::new(launcher, SiteProfile::amazon(), fast_config());

    let result = scraper.scrape(&query("shoes")).await;

    let titles: Vec<_> = result.products().iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, ["First", "Other"]);
    assert_eq!(result.count(), Some(2));
}

#[tokio::test]
async fn results_wait_timeout_is_an_error_with_single_teardown() {
    let mut site = amazon_site(distinct_amazon_cards(3));
    site.results_appear = false;
    let (launcher, counters) = FakeLauncher::new(site);
    let scraper = ListingScraper::new(launcher, SiteProfile::amazon(), fast_config());

    let result = scraper.scrape(&query("laptop")).await;

    assert_eq!(result.status(), ScrapeStatus::Error);
    assert!(result.products().is_empty());
    let message = result.message().unwrap();
    assert!(message.starts_with("Amazon scraping failed: "), "{message}");
    assert!(message.contains("timeout after 200ms"), "{message}");
    assert_eq!(assemble(result).status_code, 500);
    assert_torn_down_once(&counters);
}

#[tokio::test]
async fn navigation_failure_is_an_error_with_single_teardown() {
    let mut site = amazon_site(distinct_amazon_cards(3));
    site.navigation_fails = true;
    let (launcher, counters) = FakeLauncher::new(site);
    let scraper = ListingScraper::new(launcher, SiteProfile::amazon(), fast_config());

    let result = scraper.scrape(&query("laptop")).await;

    assert_eq!(result.status(), ScrapeStatus::Error);
    assert!(result.message().unwrap().contains("ERR_CONNECTION_RESET"));
    assert_torn_down_once(&counters);
}

#[tokio::test]
async fn page_open_failure_closes_session() {
    let (launcher, counters) = FakeLauncher::without_pages(amazon_site(distinct_amazon_cards(1)));
    let scraper = ListingScraper::new(launcher, SiteProfile::amazon(), fast_config());

    let result = scraper.scrape(&query("laptop")).await;

    assert_eq!(result.status(), ScrapeStatus::Error);
    assert_eq!(Counters::get(&counters.pages_opened), 0);
    assert_eq!(Counters::get(&counters.pages_closed), 0);
    assert_eq!(Counters::get(&counters.sessions_closed), 1);
}

#[tokio::test]
async fn busy_network_does_not_fail_scrape() {
    let mut site = amazon_site(distinct_amazon_cards(2));
    site.network_never_idle = true;
    let (launcher, counters) = FakeLauncher::new(site);
    let scraper = ListingScraper::new(launcher, SiteProfile::amazon(), fast_config());

    let result = scraper.scrape(&query("watch")).await;

    assert_eq!(result.status(), ScrapeStatus::Ok);
    assert_eq!(result.count(), Some(2));
    assert_torn_down_once(&counters);
}

#[tokio::test]
async fn navigation_timeout_is_an_error() {
    let mut site = amazon_site(distinct_amazon_cards(1));
    site.navigation_delay = Duration::from_secs(30);
    let (launcher, counters) = FakeLauncher::new(site);
    let config = kodegen_tools_pricescout::ScrapeConfig::builder()
        .navigation_timeout(Duration::from_millis(30))
        .build()
        .unwrap();
    let scraper = ListingScraper::new(launcher, SiteProfile::amazon(), config);

    let result = scraper.scrape(&query("watch")).await;

    assert_eq!(result.status(), ScrapeStatus::Error);
    assert!(result.message().unwrap().contains("timeout after 30ms"));
    assert_torn_down_once(&counters);
}

#[tokio::test]
async fn flipkart_dismisses_login_prompt_and_builds_search_url() {
    let profile = SiteProfile::flipkart();
    let card = FakeCard::new()
        .text("div.KzDlHZ", "Mixer Grinder 750W")
        .text("div.Nx9bqj", "₹2,499")
        .attr("a.CGtC98", "href", "/mixer/p/itm123?pid=MIX")
        .attr("img.DByuf4", "src", "https://rukminim2.flixcart.com/image/mixer.jpg");
    let mut site = FakeSite::with_cards(&profile.strategy.card, vec![card]);
    site.interstitial = Some("button._2KpZ6l._2doB4z".to_string());
    let (launcher, counters) = FakeLauncher::new(site);
    let scraper = ListingScraper::new(launcher, profile, fast_config());

    let result = scraper.scrape(&query("mixer grinder")).await;

    assert_eq!(result.status(), ScrapeStatus::Ok);
    let product = &result.products()[0];
    assert_eq!(product.platform, Platform::Flipkart);
    assert_eq!(product.price, Some(2499));
    assert_eq!(product.rating, None);
    assert_eq!(
        product.url.as_deref(),
        Some("https://www.flipkart.com/mixer/p/itm123?pid=MIX")
    );
    assert_eq!(Counters::get(&counters.clicks), 1);

    let visited = counters.visited();
    assert_eq!(visited.len(), 1);
    assert!(
        visited[0].starts_with("https://www.flipkart.com/search?q=mixer%20grinder&_t="),
        "{}",
        visited[0]
    );
}

fn flipkart_site_with_faulty_prompt(fault: ClickFault) -> (FakeSite, SiteProfile) {
    let profile = SiteProfile::flipkart();
    let card = FakeCard::new()
        .text("div.KzDlHZ", "Steam Iron")
        .attr("a.CGtC98", "href", "/iron/p/itm7");
    let mut site = FakeSite::with_cards(&profile.strategy.card, vec![card]);
    site.interstitial = Some(profile.interstitial_dismiss[0].clone());
    site.click_fault = Some(fault);
    (site, profile)
}

#[tokio::test]
async fn failing_login_prompt_click_does_not_fail_scrape() {
    let (site, profile) = flipkart_site_with_faulty_prompt(ClickFault::Error);
    let (launcher, counters) = FakeLauncher::new(site);
    let scraper = ListingScraper::new(launcher, profile, fast_config());

    let result = scraper.scrape(&query("steam iron")).await;

    assert_eq!(result.status(), ScrapeStatus::Ok);
    assert_eq!(result.products()[0].title, "Steam Iron");
    assert_eq!(Counters::get(&counters.clicks), 1);
    assert_torn_down_once(&counters);
}

#[tokio::test]
async fn hanging_login_prompt_click_does_not_fail_scrape() {
    let (site, profile) = flipkart_site_with_faulty_prompt(ClickFault::Hang);
    let (launcher, counters) = FakeLauncher::new(site);
    let scraper = ListingScraper::new(launcher, profile, fast_config());

    let result = scraper.scrape(&query("steam iron")).await;

    assert_eq!(result.status(), ScrapeStatus::Ok);
    assert_eq!(result.count(), Some(1));
    assert_eq!(Counters::get(&counters.clicks), 1);
    assert_torn_down_once(&counters);
}

#[tokio::test]
async fn slow_launch_is_bounded_by_launch_timeout() {
    let mut site = amazon_site(distinct_amazon_cards(1));
    site.launch_delay = Duration::from_secs(30);
    let (launcher, counters) = FakeLauncher::new(site);
    let config = fast_config()
        .into_builder()
        .launch_timeout(Duration::from_millis(40))
        .build()
        .unwrap();
    let scraper = ListingScraper::new(launcher, SiteProfile::amazon(), config);

    let result = scraper.scrape(&query("watch")).await;

    assert_eq!(result.status(), ScrapeStatus::Error);
    assert!(
        result.message().unwrap().contains("Browser launch timeout after 40ms"),
        "{:?}",
        result.message()
    );
    assert_eq!(Counters::get(&counters.launches), 0);
    assert_eq!(Counters::get(&counters.sessions_closed), 0);
}

#[tokio::test]
async fn flipkart_block_page() {
    let profile = SiteProfile::flipkart();
    let mut site = FakeSite::with_cards(&profile.strategy.card, Vec::new());
    site.body_text = "Access Denied".to_string();
    let (launcher, _) = FakeLauncher::new(site);
    let scraper = ListingScraper::new(launcher, profile, fast_config());

    let result = scraper.scrape(&query("phone")).await;

    assert_eq!(result.status(), ScrapeStatus::Blocked);
    assert_eq!(
        result.message(),
        Some("Flipkart blocked the request. No false data returned.")
    );
}

#[tokio::test]
async fn broken_field_lookup_only_loses_that_field() {
    let card = FakeCard::amazon("Headphones", "/dp/HP", "₹999").failing(".a-icon-alt");
    let (launcher, _) = FakeLauncher::new(amazon_site(vec![card]));
    let scraper = ListingScraper::new(launcher, SiteProfile::amazon(), fast_config());

    let result = scraper.scrape(&query("headphones")).await;

    assert_eq!(result.status(), ScrapeStatus::Ok);
    assert_eq!(result.products()[0].rating, None);
    assert_eq!(result.products()[0].price, Some(999));
}
