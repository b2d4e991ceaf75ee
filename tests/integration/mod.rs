// Shared fixtures for the end-to-end radar tests.
// Retail pages and the webhook are both served by wiremock.

pub mod app_tests;
pub mod runner_tests;

use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const WEBHOOK_PATH: &str = "/api/webhooks/42/token";

/// Walmart-style embedded JSON, one tile per item.
pub fn walmart_page(items: &[(&str, &str, &str)]) -> String {
    let tiles: Vec<String> = items
        .iter()
        .map(|(name, price, link)| {
            format!(
                r#"{{"__typename":"Product","name":"{}","priceInfo":{{"price":{{"price":{}}}}},"canonicalUrl":"{}"}}"#,
                name, price, link
            )
        })
        .collect();
    format!(
        r#"<html><script id="__NEXT_DATA__">{{"items":[{}]}}</script></html>"#,
        tiles.join(",")
    )
}

/// Kohl's-style product array with sale prices.
pub fn kohls_page(items: &[(&str, &str, &str)]) -> String {
    let products: Vec<String> = items
        .iter()
        .map(|(name, price, link)| {
            format!(
                r#"{{"productTitle":"{}","salePrice":"${}","pdpUrl":"{}"}}"#,
                name, price, link
            )
        })
        .collect();
    format!(r#"<html><script>{{"products":[{}]}}</script></html>"#, products.join(","))
}

pub async fn mount_page(server: &MockServer, route: &str, status: u16, body: String) {
    Mock::given(method("GET"))
        .and(path(route.to_string()))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

pub async fn mount_stalled_page(server: &MockServer, route: &str) {
    Mock::given(method("GET"))
        .and(path(route.to_string()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("late")
                .set_delay(Duration::from_secs(30)),
        )
        .mount(server)
        .await;
}

/// Webhook endpoint answering every POST with `status`.
pub async fn start_webhook(status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(WEBHOOK_PATH))
        .respond_with(ResponseTemplate::new(status))
        .mount(&server)
        .await;
    server
}

pub fn webhook_url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), WEBHOOK_PATH)
}

/// `content` of every message the webhook received, in arrival order.
pub async fn posted_messages(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter_map(|request| serde_json::from_slice::<serde_json::Value>(&request.body).ok())
        .filter_map(|body| body["content"].as_str().map(str::to_string))
        .collect()
}

/// Config file pointing both sources at `retail` with tight timeouts.
pub fn write_config(retail: &MockServer, extra: &str) -> anyhow::Result<NamedTempFile> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    writeln!(
        file,
        r#"
[webhook]
timeout_secs = 1

[fetcher]
timeout_secs = 2

[runner]
deadline_secs = 10

[sources.walmart]
url = "{uri}/walmart"

[sources.kohls]
url = "{uri}/kohls"

{extra}
"#,
        uri = retail.uri(),
        extra = extra
    )?;
    Ok(file)
}
