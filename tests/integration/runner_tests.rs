use super::*;
use clearance_radar::config::{FetcherConfig, WebhookConfig};
use clearance_radar::formatter::MessageFormatter;
use clearance_radar::models::{RunOutcome, Source};
use clearance_radar::plugins::notifiers::DiscordNotifier;
use clearance_radar::plugins::ExtractorRegistry;
use clearance_radar::runner::{RunStatus, Runner};
use clearance_radar::scraper::HttpFetcher;
use std::sync::Arc;
use url::Url;
use wiremock::MockServer;

fn fetcher() -> HttpFetcher {
    HttpFetcher::new(&FetcherConfig {
        user_agent: "ClearanceRadar-Test/1.0".to_string(),
        accept_language: "en-US,en;q=0.9".to_string(),
        timeout_secs: 2,
    })
    .unwrap()
}

fn notifier(webhook: &MockServer) -> DiscordNotifier {
    DiscordNotifier::new(&WebhookConfig {
        url: Some(webhook_url(webhook)),
        timeout_secs: 1,
    })
    .unwrap()
}

#[tokio::test]
async fn test_duplicates_dropped_and_cap_applied() -> anyhow::Result<()> {
    let retail = MockServer::start().await;
    let mut items: Vec<(String, String, String)> = (0..9)
        .map(|i| (format!("Clearance Item {}", i), "3.00".to_string(), format!("/ip/item/{}", i)))
        .collect();
    for i in 0..3 {
        items.push((format!("Duplicate Tile {}", i), "3.00".to_string(), format!("/ip/item/{}", i)));
    }
    let borrowed: Vec<(&str, &str, &str)> = items
        .iter()
        .map(|(n, p, l)| (n.as_str(), p.as_str(), l.as_str()))
        .collect();
    mount_page(&retail, "/walmart", 200, walmart_page(&borrowed)).await;
    let webhook = start_webhook(204).await;

    let source = Source::new(
        "walmart",
        "Walmart",
        Url::parse(&format!("{}/walmart", retail.uri()))?,
        10,
    );
    let runner = Runner::new(
        vec![source],
        &ExtractorRegistry::with_builtin()?,
        Arc::new(fetcher()),
        Arc::new(notifier(&webhook)),
    )?;
    let report = runner.run().await?;

    assert_eq!(report.status, RunStatus::Completed);
    assert_eq!(report.sources[0].outcome.item_count(), 9);
    let messages = posted_messages(&webhook).await;
    assert_eq!(messages[0].matches("• **$3.00**").count(), 9);
    assert!(!messages[0].contains("Duplicate Tile"));
    Ok(())
}

#[tokio::test]
async fn test_large_listing_trimmed_to_budget() -> anyhow::Result<()> {
    let retail = MockServer::start().await;
    let items: Vec<(String, String)> = (0..40)
        .map(|i| {
            (
                format!("Very Long Clearance Product Title Number {} For Budget Checks", i),
                format!("/ip/very-long-clearance-product-slug-for-budget-checks/{}", i),
            )
        })
        .collect();
    let borrowed: Vec<(&str, &str, &str)> = items
        .iter()
        .map(|(n, l)| (n.as_str(), "19.99", l.as_str()))
        .collect();
    mount_page(&retail, "/walmart", 200, walmart_page(&borrowed)).await;
    let webhook = start_webhook(204).await;

    let source = Source::new(
        "walmart",
        "Walmart",
        Url::parse(&format!("{}/walmart", retail.uri()))?,
        40,
    );
    let runner = Runner::new(
        vec![source],
        &ExtractorRegistry::with_builtin()?,
        Arc::new(fetcher()),
        Arc::new(notifier(&webhook)),
    )?
    .with_formatter(MessageFormatter::default());
    let report = runner.run().await?;

    assert!(matches!(report.sources[0].outcome, RunOutcome::ItemsFound(ref items) if items.len() == 40));
    let messages = posted_messages(&webhook).await;
    assert_eq!(messages.len(), 1);
    assert!(messages[0].chars().count() <= 1900);
    assert!(messages[0].ends_with("…(trimmed)"));
    Ok(())
}
