use super::*;
use clearance_radar::app::{self, Cli};
use clearance_radar::config::DispatchPolicy;
use std::time::Instant;
use wiremock::MockServer;

fn cli_for(config: &NamedTempFile) -> Cli {
    Cli {
        config: Some(config.path().to_path_buf()),
        ..Cli::default()
    }
}

#[tokio::test]
async fn test_webhook_from_file_without_env_is_fatal() -> anyhow::Result<()> {
    let retail = MockServer::start().await;
    let webhook = start_webhook(204).await;
    let extra = format!("[webhook]\nurl = \"{}\"\n", webhook_url(&webhook));
    let config = write_config(&retail, "")?;
    let config_text = std::fs::read_to_string(config.path())?
        .replace("[webhook]\n", &extra);
    std::fs::write(config.path(), config_text)?;

    assert_eq!(app::execute(cli_for(&config), None).await, 1);

    assert!(retail.received_requests().await.unwrap_or_default().is_empty());
    assert!(posted_messages(&webhook).await.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_blocked_source_still_reports() -> anyhow::Result<()> {
    let retail = MockServer::start().await;
    mount_page(&retail, "/walmart", 503, "Service Unavailable".to_string()).await;
    mount_page(&retail, "/kohls", 200, "<html>nothing on clearance</html>".to_string()).await;
    let webhook = start_webhook(204).await;
    let config = write_config(&retail, "")?;

    let code = app::execute(cli_for(&config), Some(webhook_url(&webhook))).await;
    assert_eq!(code, 0);

    let messages = posted_messages(&webhook).await;
    assert_eq!(messages.len(), 2);
    assert!(messages[0].starts_with("🟠 **Walmart Radar Ran**"));
    assert!(messages[0].contains("Fetch issue: **503**"));
    assert!(messages[0].contains(&format!("{}/walmart", retail.uri())));
    assert!(messages[1].starts_with("🟢 **Kohl's Radar Ran Successfully**"));
    Ok(())
}

#[tokio::test]
async fn test_webhook_rejection_exits_nonzero_after_error_report() -> anyhow::Result<()> {
    let retail = MockServer::start().await;
    mount_page(&retail, "/walmart", 200, walmart_page(&[("Desk Lamp", "7.5", "/ip/1")])).await;
    mount_page(&retail, "/kohls", 200, kohls_page(&[])).await;
    let webhook = start_webhook(400).await;
    let config = write_config(&retail, "")?;

    let code = app::execute(cli_for(&config), Some(webhook_url(&webhook))).await;
    assert_eq!(code, 1);

    // Both sources were still attempted, then one error report.
    let messages = posted_messages(&webhook).await;
    assert_eq!(messages.len(), 3);
    assert!(messages[2].starts_with("🔴 **Clearance Radar Error**"));
    assert!(messages[2].contains("400"));
    Ok(())
}

#[tokio::test]
async fn test_aggregate_dispatch_posts_once() -> anyhow::Result<()> {
    let retail = MockServer::start().await;
    mount_page(&retail, "/walmart", 200, walmart_page(&[("Desk Lamp", "7.5", "/ip/1")])).await;
    mount_page(&retail, "/kohls", 403, "Access Denied".to_string()).await;
    let webhook = start_webhook(204).await;
    let config = write_config(&retail, "")?;

    let cli = Cli {
        dispatch: Some(DispatchPolicy::Aggregate),
        ..cli_for(&config)
    };
    let code = app::execute(cli, Some(webhook_url(&webhook))).await;
    assert_eq!(code, 0);

    let messages = posted_messages(&webhook).await;
    assert_eq!(messages.len(), 1);
    let walmart_at = messages[0].find("**Walmart Clearance Detected**").unwrap();
    let kohls_at = messages[0].find("🟠 **Kohl's Radar Ran**").unwrap();
    assert!(walmart_at < kohls_at);
    assert!(messages[0].contains("**403**"));
    Ok(())
}

#[tokio::test]
async fn test_only_flag_limits_sources() -> anyhow::Result<()> {
    let retail = MockServer::start().await;
    mount_page(&retail, "/kohls", 200, kohls_page(&[("Throw Pillow", "9.60", "/product/prd-7.jsp")])).await;
    let webhook = start_webhook(204).await;
    let config = write_config(&retail, "")?;

    let cli = Cli {
        only: vec!["kohls".to_string()],
        ..cli_for(&config)
    };
    assert_eq!(app::execute(cli, Some(webhook_url(&webhook))).await, 0);

    let messages = posted_messages(&webhook).await;
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("• **$9.60** — Throw Pillow"));

    let fetched: Vec<String> = retail
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| r.url.path().to_string())
        .collect();
    assert_eq!(fetched, vec!["/kohls"]);
    Ok(())
}

#[tokio::test]
async fn test_deadline_ends_stalled_run() -> anyhow::Result<()> {
    let retail = MockServer::start().await;
    mount_stalled_page(&retail, "/walmart").await;
    mount_stalled_page(&retail, "/kohls").await;
    let webhook = start_webhook(204).await;
    // Two sequential 2s fetch timeouts cannot fit in a 3s deadline.
    let config = write_config(&retail, "")?;
    let config_text = std::fs::read_to_string(config.path())?
        .replace("deadline_secs = 10", "deadline_secs = 3");
    std::fs::write(config.path(), config_text)?;

    let started = Instant::now();
    let code = app::execute(cli_for(&config), Some(webhook_url(&webhook))).await;
    assert_eq!(code, 1);
    assert!(started.elapsed() < std::time::Duration::from_secs(8));

    let messages = posted_messages(&webhook).await;
    assert!(messages.iter().all(|m| !m.contains("Kohl's")));
    Ok(())
}
