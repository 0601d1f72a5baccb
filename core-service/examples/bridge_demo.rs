//! End-to-end demonstration against a live backend
//!
//! Run with:
//! ```bash
//! # Backend base URL, optional bearer token
//! cargo run -p core-service --example bridge_demo -- https://api.example.com my-token
//!
//! # Probe a different reachability target
//! REACHABILITY_TARGET=https://status.example.com cargo run -p core-service --example bridge_demo -- https://api.example.com
//! ```

use anyhow::Context;
use bridge_traits::LogLevel;
use core_reachability::{format_response_time, status_description};
use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
use core_service::{CoreConfig, CoreService, ItemInput, ItemUpdate};
use std::env;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut args = env::args().skip(1);
    let base_url = args
        .next()
        .context("usage: bridge_demo <api-base-url> [bearer-token]")?;
    let token = args.next();

    init_logging(
        LoggingConfig::default()
            .with_format(LogFormat::Compact)
            .with_level(LogLevel::Debug),
    )?;

    let mut builder = CoreConfig::builder().api_base_url(base_url);
    if let Some(token) = token {
        builder = builder.api_token(token);
    }
    if let Ok(target) = env::var("REACHABILITY_TARGET") {
        builder = builder.reachability_target(target);
    }

    let core = CoreService::bootstrap(builder).context("failed to assemble the core")?;
    let items = core.items();

    let health = items.health().await;
    info!(success = health.success, body = ?health.data, "Health");

    let status = items.status().await;
    info!(success = status.success, error = ?status.error, "Status");

    let created = items
        .create(ItemInput::new("Demo item").with_description("Created by bridge_demo"))
        .await;
    match created.data {
        Some(item) => {
            info!(id = %item.id, "Created item");

            let renamed = items
                .update(&item.id, ItemUpdate::default().name("Demo item (renamed)"))
                .await;
            info!(success = renamed.success, error = ?renamed.error, "Updated item");

            let removed = items.delete(&item.id).await;
            info!(success = removed.success, error = ?removed.error, "Deleted item");
        }
        None => info!(error = ?created.error, "Create failed"),
    }

    let listing = items.list().await;
    if let Some(list) = listing.data {
        info!(count = list.count, "Listed items");
    }

    let summary = core
        .checker()
        .check_many(3, Duration::from_secs(1))
        .await;
    for result in &summary.results {
        info!(
            status = %result.status,
            description = status_description(result.status),
            response_time = ?result.response_time_ms.map(format_response_time),
            "Reachability"
        );
    }

    let stats = core.bridge().stats();
    info!(
        total = stats.total_requests,
        failed = stats.failed_requests,
        online = summary.online_count,
        "Demo complete"
    );

    Ok(())
}
