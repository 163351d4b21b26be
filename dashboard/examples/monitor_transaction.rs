//! Example: Transaction monitoring with custom options
//!
//! Submits a vote and polls for its receipt with custom polling and timeout
//! settings.

use governance_dashboard::{Dashboard, DashboardConfig, MonitorOptions, MonitorResult};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("governance_dashboard=debug")
        .init();

    println!("=== Transaction Monitoring Example ===\n");

    let dashboard = Dashboard::new(Arc::new(DashboardConfig::anvil()))?;
    if dashboard.connect("injected").await.is_none() {
        eprintln!("✗ Could not connect to {}", dashboard.config().rpc_url);
        return Ok(());
    }
    println!("✓ Connected\n");

    let state = dashboard.vote_for().settled().await;
    let Some(hash) = state.hash else {
        eprintln!("✗ Vote failed: {}", state.error.unwrap_or_default());
        return Ok(());
    };
    println!("Monitoring transaction: {:?}\n", hash);

    let options = MonitorOptions::from_config(dashboard.config())
        .with_poll_interval(500) // Poll every 500ms
        .with_timeout(30); // Timeout after 30 seconds

    match dashboard.monitor().monitor(hash, options).await {
        Ok(MonitorResult::Success(receipt)) => {
            println!("✓ Transaction succeeded!");
            println!("  - Hash: {:?}", receipt.transaction_hash);
            println!("  - Block: {:?}", receipt.block_number);
        }
        Ok(MonitorResult::Reverted(receipt)) => {
            println!("✗ Transaction reverted in block {:?}", receipt.block_number);
        }
        Ok(MonitorResult::Timeout) => {
            println!("✗ Transaction monitoring timed out");
        }
        Err(e) => {
            eprintln!("✗ Error monitoring transaction: {}", e);
        }
    }

    let status = dashboard.monitor().get_status(hash).await?;
    println!("\nFinal status: {}", status);

    println!("\nExample completed!");
    Ok(())
}
