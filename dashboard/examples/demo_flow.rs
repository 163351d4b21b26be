//! Example: Full proposal lifecycle against a local Anvil node
//!
//! Connects the node's first account, creates the sample proposal, votes for
//! the demo proposal and then queues and executes it. Each step waits for the
//! call to settle and prints the rendered dashboard.

use ethers::types::U256;
use governance_dashboard::{CallHandle, Dashboard, DashboardConfig};
use std::sync::Arc;

async fn report(dashboard: &Dashboard, step: &str, handle: CallHandle) {
    let state = handle.settled().await;
    match (state.hash, state.error) {
        (Some(hash), _) => println!("✓ {}: {:?}", step, hash),
        (None, Some(error)) => println!("✗ {}: {}", step, error),
        (None, None) => println!("? {}: no outcome", step),
    }
    println!("{}", dashboard.render());
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("governance_dashboard=debug")
        .init();

    println!("=== Governance Dashboard Demo ===\n");

    let config = Arc::new(DashboardConfig::anvil().with_env_overrides());
    let dashboard = Dashboard::new(config)?;
    println!("{}", dashboard.render());

    if dashboard.connect("injected").await.is_none() {
        eprintln!("✗ Could not connect; is Anvil running on {}?", dashboard.config().rpc_url);
        return Ok(());
    }
    println!("{}", dashboard.render());

    report(&dashboard, "Create proposal", dashboard.create_sample_proposal()).await;
    report(&dashboard, "Vote for", dashboard.vote_for()).await;

    let proposal_id = U256::from(dashboard.config().demo.proposal_id);
    report(&dashboard, "Queue", dashboard.queue_proposal(proposal_id)).await;
    report(&dashboard, "Execute", dashboard.execute_proposal(proposal_id)).await;

    dashboard.disconnect().await;
    println!("{}", dashboard.render());

    println!("Example completed!");
    Ok(())
}
