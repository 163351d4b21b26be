//! Governance Dashboard
//!
//! This library drives a single-view governance dashboard for an on-chain DAO
//! governor: connect a wallet, create a proposal, vote on it, queue it in the
//! timelock and execute it. It talks to an EVM node over JSON-RPC and leaves
//! voting and timelock rules to the contracts themselves.
//!
//! # Features
//!
//! - **Wallet Session**: Node-managed ("injected") accounts or an in-process private key
//! - **Contract Calls**: ABI encoding against human-readable interfaces, per-call reactive state
//! - **Dashboard**: Proposal/vote/queue/execute handlers and a rendered view model
//! - **Transaction Monitoring**: Poll for receipts with configurable timeouts
//! - **Error Handling**: One error enum classified into connection, call and configuration errors
//! - **Retry Logic**: Exponential backoff for transient failures of read calls
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use governance_dashboard::{Dashboard, DashboardConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     governance_dashboard::init_tracing();
//!
//!     // Local Anvil node with the default contract addresses
//!     let dashboard = Dashboard::new(Arc::new(DashboardConfig::anvil()))?;
//!
//!     dashboard.connect("injected").await;
//!     println!("{}", dashboard.render());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Examples
//!
//! ## Create the sample proposal
//!
//! ```rust,no_run
//! use governance_dashboard::{Dashboard, DashboardConfig};
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dashboard = Dashboard::new(Arc::new(DashboardConfig::anvil()))?;
//! dashboard.connect("injected").await;
//!
//! let state = dashboard.create_sample_proposal().settled().await;
//! match state.error {
//!     Some(message) => println!("Proposal Error: {}", message),
//!     None => println!("Proposal submitted: {:?}", state.hash),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Vote and wait for the receipt
//!
//! ```rust,no_run
//! use governance_dashboard::{Dashboard, DashboardConfig};
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dashboard = Dashboard::new(Arc::new(DashboardConfig::anvil()))?;
//! dashboard.connect("injected").await;
//!
//! if let Some(hash) = dashboard.vote_for().settled().await.hash {
//!     let confirmed = dashboard.monitor().wait_for_confirmation(hash).await?;
//!     println!("Vote confirmed: {}", confirmed);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod call;
pub mod config;
pub mod contracts;
pub mod dashboard;
pub mod error;
pub mod monitor;
pub mod retry;
pub mod rpc;
pub mod types;
pub mod view;
pub mod wallet;

// Re-export commonly used types
pub use call::{CallAdapter, CallHandle, ContractCall};
pub use config::{ConnectorConfig, ConnectorKind, DashboardConfig, Network};
pub use contracts::Contracts;
pub use dashboard::{Action, Dashboard};
pub use error::{DashboardError, ErrorCategory, Result};
pub use monitor::{MonitorOptions, MonitorResult, TransactionMonitor};
pub use retry::RetryStrategy;
pub use rpc::RpcClient;
pub use types::{
    Account, PendingCallState, ProposalCallDescriptor, TransactionReceipt, TransactionStatus,
    VoteRequest, VoteSupport,
};
pub use view::{Button, ButtonId, ButtonStyle, Element, View};
pub use wallet::{Connector, WalletSession};

use tracing_subscriber::EnvFilter;

/// Default log filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "governance_dashboard=info";

/// Install the global tracing subscriber.
///
/// Honors `RUST_LOG` and falls back to [`DEFAULT_LOG_FILTER`]. Logs go to
/// stderr so they do not interleave with the rendered view. Calling it more
/// than once is harmless.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
