//! Transaction receipt monitoring.
//!
//! Polls the node for the receipt of a submitted transaction until it is
//! mined or the configured timeout elapses.

use crate::config::DashboardConfig;
use crate::error::Result;
use crate::rpc::RpcClient;
use crate::types::{TransactionReceipt, TransactionStatus};
use ethers::types::H256;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Receipt monitor
#[derive(Clone)]
pub struct TransactionMonitor {
    rpc: RpcClient,
    defaults: MonitorOptions,
}

/// Monitoring options
#[derive(Debug, Clone)]
pub struct MonitorOptions {
    /// Poll interval (in milliseconds)
    pub poll_interval_ms: u64,
    /// Timeout (in seconds)
    pub timeout_secs: u64,
}

impl MonitorOptions {
    /// Create from the dashboard config
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self {
            poll_interval_ms: config.tx_poll_interval_ms,
            timeout_secs: config.tx_timeout_secs,
        }
    }

    /// Set custom poll interval
    pub fn with_poll_interval(mut self, interval_ms: u64) -> Self {
        self.poll_interval_ms = interval_ms;
        self
    }

    /// Set custom timeout
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Outcome of monitoring a transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorResult {
    /// Mined and executed successfully
    Success(TransactionReceipt),
    /// Mined but execution reverted
    Reverted(TransactionReceipt),
    /// No receipt before the timeout
    Timeout,
}

impl TransactionMonitor {
    /// Create a new transaction monitor
    pub fn new(rpc: RpcClient, config: &DashboardConfig) -> Self {
        Self {
            rpc,
            defaults: MonitorOptions::from_config(config),
        }
    }

    /// Poll until the transaction is mined or the timeout elapses
    pub async fn monitor(&self, hash: H256, options: MonitorOptions) -> Result<MonitorResult> {
        info!(
            "Monitoring transaction {:?} (timeout: {}s)",
            hash, options.timeout_secs
        );

        let start = Instant::now();
        let timeout = Duration::from_secs(options.timeout_secs);
        let poll_interval = Duration::from_millis(options.poll_interval_ms);

        loop {
            if start.elapsed() >= timeout {
                warn!("Transaction monitoring timed out: {:?}", hash);
                return Ok(MonitorResult::Timeout);
            }

            match self.rpc.transaction_receipt(hash).await {
                Ok(Some(receipt)) if receipt.succeeded() => {
                    info!(
                        "Transaction {:?} mined in block {:?}",
                        hash, receipt.block_number
                    );
                    return Ok(MonitorResult::Success(receipt));
                }
                Ok(Some(receipt)) => {
                    warn!("Transaction {:?} reverted", hash);
                    return Ok(MonitorResult::Reverted(receipt));
                }
                Ok(None) => debug!("Transaction not yet mined: {:?}", hash),
                Err(e) => debug!("Error fetching receipt: {}", e),
            }

            sleep(poll_interval).await;
        }
    }

    /// Wait with the configured defaults; true only if the transaction succeeded
    pub async fn wait_for_confirmation(&self, hash: H256) -> Result<bool> {
        let result = self.monitor(hash, self.defaults.clone()).await?;
        Ok(matches!(result, MonitorResult::Success(_)))
    }

    /// Single receipt lookup, no polling
    pub async fn get_status(&self, hash: H256) -> Result<TransactionStatus> {
        Ok(match self.rpc.transaction_receipt(hash).await? {
            Some(receipt) if receipt.succeeded() => TransactionStatus::Success,
            Some(_) => TransactionStatus::Reverted,
            None => TransactionStatus::Pending,
        })
    }
}
