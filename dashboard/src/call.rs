//! Contract call submission.
//!
//! A [`ContractCall`] names a contract, its interface, a function and the
//! arguments. [`CallAdapter::submit`] encodes it, hands it to the wallet
//! session on a background task and returns a [`CallHandle`] whose state is
//! published through a watch channel as the request progresses.

use crate::error::{DashboardError, Result};
use crate::types::PendingCallState;
use crate::wallet::WalletSession;
use chrono::{DateTime, Utc};
use ethers::abi::{Abi, Token};
use ethers::types::{Address, Bytes, U256};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info};

/// Description of one contract function call
#[derive(Debug, Clone)]
pub struct ContractCall {
    /// Target contract
    pub address: Address,
    /// Interface description of the target
    pub interface: Arc<Abi>,
    /// Function name within the interface
    pub function: String,
    /// Call arguments
    pub args: Vec<Token>,
    /// Native value attached to the call
    pub value: U256,
}

impl ContractCall {
    /// Create a call with zero value attached
    pub fn new(
        address: Address,
        interface: Arc<Abi>,
        function: impl Into<String>,
        args: Vec<Token>,
    ) -> Self {
        Self {
            address,
            interface,
            function: function.into(),
            args,
            value: U256::zero(),
        }
    }

    /// ABI-encoded calldata
    pub fn encode(&self) -> Result<Bytes> {
        self.interface
            .function(&self.function)
            .and_then(|function| function.encode_input(&self.args))
            .map(Bytes::from)
            .map_err(|e| DashboardError::Abi(format!("{}: {}", self.function, e)))
    }
}

/// Handle on one submitted call
#[derive(Debug, Clone)]
pub struct CallHandle {
    id: u64,
    function: String,
    submitted_at: DateTime<Utc>,
    state: watch::Receiver<PendingCallState>,
}

impl CallHandle {
    /// Submission sequence number, unique per adapter
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Function that was called
    pub fn function(&self) -> &str {
        &self.function
    }

    /// When the call was submitted
    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    /// Latest published state
    pub fn state(&self) -> PendingCallState {
        self.state.borrow().clone()
    }

    /// Whether the call is still in flight
    pub fn is_pending(&self) -> bool {
        self.state.borrow().is_pending
    }

    /// Wait until the call is no longer pending
    pub async fn settled(&self) -> PendingCallState {
        let mut state = self.state.clone();
        let settled = state
            .wait_for(|s| !s.is_pending)
            .await
            .map(|settled| settled.clone());
        settled.unwrap_or_else(|_| state.borrow().clone())
    }
}

/// Submits contract calls through the active wallet session
#[derive(Clone)]
pub struct CallAdapter {
    session: Arc<WalletSession>,
    next_id: Arc<AtomicU64>,
}

impl CallAdapter {
    /// Create a new adapter over a wallet session
    pub fn new(session: Arc<WalletSession>) -> Self {
        Self {
            session,
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    fn handle(
        &self,
        function: &str,
        initial: PendingCallState,
    ) -> (watch::Sender<PendingCallState>, CallHandle) {
        let (tx, rx) = watch::channel(initial);
        let handle = CallHandle {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            function: function.to_string(),
            submitted_at: Utc::now(),
            state: rx,
        };
        (tx, handle)
    }

    /// Submit a call. Every invocation is an independent request.
    pub fn submit(&self, call: ContractCall) -> CallHandle {
        let (tx, handle) = self.handle(&call.function, PendingCallState::pending());
        let session = self.session.clone();
        let id = handle.id;

        info!("Submitting {} to {:?} (call #{})", call.function, call.address, id);

        tokio::spawn(async move {
            let outcome = match call.encode() {
                Ok(data) => session.send_transaction(call.address, data, call.value).await,
                Err(e) => Err(e),
            };

            let state = match outcome {
                Ok(hash) => {
                    info!("{} accepted (call #{}): {:?}", call.function, id, hash);
                    PendingCallState::submitted(hash)
                }
                Err(e) => {
                    error!("{} failed (call #{}): {}", call.function, id, e);
                    PendingCallState::failed(e.to_string())
                }
            };
            tx.send_replace(state);
        });

        handle
    }

    /// A handle that failed before submission, e.g. the call could not be built
    pub fn rejected(&self, function: &str, error: &DashboardError) -> CallHandle {
        error!("{} failed before submission: {}", function, error);
        let (_tx, handle) = self.handle(function, PendingCallState::failed(error.to_string()));
        handle
    }
}
