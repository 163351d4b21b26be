//! Common types shared by the wallet session, the call adapter and the
//! dashboard.

use ethers::abi::Token;
use ethers::types::{Address, Bytes, H256, U256, U64};
use ethers::utils::to_checksum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Connection state of the wallet session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Account {
    /// Active address, if connected
    pub address: Option<Address>,
    /// Whether a session is active
    pub is_connected: bool,
}

impl Account {
    /// A connected account
    pub fn connected(address: Address) -> Self {
        Self {
            address: Some(address),
            is_connected: true,
        }
    }

    /// The disconnected state
    pub fn disconnected() -> Self {
        Self::default()
    }

    /// Checksummed address, if connected
    pub fn checksum_address(&self) -> Option<String> {
        self.address.map(|address| to_checksum(&address, None))
    }

    /// Short form of the address: first 6 and last 4 characters
    pub fn display_address(&self) -> Option<String> {
        self.checksum_address().map(|address| truncate_address(&address))
    }
}

/// Shorten an address to `0xABCD...WXYZ`
pub fn truncate_address(address: &str) -> String {
    if address.len() <= 10 {
        return address.to_string();
    }
    format!("{}...{}", &address[..6], &address[address.len() - 4..])
}

/// Vote choice understood by the governor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteSupport {
    /// Vote against the proposal
    Against = 0,
    /// Vote for the proposal
    For = 1,
    /// Abstain
    Abstain = 2,
}

impl VoteSupport {
    /// Numeric support code
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for VoteSupport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteSupport::Against => write!(f, "against"),
            VoteSupport::For => write!(f, "for"),
            VoteSupport::Abstain => write!(f, "abstain"),
        }
    }
}

/// A single vote action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteRequest {
    /// Proposal being voted on
    pub proposal_id: U256,
    /// Vote choice
    pub support: VoteSupport,
}

impl VoteRequest {
    /// `castVote` arguments
    pub fn into_tokens(self) -> Vec<Token> {
        vec![
            Token::Uint(self.proposal_id),
            Token::Uint(U256::from(self.support.code())),
        ]
    }
}

/// Arguments of a governor `propose` call.
///
/// Targets, values and calldatas are only ever extended together, so the
/// three sequences always have the same length and index `i` of each
/// describes one sub-action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProposalCallDescriptor {
    targets: Vec<Address>,
    values: Vec<U256>,
    calldatas: Vec<Bytes>,
    description: String,
}

impl ProposalCallDescriptor {
    /// Empty proposal with the given description
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Default::default()
        }
    }

    /// Append one sub-action
    pub fn push_action(mut self, target: Address, value: U256, calldata: Bytes) -> Self {
        self.targets.push(target);
        self.values.push(value);
        self.calldatas.push(calldata);
        self
    }

    /// Contract addresses called by the proposal
    pub fn targets(&self) -> &[Address] {
        &self.targets
    }

    /// Native token amounts, one per target
    pub fn values(&self) -> &[U256] {
        &self.values
    }

    /// Encoded calls, one per target
    pub fn calldatas(&self) -> &[Bytes] {
        &self.calldatas
    }

    /// Free text description
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Number of sub-actions
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether the proposal has no sub-actions
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// `propose` arguments
    pub fn into_tokens(self) -> Vec<Token> {
        vec![
            Token::Array(self.targets.into_iter().map(Token::Address).collect()),
            Token::Array(self.values.into_iter().map(Token::Uint).collect()),
            Token::Array(
                self.calldatas
                    .into_iter()
                    .map(|calldata| Token::Bytes(calldata.to_vec()))
                    .collect(),
            ),
            Token::String(self.description),
        ]
    }
}

/// Progress of one submitted contract call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingCallState {
    /// Whether the call is still waiting on the wallet or the node
    pub is_pending: bool,
    /// Failure message, verbatim
    pub error: Option<String>,
    /// Transaction hash once the node accepted the transaction
    pub hash: Option<H256>,
}

impl PendingCallState {
    /// Freshly submitted
    pub fn pending() -> Self {
        Self {
            is_pending: true,
            ..Default::default()
        }
    }

    /// Accepted by the node
    pub fn submitted(hash: H256) -> Self {
        Self {
            is_pending: false,
            error: None,
            hash: Some(hash),
        }
    }

    /// Rejected or failed
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            is_pending: false,
            error: Some(error.into()),
            hash: None,
        }
    }

    /// Whether the call has completed successfully
    pub fn is_success(&self) -> bool {
        !self.is_pending && self.error.is_none() && self.hash.is_some()
    }
}

/// Mining status of a submitted transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionStatus {
    /// No receipt yet
    Pending,
    /// Mined and executed
    Success,
    /// Mined but reverted
    Reverted,
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionStatus::Pending => write!(f, "PENDING"),
            TransactionStatus::Success => write!(f, "SUCCESS"),
            TransactionStatus::Reverted => write!(f, "REVERTED"),
        }
    }
}

/// Subset of `eth_getTransactionReceipt` used by the monitor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    /// Transaction hash
    pub transaction_hash: H256,
    /// Block the transaction was included in
    pub block_number: Option<U64>,
    /// 1 for success, 0 for revert
    pub status: Option<U64>,
}

impl TransactionReceipt {
    /// Whether execution succeeded
    pub fn succeeded(&self) -> bool {
        self.status == Some(U64::one())
    }
}
