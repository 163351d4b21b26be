//! Governance contract interfaces and addresses.

use crate::call::ContractCall;
use crate::config::{ContractAddresses, DemoValues};
use crate::error::{DashboardError, Result};
use crate::types::ProposalCallDescriptor;
use ethers::abi::{parse_abi, Abi, Token};
use ethers::types::{Address, Bytes, U256};
use ethers::utils::parse_ether;
use std::sync::Arc;

/// Governor functions called by the dashboard.
///
/// `queue` and `execute` are the id-only overloads; governors exposing only
/// the `(targets, values, calldatas, descriptionHash)` form reject them and
/// the node's revert message is reported as the call error.
pub const GOVERNOR_INTERFACE: &[&str] = &[
    "function propose(address[] targets, uint256[] values, bytes[] calldatas, string description) returns (uint256)",
    "function castVote(uint256 proposalId, uint8 support) returns (uint256)",
    "function queue(uint256 proposalId)",
    "function execute(uint256 proposalId)",
];

/// Governance token functions used to build proposal calldata
pub const TOKEN_INTERFACE: &[&str] = &["function transfer(address to, uint256 amount) returns (bool)"];

/// Addresses and parsed interfaces of the governance contracts
#[derive(Debug, Clone)]
pub struct Contracts {
    /// Governor contract
    pub governor: Address,
    /// Governance token
    pub token: Address,
    /// Timelock controller
    pub timelock: Address,
    governor_abi: Arc<Abi>,
    token_abi: Arc<Abi>,
}

impl Contracts {
    /// Parse addresses and interface descriptions
    pub fn new(addresses: &ContractAddresses) -> Result<Self> {
        Ok(Self {
            governor: addresses.governor()?,
            token: addresses.token()?,
            timelock: addresses.timelock()?,
            governor_abi: Arc::new(parse_interface(GOVERNOR_INTERFACE)?),
            token_abi: Arc::new(parse_interface(TOKEN_INTERFACE)?),
        })
    }

    /// Governor interface description
    pub fn governor_abi(&self) -> Arc<Abi> {
        self.governor_abi.clone()
    }

    /// Token interface description
    pub fn token_abi(&self) -> Arc<Abi> {
        self.token_abi.clone()
    }

    /// Call descriptor for a governor function
    pub fn governor_call(&self, function: &str, args: Vec<Token>) -> ContractCall {
        ContractCall::new(self.governor, self.governor_abi(), function, args)
    }

    /// Encoded `transfer(recipient, amount)` on the token
    pub fn transfer_calldata(&self, recipient: Address, amount: U256) -> Result<Bytes> {
        ContractCall::new(
            self.token,
            self.token_abi(),
            "transfer",
            vec![Token::Address(recipient), Token::Uint(amount)],
        )
        .encode()
    }

    /// Single-action proposal transferring the demo amount to the demo recipient
    pub fn sample_proposal(&self, demo: &DemoValues) -> Result<ProposalCallDescriptor> {
        let amount = parse_ether(demo.token_amount)
            .map_err(|e| DashboardError::Abi(format!("Invalid token amount: {}", e)))?;
        let calldata = self.transfer_calldata(demo.recipient()?, amount)?;

        Ok(ProposalCallDescriptor::new(demo.description()).push_action(
            self.token,
            U256::zero(),
            calldata,
        ))
    }
}

fn parse_interface(signatures: &[&str]) -> Result<Abi> {
    parse_abi(signatures).map_err(|e| DashboardError::Abi(e.to_string()))
}
