//! Network, contract and connector configuration.
//!
//! The dashboard targets a single chain. By default that is the local Anvil
//! development node with the governance contracts deployed at their usual
//! deterministic addresses; everything can be overridden from a TOML file or
//! from the environment.

use crate::error::{DashboardError, Result};
use ethers::types::Address;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Environment variable overriding the RPC endpoint
pub const RPC_URL_ENV: &str = "DASHBOARD_RPC_URL";

/// Environment variable supplying the key of the `local-key` connector
pub const PRIVATE_KEY_ENV: &str = "DASHBOARD_PRIVATE_KEY";

/// Network type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Local Anvil development node
    Anvil,
    /// User-defined endpoint and chain id
    Custom,
}

impl Network {
    /// Get the default RPC URL for this network
    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Network::Anvil => "http://127.0.0.1:8545",
            Network::Custom => "",
        }
    }

    /// Get the default chain id for this network
    pub fn default_chain_id(&self) -> u64 {
        match self {
            Network::Anvil => 31337,
            Network::Custom => 0,
        }
    }
}

/// Compiled-in addresses of the governance contracts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractAddresses {
    /// Governor contract
    pub governor: String,
    /// Governance token contract
    pub token: String,
    /// Timelock controller
    pub timelock: String,
}

impl Default for ContractAddresses {
    fn default() -> Self {
        Self {
            governor: "0x9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0".to_string(),
            token: "0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string(),
            timelock: "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512".to_string(),
        }
    }
}

impl ContractAddresses {
    /// Parsed governor address
    pub fn governor(&self) -> Result<Address> {
        parse_address("governor", &self.governor)
    }

    /// Parsed token address
    pub fn token(&self) -> Result<Address> {
        parse_address("token", &self.token)
    }

    /// Parsed timelock address
    pub fn timelock(&self) -> Result<Address> {
        parse_address("timelock", &self.timelock)
    }
}

/// Fixed values used by the demonstration proposal flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoValues {
    /// Recipient of the proposed token transfer
    pub recipient: String,
    /// Whole tokens transferred by the proposal (18 decimals)
    pub token_amount: u64,
    /// Proposal id the vote buttons are bound to
    pub proposal_id: u64,
    /// Proposal description override. When unset the description is
    /// derived from `token_amount`, so the two cannot drift apart.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Default for DemoValues {
    fn default() -> Self {
        Self {
            recipient: "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".to_string(),
            token_amount: 10,
            proposal_id: 1,
            description: None,
        }
    }
}

impl DemoValues {
    /// Parsed recipient address
    pub fn recipient(&self) -> Result<Address> {
        parse_address("demo recipient", &self.recipient)
    }

    /// Proposal description: the override if set, else "Transfer {amount} Tokens"
    pub fn description(&self) -> String {
        self.description
            .clone()
            .unwrap_or_else(|| format!("Transfer {} Tokens", self.token_amount))
    }
}

/// Kind of wallet integration behind a connector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectorKind {
    /// Accounts managed and unlocked by the node itself
    Injected,
    /// In-process private key
    LocalKey,
}

/// Configuration of one wallet connector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorConfig {
    /// Stable identifier
    pub id: String,
    /// Human readable name shown on the connect button
    pub name: String,
    /// Integration kind
    pub kind: ConnectorKind,
    /// Hex private key, only meaningful for `local-key`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
}

impl ConnectorConfig {
    /// Connector backed by the node's managed accounts
    pub fn injected() -> Self {
        Self {
            id: "injected".to_string(),
            name: "Injected".to_string(),
            kind: ConnectorKind::Injected,
            private_key: None,
        }
    }

    /// Connector backed by a local private key
    pub fn local_key(private_key: Option<String>) -> Self {
        Self {
            id: "local-key".to_string(),
            name: "Local Key".to_string(),
            kind: ConnectorKind::LocalKey,
            private_key,
        }
    }
}

/// Configuration for the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Network to connect to
    pub network: Network,

    /// JSON-RPC endpoint URL
    pub rpc_url: String,

    /// Expected chain id of the endpoint
    pub chain_id: u64,

    /// HTTP request timeout (in seconds)
    pub request_timeout_secs: u64,

    /// Maximum number of retries for failed read requests
    pub max_retries: usize,

    /// Initial retry delay (in milliseconds)
    pub retry_initial_delay_ms: u64,

    /// Maximum retry delay (in milliseconds)
    pub retry_max_delay_ms: u64,

    /// Retry backoff multiplier
    pub retry_multiplier: f64,

    /// Receipt polling interval (in milliseconds)
    pub tx_poll_interval_ms: u64,

    /// Receipt polling timeout (in seconds)
    pub tx_timeout_secs: u64,

    /// Governance contract addresses
    pub contracts: ContractAddresses,

    /// Demonstration flow values
    pub demo: DemoValues,

    /// Available wallet connectors, in display order
    pub connectors: Vec<ConnectorConfig>,

    /// Connector to reconnect silently on start
    pub auto_connect: Option<String>,
}

impl DashboardConfig {
    /// Create a new configuration for the specified network
    pub fn new(network: Network) -> Self {
        Self {
            network,
            rpc_url: network.default_rpc_url().to_string(),
            chain_id: network.default_chain_id(),
            request_timeout_secs: 30,
            max_retries: 3,
            retry_initial_delay_ms: 100,
            retry_max_delay_ms: 5000,
            retry_multiplier: 2.0,
            tx_poll_interval_ms: 1000,
            tx_timeout_secs: 60,
            contracts: ContractAddresses::default(),
            demo: DemoValues::default(),
            connectors: vec![ConnectorConfig::injected(), ConnectorConfig::local_key(None)],
            auto_connect: None,
        }
    }

    /// Create configuration for the local Anvil node
    pub fn anvil() -> Self {
        Self::new(Network::Anvil)
    }

    /// Create a custom configuration
    pub fn custom(rpc_url: String, chain_id: u64) -> Result<Self> {
        if rpc_url.is_empty() {
            return Err(DashboardError::Config(
                "RPC URL cannot be empty".to_string(),
            ));
        }
        if chain_id == 0 {
            return Err(DashboardError::Config(
                "Chain id must be greater than 0".to_string(),
            ));
        }

        Ok(Self {
            rpc_url,
            chain_id,
            ..Self::new(Network::Custom)
        })
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;

        debug!("Loaded configuration from {}", path.as_ref().display());
        Ok(config)
    }

    /// Apply `DASHBOARD_RPC_URL` and `DASHBOARD_PRIVATE_KEY` if they are set
    pub fn with_env_overrides(self) -> Self {
        let rpc_url = std::env::var(RPC_URL_ENV).ok();
        let private_key = std::env::var(PRIVATE_KEY_ENV).ok();
        self.with_overrides(rpc_url, private_key)
    }

    fn with_overrides(mut self, rpc_url: Option<String>, private_key: Option<String>) -> Self {
        if let Some(url) = rpc_url.filter(|url| !url.is_empty()) {
            self.rpc_url = url;
        }
        if let Some(key) = private_key.filter(|key| !key.is_empty()) {
            match self
                .connectors
                .iter_mut()
                .find(|c| c.kind == ConnectorKind::LocalKey)
            {
                Some(connector) => connector.private_key = Some(key),
                None => self.connectors.push(ConnectorConfig::local_key(Some(key))),
            }
        }
        self
    }

    /// Set the RPC endpoint
    pub fn with_rpc_url(mut self, rpc_url: impl Into<String>) -> Self {
        self.rpc_url = rpc_url.into();
        self
    }

    /// Set request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_secs = timeout.as_secs();
        self
    }

    /// Set maximum retries
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set retry delays
    pub fn with_retry_config(
        mut self,
        initial_delay_ms: u64,
        max_delay_ms: u64,
        multiplier: f64,
    ) -> Self {
        self.retry_initial_delay_ms = initial_delay_ms;
        self.retry_max_delay_ms = max_delay_ms;
        self.retry_multiplier = multiplier;
        self
    }

    /// Set receipt polling configuration
    pub fn with_tx_config(mut self, poll_interval_ms: u64, timeout_secs: u64) -> Self {
        self.tx_poll_interval_ms = poll_interval_ms;
        self.tx_timeout_secs = timeout_secs;
        self
    }

    /// Replace the connector set
    pub fn with_connectors(mut self, connectors: Vec<ConnectorConfig>) -> Self {
        self.connectors = connectors;
        self
    }

    /// Reconnect the given connector silently on start
    pub fn with_auto_connect(mut self, connector_id: impl Into<String>) -> Self {
        self.auto_connect = Some(connector_id.into());
        self
    }

    /// HTTP request timeout
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.rpc_url.is_empty() {
            return Err(DashboardError::Config(
                "RPC URL cannot be empty".to_string(),
            ));
        }
        Url::parse(&self.rpc_url)?;
        if self.chain_id == 0 {
            return Err(DashboardError::Config(
                "Chain id must be greater than 0".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(DashboardError::Config(
                "Request timeout must be greater than 0".to_string(),
            ));
        }
        if self.max_retries == 0 {
            return Err(DashboardError::Config(
                "Max retries must be greater than 0".to_string(),
            ));
        }
        if self.retry_initial_delay_ms == 0 {
            return Err(DashboardError::Config(
                "Retry initial delay must be greater than 0".to_string(),
            ));
        }
        if self.retry_multiplier <= 1.0 {
            return Err(DashboardError::Config(
                "Retry multiplier must be greater than 1.0".to_string(),
            ));
        }
        if self.tx_poll_interval_ms == 0 {
            return Err(DashboardError::Config(
                "Transaction poll interval must be greater than 0".to_string(),
            ));
        }
        if self.tx_timeout_secs == 0 {
            return Err(DashboardError::Config(
                "Transaction timeout must be greater than 0".to_string(),
            ));
        }

        self.contracts.governor()?;
        self.contracts.token()?;
        self.contracts.timelock()?;
        self.demo.recipient()?;

        for (i, connector) in self.connectors.iter().enumerate() {
            if connector.id.is_empty() {
                return Err(DashboardError::Config(format!(
                    "Connector #{} has an empty id",
                    i
                )));
            }
            if self.connectors[..i].iter().any(|c| c.id == connector.id) {
                return Err(DashboardError::Config(format!(
                    "Duplicate connector id: {}",
                    connector.id
                )));
            }
        }

        if let Some(id) = &self.auto_connect {
            if !self.connectors.iter().any(|c| &c.id == id) {
                return Err(DashboardError::Config(format!(
                    "Auto-connect connector is not configured: {}",
                    id
                )));
            }
        }

        Ok(())
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self::anvil()
    }
}

fn parse_address(field: &str, value: &str) -> Result<Address> {
    value
        .parse::<Address>()
        .map_err(|e| DashboardError::Config(format!("Invalid {} address {:?}: {}", field, value, e)))
}
