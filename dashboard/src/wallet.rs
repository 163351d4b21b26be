//! Wallet session provider.
//!
//! Holds the statically configured connectors and at most one active
//! session. The session is only changed through [`WalletSession::connect`]
//! and [`WalletSession::disconnect`]; everybody else observes it through
//! [`WalletSession::current_account`] or a [`WalletSession::subscribe`]
//! receiver.

use crate::config::{ConnectorConfig, ConnectorKind, DashboardConfig};
use crate::error::{DashboardError, Result};
use crate::rpc::RpcClient;
use crate::types::Account;
use ethers::signers::{LocalWallet, Signer};
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, Bytes, TransactionRequest, H256, U256};
use tokio::sync::{watch, RwLock};
use tracing::{debug, info, warn};

/// A wallet integration the user can connect with
#[derive(Debug, Clone)]
pub struct Connector {
    /// Stable identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Whether the connector can be used right now
    pub is_authorized: bool,
    backend: Backend,
}

#[derive(Debug, Clone)]
enum Backend {
    Injected,
    LocalKey(Option<LocalWallet>),
}

impl Connector {
    fn from_config(config: &ConnectorConfig, chain_id: u64) -> Result<Self> {
        let backend = match config.kind {
            ConnectorKind::Injected => Backend::Injected,
            ConnectorKind::LocalKey => {
                let wallet = config
                    .private_key
                    .as_deref()
                    .map(|key| {
                        key.parse::<LocalWallet>().map_err(|e| {
                            DashboardError::Config(format!(
                                "Invalid private key for connector {}: {}",
                                config.id, e
                            ))
                        })
                    })
                    .transpose()?
                    .map(|wallet| wallet.with_chain_id(chain_id));
                Backend::LocalKey(wallet)
            }
        };

        let is_authorized = match &backend {
            Backend::Injected => true,
            Backend::LocalKey(wallet) => wallet.is_some(),
        };

        Ok(Self {
            id: config.id.clone(),
            name: config.name.clone(),
            is_authorized,
            backend,
        })
    }

    /// Integration kind
    pub fn kind(&self) -> ConnectorKind {
        match self.backend {
            Backend::Injected => ConnectorKind::Injected,
            Backend::LocalKey(_) => ConnectorKind::LocalKey,
        }
    }
}

#[derive(Debug, Clone)]
struct ActiveSession {
    connector: Connector,
    address: Address,
}

/// Process-wide wallet session
pub struct WalletSession {
    rpc: RpcClient,
    chain_id: u64,
    connectors: Vec<Connector>,
    auto_connect: Option<String>,
    active: RwLock<Option<ActiveSession>>,
    account: watch::Sender<Account>,
}

impl WalletSession {
    /// Build the connector set from configuration
    pub fn new(config: &DashboardConfig, rpc: RpcClient) -> Result<Self> {
        let connectors = config
            .connectors
            .iter()
            .map(|c| Connector::from_config(c, config.chain_id))
            .collect::<Result<Vec<_>>>()?;

        let (account, _) = watch::channel(Account::disconnected());

        Ok(Self {
            rpc,
            chain_id: config.chain_id,
            connectors,
            auto_connect: config.auto_connect.clone(),
            active: RwLock::new(None),
            account,
        })
    }

    /// Configured connectors, in display order
    pub fn list_connectors(&self) -> &[Connector] {
        &self.connectors
    }

    /// Look up a connector by id
    pub fn connector(&self, id: &str) -> Option<&Connector> {
        self.connectors.iter().find(|c| c.id == id)
    }

    /// Current connection state
    pub fn current_account(&self) -> Account {
        self.account.borrow().clone()
    }

    /// Receiver notified on every connect/disconnect
    pub fn subscribe(&self) -> watch::Receiver<Account> {
        self.account.subscribe()
    }

    /// Connect through the given connector
    pub async fn connect(&self, connector_id: &str) -> Result<Account> {
        let connector = self
            .connector(connector_id)
            .ok_or_else(|| {
                DashboardError::Connection(format!("Unknown connector: {}", connector_id))
            })?
            .clone();

        if !connector.is_authorized {
            return Err(DashboardError::Connection(format!(
                "Connector {} is not authorized",
                connector.name
            )));
        }

        debug!("Connecting with {}", connector.name);

        let chain_id = self.rpc.chain_id().await.map_err(connection_error)?;
        if chain_id != self.chain_id {
            return Err(DashboardError::Connection(format!(
                "Node serves chain {} but {} is configured",
                chain_id, self.chain_id
            )));
        }

        let address = match &connector.backend {
            Backend::Injected => self
                .rpc
                .accounts()
                .await
                .map_err(connection_error)?
                .first()
                .copied()
                .ok_or_else(|| {
                    DashboardError::Connection("Node exposes no accounts".to_string())
                })?,
            Backend::LocalKey(Some(wallet)) => wallet.address(),
            Backend::LocalKey(None) => {
                return Err(DashboardError::Connection(format!(
                    "Connector {} has no key",
                    connector.name
                )))
            }
        };

        info!("Connected {:?} with {}", address, connector.name);

        *self.active.write().await = Some(ActiveSession { connector, address });
        let account = Account::connected(address);
        self.account.send_replace(account.clone());
        Ok(account)
    }

    /// Tear down the active session. Disconnecting twice is not an error.
    pub async fn disconnect(&self) -> Result<()> {
        match self.active.write().await.take() {
            Some(session) => info!(
                "Disconnected {:?} from {}",
                session.address, session.connector.name
            ),
            None => debug!("Disconnect requested without an active session"),
        }
        self.account.send_replace(Account::disconnected());
        Ok(())
    }

    /// Silently reconnect the configured auto-connect connector, if any
    pub async fn reconnect(&self) -> Option<Account> {
        let id = self.auto_connect.as_deref()?;
        match self.connect(id).await {
            Ok(account) => Some(account),
            Err(e) => {
                warn!("Silent reconnect with {} failed: {}", id, e);
                None
            }
        }
    }

    /// Submit a transaction from the active account
    pub async fn send_transaction(&self, to: Address, data: Bytes, value: U256) -> Result<H256> {
        let session = self
            .active
            .read()
            .await
            .clone()
            .ok_or(DashboardError::NotConnected)?;

        let request = TransactionRequest::new()
            .from(session.address)
            .to(to)
            .data(data)
            .value(value);

        match &session.connector.backend {
            Backend::Injected => self.rpc.send_transaction(&request).await,
            Backend::LocalKey(Some(wallet)) => self.sign_and_send(wallet, request).await,
            Backend::LocalKey(None) => Err(DashboardError::NotConnected),
        }
    }

    async fn sign_and_send(&self, wallet: &LocalWallet, request: TransactionRequest) -> Result<H256> {
        let nonce = self.rpc.transaction_count(wallet.address()).await?;
        let gas_price = self.rpc.gas_price().await?;
        let request = request
            .nonce(nonce)
            .gas_price(gas_price)
            .chain_id(self.chain_id);
        let gas = self.rpc.estimate_gas(&request).await?;

        let tx: TypedTransaction = request.gas(gas).into();
        let signature = wallet
            .sign_transaction(&tx)
            .await
            .map_err(|e| DashboardError::Signing(e.to_string()))?;

        debug!("Signed transaction with nonce {} and gas {}", nonce, gas);
        self.rpc.send_raw_transaction(&tx.rlp_signed(&signature)).await
    }
}

fn connection_error(error: DashboardError) -> DashboardError {
    DashboardError::Connection(error.to_string())
}
