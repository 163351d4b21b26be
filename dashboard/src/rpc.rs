//! JSON-RPC client for the EVM node.
//!
//! Thin wrapper over the `eth_*` methods the dashboard needs. Reads are
//! retried with the configured backoff; transaction submissions are sent
//! exactly once.

use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use crate::retry::RetryStrategy;
use crate::types::TransactionReceipt;
use ethers::types::{Address, Bytes, TransactionRequest, H256, U256, U64};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info};

/// JSON-RPC request ID type
type RequestId = u64;

/// EVM JSON-RPC client
#[derive(Clone)]
pub struct RpcClient {
    client: Client,
    url: String,
    retry_strategy: RetryStrategy,
    request_id: Arc<AtomicU64>,
}

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: RequestId,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct JsonRpcResponse {
    jsonrpc: String,
    id: Value,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct JsonRpcError {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

impl RpcClient {
    /// Create a new RPC client
    pub fn new(config: &DashboardConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(DashboardError::Network)?;

        Ok(Self {
            client,
            url: config.rpc_url.clone(),
            retry_strategy: RetryStrategy::from_config(config),
            request_id: Arc::new(AtomicU64::new(1)),
        })
    }

    /// Endpoint this client talks to
    pub fn url(&self) -> &str {
        &self.url
    }

    fn next_request_id(&self) -> RequestId {
        self.request_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Single JSON-RPC round trip. A `null` result is returned as `Value::Null`.
    async fn send_request(&self, method: &str, params: &Value) -> Result<Value> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: self.next_request_id(),
            method,
            params: params.clone(),
        };

        debug!("RPC request: {} (id: {})", method, request.id);

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(DashboardError::Network)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(DashboardError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let rpc_response: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| DashboardError::InvalidResponse(e.to_string()))?;

        if let Some(error) = rpc_response.error {
            error!("RPC error from {}: {} (code: {})", method, error.message, error.code);
            return Err(DashboardError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        Ok(rpc_response.result.unwrap_or(Value::Null))
    }

    /// Retried call for read-only methods
    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        let value = self
            .retry_strategy
            .retry(|| self.send_request(method, &params))
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Unretried call for methods with side effects
    async fn call_once<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        let value = self.send_request(method, &params).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// `eth_chainId`
    pub async fn chain_id(&self) -> Result<u64> {
        let chain_id: U64 = self.call("eth_chainId", json!([])).await?;
        Ok(chain_id.as_u64())
    }

    /// `eth_blockNumber`
    pub async fn block_number(&self) -> Result<u64> {
        let number: U64 = self.call("eth_blockNumber", json!([])).await?;
        Ok(number.as_u64())
    }

    /// `eth_accounts`: accounts managed by the node
    pub async fn accounts(&self) -> Result<Vec<Address>> {
        self.call("eth_accounts", json!([])).await
    }

    /// `eth_getTransactionCount` against the pending block
    pub async fn transaction_count(&self, address: Address) -> Result<U256> {
        self.call("eth_getTransactionCount", json!([address, "pending"]))
            .await
    }

    /// `eth_gasPrice`
    pub async fn gas_price(&self) -> Result<U256> {
        self.call("eth_gasPrice", json!([])).await
    }

    /// `eth_estimateGas`
    pub async fn estimate_gas(&self, tx: &TransactionRequest) -> Result<U256> {
        self.call("eth_estimateGas", json!([tx])).await
    }

    /// `eth_sendTransaction`: the node signs with one of its managed accounts
    pub async fn send_transaction(&self, tx: &TransactionRequest) -> Result<H256> {
        let hash: H256 = self.call_once("eth_sendTransaction", json!([tx])).await?;
        info!("Transaction sent: {:?}", hash);
        Ok(hash)
    }

    /// `eth_sendRawTransaction`: broadcast a locally signed transaction
    pub async fn send_raw_transaction(&self, raw: &Bytes) -> Result<H256> {
        let hash: H256 = self
            .call_once("eth_sendRawTransaction", json!([raw]))
            .await?;
        info!("Raw transaction sent: {:?}", hash);
        Ok(hash)
    }

    /// `eth_getTransactionReceipt`; `None` while the transaction is unmined
    pub async fn transaction_receipt(&self, hash: H256) -> Result<Option<TransactionReceipt>> {
        self.call("eth_getTransactionReceipt", json!([hash])).await
    }

    /// Health check - verify the node answers and serves the expected chain.
    /// Returns the latest block number.
    pub async fn health_check(&self, expected_chain_id: u64) -> Result<u64> {
        debug!("Performing RPC health check against {}", self.url);

        let chain_id = self.chain_id().await?;
        if chain_id != expected_chain_id {
            return Err(DashboardError::Config(format!(
                "Node at {} serves chain {} but {} is configured",
                self.url, chain_id, expected_chain_id
            )));
        }

        let block = self.block_number().await?;
        info!("RPC health check passed (chain {}, block {})", chain_id, block);
        Ok(block)
    }
}
