//! Integration tests for the governance dashboard
//!
//! These tests use a mock JSON-RPC server to simulate an EVM node.

use assert_matches::assert_matches;
use ethers::abi::{decode, ParamType, Token};
use ethers::types::{Address, H256, U256};
use ethers::utils::{hex, id, parse_ether};
use governance_dashboard::{
    Action, ButtonId, ConnectorConfig, Dashboard, DashboardConfig, DashboardError, Element,
    MonitorOptions, MonitorResult, TransactionStatus,
};
use serde_json::{json, Value};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use wiremock::{
    matchers::{body_partial_json, method},
    Mock, MockServer, ResponseTemplate,
};

// First Anvil development key and its address
const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
const DEV_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

/// Helper to create test config pointing at the mock node
fn create_test_config(rpc_url: String) -> DashboardConfig {
    DashboardConfig::anvil()
        .with_rpc_url(rpc_url)
        .with_request_timeout(Duration::from_secs(5))
        .with_max_retries(3)
        .with_retry_config(10, 100, 2.0)
        .with_tx_config(50, 2)
}

fn rpc_result(result: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "result": result
    }))
}

fn rpc_error(code: i64, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "error": {"code": code, "message": message}
    }))
}

async fn mock_method(server: &MockServer, rpc_method: &str, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"method": rpc_method})))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Node answering the calls made while connecting the injected connector
async fn mock_node(server: &MockServer) {
    mock_method(server, "eth_chainId", rpc_result(json!("0x7a69"))).await;
    mock_method(server, "eth_accounts", rpc_result(json!([DEV_ADDRESS]))).await;
}

fn tx_hash(byte: u8) -> H256 {
    H256::repeat_byte(byte)
}

async fn connected_dashboard(server: &MockServer) -> Dashboard {
    mock_node(server).await;
    let dashboard = Dashboard::new(Arc::new(create_test_config(server.uri()))).unwrap();
    assert!(dashboard.connect("injected").await.is_some());
    dashboard
}

/// Bodies of all requests for one RPC method, in arrival order
async fn requests_for(server: &MockServer, rpc_method: &str) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter_map(|request| request.body_json::<Value>().ok())
        .filter(|body| body["method"] == rpc_method)
        .collect()
}

fn calldata(body: &Value) -> Vec<u8> {
    let data = body["params"][0]["data"].as_str().unwrap();
    hex::decode(data.trim_start_matches("0x")).unwrap()
}

#[tokio::test]
async fn test_dashboard_creation_and_validation() {
    assert!(Dashboard::new(Arc::new(DashboardConfig::anvil())).is_ok());

    let invalid = DashboardConfig::anvil().with_rpc_url("not a url");
    assert!(Dashboard::new(Arc::new(invalid)).is_err());

    assert!(DashboardConfig::custom("".to_string(), 1).is_err());
}

#[tokio::test]
async fn test_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
rpc_url = "http://127.0.0.1:9545"
auto_connect = "injected"

[demo]
proposal_id = 7
"#
    )
    .unwrap();

    let config = DashboardConfig::from_file(file.path()).unwrap();
    assert_eq!(config.rpc_url, "http://127.0.0.1:9545");
    assert_eq!(config.chain_id, 31337);
    assert_eq!(config.demo.proposal_id, 7);
    assert_eq!(config.demo.description(), "Transfer 10 Tokens");
    assert_eq!(config.auto_connect.as_deref(), Some("injected"));
}

#[tokio::test]
async fn test_config_from_missing_file() {
    let result = DashboardConfig::from_file("/nonexistent/dashboard.toml");
    assert_matches!(result, Err(DashboardError::Io(_)));
}

#[tokio::test]
async fn test_disconnected_view_lists_connectors() {
    let config = create_test_config("http://127.0.0.1:8545".to_string()).with_connectors(vec![
        ConnectorConfig::injected(),
        ConnectorConfig::local_key(None),
        ConnectorConfig::local_key(Some(DEV_KEY.to_string())),
    ]);
    // Duplicate ids are rejected
    assert!(Dashboard::new(Arc::new(config)).is_err());

    let config = create_test_config("http://127.0.0.1:8545".to_string());
    let dashboard = Dashboard::new(Arc::new(config)).unwrap();
    let view = dashboard.render();

    assert_eq!(view.title, "Governance Dashboard");
    let buttons = view.buttons();
    assert_eq!(buttons.len(), 2);
    assert_eq!(buttons[0].label, "Injected");
    assert!(!buttons[0].disabled);
    assert_eq!(buttons[1].label, "Local Key");
    assert!(buttons[1].disabled);
}

#[tokio::test]
async fn test_connect_renders_truncated_address() {
    let mock_server = MockServer::start().await;
    let dashboard = connected_dashboard(&mock_server).await;

    let account = dashboard.account();
    assert!(account.is_connected);
    assert_eq!(account.address, Some(DEV_ADDRESS.parse::<Address>().unwrap()));

    let view = dashboard.render();
    assert_eq!(view.texts(), vec!["Connected: 0xf39F...2266"]);

    let labels: Vec<&str> = view.buttons().iter().map(|b| b.label.as_str()).collect();
    assert_eq!(
        labels,
        vec!["Disconnect", "Create Proposal", "Vote For", "Vote Against"]
    );
    assert!(view.buttons().iter().all(|b| !b.disabled));
    assert!(view.errors().is_empty());
}

#[tokio::test]
async fn test_connect_rejects_chain_mismatch() {
    let mock_server = MockServer::start().await;
    mock_method(&mock_server, "eth_chainId", rpc_result(json!("0x1"))).await;
    mock_method(&mock_server, "eth_accounts", rpc_result(json!([DEV_ADDRESS]))).await;

    let dashboard = Dashboard::new(Arc::new(create_test_config(mock_server.uri()))).unwrap();
    assert!(dashboard.connect("injected").await.is_none());
    assert!(!dashboard.account().is_connected);

    let err = dashboard.session().connect("injected").await.unwrap_err();
    assert_matches!(err, DashboardError::Connection(_));
}

#[tokio::test]
async fn test_connect_without_node_accounts() {
    let mock_server = MockServer::start().await;
    mock_method(&mock_server, "eth_chainId", rpc_result(json!("0x7a69"))).await;
    mock_method(&mock_server, "eth_accounts", rpc_result(json!([]))).await;

    let dashboard = Dashboard::new(Arc::new(create_test_config(mock_server.uri()))).unwrap();
    let err = dashboard.session().connect("injected").await.unwrap_err();
    assert_eq!(err.to_string(), "Connection error: Node exposes no accounts");
    assert!(dashboard.render().texts().is_empty());
}

#[tokio::test]
async fn test_disconnect_twice() {
    let mock_server = MockServer::start().await;
    let dashboard = connected_dashboard(&mock_server).await;

    assert!(dashboard.session().disconnect().await.is_ok());
    assert!(dashboard.session().disconnect().await.is_ok());

    assert!(!dashboard.account().is_connected);
    assert_eq!(dashboard.render().buttons().len(), 2);
}

#[tokio::test]
async fn test_silent_reconnect_on_start() {
    let mock_server = MockServer::start().await;
    mock_node(&mock_server).await;

    let config = create_test_config(mock_server.uri()).with_auto_connect("injected");
    let dashboard = Dashboard::new(Arc::new(config)).unwrap();

    let account = dashboard.start().await.unwrap();
    assert!(account.is_connected);
    assert!(dashboard.account().is_connected);
}

#[tokio::test]
async fn test_silent_reconnect_failure_is_swallowed() {
    let mock_server = MockServer::start().await;
    mock_method(&mock_server, "eth_chainId", rpc_error(-32000, "node is syncing")).await;

    let config = create_test_config(mock_server.uri()).with_auto_connect("injected");
    let dashboard = Dashboard::new(Arc::new(config)).unwrap();

    assert!(dashboard.start().await.is_none());
    assert!(!dashboard.account().is_connected);
}

#[tokio::test]
async fn test_create_proposal_submits_single_transfer() {
    let mock_server = MockServer::start().await;
    mock_method(&mock_server, "eth_sendTransaction", rpc_result(json!(tx_hash(0xaa)))).await;
    let dashboard = connected_dashboard(&mock_server).await;

    let state = dashboard.create_sample_proposal().settled().await;
    assert!(state.is_success());
    assert_eq!(state.hash, Some(tx_hash(0xaa)));

    let sent = requests_for(&mock_server, "eth_sendTransaction").await;
    assert_eq!(sent.len(), 1);

    let tx = &sent[0]["params"][0];
    let governor = dashboard.contracts().governor;
    assert_eq!(tx["to"].as_str().unwrap().parse::<Address>().unwrap(), governor);
    let from: Address = tx["from"].as_str().unwrap().parse().unwrap();
    assert_eq!(from, DEV_ADDRESS.parse::<Address>().unwrap());

    let data = calldata(&sent[0]);
    assert_eq!(&data[..4], &id("propose(address[],uint256[],bytes[],string)")[..]);

    let args = decode(
        &[
            ParamType::Array(Box::new(ParamType::Address)),
            ParamType::Array(Box::new(ParamType::Uint(256))),
            ParamType::Array(Box::new(ParamType::Bytes)),
            ParamType::String,
        ],
        &data[4..],
    )
    .unwrap();

    let token = dashboard.contracts().token;
    let recipient: Address = DEV_ADDRESS.parse().unwrap();
    let transfer = dashboard
        .contracts()
        .transfer_calldata(recipient, parse_ether(10).unwrap())
        .unwrap();

    assert_eq!(args[0], Token::Array(vec![Token::Address(token)]));
    assert_eq!(args[1], Token::Array(vec![Token::Uint(U256::zero())]));
    assert_eq!(args[2], Token::Array(vec![Token::Bytes(transfer.to_vec())]));
    assert_eq!(args[3], Token::String("Transfer 10 Tokens".to_string()));
}

#[tokio::test]
async fn test_vote_for_and_against_support_codes() {
    let mock_server = MockServer::start().await;
    mock_method(&mock_server, "eth_sendTransaction", rpc_result(json!(tx_hash(0xbb)))).await;
    let dashboard = connected_dashboard(&mock_server).await;

    dashboard.vote_for().settled().await;
    dashboard.vote_against().settled().await;

    let sent = requests_for(&mock_server, "eth_sendTransaction").await;
    assert_eq!(sent.len(), 2);

    let expected = [U256::one(), U256::zero()];
    for (body, support) in sent.iter().zip(expected) {
        let data = calldata(body);
        assert_eq!(&data[..4], &id("castVote(uint256,uint8)")[..]);
        let args = decode(&[ParamType::Uint(256), ParamType::Uint(8)], &data[4..]).unwrap();
        assert_eq!(args, vec![Token::Uint(U256::one()), Token::Uint(support)]);
    }
}

#[tokio::test]
async fn test_queue_and_execute_send_proposal_id() {
    let mock_server = MockServer::start().await;
    mock_method(&mock_server, "eth_sendTransaction", rpc_result(json!(tx_hash(0xcc)))).await;
    let dashboard = connected_dashboard(&mock_server).await;

    assert!(dashboard.queue_proposal(U256::from(42)).settled().await.is_success());
    assert!(dashboard.execute_proposal(U256::from(42)).settled().await.is_success());

    let sent = requests_for(&mock_server, "eth_sendTransaction").await;
    assert_eq!(sent.len(), 2);

    let queue = calldata(&sent[0]);
    assert_eq!(&queue[..4], &id("queue(uint256)")[..]);
    let execute = calldata(&sent[1]);
    assert_eq!(&execute[..4], &id("execute(uint256)")[..]);
    assert_eq!(
        decode(&[ParamType::Uint(256)], &execute[4..]).unwrap(),
        vec![Token::Uint(U256::from(42))]
    );
}

#[tokio::test]
async fn test_pending_vote_disables_buttons() {
    let mock_server = MockServer::start().await;
    mock_method(
        &mock_server,
        "eth_sendTransaction",
        rpc_result(json!(tx_hash(0xdd))).set_delay(Duration::from_millis(500)),
    )
    .await;
    let dashboard = connected_dashboard(&mock_server).await;

    let handle = dashboard.vote_for();
    let view = dashboard.render();

    let vote_for = view.button(&ButtonId::VoteFor).unwrap();
    assert_eq!(vote_for.label, "Voting...");
    assert!(vote_for.disabled);
    let vote_against = view.button(&ButtonId::VoteAgainst).unwrap();
    assert_eq!(vote_against.label, "Voting...");
    assert!(vote_against.disabled);

    // Proposal button is unaffected by a pending vote
    let create = view.button(&ButtonId::CreateProposal).unwrap();
    assert_eq!(create.label, "Create Proposal");
    assert!(!create.disabled);

    handle.settled().await;
    let view = dashboard.render();
    let vote_for = view.button(&ButtonId::VoteFor).unwrap();
    assert_eq!(vote_for.label, "Vote For");
    assert!(!vote_for.disabled);
}

#[tokio::test]
async fn test_pending_proposal_disables_button() {
    let mock_server = MockServer::start().await;
    mock_method(
        &mock_server,
        "eth_sendTransaction",
        rpc_result(json!(tx_hash(0xde))).set_delay(Duration::from_millis(500)),
    )
    .await;
    let dashboard = connected_dashboard(&mock_server).await;

    let handle = dashboard.create_sample_proposal();
    let view = dashboard.render();
    let create = view.button(&ButtonId::CreateProposal).unwrap();
    assert_eq!(create.label, "Creating Proposal...");
    assert!(create.disabled);
    assert!(dashboard.click(&ButtonId::CreateProposal).await.is_none());

    handle.settled().await;
    assert!(!dashboard.call_state(Action::Propose).is_pending);
}

#[tokio::test]
async fn test_revert_rendered_verbatim() {
    let mock_server = MockServer::start().await;
    mock_method(
        &mock_server,
        "eth_sendTransaction",
        rpc_error(3, "execution reverted: Governor: vote not currently active"),
    )
    .await;
    let dashboard = connected_dashboard(&mock_server).await;

    let state = dashboard.vote_for().settled().await;
    assert_eq!(
        state.error.as_deref(),
        Some("execution reverted: Governor: vote not currently active")
    );

    let view = dashboard.render();
    assert_eq!(
        view.errors(),
        vec!["Voting Error: execution reverted: Governor: vote not currently active"]
    );
    // The UI stays interactive after a failure
    assert!(!view.button(&ButtonId::VoteFor).unwrap().disabled);
}

#[tokio::test]
async fn test_proposal_error_rendered_beneath_button() {
    let mock_server = MockServer::start().await;
    mock_method(
        &mock_server,
        "eth_sendTransaction",
        rpc_error(-32000, "insufficient funds for gas * price + value"),
    )
    .await;
    let dashboard = connected_dashboard(&mock_server).await;

    dashboard.create_sample_proposal().settled().await;
    let view = dashboard.render();

    assert_eq!(
        view.errors(),
        vec!["Proposal Error: insufficient funds for gas * price + value"]
    );
    let create = view
        .elements
        .iter()
        .position(|e| matches!(e, Element::Button(b) if b.id == ButtonId::CreateProposal))
        .unwrap();
    let error = view
        .elements
        .iter()
        .position(|e| matches!(e, Element::Error(_)))
        .unwrap();
    assert_eq!(error, create + 1);
}

#[tokio::test]
async fn test_queue_error_is_not_rendered() {
    let mock_server = MockServer::start().await;
    mock_method(
        &mock_server,
        "eth_sendTransaction",
        rpc_error(3, "execution reverted: Governor: proposal not successful"),
    )
    .await;
    let dashboard = connected_dashboard(&mock_server).await;

    let state = dashboard.queue_proposal(U256::one()).settled().await;
    assert!(state.error.is_some());
    assert!(dashboard.call_state(Action::Queue).error.is_some());
    assert!(dashboard.render().errors().is_empty());
}

#[tokio::test]
async fn test_rapid_votes_are_independent() {
    let mock_server = MockServer::start().await;
    mock_method(
        &mock_server,
        "eth_sendTransaction",
        rpc_result(json!(tx_hash(0xee))).set_delay(Duration::from_millis(100)),
    )
    .await;
    let dashboard = connected_dashboard(&mock_server).await;

    let first = dashboard.vote_for();
    let second = dashboard.vote_for();
    assert_ne!(first.id(), second.id());

    assert!(first.settled().await.is_success());
    assert!(second.settled().await.is_success());
    assert_eq!(requests_for(&mock_server, "eth_sendTransaction").await.len(), 2);
}

#[tokio::test]
async fn test_submission_without_connection() {
    let mock_server = MockServer::start().await;
    let dashboard = Dashboard::new(Arc::new(create_test_config(mock_server.uri()))).unwrap();

    let state = dashboard.vote_for().settled().await;
    assert_eq!(state.error.as_deref(), Some("Connector not connected."));
    assert!(requests_for(&mock_server, "eth_sendTransaction").await.is_empty());
}

#[tokio::test]
async fn test_submission_is_not_retried() {
    let mock_server = MockServer::start().await;
    mock_method(
        &mock_server,
        "eth_sendTransaction",
        ResponseTemplate::new(503).set_body_string("Service Unavailable"),
    )
    .await;
    let dashboard = connected_dashboard(&mock_server).await;

    let state = dashboard.vote_against().settled().await;
    assert_eq!(state.error.as_deref(), Some("HTTP 503: Service Unavailable"));
    assert_eq!(requests_for(&mock_server, "eth_sendTransaction").await.len(), 1);
}

#[tokio::test]
async fn test_read_calls_are_retried() {
    let mock_server = MockServer::start().await;

    // First eth_chainId fails, the retry succeeds
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"method": "eth_chainId"})))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    mock_node(&mock_server).await;

    let dashboard = Dashboard::new(Arc::new(create_test_config(mock_server.uri()))).unwrap();
    assert!(dashboard.connect("injected").await.is_some());
    assert_eq!(requests_for(&mock_server, "eth_chainId").await.len(), 2);
}

#[tokio::test]
async fn test_local_key_signs_and_broadcasts() {
    let mock_server = MockServer::start().await;
    mock_method(&mock_server, "eth_chainId", rpc_result(json!("0x7a69"))).await;
    mock_method(&mock_server, "eth_getTransactionCount", rpc_result(json!("0x0"))).await;
    mock_method(&mock_server, "eth_gasPrice", rpc_result(json!("0x3b9aca00"))).await;
    mock_method(&mock_server, "eth_estimateGas", rpc_result(json!("0x30d40"))).await;
    mock_method(&mock_server, "eth_sendRawTransaction", rpc_result(json!(tx_hash(0xff)))).await;

    let config = create_test_config(mock_server.uri())
        .with_connectors(vec![ConnectorConfig::local_key(Some(DEV_KEY.to_string()))]);
    let dashboard = Dashboard::new(Arc::new(config)).unwrap();

    let account = dashboard.connect("local-key").await.unwrap();
    assert_eq!(account.display_address().as_deref(), Some("0xf39F...2266"));

    let state = dashboard.vote_for().settled().await;
    assert_eq!(state.hash, Some(tx_hash(0xff)));

    assert!(requests_for(&mock_server, "eth_sendTransaction").await.is_empty());
    assert!(requests_for(&mock_server, "eth_accounts").await.is_empty());

    let raw = requests_for(&mock_server, "eth_sendRawTransaction").await;
    assert_eq!(raw.len(), 1);
    let bytes = hex::decode(
        raw[0]["params"][0]
            .as_str()
            .unwrap()
            .trim_start_matches("0x"),
    )
    .unwrap();
    // Legacy transactions are RLP lists
    assert!(bytes[0] >= 0xc0);
}

#[tokio::test]
async fn test_local_key_read_failure_surfaces_node_error() {
    let mock_server = MockServer::start().await;
    mock_method(&mock_server, "eth_chainId", rpc_result(json!("0x7a69"))).await;
    mock_method(
        &mock_server,
        "eth_getTransactionCount",
        ResponseTemplate::new(503).set_body_string("Service Unavailable"),
    )
    .await;
    mock_method(&mock_server, "eth_sendRawTransaction", rpc_result(json!(tx_hash(0xff)))).await;

    let config = create_test_config(mock_server.uri())
        .with_connectors(vec![ConnectorConfig::local_key(Some(DEV_KEY.to_string()))]);
    let dashboard = Dashboard::new(Arc::new(config)).unwrap();
    assert!(dashboard.connect("local-key").await.is_some());

    let state = dashboard.vote_for().settled().await;
    assert_eq!(state.error.as_deref(), Some("HTTP 503: Service Unavailable"));
    assert_eq!(
        dashboard.render().errors(),
        vec!["Voting Error: HTTP 503: Service Unavailable"]
    );

    // Initial attempt plus three retries, and nothing is broadcast
    assert_eq!(requests_for(&mock_server, "eth_getTransactionCount").await.len(), 4);
    assert!(requests_for(&mock_server, "eth_sendRawTransaction").await.is_empty());
}

#[tokio::test]
async fn test_health_check_reports_block_number() {
    let mock_server = MockServer::start().await;
    mock_method(&mock_server, "eth_chainId", rpc_result(json!("0x7a69"))).await;
    mock_method(&mock_server, "eth_blockNumber", rpc_result(json!("0x10"))).await;

    let dashboard = Dashboard::new(Arc::new(create_test_config(mock_server.uri()))).unwrap();
    assert_eq!(dashboard.health_check().await.unwrap(), 16);
}

#[tokio::test]
async fn test_health_check_rejects_wrong_chain() {
    let mock_server = MockServer::start().await;
    mock_method(&mock_server, "eth_chainId", rpc_result(json!("0x1"))).await;
    mock_method(&mock_server, "eth_blockNumber", rpc_result(json!("0x10"))).await;

    let dashboard = Dashboard::new(Arc::new(create_test_config(mock_server.uri()))).unwrap();
    let err = dashboard.health_check().await.unwrap_err();
    assert_matches!(err, DashboardError::Config(_));
    assert!(requests_for(&mock_server, "eth_blockNumber").await.is_empty());
}

#[tokio::test]
async fn test_click_ignored_while_vote_pending() {
    let mock_server = MockServer::start().await;
    mock_method(
        &mock_server,
        "eth_sendTransaction",
        rpc_result(json!(tx_hash(0xdd))).set_delay(Duration::from_millis(300)),
    )
    .await;
    let dashboard = connected_dashboard(&mock_server).await;

    let first = dashboard.click(&ButtonId::VoteFor).await.unwrap();
    assert!(dashboard.click(&ButtonId::VoteFor).await.is_none());
    assert!(dashboard.click(&ButtonId::VoteAgainst).await.is_none());

    // Calling the handler directly still submits
    let direct = dashboard.vote_for();
    assert!(first.settled().await.is_success());
    assert!(direct.settled().await.is_success());
    assert_eq!(requests_for(&mock_server, "eth_sendTransaction").await.len(), 2);
}

#[tokio::test]
async fn test_click_flow() {
    let mock_server = MockServer::start().await;
    mock_node(&mock_server).await;
    mock_method(&mock_server, "eth_sendTransaction", rpc_result(json!(tx_hash(0x11)))).await;

    let dashboard = Dashboard::new(Arc::new(create_test_config(mock_server.uri()))).unwrap();

    assert!(dashboard
        .click(&ButtonId::Connect("injected".to_string()))
        .await
        .is_none());
    assert!(dashboard.account().is_connected);

    let handle = dashboard.click(&ButtonId::VoteAgainst).await.unwrap();
    assert_eq!(handle.function(), "castVote");
    assert!(handle.settled().await.is_success());

    dashboard.click(&ButtonId::Disconnect).await;
    assert!(!dashboard.account().is_connected);
}

#[tokio::test]
async fn test_transaction_monitoring_success() {
    let mock_server = MockServer::start().await;
    let hash = tx_hash(0x22);
    mock_method(
        &mock_server,
        "eth_getTransactionReceipt",
        rpc_result(json!({
            "transactionHash": hash,
            "blockNumber": "0x5",
            "status": "0x1"
        })),
    )
    .await;

    let dashboard = Dashboard::new(Arc::new(create_test_config(mock_server.uri()))).unwrap();
    let monitor = dashboard.monitor();

    let result = monitor
        .monitor(hash, MonitorOptions::from_config(dashboard.config()))
        .await
        .unwrap();
    match result {
        MonitorResult::Success(receipt) => {
            assert_eq!(receipt.transaction_hash, hash);
            assert_eq!(receipt.block_number.map(|n| n.as_u64()), Some(5));
        }
        other => panic!("Expected success result, got {:?}", other),
    }

    assert!(monitor.wait_for_confirmation(hash).await.unwrap());
    assert_eq!(monitor.get_status(hash).await.unwrap(), TransactionStatus::Success);
}

#[tokio::test]
async fn test_transaction_monitoring_reverted() {
    let mock_server = MockServer::start().await;
    let hash = tx_hash(0x33);
    mock_method(
        &mock_server,
        "eth_getTransactionReceipt",
        rpc_result(json!({
            "transactionHash": hash,
            "blockNumber": "0x6",
            "status": "0x0"
        })),
    )
    .await;

    let dashboard = Dashboard::new(Arc::new(create_test_config(mock_server.uri()))).unwrap();
    let monitor = dashboard.monitor();

    let result = monitor
        .monitor(hash, MonitorOptions::from_config(dashboard.config()))
        .await
        .unwrap();
    assert_matches!(result, MonitorResult::Reverted(_));
    assert!(!monitor.wait_for_confirmation(hash).await.unwrap());
    assert_eq!(monitor.get_status(hash).await.unwrap(), TransactionStatus::Reverted);
}

#[tokio::test]
async fn test_transaction_monitoring_timeout() {
    let mock_server = MockServer::start().await;
    mock_method(&mock_server, "eth_getTransactionReceipt", rpc_result(Value::Null)).await;

    let dashboard = Dashboard::new(Arc::new(create_test_config(mock_server.uri()))).unwrap();
    let monitor = dashboard.monitor();
    let hash = tx_hash(0x44);

    let options = MonitorOptions::from_config(dashboard.config())
        .with_poll_interval(50)
        .with_timeout(1);
    assert_eq!(monitor.monitor(hash, options).await.unwrap(), MonitorResult::Timeout);
    assert_eq!(monitor.get_status(hash).await.unwrap(), TransactionStatus::Pending);
}

#[tokio::test]
async fn test_concurrent_submissions() {
    let mock_server = MockServer::start().await;
    mock_method(&mock_server, "eth_sendTransaction", rpc_result(json!(tx_hash(0x55)))).await;
    let dashboard = Arc::new(connected_dashboard(&mock_server).await);

    let mut handles = vec![];
    for i in 0..10u64 {
        let dashboard = dashboard.clone();
        handles.push(tokio::spawn(async move {
            dashboard.queue_proposal(U256::from(i)).settled().await
        }));
    }

    for handle in handles {
        assert!(handle.await.unwrap().is_success());
    }
    assert_eq!(requests_for(&mock_server, "eth_sendTransaction").await.len(), 10);
}
