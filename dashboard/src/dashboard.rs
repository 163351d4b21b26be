//! Governance dashboard controller.
//!
//! Turns user actions into governor calls and renders the current state of
//! the wallet session and of the latest call per action into a [`View`].

use crate::call::{CallAdapter, CallHandle, ContractCall};
use crate::config::DashboardConfig;
use crate::contracts::Contracts;
use crate::error::Result;
use crate::monitor::TransactionMonitor;
use crate::rpc::RpcClient;
use crate::types::{Account, PendingCallState, VoteRequest, VoteSupport};
use crate::view::{Button, ButtonId, ButtonStyle, Element, View};
use crate::wallet::{Connector, WalletSession};
use ethers::abi::Token;
use ethers::types::U256;
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info};

/// Page title
pub const TITLE: &str = "Governance Dashboard";

/// User actions that submit a governor call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// `propose`
    Propose,
    /// `castVote`
    Vote,
    /// `queue`
    Queue,
    /// `execute`
    Execute,
}

impl Action {
    const ALL: [Action; 4] = [Action::Propose, Action::Vote, Action::Queue, Action::Execute];

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Propose => write!(f, "propose"),
            Action::Vote => write!(f, "vote"),
            Action::Queue => write!(f, "queue"),
            Action::Execute => write!(f, "execute"),
        }
    }
}

/// The dashboard controller.
///
/// Keeps one slot per [`Action`] holding the handle of the most recent call
/// of that kind. A new invocation replaces the slot; the previous call keeps
/// running independently.
pub struct Dashboard {
    config: Arc<DashboardConfig>,
    rpc: RpcClient,
    session: Arc<WalletSession>,
    calls: CallAdapter,
    contracts: Contracts,
    demo_proposal_id: U256,
    slots: [watch::Sender<Option<CallHandle>>; 4],
}

impl Dashboard {
    /// Create a dashboard from a validated configuration
    pub fn new(config: Arc<DashboardConfig>) -> Result<Self> {
        config.validate()?;

        info!(
            "Initializing governance dashboard for {} (chain {})",
            config.rpc_url, config.chain_id
        );

        let rpc = RpcClient::new(&config)?;
        let session = Arc::new(WalletSession::new(&config, rpc.clone())?);
        let calls = CallAdapter::new(session.clone());
        let contracts = Contracts::new(&config.contracts)?;

        Ok(Self {
            demo_proposal_id: U256::from(config.demo.proposal_id),
            slots: Action::ALL.map(|_| watch::channel(None).0),
            config,
            rpc,
            session,
            calls,
            contracts,
        })
    }

    /// Silent reconnect of the configured auto-connect connector
    pub async fn start(&self) -> Option<Account> {
        self.session.reconnect().await
    }

    /// Configuration in use
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Shared wallet session
    pub fn session(&self) -> &Arc<WalletSession> {
        &self.session
    }

    /// Governance contracts
    pub fn contracts(&self) -> &Contracts {
        &self.contracts
    }

    /// Current connection state
    pub fn account(&self) -> Account {
        self.session.current_account()
    }

    /// Configured connectors
    pub fn connectors(&self) -> &[Connector] {
        self.session.list_connectors()
    }

    /// Check that the node is reachable and serves the configured chain.
    /// Returns the latest block number.
    pub async fn health_check(&self) -> Result<u64> {
        self.rpc.health_check(self.config.chain_id).await
    }

    /// Receipt monitor over the dashboard's node
    pub fn monitor(&self) -> TransactionMonitor {
        TransactionMonitor::new(self.rpc.clone(), &self.config)
    }

    /// Handle of the latest call for an action
    pub fn latest_call(&self, action: Action) -> Option<CallHandle> {
        self.slots[action.slot()].borrow().clone()
    }

    /// State of the latest call for an action; idle if none was made
    pub fn call_state(&self, action: Action) -> PendingCallState {
        self.latest_call(action)
            .map(|handle| handle.state())
            .unwrap_or_default()
    }

    /// Connect through a connector. Failures are logged, never returned.
    pub async fn connect(&self, connector_id: &str) -> Option<Account> {
        match self.session.connect(connector_id).await {
            Ok(account) => Some(account),
            Err(e) => {
                error!("Failed to connect with {}: {}", connector_id, e);
                None
            }
        }
    }

    /// Disconnect the active session. Failures are logged, never returned.
    pub async fn disconnect(&self) {
        if let Err(e) = self.session.disconnect().await {
            error!("Failed to disconnect: {}", e);
        }
    }

    fn dispatch(&self, action: Action, call: Result<ContractCall>) -> CallHandle {
        let handle = match call {
            Ok(call) => self.calls.submit(call),
            Err(e) => self.calls.rejected(&action.to_string(), &e),
        };
        self.slots[action.slot()].send_replace(Some(handle.clone()));
        handle
    }

    /// Propose transferring the demo amount of tokens to the demo recipient
    pub fn create_sample_proposal(&self) -> CallHandle {
        let call = self
            .contracts
            .sample_proposal(&self.config.demo)
            .map(|proposal| {
                debug!(
                    "Proposal \"{}\" with {} action(s)",
                    proposal.description(),
                    proposal.len()
                );
                self.contracts
                    .governor_call("propose", proposal.into_tokens())
            });
        self.dispatch(Action::Propose, call)
    }

    /// Cast a vote on a proposal
    pub fn vote(&self, proposal_id: U256, support: VoteSupport) -> CallHandle {
        let request = VoteRequest {
            proposal_id,
            support,
        };
        debug!("Voting {} on proposal {}", support, proposal_id);
        let call = self
            .contracts
            .governor_call("castVote", request.into_tokens());
        self.dispatch(Action::Vote, Ok(call))
    }

    /// Vote for the demo proposal
    pub fn vote_for(&self) -> CallHandle {
        self.vote(self.demo_proposal_id, VoteSupport::For)
    }

    /// Vote against the demo proposal
    pub fn vote_against(&self) -> CallHandle {
        self.vote(self.demo_proposal_id, VoteSupport::Against)
    }

    /// Queue a succeeded proposal in the timelock
    pub fn queue_proposal(&self, proposal_id: U256) -> CallHandle {
        let call = self
            .contracts
            .governor_call("queue", vec![Token::Uint(proposal_id)]);
        self.dispatch(Action::Queue, Ok(call))
    }

    /// Execute a queued proposal
    pub fn execute_proposal(&self, proposal_id: U256) -> CallHandle {
        let call = self
            .contracts
            .governor_call("execute", vec![Token::Uint(proposal_id)]);
        self.dispatch(Action::Execute, Ok(call))
    }

    /// Render the page for the current state
    pub fn render(&self) -> View {
        let mut view = View::new(TITLE);
        let account = self.account();

        if !account.is_connected {
            for connector in self.connectors() {
                view.push(Element::Button(
                    Button::new(
                        ButtonId::Connect(connector.id.clone()),
                        connector.name.clone(),
                        ButtonStyle::Primary,
                    )
                    .disabled(!connector.is_authorized),
                ));
            }
            return view;
        }

        view.push(Element::Text(format!(
            "Connected: {}",
            account.display_address().unwrap_or_default()
        )));
        view.push(Element::Button(Button::new(
            ButtonId::Disconnect,
            "Disconnect",
            ButtonStyle::Danger,
        )));

        let proposal = self.call_state(Action::Propose);
        let label = if proposal.is_pending {
            "Creating Proposal..."
        } else {
            "Create Proposal"
        };
        view.push(Element::Button(
            Button::new(ButtonId::CreateProposal, label, ButtonStyle::Primary)
                .disabled(proposal.is_pending),
        ));
        if let Some(message) = proposal.error {
            view.push(Element::Error(format!("Proposal Error: {}", message)));
        }

        view.push(Element::Heading("Vote on Proposals".to_string()));

        let vote = self.call_state(Action::Vote);
        let (for_label, against_label) = if vote.is_pending {
            ("Voting...", "Voting...")
        } else {
            ("Vote For", "Vote Against")
        };
        view.push(Element::Button(
            Button::new(ButtonId::VoteFor, for_label, ButtonStyle::Success)
                .disabled(vote.is_pending),
        ));
        view.push(Element::Button(
            Button::new(ButtonId::VoteAgainst, against_label, ButtonStyle::Danger)
                .disabled(vote.is_pending),
        ));
        if let Some(message) = vote.error {
            view.push(Element::Error(format!("Voting Error: {}", message)));
        }

        view
    }

    /// Route a click on a rendered button to its handler.
    ///
    /// Clicks on buttons that are not currently rendered or are disabled are
    /// ignored. Both vote buttons are disabled while a vote is pending, so a
    /// second vote click during that window is dropped here. Calling
    /// [`Dashboard::vote`] and friends directly never deduplicates: each call
    /// is an independent request. Returns the handle when the click
    /// submitted a call.
    pub async fn click(&self, id: &ButtonId) -> Option<CallHandle> {
        let clickable = self
            .render()
            .button(id)
            .map(|button| !button.disabled)
            .unwrap_or(false);
        if !clickable {
            debug!("Ignoring click on unavailable button {:?}", id);
            return None;
        }

        match id {
            ButtonId::Connect(connector_id) => {
                self.connect(connector_id).await;
                None
            }
            ButtonId::Disconnect => {
                self.disconnect().await;
                None
            }
            ButtonId::CreateProposal => Some(self.create_sample_proposal()),
            ButtonId::VoteFor => Some(self.vote_for()),
            ButtonId::VoteAgainst => Some(self.vote_against()),
        }
    }
}
