use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use dialoguer::Select;
use ethers::types::U256;
use governance_dashboard::{
    CallHandle, Dashboard, DashboardConfig, MonitorOptions, MonitorResult, VoteSupport,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// TOML configuration file [default: local Anvil node]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// RPC endpoint, overrides the configuration
    #[arg(long, global = true)]
    rpc_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Render the dashboard and click through it
    Interactive,

    /// List the configured connectors
    Connectors,

    /// Create the sample proposal
    Propose(ActionArgs),

    /// Vote on a proposal
    Vote {
        #[command(flatten)]
        args: ActionArgs,

        /// Vote choice
        #[arg(long, value_enum)]
        support: SupportArg,

        /// Proposal to vote on [default: demo proposal]
        #[arg(long)]
        proposal_id: Option<u64>,
    },

    /// Queue a succeeded proposal
    Queue {
        #[command(flatten)]
        args: ActionArgs,

        #[arg(long)]
        proposal_id: u64,
    },

    /// Execute a queued proposal
    Execute {
        #[command(flatten)]
        args: ActionArgs,

        #[arg(long)]
        proposal_id: u64,
    },
}

#[derive(Args)]
struct ActionArgs {
    /// Connector to sign with
    #[arg(long, default_value = "injected")]
    connector: String,

    /// Wait for the transaction receipt
    #[arg(long)]
    wait: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum SupportArg {
    For,
    Against,
    Abstain,
}

impl From<SupportArg> for VoteSupport {
    fn from(support: SupportArg) -> Self {
        match support {
            SupportArg::For => VoteSupport::For,
            SupportArg::Against => VoteSupport::Against,
            SupportArg::Abstain => VoteSupport::Abstain,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    governance_dashboard::init_tracing();

    let config = load_config(cli.config, cli.rpc_url)?;
    let dashboard = Dashboard::new(Arc::new(config))?;

    match cli.command.unwrap_or(Command::Interactive) {
        Command::Interactive => interactive(&dashboard).await,
        Command::Connectors => {
            report_health(&dashboard).await;
            for connector in dashboard.connectors() {
                let status = if connector.is_authorized {
                    "authorized".green()
                } else {
                    "not authorized".red()
                };
                println!("{:<12} {:<12} {}", connector.id, connector.name, status);
            }
            Ok(())
        }
        Command::Propose(args) => {
            run_action(&dashboard, &args, |d| d.create_sample_proposal()).await
        }
        Command::Vote {
            args,
            support,
            proposal_id,
        } => {
            let proposal_id = proposal_id.unwrap_or(dashboard.config().demo.proposal_id);
            run_action(&dashboard, &args, |d| {
                d.vote(U256::from(proposal_id), support.into())
            })
            .await
        }
        Command::Queue { args, proposal_id } => {
            run_action(&dashboard, &args, |d| {
                d.queue_proposal(U256::from(proposal_id))
            })
            .await
        }
        Command::Execute { args, proposal_id } => {
            run_action(&dashboard, &args, |d| {
                d.execute_proposal(U256::from(proposal_id))
            })
            .await
        }
    }
}

fn load_config(path: Option<PathBuf>, rpc_url: Option<String>) -> anyhow::Result<DashboardConfig> {
    let config = match path {
        Some(path) => DashboardConfig::from_file(&path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => DashboardConfig::anvil(),
    }
    .with_env_overrides();

    Ok(match rpc_url {
        Some(url) => config.with_rpc_url(url),
        None => config,
    })
}

async fn report_health(dashboard: &Dashboard) {
    match dashboard.health_check().await {
        Ok(block) => println!(
            "{} {} (chain {}, block {})",
            "Node:".bold(),
            dashboard.config().rpc_url,
            dashboard.config().chain_id,
            block
        ),
        Err(e) => println!(
            "{} {} is not usable: {}",
            "Warning:".yellow().bold(),
            dashboard.config().rpc_url,
            e
        ),
    }
}

/// Run a blocking terminal prompt on the blocking pool so submissions spawned
/// on the runtime keep making progress while the user decides.
async fn prompt<F>(items: Vec<String>, select: F) -> anyhow::Result<usize>
where
    F: FnOnce(Vec<String>) -> anyhow::Result<usize> + Send + 'static,
{
    tokio::task::spawn_blocking(move || select(items)).await?
}

async fn interactive(dashboard: &Dashboard) -> anyhow::Result<()> {
    report_health(dashboard).await;
    dashboard.start().await;

    loop {
        let view = dashboard.render();
        println!("\n{}", view.paint());

        let buttons = view.enabled_buttons();
        let mut items: Vec<String> = buttons.iter().map(|b| b.label.clone()).collect();
        items.push("Refresh".to_string());
        items.push("Quit".to_string());
        let quit = items.len() - 1;

        let choice = prompt(items, |items| {
            Ok(Select::new()
                .with_prompt("Action")
                .items(&items)
                .default(0)
                .interact()?)
        })
        .await?;

        match buttons.get(choice) {
            Some(button) => {
                dashboard.click(&button.id).await;
            }
            None if choice == quit => return Ok(()),
            None => {}
        }
    }
}

async fn run_action<F>(dashboard: &Dashboard, args: &ActionArgs, action: F) -> anyhow::Result<()>
where
    F: FnOnce(&Dashboard) -> CallHandle,
{
    if dashboard.connect(&args.connector).await.is_none() {
        bail!("failed to connect with connector {}", args.connector);
    }

    let handle = action(dashboard);
    let state = handle.settled().await;

    if let Some(message) = state.error {
        bail!("{} failed: {}", handle.function(), message);
    }
    let Some(hash) = state.hash else {
        bail!("{} returned no transaction hash", handle.function());
    };
    println!("{} {} submitted: {:?}", "✓".green(), handle.function(), hash);

    if args.wait {
        let options = MonitorOptions::from_config(dashboard.config());
        match dashboard.monitor().monitor(hash, options).await? {
            MonitorResult::Success(receipt) => println!(
                "{} mined in block {}",
                "✓".green(),
                receipt
                    .block_number
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "?".to_string())
            ),
            MonitorResult::Reverted(_) => bail!("{} reverted", handle.function()),
            MonitorResult::Timeout => bail!("timed out waiting for {:?}", hash),
        }
    }

    Ok(())
}
