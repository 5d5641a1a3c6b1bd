use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use alloy::primitives::Address;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, warn};

use contract_playground::config::{self, Config};
use contract_playground::core::{FormFields, OperationKind, OperationState, Orchestrator, Session};
use contract_playground::domain::chain::WalletClient;
use contract_playground::infrastructure::{AlloyChainClient, LocalWallet, NoWallet};
use contract_playground::modules::playground::{
    functions_report, outcome_report, parse_binding, unknown_parameters,
};
use contract_playground::modules::usdc::{balance_report, disconnected_report, fetch_balance};
use contract_playground::modules::Report;
use contract_playground::store::FormStore;

#[derive(Debug, Parser)]
#[command(
    name = "contract-playground",
    version,
    about = "Load a contract ABI, then read, simulate or write its functions"
)]
struct Args {
    /// HTTP JSON-RPC endpoint (defaults to the configured Arbitrum RPC)
    #[arg(long)]
    rpc: Option<String>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the functions of a contract
    Functions(ContractArgs),
    /// Call a view or pure function
    Read(CallArgs),
    /// Dry-run a state-changing function and estimate its cost
    Simulate(CallArgs),
    /// Submit a state-changing function through the wallet
    Write(CallArgs),
    /// Connect the wallet and check its network
    Connect,
    /// Show the USDC balance of an account
    Usdc {
        /// Account to inspect (defaults to the wallet account)
        #[arg(long)]
        owner: Option<String>,
    },
}

/// Contract form inputs; omitted values fall back to the saved form
#[derive(Debug, clap::Args)]
struct ContractArgs {
    /// Contract address (0x followed by 40 hex characters)
    #[arg(long)]
    address: Option<String>,

    /// File holding the ABI JSON array
    #[arg(long, conflicts_with = "abi_json")]
    abi: Option<PathBuf>,

    /// ABI JSON array given inline
    #[arg(long)]
    abi_json: Option<String>,
}

#[derive(Debug, clap::Args)]
struct CallArgs {
    #[command(flatten)]
    contract: ContractArgs,

    /// Function name, full signature or 0x-prefixed selector
    #[arg(long)]
    function: String,

    /// Parameter value as name=value (positional params use param0, param1, ...)
    #[arg(long = "arg", value_parser = parse_binding)]
    args: Vec<(String, String)>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = config::load();
    let rpc = args.rpc.clone().unwrap_or_else(|| config.rpc.clone());
    let orchestrator = build_orchestrator(&config, &rpc)?;

    let ok = match args.command {
        Command::Functions(contract) => list_functions(&contract)?,
        Command::Read(call) => run_call(&orchestrator, &config, &call, OperationKind::Read).await?,
        Command::Simulate(call) => {
            run_call(&orchestrator, &config, &call, OperationKind::Simulate).await?
        }
        Command::Write(call) => run_call(&orchestrator, &config, &call, OperationKind::Write).await?,
        Command::Connect => connect(&orchestrator, &config).await,
        Command::Usdc { owner } => show_usdc(&orchestrator, &config, owner.as_deref()).await?,
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn build_orchestrator(config: &Config, rpc: &str) -> Result<Orchestrator> {
    let chain = AlloyChainClient::connect_http(rpc)?;
    debug!(endpoint = chain.endpoint_name(), "chain client ready");
    let wallet: Box<dyn WalletClient> = match config.private_key() {
        Some(key) => Box::new(LocalWallet::connect_http(rpc, &key)?),
        None => Box::new(NoWallet::new(&config.private_key_env)),
    };
    Ok(Orchestrator::new(Box::new(chain), wallet))
}

fn open_form_store() -> Option<FormStore> {
    let db_path = config::form_db_path()?;
    if let Some(parent) = db_path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    match FormStore::open(&db_path) {
        Ok(store) => Some(store),
        Err(err) => {
            warn!(error = %err, "form persistence disabled");
            None
        }
    }
}

/// Merge command-line inputs over the saved form
fn resolve_form(args: &ContractArgs, saved: FormFields) -> Result<FormFields> {
    let abi_text = match (&args.abi, &args.abi_json) {
        (Some(path), _) => fs::read_to_string(path)
            .with_context(|| format!("read ABI file {}", path.display()))?,
        (None, Some(text)) => text.clone(),
        (None, None) => saved.abi_text,
    };
    Ok(FormFields {
        contract_address: args
            .address
            .clone()
            .unwrap_or(saved.contract_address),
        abi_text,
    })
}

/// Load the contract and persist the entered form, whatever the outcome
fn load_session(args: &ContractArgs) -> Result<Session> {
    let store = open_form_store();
    let saved = match &store {
        Some(store) => store.load().unwrap_or_else(|err| {
            warn!(error = %err, "could not restore form");
            FormFields::default()
        }),
        None => FormFields::default(),
    };

    let form = resolve_form(args, saved)?;
    if let Some(store) = &store {
        if let Err(err) = store.save(&form) {
            warn!(error = %err, "could not save form");
        }
    }
    Ok(Session::with_form(form).load_contract())
}

fn print(report: &Report) {
    println!("{}", report.render());
}

fn print_error(message: impl Into<String>) {
    print(&Report::new("Error").add("error", message));
}

fn list_functions(args: &ContractArgs) -> Result<bool> {
    let session = load_session(args)?;
    match (&session.contract, &session.error) {
        (Some(contract), _) => {
            print(&functions_report(contract));
            Ok(true)
        }
        (None, Some(err)) => {
            print_error(err.to_string());
            Ok(false)
        }
        (None, None) => Ok(false),
    }
}

async fn run_call(
    orchestrator: &Orchestrator,
    config: &Config,
    call: &CallArgs,
    kind: OperationKind,
) -> Result<bool> {
    let mut session = load_session(&call.contract)?;
    if let Some(err) = &session.error {
        print_error(err.to_string());
        return Ok(false);
    }

    if kind != OperationKind::Read {
        session = orchestrator.connect(&session, &config.target_chain()).await;
        if let Some(err) = &session.error {
            print_error(err.to_string());
            return Ok(false);
        }
    }

    session = session.select_function(&call.function);
    if let Some(err) = &session.error {
        print_error(err.to_string());
        return Ok(false);
    }
    for (key, value) in &call.args {
        session = session.set_param(key, value);
    }
    if let Some(function) = session.selected_function() {
        let unknown = unknown_parameters(function, &session.binding);
        if !unknown.is_empty() {
            print_error(format!(
                "Unknown parameter(s): {}. Expected: {}",
                unknown.join(", "),
                function.input_keys().join(", ")
            ));
            return Ok(false);
        }
    }

    let session = orchestrator.execute(&session, kind).await;
    print(&outcome_report(&session, kind, config));
    Ok(matches!(session.slot(kind), OperationState::Success(_)))
}

async fn connect(orchestrator: &Orchestrator, config: &Config) -> bool {
    let session = orchestrator
        .connect(&Session::new(), &config.target_chain())
        .await;

    let mut report = Report::new("Wallet");
    if let Some(account) = session.account {
        report = report.add("account", account.to_checksum(None));
    }
    if let Some(chain_id) = session.chain_id {
        report = report.add("chain id", chain_id.to_string());
    }
    match &session.error {
        Some(err) => {
            print(&report.add("error", err.to_string()));
            false
        }
        None => {
            print(&report.add("status", "connected"));
            true
        }
    }
}

async fn show_usdc(
    orchestrator: &Orchestrator,
    config: &Config,
    owner: Option<&str>,
) -> Result<bool> {
    let owner = match owner {
        Some(text) => text
            .parse::<Address>()
            .with_context(|| format!("invalid owner address '{}'", text))?,
        None => {
            let session = orchestrator
                .connect(&Session::new(), &config.target_chain())
                .await;
            match session.account {
                Some(account) => account,
                None => {
                    print(&disconnected_report());
                    return Ok(false);
                }
            }
        }
    };

    match fetch_balance(orchestrator, &config.usdc_address, owner).await {
        Ok(balance) => {
            print(&balance_report(&balance));
            Ok(true)
        }
        Err(err) => {
            print_error(format!("Failed to load USDC balance: {}", err));
            Ok(false)
        }
    }
}
