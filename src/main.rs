use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use timelock_codec::config::{self, Config};
use timelock_codec::core::{Session, TimelockContract};
use timelock_codec::domain::abi::{parse_abi, AbiLibrary, AbiRecord};
use timelock_codec::domain::timelock::{default_eta, parse_eta, TimelockOperation};
use timelock_codec::infrastructure::abi::coerce::coerce_address;
use timelock_codec::infrastructure::{AbiApiClient, AbiScanner};
use timelock_codec::modules::form::TransactionForm;
use timelock_codec::modules::toolkit::{decode, encode, selector, ToolResult};

#[derive(Debug, Parser)]
#[command(
    name = "tlc",
    version,
    about = "tlc: encode and decode Compound-style timelock transactions"
)]
struct Args {
    /// Log filter used when RUST_LOG is not set (e.g. debug, timelock_codec=trace)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List timelock methods and their selectors
    Methods,

    /// List the encodable functions of an ABI file
    Functions {
        #[arg(long)]
        abi: PathBuf,
    },

    /// List ABIs from the configured directories or the backend
    Abis {
        /// Fetch from the backend API instead of scanning directories
        #[arg(long)]
        remote: bool,

        /// Backend base URL (overrides config)
        #[arg(long)]
        api_url: Option<String>,
    },

    /// Encode a function call and wrap it in a timelock call
    Encode(EncodeArgs),

    /// Decode parameter data (no selector) against a signature
    Decode {
        #[arg(long)]
        signature: String,
        #[arg(long)]
        data: String,
    },

    /// Decode full queue/execute/cancel calldata
    DecodeCall {
        #[arg(long)]
        data: String,
    },
}

#[derive(Debug, clap::Args)]
struct EncodeArgs {
    /// ABI JSON file (raw array or artifact with an `abi` field)
    #[arg(long)]
    abi: PathBuf,

    /// Function selection, e.g. approve(address,uint256)
    #[arg(long)]
    function: String,

    /// Argument values in parameter order; tuples and arrays as JSON
    #[arg(long = "arg")]
    args: Vec<String>,

    /// queue, execute or cancel
    #[arg(long, default_value = "queue")]
    method: String,

    /// Timelock address, or the id of a configured timelock
    #[arg(long)]
    timelock: Option<String>,

    /// Target contract address
    #[arg(long)]
    target: String,

    /// Value in wei
    #[arg(long, default_value = "")]
    value: String,

    /// UNIX seconds or local YYYY-MM-DDTHH:MM; defaults to two days ahead at 14:00
    #[arg(long)]
    eta: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = config::load();

    let result = match args.command {
        Command::Methods => selector::methods(),
        Command::Functions { abi } => {
            let record = load_abi_record(&abi)?;
            selector::functions(&record.entries()?)
        }
        Command::Abis { remote, api_url } => {
            let library = load_library(&config, remote, api_url).await?;
            selector::abis(&library)
        }
        Command::Encode(encode_args) => run_encode(&config, encode_args)?,
        Command::Decode { signature, data } => decode::decode(&signature, &data)?,
        Command::DecodeCall { data } => decode::decode_call(&data)?,
    };

    print!("{result}");
    Ok(())
}

fn load_abi_record(path: &Path) -> Result<AbiRecord> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read ABI file {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("{} is not JSON", path.display()))?;
    let abi = match value.get("abi") {
        Some(abi) => abi.clone(),
        None => value,
    };
    let abi_content = abi.to_string();
    parse_abi(&abi_content).with_context(|| format!("{} is not an ABI", path.display()))?;

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("abi")
        .to_string();
    Ok(AbiRecord::new(1, name, abi_content))
}

async fn load_library(
    config: &Config,
    remote: bool,
    api_url: Option<String>,
) -> Result<AbiLibrary> {
    if remote {
        let Some(api_url) = api_url.or_else(|| config.api_url.clone()) else {
            bail!("no backend configured: pass --api-url or set api_url in the config");
        };
        let client = AbiApiClient::new(api_url)?;
        return client.list_abis().await;
    }
    Ok(AbiScanner::scan_roots(&config.abi_dirs()))
}

fn resolve_timelock(config: &Config, input: &str) -> Result<TimelockContract> {
    if let Ok(id) = input.parse::<u64>() {
        if let Some(timelock) = config.timelock(id) {
            return Ok(timelock.clone());
        }
        bail!("no configured timelock with id {id}");
    }
    let contract_address = coerce_address(input)?;
    let configured = config
        .timelocks
        .iter()
        .find(|t| t.contract_address == contract_address);
    Ok(configured.cloned().unwrap_or(TimelockContract {
        id: 0,
        remark: String::new(),
        chain_id: 0,
        contract_address,
    }))
}

fn run_encode(config: &Config, args: EncodeArgs) -> Result<ToolResult> {
    let operation: TimelockOperation = args.method.parse().map_err(anyhow::Error::msg)?;
    let record = load_abi_record(&args.abi)?;
    let library = AbiLibrary::from_records(vec![record]);

    let eta = match args.eta.as_deref() {
        Some(input) => parse_eta(input, &Local)?,
        None => default_eta(&Local::now()).context("cannot compute default ETA")?,
    };

    let mut session = Session::new();
    let mut form = TransactionForm::new();
    if let Some(input) = args.timelock.as_deref() {
        let timelock = resolve_timelock(config, input)?;
        form.select_timelock(Some(timelock.id));
        session.set_timelocks(vec![timelock]);
    }
    form.select_method(operation.signature());
    form.set_target(args.target);
    form.set_value(args.value);
    form.set_eta(Some(eta));
    form.select_abi(Some(1));
    form.select_function(args.function);
    for (index, value) in args.args.into_iter().enumerate() {
        form.set_argument(index, value);
    }

    let now = u64::try_from(Utc::now().timestamp()).unwrap_or_default();
    Ok(encode::encode(&form, &session, &library, now))
}
