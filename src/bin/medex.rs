//! medex - command-line access to the extraction backend
//!
//! Thin front-end over `medex_client`; every command prints the backend's
//! JSON response to stdout.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use medex_client::{ApiClient, CacheMode, ClientConfig};
use serde_json::{Value, json};

/// Medical data extraction backend client
#[derive(Parser)]
#[command(name = "medex")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Query and control the medical data extraction backend")]
struct Args {
    /// Config file (default: $MEDEX_CONFIG, then ~/.medex/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend base URL
    #[arg(short, long, env = "MEDEX_API_URL")]
    base_url: Option<String>,

    /// Bypass every cache for read commands
    #[arg(long, global = true)]
    fresh: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extraction jobs
    #[command(subcommand)]
    Jobs(JobsCommand),

    /// Portal adapters
    #[command(subcommand)]
    Adapters(AdaptersCommand),

    /// Administration
    #[command(subcommand)]
    Admin(AdminCommand),

    /// Realtime dashboard feed
    #[command(subcommand)]
    Realtime(RealtimeCommand),
}

#[derive(Subcommand)]
enum JobsCommand {
    /// List one page of jobs
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        per_page: u32,
    },
    /// Jobs currently running
    Active,
    /// Status of one or more jobs
    Status {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Confirm a manual portal login
    ConfirmLogin { id: String },
    /// Retry a failed job
    Retry { id: String },
}

#[derive(Subcommand)]
enum AdaptersCommand {
    /// List adapters
    List,
    /// Check whether an adapter's source file exists
    FileExists { name: String },
    /// Jobs that reference an adapter
    Dependents { name: String },
}

#[derive(Subcommand)]
enum AdminCommand {
    /// Backend statistics
    Stats,
}

#[derive(Subcommand)]
enum RealtimeCommand {
    /// Current dashboard snapshot
    Snapshot,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config =
        ClientConfig::load(args.config.as_deref())?.with_base_url_override(args.base_url);
    let client = ApiClient::builder().config(config).build()?;
    let mode = CacheMode::fresh(args.fresh);

    let output = match args.command {
        Command::Jobs(cmd) => jobs(&client, cmd, mode).await?,
        Command::Adapters(cmd) => adapters(&client, cmd, mode).await?,
        Command::Admin(AdminCommand::Stats) => client.admin().stats(mode).await?,
        Command::Realtime(RealtimeCommand::Snapshot) => client.realtime().snapshot(mode).await?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn jobs(client: &ApiClient, cmd: JobsCommand, mode: CacheMode) -> medex_client::Result<Value> {
    let jobs = client.jobs();
    match cmd {
        JobsCommand::List { page, per_page } => jobs.list(page, per_page, mode).await,
        JobsCommand::Active => {
            let active = jobs.active(mode).await?;
            Ok(serde_json::to_value(active)?)
        }
        JobsCommand::Status { ids } => Ok(Value::Array(jobs.statuses(&ids, mode).await?)),
        JobsCommand::ConfirmLogin { id } => jobs.confirm_login(&id).await,
        JobsCommand::Retry { id } => jobs.retry(&id).await,
    }
}

async fn adapters(
    client: &ApiClient,
    cmd: AdaptersCommand,
    mode: CacheMode,
) -> medex_client::Result<Value> {
    let adapters = client.adapters();
    match cmd {
        AdaptersCommand::List => adapters.list(mode).await,
        AdaptersCommand::FileExists { name } => {
            let exists = adapters.file_exists(&name).await?;
            Ok(json!({ "adapter": name, "exists": exists }))
        }
        AdaptersCommand::Dependents { name } => {
            let dependents = adapters.dependent_jobs(&name).await?;
            Ok(json!({ "adapter": name, "jobs": dependents.jobs }))
        }
    }
}
