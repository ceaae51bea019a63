//! `depot`: operator command line for the Depot relief-supply tracker.
//!
//! Reads `depot.toml` (or the path given with `--config`), opens the SQLite
//! store, runs one subcommand and prints the result as JSON.
//!
//! # Usage
//!
//! ```text
//! depot site add --name "Boone Hub" --address "1 King St" --city Boone --county Watauga
//! depot inventory activate <SITE> water "Urgently Needed"
//! depot --store /tmp/depot.db inventory show <SITE>
//! ```

mod commands;
mod notifier;
mod settings;

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use commands::Command;
use depot_core::service::Coordinator;
use depot_store_sqlite::SqliteStore;
use notifier::LogNotifier;
use settings::{CliConfig, expand_tilde};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "depot", version, about = "Relief-supply site and inventory tracker")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "depot.toml")]
  config: PathBuf,

  /// Database file; overrides `store_path` from the configuration.
  #[arg(long, value_name = "FILE")]
  store: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();

  let cfg = CliConfig::load(&cli.config)?;

  // RUST_LOG wins over the configured filter. Logs go to stderr so stdout
  // stays machine-readable.
  let filter = EnvFilter::try_from_default_env()
    .or_else(|_| EnvFilter::try_new(&cfg.log_filter))
    .context("invalid log_filter")?;
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .init();

  let store_path = cli
    .store
    .as_deref()
    .map(expand_tilde)
    .unwrap_or(cfg.store_path);

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  tracing::debug!(path = ?store_path, "store opened");

  let coordinator = Coordinator::new(store, LogNotifier);
  commands::run(&coordinator, cli.command).await
}
