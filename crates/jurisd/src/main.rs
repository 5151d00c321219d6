//! Juris Daemon - case intake, matching, and lifecycle service

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};

use jurisd::config::{JurisConfig, CONFIG_PATH};
use jurisd::ledger::WorkloadLedger;
use jurisd::lifecycle::LifecycleEngine;
use jurisd::notifier::LogNotifier;
use jurisd::server::{self, AppState};
use jurisd::store::{AdvocateStore, CaseStore};

#[derive(Parser, Debug)]
#[command(name = "jurisd", version, about = "Juris case intake and matching daemon")]
struct Args {
    /// Config file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured listen address
    #[arg(long)]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let args = Args::parse();

    info!("Juris Daemon v{} starting", env!("CARGO_PKG_VERSION"));

    let config_path = args.config.unwrap_or_else(|| PathBuf::from(CONFIG_PATH));
    let mut config = JurisConfig::load(&config_path)?;
    if let Some(listen) = args.listen {
        config.listen_addr = listen;
    }

    let lexicon = config.load_lexicon()?;
    info!(
        "lexicon {} loaded: {} categories, {} urgency tiers",
        lexicon.version,
        lexicon.categories.len(),
        lexicon.urgency_tiers.len()
    );

    let engine = Arc::new(LifecycleEngine::new(
        Arc::new(CaseStore::new()),
        Arc::new(AdvocateStore::new()),
        Arc::new(WorkloadLedger::new()),
        Arc::new(lexicon),
        Arc::new(LogNotifier),
    ));

    info!("Juris Daemon ready");
    server::run(AppState::new(engine, config)).await
}
