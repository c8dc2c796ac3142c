//! CLI for running the governance store upgrade against a node database
//!
//! Usage:
//!   gov-migrate [OPTIONS]
//!
//! Examples:
//!   # Upgrade with defaults (./data/state.sled, tree "gov", v1 -> v2)
//!   gov-migrate
//!
//!   # Preview against a copy of production state
//!   gov-migrate --db /backup/state.sled --dry-run -v
//!
//!   # Use a config file, overriding the tree
//!   gov-migrate --config upgrade.toml --tree governance

use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gov_migrate::{SledStore, UpgradeConfig, Upgrader};

#[derive(Parser, Debug)]
#[command(name = "gov-migrate")]
#[command(about = "Upgrade stored governance proposals and parameters to the current schema")]
struct Args {
    /// Path to config file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// sled database path
    #[arg(long, value_name = "PATH", env = "GOV_MIGRATE_DB")]
    db: Option<PathBuf>,

    /// sled tree holding the module's keys
    #[arg(long)]
    tree: Option<String>,

    /// Expected schema version before the upgrade
    #[arg(long)]
    from: Option<u64>,

    /// Schema version after the upgrade
    #[arg(long)]
    to: Option<u64>,

    /// Run the upgrade without committing it
    #[arg(long)]
    dry_run: bool,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "gov_migrate=info",
        1 => "gov_migrate=debug",
        _ => "gov_migrate=trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.parse()?))
        .init();

    let mut config = match &args.config {
        Some(path) => UpgradeConfig::load(path)?,
        None => UpgradeConfig::default(),
    };

    // Apply CLI overrides
    if let Some(db) = args.db {
        config.db_path = db;
    }
    if let Some(tree) = args.tree {
        config.tree = tree;
    }
    if let Some(from) = args.from {
        config.from_version = from;
    }
    if let Some(to) = args.to {
        config.to_version = to;
    }
    if args.dry_run {
        config.dry_run = true;
    }

    let upgrader = Upgrader::from_config(&config)?;
    let mut store = SledStore::open(&config.db_path, &config.tree)?;
    let report = upgrader.run(&mut store)?;
    if !config.dry_run {
        store.flush()?;
    }

    info!(
        module = %report.module,
        records = report.total_imported(),
        skipped = report.skipped,
        "Upgrade finished"
    );
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
