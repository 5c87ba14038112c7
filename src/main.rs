//! DEX Route Runner CLI
//!
//! Command-line interface for running route automation across a pool of
//! wallets.

use clap::{Parser, Subcommand};
use dex_route_runner::{routes, Result, RunConfig, WalletOrchestrator};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "route-runner")]
#[command(about = "Automated DEX route runner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute the configured routes for every wallet
    Run {
        /// Validate config, routes, and wallets, print the plan, submit nothing
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate the route file against the active percentage mode
    Validate,

    /// Query and persist current balances for all wallets
    Balances,

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore if not found)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let config = RunConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Run { dry_run } => run(config, dry_run).await?,
        Commands::Validate => validate(config)?,
        Commands::Balances => balances(config).await?,
        Commands::Config => {
            println!(
                "{}",
                serde_json::to_string_pretty(&config).map_err(dex_route_runner::Error::from)?
            );
        }
    }

    Ok(())
}

async fn run(config: RunConfig, dry_run: bool) -> Result<()> {
    // A malformed route file aborts here, before any wallet task starts.
    let routes = routes::load_routes(&config.routes_path, config.swap_percentage)?;

    let orchestrator = WalletOrchestrator::new(Arc::new(config), routes);

    if dry_run {
        let clients = orchestrator.build_clients()?;
        tracing::info!(wallets = clients.len(), "Dry run - nothing will be submitted");
        for (address, _) in &clients {
            println!("wallet {address}: ready");
        }
        return Ok(());
    }

    tokio::select! {
        result = orchestrator.run() => {
            let report = result?;
            tracing::info!(wallets = report.wallets.len(), "Run complete");
            Ok(())
        }
        _ = tokio::signal::ctrl_c() => {
            // In-flight schedulers are dropped at their suspension points;
            // anything already broadcast stays on-chain.
            tracing::warn!("Interrupted, abandoning current routes");
            Ok(())
        }
    }
}

fn validate(config: RunConfig) -> Result<()> {
    let routes = routes::load_routes(&config.routes_path, config.swap_percentage)?;
    let steps: usize = routes.iter().map(|r| r.steps.len()).sum();
    println!(
        "OK: {} routes, {} steps, percentage mode: {}",
        routes.len(),
        steps,
        config.swap_percentage
    );
    Ok(())
}

async fn balances(config: RunConfig) -> Result<()> {
    use dex_route_runner::chain::snapshot_balances;
    use dex_route_runner::report::write_balance_snapshot;

    let report_dir = config.report_dir.clone();
    // Reuse the orchestrator's wallet/proxy wiring; no routes are needed.
    let orchestrator = WalletOrchestrator::new(Arc::new(config), Vec::new());

    for (address, client) in orchestrator.build_clients()? {
        let snapshot = snapshot_balances(client.as_ref(), &address).await;
        let path = write_balance_snapshot(&report_dir, &address, &snapshot)?;
        println!("{address}: {} tokens -> {}", snapshot.len(), path.display());
    }
    Ok(())
}
