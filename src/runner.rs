//! Wallet orchestrator
//!
//! Fans the route scheduler out across all configured wallets. Every wallet
//! gets its own chain client (and proxy binding), its own scheduler task,
//! and its own report; a failing or panicking wallet task never halts the
//! others. When every wallet has exhausted its route budget the per-wallet
//! reports are aggregated and persisted.

use chrono::Utc;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{error, info};

use crate::chain::{ChainClient, RpcChainClient};
use crate::config::{load_proxies, RunConfig};
use crate::engine::RouteScheduler;
use crate::report::RunReport;
use crate::routes::Route;
use crate::wallet::{load_wallets, SignerWallet};
use crate::Result;

/// Orchestrates one full run across all wallets.
pub struct WalletOrchestrator {
    config: Arc<RunConfig>,
    routes: Arc<Vec<Route>>,
}

impl WalletOrchestrator {
    pub fn new(config: Arc<RunConfig>, routes: Vec<Route>) -> Self {
        Self {
            config,
            routes: Arc::new(routes),
        }
    }

    /// Load wallets and proxies, build one RPC client per wallet, run every
    /// scheduler to exhaustion, then persist the final report.
    pub async fn run(&self) -> Result<RunReport> {
        let clients = self.build_clients()?;
        let report = self.run_with_clients(clients).await;
        report.persist(&self.config.report_dir)?;
        Ok(report)
    }

    /// One (address, chain client) pair per configured wallet.
    pub fn build_clients(&self) -> Result<Vec<(String, Arc<dyn ChainClient>)>> {
        let wallets = load_wallets(&self.config.wallets_path)?;
        let proxies = match &self.config.proxy_path {
            Some(path) => load_proxies(path)?,
            None => Vec::new(),
        };

        let mut clients: Vec<(String, Arc<dyn ChainClient>)> = Vec::with_capacity(wallets.len());
        for (index, credential) in wallets.iter().enumerate() {
            let signer = Arc::new(SignerWallet::from_credential(credential)?);
            let proxy = self.config.proxy_assignment.proxy_for(&proxies, index);
            let client = RpcChainClient::new(&self.config.chain, signer.clone(), proxy)?;
            clients.push((signer.address().to_string(), Arc::new(client)));
        }
        Ok(clients)
    }

    /// Fan out one scheduler task per wallet and wait for all of them.
    /// Exposed separately so the engine can be driven with any
    /// [`ChainClient`] implementation.
    pub async fn run_with_clients(
        &self,
        clients: Vec<(String, Arc<dyn ChainClient>)>,
    ) -> RunReport {
        let started_at = Utc::now();
        info!(
            wallets = clients.len(),
            routes = self.routes.len(),
            routes_count = ?self.config.routes_count,
            "Starting run"
        );

        let mut tasks = JoinSet::new();
        for (address, client) in clients {
            let scheduler = RouteScheduler::new(
                address,
                client,
                self.routes.clone(),
                self.config.clone(),
            );
            tasks.spawn(async move { scheduler.run().await });
        }

        let mut wallets = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(report) => {
                    info!(
                        wallet = %report.address,
                        completed = report.routes_completed,
                        failed = report.routes_failed,
                        "Wallet finished"
                    );
                    wallets.push(report);
                }
                // A panic in one wallet's task is isolated; the run
                // continues for everyone else.
                Err(e) => error!(error = %e, "Wallet task aborted"),
            }
        }

        // Completion order across wallets is nondeterministic.
        wallets.sort_by(|a, b| a.address.cmp(&b.address));

        RunReport {
            started_at,
            finished_at: Utc::now(),
            wallets,
        }
    }
}
