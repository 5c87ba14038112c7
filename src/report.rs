//! Run report persistence
//!
//! After every wallet reaches Exhausted the orchestrator writes one
//! snapshot file per wallet (symbol -> balance, the format the balance
//! files have always used) plus an aggregated `run_report.json` with the
//! full route outcome log.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::engine::WalletReport;
use crate::Result;

/// Aggregated outcome of a whole run.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub wallets: Vec<WalletReport>,
}

impl RunReport {
    /// Persist per-wallet balance snapshots and the aggregated report.
    /// Returns the path of the aggregated report file.
    pub fn persist(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;

        for wallet in &self.wallets {
            write_balance_snapshot(dir, &wallet.address, &wallet.final_balances)?;
        }

        let path = dir.join("run_report.json");
        std::fs::write(&path, serde_json::to_string_pretty(self)?)?;
        info!(path = %path.display(), wallets = self.wallets.len(), "Run report saved");
        Ok(path)
    }
}

/// Write one wallet's balance snapshot as `<dir>/<address>.json`.
pub fn write_balance_snapshot(
    dir: &Path,
    address: &str,
    balances: &BTreeMap<String, f64>,
) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{address}.json"));
    std::fs::write(&path, serde_json::to_string_pretty(balances)?)?;
    info!(path = %path.display(), "Balances saved");
    Ok(path)
}
