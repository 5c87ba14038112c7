//! Configuration for the route runner
//!
//! The whole run is driven by one immutable [`RunConfig`] built at startup
//! and shared read-only (behind an `Arc`) with every wallet task. Nothing
//! mutates it during execution.

pub mod proxy;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{Error, Result};

pub use proxy::{load_proxies, ProxyAssignment};

/// How the scheduler picks the next route for a wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RouteSelection {
    /// Cycle through the route collection in declared order.
    #[default]
    Sequential,
    /// Pick uniformly among the configured routes each time.
    Random,
}

/// Target network settings: RPC endpoint and DEX contract addresses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainSettings {
    /// JSON-RPC endpoint of the EVM network
    pub rpc_url: String,
    /// Chain id pinned on every signer for EIP-155 replay protection
    pub chain_id: u64,
    /// DEX router contract address
    pub router_address: String,
    /// DEX factory contract address
    pub factory_address: String,
    /// Seconds of headroom added to the current wall-clock time for swap
    /// deadlines
    #[serde(default = "defaults::deadline_secs")]
    pub deadline_secs: u64,
}

impl Default for ChainSettings {
    fn default() -> Self {
        Self {
            // Hyperliquid testnet
            rpc_url: "https://api.hyperliquid-testnet.xyz/evm".to_string(),
            chain_id: 998,
            router_address: "0x85aA63EB2ab9BaAA74eAd7e7f82A571d74901853".to_string(),
            factory_address: "0xA028411927E2015A363014881a4404C636218fb1".to_string(),
            deadline_secs: defaults::deadline_secs(),
        }
    }
}

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Path to the wallet list (one `address;private_key;ref_address` per line)
    pub wallets_path: PathBuf,
    /// Path to the proxy list (one URI per line); optional
    #[serde(default)]
    pub proxy_path: Option<PathBuf>,
    /// Path to the JSON route file
    pub routes_path: PathBuf,

    /// Inter-step delay bounds in seconds, drawn uniformly per step
    pub delay_step: (f64, f64),
    /// Number of routes each wallet executes; `None` runs indefinitely
    pub routes_count: Option<u32>,
    /// If true, step amounts are fractions (0, 1] of the current balance;
    /// if false, absolute quantities with a 90%-of-balance fallback when
    /// the balance is insufficient
    pub swap_percentage: bool,

    #[serde(default)]
    pub route_selection: RouteSelection,
    #[serde(default)]
    pub proxy_assignment: ProxyAssignment,

    /// Seconds to wait for a transaction receipt before treating the step
    /// outcome as unknown
    #[serde(default = "defaults::confirmation_timeout_secs")]
    pub confirmation_timeout_secs: u64,
    /// Bounded retries for RPC-level failures before abandoning the route
    #[serde(default = "defaults::rpc_retry_attempts")]
    pub rpc_retry_attempts: u32,
    /// Initial backoff between RPC retries, doubled per attempt
    #[serde(default = "defaults::rpc_retry_backoff_ms")]
    pub rpc_retry_backoff_ms: u64,

    /// Directory for per-wallet balance snapshots and the run report
    #[serde(default = "defaults::report_dir")]
    pub report_dir: PathBuf,

    #[serde(default)]
    pub chain: ChainSettings,
}

mod defaults {
    use std::path::PathBuf;

    pub fn deadline_secs() -> u64 {
        600
    }
    pub fn confirmation_timeout_secs() -> u64 {
        300
    }
    pub fn rpc_retry_attempts() -> u32 {
        3
    }
    pub fn rpc_retry_backoff_ms() -> u64 {
        2_000
    }
    pub fn report_dir() -> PathBuf {
        PathBuf::from("balances")
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            wallets_path: PathBuf::from("data/wallets.txt"),
            proxy_path: Some(PathBuf::from("data/proxy.txt")),
            routes_path: PathBuf::from("data/routes.json"),
            delay_step: (100.0, 200.0),
            routes_count: Some(1),
            swap_percentage: true,
            route_selection: RouteSelection::default(),
            proxy_assignment: ProxyAssignment::default(),
            confirmation_timeout_secs: defaults::confirmation_timeout_secs(),
            rpc_retry_attempts: defaults::rpc_retry_attempts(),
            rpc_retry_backoff_ms: defaults::rpc_retry_backoff_ms(),
            report_dir: defaults::report_dir(),
            chain: ChainSettings::default(),
        }
    }
}

impl RunConfig {
    /// Load configuration from a JSON file, or defaults when no path given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
                serde_json::from_str(&content)
                    .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let (min, max) = self.delay_step;
        if !(min.is_finite() && max.is_finite()) || min < 0.0 || max < min {
            return Err(Error::Config(format!(
                "delay_step must satisfy 0 <= min <= max, got ({min}, {max})"
            )));
        }
        if let Some(count) = self.routes_count {
            if count == 0 {
                return Err(Error::Config(
                    "routes_count must be positive; use null for unbounded".into(),
                ));
            }
        }
        if self.rpc_retry_attempts == 0 {
            return Err(Error::Config("rpc_retry_attempts must be >= 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        RunConfig::default().validate().unwrap();
    }

    #[test]
    fn deserialize_minimal() {
        let value = serde_json::json!({
            "wallets_path": "data/wallets.txt",
            "routes_path": "data/routes.json",
            "delay_step": [5.0, 10.0],
            "routes_count": 3,
            "swap_percentage": false
        });
        let parsed: RunConfig = serde_json::from_value(value).expect("parse config");
        assert_eq!(parsed.routes_count, Some(3));
        assert_eq!(parsed.route_selection, RouteSelection::Sequential);
        assert_eq!(parsed.confirmation_timeout_secs, 300);
        parsed.validate().unwrap();
    }

    #[test]
    fn unbounded_routes_count() {
        let value = serde_json::json!({
            "wallets_path": "w.txt",
            "routes_path": "r.json",
            "delay_step": [0.0, 0.0],
            "routes_count": null,
            "swap_percentage": true
        });
        let parsed: RunConfig = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.routes_count, None);
    }

    #[test]
    fn rejects_inverted_delay_bounds() {
        let mut config = RunConfig::default();
        config.delay_step = (10.0, 5.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_routes_count() {
        let mut config = RunConfig::default();
        config.routes_count = Some(0);
        assert!(config.validate().is_err());
    }
}
