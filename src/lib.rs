//! DEX Route Runner
//!
//! Automates sequences of DEX operations (swaps, wrap/unwrap, liquidity
//! provision) on an EVM-compatible network, driven by a declarative JSON
//! route file and a pool of wallet credentials:
//! - Wallets run concurrently as independent tasks; a failure in one never
//!   touches another
//! - Steps within a route run strictly in order, each amount resolved
//!   against the live balance left by the previous step
//! - Private keys never leave the wallet module
//! - Every step attempt is logged and summarized in a final run report

pub mod chain;
pub mod config;
pub mod engine;
pub mod report;
pub mod routes;
pub mod runner;
pub mod tokens;
pub mod wallet;

mod error;

// Re-export commonly used types
pub use config::{ProxyAssignment, RouteSelection, RunConfig};
pub use error::{Error, Result};
pub use report::RunReport;
pub use runner::WalletOrchestrator;
