//! Route execution engine
//!
//! Per-wallet machinery: amount resolution, single-step execution, and the
//! route scheduler state machine. The wallet orchestrator in
//! [`crate::runner`] fans these out across wallets.

pub mod amount;
pub mod executor;
pub mod scheduler;

#[cfg(test)]
pub(crate) mod mock;

pub use executor::{StepExecutor, StepStatus};
pub use scheduler::{RouteScheduler, WalletReport};
