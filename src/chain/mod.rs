//! Chain client boundary
//!
//! The engine never touches contracts or RPC directly; it drives a
//! [`ChainClient`], which exposes balance queries, transaction submission,
//! and confirmation waiting for exactly one wallet. Each wallet task owns
//! its own client instance (with its own proxy binding), so there is no
//! shared connection state between wallets.

pub mod rpc;

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::routes::StepAction;
use crate::tokens::{registry, NATIVE_SYMBOL};
use crate::Result;
use alloy::primitives::B256;

pub use rpc::RpcChainClient;

/// Handle to a submitted transaction.
#[derive(Debug, Clone)]
pub struct TxHandle {
    pub hash: B256,
    pub action: StepAction,
}

/// Terminal status of a confirmed transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStatus {
    Confirmed { block: u64 },
    Reverted,
}

/// On-chain capability for one wallet.
///
/// Amounts cross this boundary in human units; implementations scale by
/// token decimals. Submission is atomic from the engine's perspective:
/// either the transaction was accepted for broadcast (a handle is returned)
/// or it was not.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Current balance of `token` in human units. The native symbol queries
    /// the account balance; anything else is an ERC-20 `balanceOf`.
    async fn balance(&self, token: &str) -> Result<f64>;

    /// Submit a swap `token_in` -> `token_out` with a minimum-out guard.
    async fn submit_swap(
        &self,
        token_in: &str,
        token_out: &str,
        amount_in: f64,
        amount_out_min: f64,
    ) -> Result<TxHandle>;

    /// Wrap the native asset into its tokenized form.
    async fn submit_wrap(&self, amount_in: f64) -> Result<TxHandle>;

    /// Unwrap the tokenized native asset.
    async fn submit_unwrap(&self, amount_in: f64) -> Result<TxHandle>;

    /// Provide liquidity for a pair. The second-token amount is implied by
    /// the pool ratio and quoted by the implementation, not by the caller.
    async fn submit_add_liquidity(
        &self,
        token_a: &str,
        token_b: &str,
        amount_a: f64,
    ) -> Result<TxHandle>;

    /// Block until the transaction lands or the timeout elapses.
    ///
    /// Returns [`crate::Error::TransactionTimeout`] when no receipt was
    /// observed in time; the transaction may still land later.
    async fn wait_for_confirmation(&self, handle: &TxHandle, timeout: Duration) -> Result<TxStatus>;
}

/// Snapshot the wallet's balance of the native asset and every registry
/// token. Individual query failures are logged and skipped; a partial
/// snapshot is still worth reporting.
pub async fn snapshot_balances(client: &dyn ChainClient, wallet: &str) -> BTreeMap<String, f64> {
    let mut symbols = vec![NATIVE_SYMBOL];
    symbols.extend_from_slice(registry().symbols());

    let queries = symbols
        .into_iter()
        .map(|symbol| async move { (symbol, client.balance(symbol).await) });

    let mut balances = BTreeMap::new();
    for (symbol, result) in futures::future::join_all(queries).await {
        match result {
            Ok(balance) => {
                balances.insert(symbol.to_string(), balance);
            }
            Err(e) => {
                tracing::warn!(wallet = %wallet, token = symbol, error = %e, "Skipping balance query");
            }
        }
    }
    balances
}
