//! Step executor
//!
//! Executes exactly one step against the chain client and reports its
//! outcome. Steps within a route are awaited sequentially by the scheduler,
//! so there is at most one in-flight transaction per wallet at any time.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::amount;
use crate::chain::{ChainClient, TxStatus};
use crate::routes::Step;
use crate::{Error, Result};

/// Outcome of one executed step.
#[derive(Debug, Clone)]
pub enum StepStatus {
    /// Transaction confirmed on-chain.
    Confirmed { tx_hash: String, block: u64 },
    /// Confirmation timed out but the action kind allows the route to
    /// continue (the next step re-reads balances).
    TimedOut { tx_hash: String },
}

impl StepStatus {
    pub fn label(&self) -> &'static str {
        match self {
            StepStatus::Confirmed { .. } => "confirmed",
            StepStatus::TimedOut { .. } => "timeout_continue",
        }
    }

    pub fn tx_hash(&self) -> &str {
        match self {
            StepStatus::Confirmed { tx_hash, .. } | StepStatus::TimedOut { tx_hash } => tx_hash,
        }
    }
}

/// Executes single steps for one wallet.
pub struct StepExecutor {
    client: Arc<dyn ChainClient>,
    percentage_mode: bool,
    confirmation_timeout: Duration,
    retry_attempts: u32,
    retry_backoff: Duration,
}

impl StepExecutor {
    pub fn new(
        client: Arc<dyn ChainClient>,
        percentage_mode: bool,
        confirmation_timeout: Duration,
        retry_attempts: u32,
        retry_backoff: Duration,
    ) -> Self {
        Self {
            client,
            percentage_mode,
            confirmation_timeout,
            retry_attempts,
            retry_backoff,
        }
    }

    /// Execute one step: fresh balance query, amount resolution, submission,
    /// confirmation wait.
    ///
    /// Any error returned here abandons the remainder of the current route;
    /// [`StepStatus::TimedOut`] is the one non-fatal ambiguous outcome.
    pub async fn execute(&self, step: &Step) -> Result<StepStatus> {
        let token = step.input_token();
        let balance = self
            .with_retries(|| self.client.balance(token))
            .await?;
        let resolved = amount::resolve(step.declared_amount(), balance, self.percentage_mode, token)?;

        debug!(
            action = %step.action(),
            %token,
            balance,
            declared = step.declared_amount(),
            resolved,
            "Resolved step amount"
        );

        let handle = self
            .with_retries(|| self.submit(step, resolved))
            .await?;

        match self
            .client
            .wait_for_confirmation(&handle, self.confirmation_timeout)
            .await
        {
            Ok(TxStatus::Confirmed { block }) => Ok(StepStatus::Confirmed {
                tx_hash: handle.hash.to_string(),
                block,
            }),
            Ok(TxStatus::Reverted) => Err(Error::TransactionRejected(format!(
                "transaction {} reverted on-chain",
                handle.hash
            ))),
            Err(e @ Error::TransactionTimeout { .. }) => {
                if handle.action.continues_after_timeout() {
                    warn!(
                        action = %handle.action,
                        tx = %handle.hash,
                        "Confirmation timed out; outcome unknown, continuing route"
                    );
                    Ok(StepStatus::TimedOut {
                        tx_hash: handle.hash.to_string(),
                    })
                } else {
                    Err(e)
                }
            }
            Err(e) => Err(e),
        }
    }

    async fn submit(&self, step: &Step, resolved: f64) -> Result<crate::chain::TxHandle> {
        match step {
            Step::Swap {
                token_in,
                token_out,
                amount_out_min,
                ..
            } => {
                self.client
                    .submit_swap(token_in, token_out, resolved, *amount_out_min)
                    .await
            }
            Step::Wrap { .. } => self.client.submit_wrap(resolved).await,
            Step::Unwrap { .. } => self.client.submit_unwrap(resolved).await,
            Step::AddLiquidity { token_a, token_b, .. } => {
                self.client
                    .submit_add_liquidity(token_a, token_b, resolved)
                    .await
            }
        }
    }

    /// Bounded retries with doubling backoff for transient RPC failures.
    /// Anything else propagates immediately.
    async fn with_retries<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut delay = self.retry_backoff;
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if is_transient(&e) && attempt < self.retry_attempts => {
                    warn!(error = %e, attempt, "Transient chain error, retrying");
                    tokio::time::sleep(delay).await;
                    delay = delay.saturating_mul(2);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

fn is_transient(e: &Error) -> bool {
    matches!(e, Error::ChainUnavailable(_) | Error::Network(_))
}
