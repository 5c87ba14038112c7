//! In-memory chain client for engine tests
//!
//! Tracks per-wallet balances, records every submission in order, and lets
//! tests inject reverts, confirmation timeouts, and transient RPC failures.
//! Swaps convert 1:1 so balance flow through a route stays easy to assert.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use alloy::primitives::B256;

use crate::chain::{ChainClient, TxHandle, TxStatus};
use crate::routes::StepAction;
use crate::tokens::{NATIVE_SYMBOL, WRAPPED_NATIVE_SYMBOL};
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct Submission {
    pub action: StepAction,
    pub token_in: String,
    pub token_out: Option<String>,
    pub amount: f64,
}

#[derive(Debug, Clone)]
enum Effect {
    Transfer { from: String, to: String, amount: f64 },
    Burn { tokens: Vec<String>, amount: f64 },
}

pub struct MockChainClient {
    balances: Mutex<HashMap<String, f64>>,
    submissions: Mutex<Vec<Submission>>,
    pending: Mutex<HashMap<B256, Effect>>,
    next_hash: AtomicU64,
    revert_next: AtomicBool,
    timeout_next: AtomicBool,
    balance_failures: AtomicU32,
}

impl MockChainClient {
    pub fn new<I: IntoIterator<Item = (&'static str, f64)>>(balances: I) -> Self {
        Self {
            balances: Mutex::new(
                balances
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v))
                    .collect(),
            ),
            submissions: Mutex::new(Vec::new()),
            pending: Mutex::new(HashMap::new()),
            next_hash: AtomicU64::new(1),
            revert_next: AtomicBool::new(false),
            timeout_next: AtomicBool::new(false),
            balance_failures: AtomicU32::new(0),
        }
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn balance_of(&self, token: &str) -> f64 {
        *self.balances.lock().unwrap().get(token).unwrap_or(&0.0)
    }

    pub fn fail_next_confirmation_with_revert(&self) {
        self.revert_next.store(true, Ordering::SeqCst);
    }

    pub fn time_out_next_confirmation(&self) {
        self.timeout_next.store(true, Ordering::SeqCst);
    }

    /// The next `count` balance queries fail with a transient error.
    pub fn fail_balance_queries(&self, count: u32) {
        self.balance_failures.store(count, Ordering::SeqCst);
    }

    fn record(&self, submission: Submission, effect: Effect) -> TxHandle {
        let action = submission.action;
        self.submissions.lock().unwrap().push(submission);

        let n = self.next_hash.fetch_add(1, Ordering::SeqCst);
        let hash = B256::with_last_byte((n % 255) as u8 + 1);
        self.pending.lock().unwrap().insert(hash, effect);
        TxHandle { hash, action }
    }

    fn apply(&self, effect: Effect) {
        let mut balances = self.balances.lock().unwrap();
        match effect {
            Effect::Transfer { from, to, amount } => {
                *balances.entry(from).or_insert(0.0) -= amount;
                *balances.entry(to).or_insert(0.0) += amount;
            }
            Effect::Burn { tokens, amount } => {
                for token in tokens {
                    *balances.entry(token).or_insert(0.0) -= amount;
                }
            }
        }
    }
}

#[async_trait]
impl ChainClient for MockChainClient {
    async fn balance(&self, token: &str) -> Result<f64> {
        let remaining = self.balance_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.balance_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(Error::ChainUnavailable("simulated rpc outage".into()));
        }
        Ok(self.balance_of(token))
    }

    async fn submit_swap(
        &self,
        token_in: &str,
        token_out: &str,
        amount_in: f64,
        _amount_out_min: f64,
    ) -> Result<TxHandle> {
        Ok(self.record(
            Submission {
                action: StepAction::Swap,
                token_in: token_in.to_string(),
                token_out: Some(token_out.to_string()),
                amount: amount_in,
            },
            Effect::Transfer {
                from: token_in.to_string(),
                to: token_out.to_string(),
                amount: amount_in,
            },
        ))
    }

    async fn submit_wrap(&self, amount_in: f64) -> Result<TxHandle> {
        Ok(self.record(
            Submission {
                action: StepAction::Wrap,
                token_in: NATIVE_SYMBOL.to_string(),
                token_out: Some(WRAPPED_NATIVE_SYMBOL.to_string()),
                amount: amount_in,
            },
            Effect::Transfer {
                from: NATIVE_SYMBOL.to_string(),
                to: WRAPPED_NATIVE_SYMBOL.to_string(),
                amount: amount_in,
            },
        ))
    }

    async fn submit_unwrap(&self, amount_in: f64) -> Result<TxHandle> {
        Ok(self.record(
            Submission {
                action: StepAction::Unwrap,
                token_in: WRAPPED_NATIVE_SYMBOL.to_string(),
                token_out: Some(NATIVE_SYMBOL.to_string()),
                amount: amount_in,
            },
            Effect::Transfer {
                from: WRAPPED_NATIVE_SYMBOL.to_string(),
                to: NATIVE_SYMBOL.to_string(),
                amount: amount_in,
            },
        ))
    }

    async fn submit_add_liquidity(
        &self,
        token_a: &str,
        token_b: &str,
        amount_a: f64,
    ) -> Result<TxHandle> {
        Ok(self.record(
            Submission {
                action: StepAction::AddLiquidity,
                token_in: token_a.to_string(),
                token_out: Some(token_b.to_string()),
                amount: amount_a,
            },
            Effect::Burn {
                tokens: vec![token_a.to_string(), token_b.to_string()],
                amount: amount_a,
            },
        ))
    }

    async fn wait_for_confirmation(&self, handle: &TxHandle, timeout: Duration) -> Result<TxStatus> {
        let effect = self.pending.lock().unwrap().remove(&handle.hash);

        if self.timeout_next.swap(false, Ordering::SeqCst) {
            return Err(Error::TransactionTimeout {
                tx_hash: handle.hash.to_string(),
                timeout_secs: timeout.as_secs(),
            });
        }
        if self.revert_next.swap(false, Ordering::SeqCst) {
            return Ok(TxStatus::Reverted);
        }

        if let Some(effect) = effect {
            self.apply(effect);
        }
        Ok(TxStatus::Confirmed { block: 1 })
    }
}
