//! Route model
//!
//! Routes are declarative JSON templates: an ordered list of steps, each one
//! on-chain action with its parameters. Templates are validated once at load
//! time and shared read-only across all wallet tasks; nothing in the engine
//! mutates them.

use crate::tokens::registry;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// The action kind of a step, used for dispatch and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepAction {
    Swap,
    Wrap,
    Unwrap,
    AddLiquidity,
}

impl StepAction {
    pub fn name(&self) -> &'static str {
        match self {
            StepAction::Swap => "swap",
            StepAction::Wrap => "wrap",
            StepAction::Unwrap => "unwrap",
            StepAction::AddLiquidity => "add_liquidity",
        }
    }

    /// Whether a step of this kind may be followed by the next step after an
    /// ambiguous confirmation timeout.
    ///
    /// Wrap/unwrap only shift value between the native asset and its wrapped
    /// form; the next step re-reads balances, so an unresolved wrap cannot
    /// corrupt later amount resolution. Swaps and liquidity adds abandon the
    /// route instead.
    pub fn continues_after_timeout(&self) -> bool {
        matches!(self, StepAction::Wrap | StepAction::Unwrap)
    }
}

impl fmt::Display for StepAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One atomic on-chain action with its parameters.
///
/// Deserialized from JSON objects of the shape
/// `{ "action": ..., "params": { ... } }`, with the action-specific fields
/// nested under `params`. Unrecognized actions are rejected at load time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", content = "params", rename_all = "snake_case")]
pub enum Step {
    Swap {
        token_in: String,
        token_out: String,
        amount_in: f64,
        /// Slippage floor: minimum acceptable output quantity.
        #[serde(default)]
        amount_out_min: f64,
    },
    Wrap {
        amount_in: f64,
    },
    Unwrap {
        amount_in: f64,
    },
    AddLiquidity {
        token_a: String,
        token_b: String,
        amount_a: f64,
    },
}

impl Step {
    pub fn action(&self) -> StepAction {
        match self {
            Step::Swap { .. } => StepAction::Swap,
            Step::Wrap { .. } => StepAction::Wrap,
            Step::Unwrap { .. } => StepAction::Unwrap,
            Step::AddLiquidity { .. } => StepAction::AddLiquidity,
        }
    }

    /// The declared input amount this step spends.
    pub fn declared_amount(&self) -> f64 {
        match self {
            Step::Swap { amount_in, .. } => *amount_in,
            Step::Wrap { amount_in } => *amount_in,
            Step::Unwrap { amount_in } => *amount_in,
            Step::AddLiquidity { amount_a, .. } => *amount_a,
        }
    }

    /// Symbol of the token the declared amount is denominated in.
    pub fn input_token(&self) -> &str {
        match self {
            Step::Swap { token_in, .. } => token_in,
            Step::Wrap { .. } => crate::tokens::NATIVE_SYMBOL,
            Step::Unwrap { .. } => crate::tokens::WRAPPED_NATIVE_SYMBOL,
            Step::AddLiquidity { token_a, .. } => token_a,
        }
    }

    fn validate(&self, route_idx: usize, step_idx: usize, percentage_mode: bool) -> Result<()> {
        let fail = |msg: String| {
            Err(Error::MalformedRoute(format!(
                "route {route_idx} step {step_idx}: {msg}"
            )))
        };

        let amount = self.declared_amount();
        if !amount.is_finite() || amount <= 0.0 {
            return fail(format!("amount must be a positive number, got {amount}"));
        }
        if percentage_mode && amount > 1.0 {
            return fail(format!(
                "percentage mode is active but amount {amount} is not a fraction in (0, 1]"
            ));
        }

        let tokens = registry();
        match self {
            Step::Swap {
                token_in,
                token_out,
                amount_out_min,
                ..
            } => {
                for symbol in [token_in.as_str(), token_out.as_str()] {
                    if !tokens.is_known(symbol) {
                        return fail(format!("unknown token symbol {symbol:?}"));
                    }
                }
                if token_in == token_out {
                    return fail(format!("token_in and token_out are both {token_in:?}"));
                }
                if !amount_out_min.is_finite() || *amount_out_min < 0.0 {
                    return fail(format!("amount_out_min must be >= 0, got {amount_out_min}"));
                }
            }
            Step::AddLiquidity { token_a, token_b, .. } => {
                for symbol in [token_a.as_str(), token_b.as_str()] {
                    if !tokens.is_known(symbol) {
                        return fail(format!("unknown token symbol {symbol:?}"));
                    }
                    // The pool pairs ERC-20s; the native asset must be
                    // wrapped by an earlier step.
                    if tokens.is_native(symbol) {
                        return fail(format!(
                            "add_liquidity requires the wrapped form, not native {symbol:?}"
                        ));
                    }
                }
                if token_a == token_b {
                    return fail(format!("token_a and token_b are both {token_a:?}"));
                }
            }
            Step::Wrap { .. } | Step::Unwrap { .. } => {}
        }

        Ok(())
    }
}

/// An ordered list of steps executed as one unit for a wallet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    #[serde(default)]
    pub name: Option<String>,
    pub steps: Vec<Step>,
}

impl Route {
    /// Human-readable label for logs: the declared name or a fallback.
    pub fn label(&self, index: usize) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("route-{index}"),
        }
    }
}

/// Parse and validate a route collection from a JSON string.
///
/// Fails with [`Error::MalformedRoute`] on unrecognized actions, missing
/// params, or amounts out of range for the active percentage mode. Unknown
/// top-level fields are ignored.
pub fn parse_routes(json: &str, percentage_mode: bool) -> Result<Vec<Route>> {
    let routes: Vec<Route> =
        serde_json::from_str(json).map_err(|e| Error::MalformedRoute(e.to_string()))?;

    if routes.is_empty() {
        return Err(Error::MalformedRoute("route file contains no routes".into()));
    }

    for (route_idx, route) in routes.iter().enumerate() {
        if route.steps.is_empty() {
            return Err(Error::MalformedRoute(format!(
                "route {route_idx} has no steps"
            )));
        }
        for (step_idx, step) in route.steps.iter().enumerate() {
            step.validate(route_idx, step_idx, percentage_mode)?;
        }
    }

    Ok(routes)
}

/// Load routes from a JSON file. See [`parse_routes`].
pub fn load_routes(path: &Path, percentage_mode: bool) -> Result<Vec<Route>> {
    let content = std::fs::read_to_string(path)?;
    let routes = parse_routes(&content, percentage_mode)?;
    tracing::info!(
        path = %path.display(),
        count = routes.len(),
        "Routes loaded successfully"
    );
    Ok(routes)
}
