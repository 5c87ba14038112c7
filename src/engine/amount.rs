//! Amount resolution
//!
//! Converts a step's declared amount into a concrete transfer quantity
//! given the wallet's current balance. Pure function; the caller queries
//! the balance fresh from the chain client immediately beforehand so prior
//! steps in the same route are reflected.

use crate::{Error, Result};

/// Fraction of the available balance used when an absolute amount exceeds
/// it. Documented degradation policy: absolute amounts never fail outright
/// on insufficient funds as long as some balance exists.
const OVERDRAW_FALLBACK: f64 = 0.9;

/// Resolve a declared amount against the current balance.
///
/// - percentage mode: quantity = balance x declared (declared is a fraction
///   in (0, 1], validated at route load);
/// - absolute mode, declared <= balance: used as-is;
/// - absolute mode, declared > balance: 90% of the available balance.
///
/// A zero (or unusable) balance fails with
/// [`Error::InsufficientBalance`] in either mode.
pub fn resolve(declared: f64, balance: f64, percentage_mode: bool, token: &str) -> Result<f64> {
    if !balance.is_finite() || balance <= 0.0 {
        return Err(Error::InsufficientBalance {
            token: token.to_string(),
            balance,
        });
    }

    if percentage_mode {
        return Ok(balance * declared);
    }

    if declared > balance {
        Ok(balance * OVERDRAW_FALLBACK)
    } else {
        Ok(declared)
    }
}
