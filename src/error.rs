//! Error types for the route runner

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed route: {0}")]
    MalformedRoute(String),

    #[error("Insufficient balance of {token}: {balance}")]
    InsufficientBalance { token: String, balance: f64 },

    #[error("Transaction rejected on-chain: {0}")]
    TransactionRejected(String),

    #[error("Transaction {tx_hash} not confirmed within {timeout_secs}s")]
    TransactionTimeout { tx_hash: String, timeout_secs: u64 },

    #[error("Chain client unavailable: {0}")]
    ChainUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Wallet error: {0}")]
    Wallet(String),

    #[error("Unknown token symbol: {0}")]
    UnknownToken(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl Error {
    /// Short machine-readable kind used in step logs and the run report.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::MalformedRoute(_) => "malformed_route",
            Error::InsufficientBalance { .. } => "insufficient_balance",
            Error::TransactionRejected(_) => "transaction_rejected",
            Error::TransactionTimeout { .. } => "transaction_timeout",
            Error::ChainUnavailable(_) => "chain_unavailable",
            Error::Config(_) => "config",
            Error::Wallet(_) => "wallet",
            Error::UnknownToken(_) => "unknown_token",
            Error::Io(_) => "io",
            Error::Json(_) => "json",
            Error::Network(_) => "network",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
