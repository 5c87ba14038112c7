//! Wallet credentials and signing

mod credentials;
mod signer;

pub use credentials::{load_wallets, WalletCredential};
pub use signer::SignerWallet;
