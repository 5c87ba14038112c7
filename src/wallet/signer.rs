//! Signing wallet
//!
//! SECURITY: This is the ONLY place where private keys exist.
//! - Keys are held in alloy's PrivateKeySigner which handles crypto securely
//! - Keys are never serialized to JSON
//! - Keys are never logged

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;
use secrecy::ExposeSecret;

use super::WalletCredential;
use crate::{Error, Result};

/// A wallet ready to sign transactions, built from one credential record.
///
/// The private key is stored in alloy's PrivateKeySigner and only accessible
/// via signing operations.
pub struct SignerWallet {
    address: Address,
    ref_address: Option<Address>,
    signer: PrivateKeySigner,
}

impl SignerWallet {
    /// Build a signer from a loaded credential record.
    ///
    /// The declared address must match the one derived from the key; a
    /// mismatch means the wallet file is corrupt.
    pub fn from_credential(credential: &WalletCredential) -> Result<Self> {
        let declared: Address = credential
            .address
            .parse()
            .map_err(|e| Error::Wallet(format!("invalid address {}: {e}", credential.address)))?;

        let key_hex = credential.private_key.expose_secret();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);
        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| Error::Wallet(format!("invalid private key for {declared}: {e}")))?;

        let derived = signer.address();
        if derived != declared {
            return Err(Error::Wallet(format!(
                "address {declared} does not match key-derived address {derived}"
            )));
        }

        let ref_address = match &credential.ref_address {
            Some(addr) => Some(
                addr.parse()
                    .map_err(|e| Error::Wallet(format!("invalid ref_address {addr}: {e}")))?,
            ),
            None => None,
        };

        Ok(Self {
            address: derived,
            ref_address,
            signer,
        })
    }

    /// Public address (safe to share)
    pub fn address(&self) -> Address {
        self.address
    }

    /// Referral address for router calls; falls back to the wallet itself.
    pub fn referrer(&self) -> Address {
        self.ref_address.unwrap_or(self.address)
    }

    /// An EthereumWallet for use with alloy providers, with the signer
    /// pinned to `chain_id` so signatures carry EIP-155 replay protection.
    ///
    /// This is safe because EthereumWallet only exposes signing operations,
    /// not the raw private key.
    pub fn ethereum_wallet(&self, chain_id: u64) -> EthereumWallet {
        EthereumWallet::from(self.chain_signer(chain_id))
    }

    fn chain_signer(&self, chain_id: u64) -> PrivateKeySigner {
        self.signer.clone().with_chain_id(Some(chain_id))
    }
}

// Implement Debug manually to avoid exposing the signer
impl std::fmt::Debug for SignerWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignerWallet")
            .field("address", &self.address)
            .field("ref_address", &self.ref_address)
            .field("signer", &"[REDACTED]")
            .finish()
    }
}
