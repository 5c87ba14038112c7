//! Wallet list parsing
//!
//! One credential record per line: `address;private_key;ref_address`, the
//! referral address optional. Key material is held in a `SecretString` from
//! the moment it leaves the file; it is only ever read once, to construct
//! the alloy signer.

use secrecy::SecretString;
use std::path::Path;

use crate::{Error, Result};

/// A wallet credential record, immutable after load.
pub struct WalletCredential {
    pub address: String,
    pub private_key: SecretString,
    pub ref_address: Option<String>,
}

impl WalletCredential {
    fn parse_line(line: &str, path: &Path, line_no: usize) -> Result<Self> {
        let mut parts = line.split(';');
        let address = parts.next().map(str::trim).unwrap_or_default();
        let key = parts.next().map(str::trim).unwrap_or_default();
        let ref_address = parts.next().map(str::trim).filter(|s| !s.is_empty());

        if address.is_empty() || key.is_empty() {
            return Err(Error::Wallet(format!(
                "{}:{}: expected address;private_key[;ref_address]",
                path.display(),
                line_no + 1
            )));
        }

        Ok(Self {
            address: address.to_string(),
            private_key: SecretString::from(key.to_string()),
            ref_address: ref_address.map(str::to_string),
        })
    }
}

// Keep key material out of Debug output.
impl std::fmt::Debug for WalletCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletCredential")
            .field("address", &self.address)
            .field("private_key", &"[REDACTED]")
            .field("ref_address", &self.ref_address)
            .finish()
    }
}

/// Load the wallet list. Blank lines and `#` comments are skipped.
pub fn load_wallets(path: &Path) -> Result<Vec<WalletCredential>> {
    let content = std::fs::read_to_string(path)?;
    let mut wallets = Vec::new();

    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        wallets.push(WalletCredential::parse_line(line, path, line_no)?);
    }

    if wallets.is_empty() {
        return Err(Error::Wallet(format!(
            "{}: no wallet records found",
            path.display()
        )));
    }

    tracing::info!(
        path = %path.display(),
        count = wallets.len(),
        "Wallets loaded successfully"
    );
    Ok(wallets)
}
