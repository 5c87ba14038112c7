//! Shared token registry
//!
//! Centralizes token metadata (addresses, decimals, symbols) so the route
//! loader, chain client, and balance report all agree on which tokens exist
//! on the target network.

use alloy::primitives::{address, Address};
use std::collections::HashMap;

/// Symbol of the network's native asset.
pub const NATIVE_SYMBOL: &str = "HYPE";

/// Symbol of the wrapped form of the native asset.
pub const WRAPPED_NATIVE_SYMBOL: &str = "WETH";

/// Token metadata
#[derive(Debug, Clone, Copy)]
pub struct TokenInfo {
    /// Token symbol (e.g., "USDC", "WETH")
    pub symbol: &'static str,
    /// On-chain contract address
    pub address: Address,
    /// Number of decimals
    pub decimals: u8,
}

/// Hyperliquid testnet token addresses
pub mod addresses {
    use super::*;

    pub const WETH: Address = address!("ADcb2f358Eae6492F61A5F87eb8893d09391d160");
    pub const HSPX: Address = address!("D8c23394e2d55AA6dB9E5bb1305df54A1F83D122");
    pub const XHSPX: Address = address!("91483330b5953895757b65683d1272d86d6430B3");
    pub const PURR: Address = address!("C003D79B8a489703b1753711E3ae9fFDFC8d1a82");
    pub const JEFF: Address = address!("bF7C8201519EC22512EB1405Db19C427DF64fC91");
    pub const CATBAL: Address = address!("26272928f2395452090143Cf347aa85f78cDa3E8");
    pub const HFUN: Address = address!("37adB2550b965851593832a6444763eeB3e1d1Ec");
    pub const POINTS: Address = address!("Fe1E6dAC7601724768C5d84Eb8E1b2f6F1314BDe");
    pub const STHYPE: Address = address!("e2FbC9cB335A65201FcDE55323aE0F4E8A96A616");
    pub const USDC: Address = address!("24ac48bf01fd6CB1C3836D08b3EdC70a9C4380cA");
    pub const KEY: Address = address!("8D7527f1ECc271486E319908E62DADd033288f31");
}

/// Token registry providing token info lookups by symbol
pub struct TokenRegistry {
    tokens: HashMap<&'static str, TokenInfo>,
    /// Symbols in a stable order for balance snapshots
    order: Vec<&'static str>,
}

impl TokenRegistry {
    /// Create a registry with all tokens known on the target network
    pub fn new() -> Self {
        use addresses::*;

        let entries = [
            TokenInfo { symbol: "WETH", address: WETH, decimals: 18 },
            TokenInfo { symbol: "HSPX", address: HSPX, decimals: 18 },
            TokenInfo { symbol: "xHSPX", address: XHSPX, decimals: 18 },
            TokenInfo { symbol: "PURR", address: PURR, decimals: 18 },
            TokenInfo { symbol: "JEFF", address: JEFF, decimals: 18 },
            TokenInfo { symbol: "CATBAL", address: CATBAL, decimals: 18 },
            TokenInfo { symbol: "HFUN", address: HFUN, decimals: 18 },
            TokenInfo { symbol: "POINTS", address: POINTS, decimals: 18 },
            TokenInfo { symbol: "stHYPE", address: STHYPE, decimals: 18 },
            TokenInfo { symbol: "USDC", address: USDC, decimals: 6 },
            TokenInfo { symbol: "KEY", address: KEY, decimals: 18 },
        ];

        let mut tokens = HashMap::new();
        let mut order = Vec::new();
        for info in entries {
            tokens.insert(info.symbol, info);
            order.push(info.symbol);
        }

        Self { tokens, order }
    }

    /// Get token info by symbol
    pub fn get(&self, symbol: &str) -> Option<&TokenInfo> {
        self.tokens.get(symbol)
    }

    /// Whether a symbol names the network's native asset
    pub fn is_native(&self, symbol: &str) -> bool {
        symbol == NATIVE_SYMBOL
    }

    /// Whether a symbol is known to the registry (native included)
    pub fn is_known(&self, symbol: &str) -> bool {
        self.is_native(symbol) || self.tokens.contains_key(symbol)
    }

    /// ERC-20 symbols in registration order, for balance snapshots
    pub fn symbols(&self) -> &[&'static str] {
        &self.order
    }
}

impl Default for TokenRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Global token registry (lazy initialized)
static REGISTRY: std::sync::OnceLock<TokenRegistry> = std::sync::OnceLock::new();

/// Get the global token registry
pub fn registry() -> &'static TokenRegistry {
    REGISTRY.get_or_init(TokenRegistry::new)
}
