//! Chain identifiers for the networks the exchange front end knows about.
//!
//! A [`ChainId`] is only a number. Any value is accepted; the helpers here
//! answer "do we know this chain" and hand out display metadata when we do.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::NavError;

// ============================================================================
// Chain Identifier
// ============================================================================

/// Numeric identifier of a blockchain network.
///
/// No range validation is performed. Unknown ids are legal values that the
/// explorer resolver degrades to the default network for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(pub u64);

impl ChainId {
    pub const MAINNET: Self = Self(1);
    pub const GOERLI: Self = Self(5);
    pub const SEPOLIA: Self = Self(11_155_111);
    pub const OPTIMISM: Self = Self(10);
    pub const OPTIMISM_GOERLI: Self = Self(420);
    pub const ARBITRUM_ONE: Self = Self(42_161);
    pub const ARBITRUM_GOERLI: Self = Self(421_613);
    pub const POLYGON: Self = Self(137);
    pub const POLYGON_MUMBAI: Self = Self(80_001);
    pub const CELO: Self = Self(42_220);
    pub const CELO_ALFAJORES: Self = Self(44_787);
    pub const BNB: Self = Self(56);
    pub const AVALANCHE: Self = Self(43_114);
    pub const BASE: Self = Self(8_453);
    pub const BASE_GOERLI: Self = Self(84_531);
    pub const SCROLL_ALPHA: Self = Self(534_354);

    /// Every chain with a built-in explorer, in display order.
    pub const SUPPORTED: [Self; 16] = [
        Self::MAINNET,
        Self::GOERLI,
        Self::SEPOLIA,
        Self::OPTIMISM,
        Self::OPTIMISM_GOERLI,
        Self::ARBITRUM_ONE,
        Self::ARBITRUM_GOERLI,
        Self::POLYGON,
        Self::POLYGON_MUMBAI,
        Self::CELO,
        Self::CELO_ALFAJORES,
        Self::BNB,
        Self::AVALANCHE,
        Self::BASE,
        Self::BASE_GOERLI,
        Self::SCROLL_ALPHA,
    ];

    /// Returns the raw numeric id.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Returns the human-readable network name, if the chain is known.
    #[must_use]
    pub const fn name(self) -> Option<&'static str> {
        let name = match self.0 {
            1 => "Ethereum",
            5 => "Goerli",
            11_155_111 => "Sepolia",
            10 => "Optimism",
            420 => "Optimism Goerli",
            42_161 => "Arbitrum One",
            421_613 => "Arbitrum Goerli",
            137 => "Polygon",
            80_001 => "Polygon Mumbai",
            42_220 => "Celo",
            44_787 => "Celo Alfajores",
            56 => "BNB Chain",
            43_114 => "Avalanche",
            8_453 => "Base",
            84_531 => "Base Goerli",
            534_354 => "Scroll Alpha",
            _ => return None,
        };
        Some(name)
    }

    /// Returns the name the token data service uses for this chain.
    ///
    /// Testnets share their mainnet's name where the service has no separate
    /// entry. Unknown chains map to `ETHEREUM`.
    #[must_use]
    pub const fn backend_name(self) -> &'static str {
        match self.0 {
            5 => "ETHEREUM_GOERLI",
            11_155_111 => "ETHEREUM_SEPOLIA",
            137 | 80_001 => "POLYGON",
            42_220 | 44_787 => "CELO",
            42_161 | 421_613 => "ARBITRUM",
            10 | 420 => "OPTIMISM",
            56 => "BNB",
            43_114 => "AVALANCHE",
            8_453 => "BASE",
            _ => "ETHEREUM",
        }
    }

    /// Returns `true` if the chain has a built-in explorer.
    #[must_use]
    pub const fn is_supported(self) -> bool {
        self.name().is_some()
    }
}

impl From<u64> for ChainId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ChainId {
    type Err = NavError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| NavError::InvalidChainId(s.to_string()))
    }
}

// ============================================================================
// Tests
// ============================================================================
