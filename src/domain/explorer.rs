//! Block-explorer link resolution.
//!
//! Every supported chain has one entry in a static table naming its explorer
//! origin and any path segments that differ from the usual `tx` / `token` /
//! `address` / `block` vocabulary. Resolution is a table lookup followed by
//! `origin/segment/identifier`; a chain missing from the table resolves
//! against the mainnet entry instead of failing.
//!
//! [`ExplorerRegistry`] layers user-configured explorers on top of the
//! built-in table.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use super::{ChainId, NavError};
use crate::constants::DEFAULT_CHAIN;

// ============================================================================
// Entity Kind
// ============================================================================

/// The kind of on-chain entity an explorer link points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum ExplorerEntityKind {
    /// A transaction, by hash.
    Transaction,
    /// A token contract, by address.
    Token,
    /// A wallet or contract, by address.
    Address,
    /// A block, by number or hash.
    Block,
}

impl ExplorerEntityKind {
    /// All entity kinds.
    pub const ALL: [Self; 4] = [Self::Transaction, Self::Token, Self::Address, Self::Block];

    /// Path segment used by explorers that follow the common layout.
    #[must_use]
    pub const fn default_segment(self) -> &'static str {
        match self {
            Self::Transaction => "tx",
            Self::Token => "token",
            Self::Address => "address",
            Self::Block => "block",
        }
    }

    /// Returns the lowercase name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Transaction => "transaction",
            Self::Token => "token",
            Self::Address => "address",
            Self::Block => "block",
        }
    }
}

impl std::fmt::Display for ExplorerEntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExplorerEntityKind {
    type Err = NavError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tx" | "transaction" => Ok(Self::Transaction),
            "token" => Ok(Self::Token),
            "address" | "account" => Ok(Self::Address),
            "block" => Ok(Self::Block),
            _ => Err(NavError::InvalidEntityKind(s.to_string())),
        }
    }
}

fn join_link(origin: &str, segment: &str, identifier: &str) -> String {
    format!("{origin}/{segment}/{identifier}")
}

// ============================================================================
// Built-in Explorers
// ============================================================================

/// Explorer settings for one built-in chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExplorerLinkConfig {
    /// The chain this explorer serves.
    pub chain_id: ChainId,
    /// Scheme and host, without a trailing slash.
    pub origin: &'static str,
    /// Segments that replace [`ExplorerEntityKind::default_segment`].
    pub segments: &'static [(ExplorerEntityKind, &'static str)],
    /// Whether the explorer can be used without registering for a key.
    pub keyless: bool,
}

impl ExplorerLinkConfig {
    const fn new(chain_id: ChainId, origin: &'static str) -> Self {
        Self {
            chain_id,
            origin,
            segments: &[],
            keyless: false,
        }
    }

    const fn with_segments(mut self, segments: &'static [(ExplorerEntityKind, &'static str)]) -> Self {
        self.segments = segments;
        self
    }

    const fn without_registration(mut self) -> Self {
        self.keyless = true;
        self
    }

    /// Returns the path segment this explorer uses for `kind`.
    #[must_use]
    pub fn segment(&self, kind: ExplorerEntityKind) -> &'static str {
        self.segments
            .iter()
            .find(|(k, _)| *k == kind)
            .map_or(kind.default_segment(), |&(_, segment)| segment)
    }

    /// Builds the explorer URL for `identifier`.
    #[must_use]
    pub fn link(&self, identifier: &str, kind: ExplorerEntityKind) -> String {
        join_link(self.origin, self.segment(kind), identifier)
    }
}

// Arbiscan shows token contracts on the address page.
const ARBISCAN_SEGMENTS: &[(ExplorerEntityKind, &str)] =
    &[(ExplorerEntityKind::Token, "address")];

// Mainnet leads the table; it is also the fallback entry.
static EXPLORERS: [ExplorerLinkConfig; 16] = [
    ExplorerLinkConfig::new(ChainId::MAINNET, "https://etherscan.io"),
    ExplorerLinkConfig::new(ChainId::GOERLI, "https://goerli.etherscan.io"),
    ExplorerLinkConfig::new(ChainId::SEPOLIA, "https://sepolia.etherscan.io"),
    ExplorerLinkConfig::new(ChainId::OPTIMISM, "https://optimistic.etherscan.io"),
    ExplorerLinkConfig::new(ChainId::OPTIMISM_GOERLI, "https://goerli-optimism.etherscan.io"),
    ExplorerLinkConfig::new(ChainId::ARBITRUM_ONE, "https://arbiscan.io")
        .with_segments(ARBISCAN_SEGMENTS),
    ExplorerLinkConfig::new(ChainId::ARBITRUM_GOERLI, "https://goerli.arbiscan.io"),
    ExplorerLinkConfig::new(ChainId::POLYGON, "https://polygonscan.com"),
    ExplorerLinkConfig::new(ChainId::POLYGON_MUMBAI, "https://mumbai.polygonscan.com"),
    ExplorerLinkConfig::new(ChainId::CELO, "https://celoscan.io"),
    ExplorerLinkConfig::new(
        ChainId::CELO_ALFAJORES,
        "https://alfajores-blockscout.celo-testnet.org",
    )
    .without_registration(),
    ExplorerLinkConfig::new(ChainId::BNB, "https://bscscan.com"),
    ExplorerLinkConfig::new(ChainId::AVALANCHE, "https://snowtrace.io"),
    ExplorerLinkConfig::new(ChainId::BASE, "https://basescan.org"),
    ExplorerLinkConfig::new(ChainId::BASE_GOERLI, "https://goerli.basescan.org"),
    ExplorerLinkConfig::new(ChainId::SCROLL_ALPHA, "https://blockscout.scroll.io")
        .without_registration(),
];

static EXPLORER_INDEX: LazyLock<HashMap<ChainId, &'static ExplorerLinkConfig>> =
    LazyLock::new(|| EXPLORERS.iter().map(|config| (config.chain_id, config)).collect());

/// Returns the built-in explorer table.
#[must_use]
pub fn builtin_explorers() -> &'static [ExplorerLinkConfig] {
    &EXPLORERS
}

/// Returns the built-in explorer for `chain_id`, if there is one.
#[must_use]
pub fn known_explorer(chain_id: ChainId) -> Option<&'static ExplorerLinkConfig> {
    EXPLORER_INDEX.get(&chain_id).copied()
}

/// Returns the built-in explorer for `chain_id`, falling back to mainnet.
#[must_use]
pub fn explorer_config(chain_id: ChainId) -> &'static ExplorerLinkConfig {
    known_explorer(chain_id).unwrap_or_else(|| {
        tracing::debug!("No explorer for chain {chain_id}, using chain {DEFAULT_CHAIN}");
        default_explorer()
    })
}

fn default_explorer() -> &'static ExplorerLinkConfig {
    known_explorer(DEFAULT_CHAIN).unwrap_or(&EXPLORERS[0])
}

/// Builds a link to `identifier` on the public explorer of `chain_id`.
///
/// The identifier is not validated. Unknown chains resolve against the
/// mainnet explorer, so this never fails.
///
/// # Example
///
/// ```
/// use dexnav::{ChainId, ExplorerEntityKind, resolve_explorer_link};
///
/// assert_eq!(
///     resolve_explorer_link(ChainId(137), "abc", ExplorerEntityKind::Address),
///     "https://polygonscan.com/address/abc"
/// );
/// ```
#[must_use]
pub fn resolve_explorer_link(
    chain_id: ChainId,
    identifier: &str,
    kind: ExplorerEntityKind,
) -> String {
    explorer_config(chain_id).link(identifier, kind)
}

// ============================================================================
// Custom Explorers
// ============================================================================

/// A user-configured explorer.
///
/// Takes precedence over the built-in entry for the same chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomExplorer {
    pub chain_id: ChainId,
    pub name: String,
    pub origin: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub segments: BTreeMap<ExplorerEntityKind, String>,
    #[serde(default)]
    pub keyless: bool,
}

impl CustomExplorer {
    /// Creates a custom explorer using the default path segments.
    pub fn new(chain_id: ChainId, name: impl Into<String>, origin: impl Into<String>) -> Self {
        Self {
            chain_id,
            name: name.into(),
            origin: origin.into(),
            segments: BTreeMap::new(),
            keyless: false,
        }
    }

    /// Overrides the path segment for one entity kind.
    #[must_use]
    pub fn with_segment(mut self, kind: ExplorerEntityKind, segment: impl Into<String>) -> Self {
        self.segments.insert(kind, segment.into());
        self
    }

    /// Marks the explorer as usable without registration.
    #[must_use]
    pub fn with_keyless(mut self, keyless: bool) -> Self {
        self.keyless = keyless;
        self
    }

    /// Returns the path segment this explorer uses for `kind`.
    #[must_use]
    pub fn segment(&self, kind: ExplorerEntityKind) -> &str {
        self.segments
            .get(&kind)
            .map_or(kind.default_segment(), String::as_str)
    }

    /// Builds the explorer URL for `identifier`.
    #[must_use]
    pub fn link(&self, identifier: &str, kind: ExplorerEntityKind) -> String {
        join_link(&self.origin, self.segment(kind), identifier)
    }

    /// Checks the explorer and normalises its origin.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::InvalidExplorer`] if the name is empty, the origin
    /// is not an http(s) URL with a plain host, or a segment is empty or
    /// contains a slash or whitespace.
    pub fn validated(mut self) -> Result<Self, NavError> {
        let chain_id = self.chain_id;

        self.name = self.name.trim().to_string();
        if self.name.is_empty() {
            return Err(NavError::invalid_explorer(chain_id, "name must not be empty"));
        }

        let origin = self.origin.trim().trim_end_matches('/');
        let Some(rest) = origin
            .strip_prefix("https://")
            .or_else(|| origin.strip_prefix("http://"))
        else {
            return Err(NavError::invalid_explorer(
                chain_id,
                format!("origin '{origin}' must start with http:// or https://"),
            ));
        };
        let host = rest.split('/').next().unwrap_or_default();
        if host.is_empty() {
            return Err(NavError::invalid_explorer(
                chain_id,
                format!("origin '{origin}' has no host"),
            ));
        }
        if host.contains(|c: char| c.is_whitespace() || matches!(c, '?' | '#' | '@')) {
            return Err(NavError::invalid_explorer(
                chain_id,
                format!("origin '{origin}' has an invalid host"),
            ));
        }
        self.origin = origin.to_string();

        for (kind, segment) in &self.segments {
            if segment.is_empty() || segment.contains('/') || segment.contains(char::is_whitespace)
            {
                return Err(NavError::invalid_explorer(
                    chain_id,
                    format!("segment '{segment}' for {kind} must be a single path component"),
                ));
            }
        }

        Ok(self)
    }
}

// ============================================================================
// Registry
// ============================================================================

/// An explorer as seen through the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplorerEntry<'a> {
    /// An entry of the built-in table.
    BuiltIn(&'static ExplorerLinkConfig),
    /// A user-configured explorer.
    Custom(&'a CustomExplorer),
}

impl ExplorerEntry<'_> {
    #[must_use]
    pub fn chain_id(&self) -> ChainId {
        match self {
            Self::BuiltIn(config) => config.chain_id,
            Self::Custom(custom) => custom.chain_id,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::BuiltIn(config) => config.chain_id.name().unwrap_or("Unknown"),
            Self::Custom(custom) => &custom.name,
        }
    }

    #[must_use]
    pub fn origin(&self) -> &str {
        match self {
            Self::BuiltIn(config) => config.origin,
            Self::Custom(custom) => &custom.origin,
        }
    }

    #[must_use]
    pub fn segment(&self, kind: ExplorerEntityKind) -> &str {
        match self {
            Self::BuiltIn(config) => config.segment(kind),
            Self::Custom(custom) => custom.segment(kind),
        }
    }

    #[must_use]
    pub fn keyless(&self) -> bool {
        match self {
            Self::BuiltIn(config) => config.keyless,
            Self::Custom(custom) => custom.keyless,
        }
    }

    #[must_use]
    pub const fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }

    /// Builds the explorer URL for `identifier`.
    #[must_use]
    pub fn link(&self, identifier: &str, kind: ExplorerEntityKind) -> String {
        join_link(self.origin(), self.segment(kind), identifier)
    }
}

/// Built-in explorers plus any user-configured ones.
///
/// Lookup order is custom, then built-in, then the default chain's entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExplorerRegistry {
    custom: HashMap<ChainId, CustomExplorer>,
}

impl ExplorerRegistry {
    /// A registry with only the built-in table.
    #[must_use]
    pub fn builtin() -> Self {
        Self::default()
    }

    /// A registry with the given custom explorers layered over the table.
    ///
    /// # Errors
    ///
    /// Returns an error if an explorer fails validation or two explorers
    /// target the same chain.
    pub fn with_custom(
        explorers: impl IntoIterator<Item = CustomExplorer>,
    ) -> Result<Self, NavError> {
        let mut registry = Self::builtin();
        for explorer in explorers {
            registry.insert(explorer)?;
        }
        Ok(registry)
    }

    /// Validates `explorer` and layers it over the table.
    ///
    /// # Errors
    ///
    /// Returns an error if the explorer fails validation or its chain already
    /// has a custom explorer; the registry is unchanged in that case.
    pub fn insert(&mut self, explorer: CustomExplorer) -> Result<(), NavError> {
        let explorer = explorer.validated()?;
        match self.custom.entry(explorer.chain_id) {
            Entry::Occupied(_) => Err(NavError::DuplicateExplorer(explorer.chain_id)),
            Entry::Vacant(slot) => {
                slot.insert(explorer);
                Ok(())
            }
        }
    }

    /// Returns the explorer configured for `chain_id`, without fallback.
    #[must_use]
    pub fn get(&self, chain_id: ChainId) -> Option<ExplorerEntry<'_>> {
        self.custom
            .get(&chain_id)
            .map(ExplorerEntry::Custom)
            .or_else(|| known_explorer(chain_id).map(ExplorerEntry::BuiltIn))
    }

    /// Returns the explorer for `chain_id`, falling back to the default chain.
    #[must_use]
    pub fn entry(&self, chain_id: ChainId) -> ExplorerEntry<'_> {
        self.get(chain_id).unwrap_or_else(|| {
            tracing::debug!("No explorer for chain {chain_id}, using chain {DEFAULT_CHAIN}");
            self.get(DEFAULT_CHAIN)
                .unwrap_or(ExplorerEntry::BuiltIn(default_explorer()))
        })
    }

    /// Builds a link to `identifier` on the explorer for `chain_id`.
    #[must_use]
    pub fn link(&self, chain_id: ChainId, identifier: &str, kind: ExplorerEntityKind) -> String {
        self.entry(chain_id).link(identifier, kind)
    }

    /// All explorers: the built-in table in order (custom entries replacing
    /// built-in ones for the same chain), then custom-only chains by id.
    #[must_use]
    pub fn entries(&self) -> Vec<ExplorerEntry<'_>> {
        let mut entries: Vec<_> = EXPLORERS
            .iter()
            .map(|config| {
                self.custom
                    .get(&config.chain_id)
                    .map_or(ExplorerEntry::BuiltIn(config), ExplorerEntry::Custom)
            })
            .collect();

        let mut extra: Vec<_> = self
            .custom
            .values()
            .filter(|custom| known_explorer(custom.chain_id).is_none())
            .collect();
        extra.sort_by_key(|custom| custom.chain_id);
        entries.extend(extra.into_iter().map(ExplorerEntry::Custom));

        entries
    }
}

// ============================================================================
// Tests
// ============================================================================
