//! Domain types for dexnav.
//!
//! # Module Organization
//!
//! - [`error`] - Error type shared by the crate
//! - [`chain`] - Chain identifiers and per-chain metadata
//! - [`explorer`] - Block-explorer link resolution

// ============================================================================
// Module Declarations
// ============================================================================

pub mod chain;
pub mod error;
pub mod explorer;

// ============================================================================
// Re-exports
// ============================================================================

pub use chain::ChainId;
pub use error::NavError;
pub use explorer::{
    CustomExplorer, ExplorerEntityKind, ExplorerEntry, ExplorerLinkConfig, ExplorerRegistry,
    builtin_explorers, explorer_config, known_explorer, resolve_explorer_link,
};
