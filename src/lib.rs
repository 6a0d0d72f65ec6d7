//! dexnav: explorer links and account drawer state for a decentralized
//! exchange front end.
//!
//! - [`resolve_explorer_link`] builds a block-explorer URL for a chain,
//!   falling back to the mainnet explorer for chains it does not know.
//! - [`MenuController`](state::MenuController) tracks which drawer panel is
//!   visible and resets it shortly after the drawer closes.

pub mod constants;
pub mod domain;
pub mod render;
pub mod state;

pub use domain::{
    ChainId, CustomExplorer, ExplorerEntityKind, ExplorerEntry, ExplorerLinkConfig,
    ExplorerRegistry, NavError, resolve_explorer_link,
};
