//! State management for dexnav.
//!
//! - [`MenuController`] - Drawer menu state machine with delayed reset
//! - [`DrawerHandle`] - Async session driving a controller on tokio
//! - [`DrawerStep`] - Scripted input for a session
//! - [`AppConfig`] - Persistent configuration with load/save capabilities
//!
//! ```text
//! ┌──────────────┐  DrawerEvent   ┌──────────────────────────┐
//! │ DrawerHandle │ ─────────────▶ │ session task             │
//! │              │ ◀───────────── │  MenuController + timer  │
//! └──────────────┘ DrawerSnapshot └──────────────────────────┘
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

pub mod config;
pub mod drawer;
pub mod menu;
pub mod script;

#[cfg(test)]
mod tests;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::AppConfig;
pub use drawer::{DrawerEvent, DrawerHandle, DrawerSnapshot, spawn_drawer};
pub use menu::{
    DrawerPanel, MenuController, MenuState, MenuTransition, ResetHandle, TransitionCause,
    WalletStatus,
};
pub use script::{DrawerStep, parse_script, run_script};
