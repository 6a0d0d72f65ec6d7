//! Application constants for dexnav.

use std::time::Duration;

use crate::domain::ChainId;

/// Application name used for the configuration directory.
pub const APP_NAME: &str = "dexnav";

/// Configuration file name.
pub const CONFIG_FILE: &str = "config.json";

/// Delay before the settings panel falls back to the default panel once the
/// drawer has closed. Matches the drawer's closing animation.
pub const SETTINGS_RESET_DELAY: Duration = Duration::from_millis(250);

/// Chain whose explorer is used when a chain id is not recognised.
pub const DEFAULT_CHAIN: ChainId = ChainId::MAINNET;
