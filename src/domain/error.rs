//! Error types for dexnav.
//!
//! Resolution of explorer links never fails. Errors only arise at the edges:
//! parsing user input, validating configured explorers and talking to a
//! drawer session task.

use thiserror::Error;

use super::ChainId;

// ============================================================================
// Error Types
// ============================================================================

/// Error type for dexnav operations.
#[derive(Debug, Error)]
pub enum NavError {
    /// An entity kind string that does not name a known kind.
    #[error("Unknown entity kind '{0}' (expected tx, token, address or block)")]
    InvalidEntityKind(String),

    /// A chain id string that is not a non-negative integer.
    #[error("Invalid chain id '{0}'")]
    InvalidChainId(String),

    /// A custom explorer that failed validation.
    #[error("Invalid explorer for chain {chain_id}: {message}")]
    InvalidExplorer {
        /// Chain the explorer was configured for.
        chain_id: ChainId,
        /// Why the explorer was rejected.
        message: String,
    },

    /// Two custom explorers configured for the same chain.
    #[error("An explorer for chain {0} is already configured")]
    DuplicateExplorer(ChainId),

    /// No custom explorer configured for the chain.
    #[error("No custom explorer configured for chain {0}")]
    UnknownExplorer(ChainId),

    /// A drawer script step that could not be parsed.
    #[error("Invalid drawer step '{step}': {message}")]
    InvalidScriptStep {
        /// The offending step as written.
        step: String,
        /// Why the step was rejected.
        message: String,
    },

    /// The drawer session task has already stopped.
    #[error("Drawer session is closed")]
    DrawerClosed,

    /// The drawer session task panicked or was cancelled.
    #[error("Drawer session task failed: {0}")]
    DrawerTask(#[from] tokio::task::JoinError),
}

impl NavError {
    /// Create a new invalid explorer error.
    #[must_use]
    pub fn invalid_explorer(chain_id: ChainId, message: impl Into<String>) -> Self {
        Self::InvalidExplorer {
            chain_id,
            message: message.into(),
        }
    }

    /// Create a new invalid script step error.
    #[must_use]
    pub fn invalid_step(step: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidScriptStep {
            step: step.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nav_error_display() {
        let err = NavError::InvalidEntityKind("nft".to_string());
        assert_eq!(
            err.to_string(),
            "Unknown entity kind 'nft' (expected tx, token, address or block)"
        );

        let err = NavError::invalid_explorer(ChainId(10), "origin must not be empty");
        assert_eq!(
            err.to_string(),
            "Invalid explorer for chain 10: origin must not be empty"
        );

        let err = NavError::DuplicateExplorer(ChainId(137));
        assert_eq!(
            err.to_string(),
            "An explorer for chain 137 is already configured"
        );

        let err = NavError::invalid_step("wait:x", "expected milliseconds");
        assert_eq!(
            err.to_string(),
            "Invalid drawer step 'wait:x': expected milliseconds"
        );
    }

    #[test]
    fn test_invalid_explorer_creation() {
        match NavError::invalid_explorer(ChainId(1), "bad") {
            NavError::InvalidExplorer { chain_id, message } => {
                assert_eq!(chain_id, ChainId(1));
                assert_eq!(message, "bad");
            }
            _ => panic!("Expected InvalidExplorer variant"),
        }
    }
}
