//! Scripted drawer sessions.
//!
//! A script is a comma-separated list of steps:
//!
//! | step        | effect                          |
//! |-------------|---------------------------------|
//! | `open`      | drawer opens                    |
//! | `close`     | drawer closes                   |
//! | `settings`  | settings panel requested        |
//! | `back`      | settings panel closed           |
//! | `wait:<ms>` | let time pass                   |

use std::str::FromStr;
use std::time::Duration;

use super::drawer::{DrawerEvent, DrawerHandle, DrawerSnapshot};
use crate::domain::NavError;

/// One step of a drawer script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawerStep {
    Event(DrawerEvent),
    Wait(Duration),
}

impl FromStr for DrawerStep {
    type Err = NavError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let step = s.trim();
        let event = match step.to_ascii_lowercase().as_str() {
            "open" => DrawerEvent::Opened,
            "close" => DrawerEvent::Closed,
            "settings" => DrawerEvent::OpenSettings,
            "back" => DrawerEvent::CloseSettings,
            other => {
                let Some(millis) = other.strip_prefix("wait:") else {
                    return Err(NavError::invalid_step(step, "unknown step"));
                };
                let millis = millis
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| NavError::invalid_step(step, "expected milliseconds"))?;
                return Ok(Self::Wait(Duration::from_millis(millis)));
            }
        };
        Ok(Self::Event(event))
    }
}

impl std::fmt::Display for DrawerStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Event(DrawerEvent::Opened) => f.write_str("open"),
            Self::Event(DrawerEvent::Closed) => f.write_str("close"),
            Self::Event(DrawerEvent::OpenSettings) => f.write_str("settings"),
            Self::Event(DrawerEvent::CloseSettings) => f.write_str("back"),
            Self::Wait(duration) => write!(f, "wait:{}", duration.as_millis()),
        }
    }
}

/// Parses a comma-separated script. Empty steps are skipped.
///
/// # Errors
///
/// Returns [`NavError::InvalidScriptStep`] for the first step that does not
/// parse.
pub fn parse_script(script: &str) -> Result<Vec<DrawerStep>, NavError> {
    script
        .split(',')
        .filter(|step| !step.trim().is_empty())
        .map(str::parse::<DrawerStep>)
        .collect()
}

/// Plays `steps` against a running session, reporting the snapshot after
/// each step.
///
/// # Errors
///
/// Returns [`NavError::DrawerClosed`] if the session stops mid-script.
pub async fn run_script(
    drawer: &DrawerHandle,
    steps: &[DrawerStep],
    mut on_step: impl FnMut(&DrawerStep, DrawerSnapshot),
) -> Result<(), NavError> {
    for step in steps {
        let snapshot = match *step {
            DrawerStep::Event(event) => drawer.dispatch(event).await?,
            DrawerStep::Wait(duration) => {
                tokio::time::sleep(duration).await;
                drawer.snapshot()
            }
        };
        on_step(step, snapshot);
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
