//! Plain-text rendering for the command-line interface.

use std::fmt::Write as _;

use crate::domain::{ExplorerEntityKind, ExplorerEntry};
use crate::state::{DrawerSnapshot, DrawerStep};

/// Renders explorers as an aligned table, one row per chain.
///
/// Segment overrides are listed in brackets after the origin, and
/// registrationless explorers are marked `(keyless)`.
#[must_use]
pub fn chain_table(entries: &[ExplorerEntry<'_>]) -> String {
    let mut lines = vec![table_row("CHAIN", "NAME", "SOURCE", "EXPLORER")];

    for entry in entries {
        let mut explorer = entry.origin().to_string();

        let overrides: Vec<_> = ExplorerEntityKind::ALL
            .into_iter()
            .filter(|kind| entry.segment(*kind) != kind.default_segment())
            .map(|kind| format!("{}={}", kind.default_segment(), entry.segment(kind)))
            .collect();
        if !overrides.is_empty() {
            let _ = write!(explorer, " [{}]", overrides.join(", "));
        }
        if entry.keyless() {
            explorer.push_str(" (keyless)");
        }

        let source = if entry.is_custom() { "custom" } else { "built-in" };
        lines.push(table_row(
            &entry.chain_id().to_string(),
            entry.name(),
            source,
            &explorer,
        ));
    }

    lines.join("\n")
}

fn table_row(chain: &str, name: &str, source: &str, explorer: &str) -> String {
    format!("{chain:<8}  {name:<16}  {source:<8}  {explorer}")
}

/// Renders the drawer state after a script step.
#[must_use]
pub fn snapshot_line(step: &DrawerStep, snapshot: DrawerSnapshot) -> String {
    let drawer = if snapshot.drawer_open { "open" } else { "closed" };
    let mut line = format!(
        "{:<8} drawer={drawer:<6} menu={}",
        step.to_string(),
        snapshot.state.as_str()
    );
    if snapshot.reset_pending {
        line.push_str(" (reset pending)");
    }
    line
}

// ============================================================================
// Tests
// ============================================================================
