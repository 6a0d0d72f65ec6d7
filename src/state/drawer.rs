//! Async drawer session.
//!
//! A session is a tokio task that owns one [`MenuController`]. It receives
//! [`DrawerEvent`]s over a channel, sleeps until the controller's pending
//! reset is due and publishes a [`DrawerSnapshot`] through a watch channel
//! whenever something visible changes. Unmounting the session cancels any
//! reset that has not fired yet.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};

use super::menu::{MenuController, MenuState, MenuTransition};
use crate::domain::NavError;

// ============================================================================
// Events and Snapshots
// ============================================================================

/// Input to a drawer session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawerEvent {
    /// The drawer finished opening.
    Opened,
    /// The drawer started closing.
    Closed,
    /// The user asked for the settings panel.
    OpenSettings,
    /// The user left the settings panel.
    CloseSettings,
}

/// Observable state of a drawer session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawerSnapshot {
    pub state: MenuState,
    pub drawer_open: bool,
    pub reset_pending: bool,
}

impl DrawerSnapshot {
    fn of(controller: &MenuController) -> Self {
        Self {
            state: controller.state(),
            drawer_open: controller.is_drawer_open(),
            reset_pending: controller.pending_reset().is_some(),
        }
    }
}

enum Command {
    Event(DrawerEvent, Option<oneshot::Sender<DrawerSnapshot>>),
    Unmount,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Event(event, _) => f.debug_tuple("Event").field(event).finish(),
            Self::Unmount => f.write_str("Unmount"),
        }
    }
}

// ============================================================================
// Handle
// ============================================================================

/// Handle to a running drawer session.
#[derive(Debug)]
pub struct DrawerHandle {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<DrawerSnapshot>,
    task: JoinHandle<MenuState>,
}

/// Starts a drawer session on the current tokio runtime.
///
/// # Panics
///
/// Panics if called outside a tokio runtime.
#[must_use]
pub fn spawn_drawer(drawer_open: bool, reset_delay: Duration) -> DrawerHandle {
    let controller = MenuController::with_reset_delay(drawer_open, reset_delay);
    let (commands, command_rx) = mpsc::unbounded_channel();
    let (snapshot_tx, snapshots) = watch::channel(DrawerSnapshot::of(&controller));
    let task = tokio::spawn(run_session(controller, command_rx, snapshot_tx));

    DrawerHandle {
        commands,
        snapshots,
        task,
    }
}

impl DrawerHandle {
    /// Queues an event without waiting for it to be applied.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::DrawerClosed`] if the session has stopped.
    pub fn send(&self, event: DrawerEvent) -> Result<(), NavError> {
        self.commands
            .send(Command::Event(event, None))
            .map_err(|_| NavError::DrawerClosed)
    }

    /// Applies an event and returns the snapshot right after it.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::DrawerClosed`] if the session has stopped.
    pub async fn dispatch(&self, event: DrawerEvent) -> Result<DrawerSnapshot, NavError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(Command::Event(event, Some(reply_tx)))
            .map_err(|_| NavError::DrawerClosed)?;
        reply_rx.await.map_err(|_| NavError::DrawerClosed)
    }

    /// Latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> DrawerSnapshot {
        *self.snapshots.borrow()
    }

    /// Subscribes to snapshot changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<DrawerSnapshot> {
        self.snapshots.clone()
    }

    /// Stops the session, cancelling any pending reset.
    ///
    /// Returns the final menu state.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::DrawerTask`] if the session task panicked.
    pub async fn unmount(self) -> Result<MenuState, NavError> {
        // A failed send means the task already stopped; joining still
        // reports how it ended.
        let _ = self.commands.send(Command::Unmount);
        Ok(self.task.await?)
    }
}

// ============================================================================
// Session Loop
// ============================================================================

async fn run_session(
    mut controller: MenuController,
    mut commands: mpsc::UnboundedReceiver<Command>,
    snapshots: watch::Sender<DrawerSnapshot>,
) -> MenuState {
    loop {
        let deadline = controller.pending_reset_deadline();

        tokio::select! {
            biased;

            command = commands.recv() => match command {
                Some(Command::Event(event, reply)) => {
                    apply_event(&mut controller, event, Instant::now());
                    let snapshot = publish(&controller, &snapshots);
                    if let Some(reply) = reply {
                        // The caller may have given up waiting.
                        let _ = reply.send(snapshot);
                    }
                }
                Some(Command::Unmount) | None => break,
            },
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                if let Some(transition) = controller.poll(Instant::now()) {
                    log_transition(transition);
                }
                publish(&controller, &snapshots);
            }
        }
    }

    tracing::debug!("Drawer session unmounted");
    controller.teardown()
}

fn apply_event(controller: &mut MenuController, event: DrawerEvent, now: Instant) {
    let transition = match event {
        DrawerEvent::Opened => {
            controller.set_drawer_open(true, now);
            None
        }
        DrawerEvent::Closed => {
            controller.set_drawer_open(false, now);
            None
        }
        DrawerEvent::OpenSettings => controller.open_settings(now),
        DrawerEvent::CloseSettings => controller.close_settings(now),
    };
    if let Some(transition) = transition {
        log_transition(transition);
    }
}

fn publish(controller: &MenuController, snapshots: &watch::Sender<DrawerSnapshot>) -> DrawerSnapshot {
    let snapshot = DrawerSnapshot::of(controller);
    snapshots.send_if_modified(|current| {
        if *current == snapshot {
            false
        } else {
            *current = snapshot;
            true
        }
    });
    snapshot
}

fn log_transition(transition: MenuTransition) {
    tracing::debug!(
        from = %transition.from,
        to = %transition.to,
        cause = ?transition.cause,
        "Menu transition"
    );
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_stopped_session_rejects_events() {
        let drawer = spawn_drawer(true, Duration::from_millis(250));
        drawer.dispatch(DrawerEvent::OpenSettings).await.unwrap();
        let mut snapshots = drawer.subscribe();

        drawer.task.abort();
        while !drawer.task.is_finished() {
            tokio::task::yield_now().await;
        }

        assert!(matches!(
            drawer.send(DrawerEvent::Closed),
            Err(NavError::DrawerClosed)
        ));
        assert!(matches!(
            drawer.dispatch(DrawerEvent::CloseSettings).await,
            Err(NavError::DrawerClosed)
        ));
        assert!(snapshots.changed().await.is_err());
        assert!(matches!(
            drawer.unmount().await,
            Err(NavError::DrawerTask(err)) if err.is_cancelled()
        ));
    }
}
