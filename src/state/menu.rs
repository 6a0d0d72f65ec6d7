//! Menu state for the account drawer.
//!
//! The drawer shows one sub-panel at a time: the account (or connect-wallet)
//! panel by default, or the settings panel. When the drawer closes while
//! settings are showing, the menu falls back to the default panel only after
//! [`SETTINGS_RESET_DELAY`], so the panel does not flip while the drawer is
//! still animating shut.
//!
//! The controller never sleeps. Callers pass the current [`Instant`] to every
//! operation, wait until [`MenuController::pending_reset_deadline`] and then
//! call [`MenuController::poll`]. The async [`drawer`](super::drawer) session
//! does exactly that on the tokio runtime.

use std::time::Duration;

use tokio::time::Instant;

use crate::constants::SETTINGS_RESET_DELAY;

// ============================================================================
// Menu State
// ============================================================================

/// Which sub-panel of the drawer is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MenuState {
    /// Account panel, or the connect-wallet panel when disconnected.
    #[default]
    Default,
    /// Settings panel.
    Settings,
}

impl MenuState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Settings => "settings",
        }
    }
}

impl std::fmt::Display for MenuState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What caused a menu transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionCause {
    /// The user asked for the settings panel.
    OpenSettings,
    /// The user closed the settings panel.
    CloseSettings,
    /// The delayed reset fired after the drawer closed.
    DrawerClosed,
}

/// A change of [`MenuState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuTransition {
    pub from: MenuState,
    pub to: MenuState,
    pub cause: TransitionCause,
}

// ============================================================================
// Wallet Status
// ============================================================================

/// Wallet connection as reported by the wallet provider.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WalletStatus {
    /// A wallet is connected with the given account.
    Connected { account: String },
    /// No wallet is connected.
    #[default]
    Disconnected,
}

impl WalletStatus {
    pub fn connected(account: impl Into<String>) -> Self {
        Self::Connected {
            account: account.into(),
        }
    }

    #[must_use]
    pub fn account(&self) -> Option<&str> {
        match self {
            Self::Connected { account } => Some(account),
            Self::Disconnected => None,
        }
    }
}

/// The panel the drawer should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawerPanel<'a> {
    /// Header for the connected account.
    AuthenticatedAccount(&'a str),
    /// Wallet picker.
    ConnectWallet,
    /// Settings menu.
    Settings,
}

// ============================================================================
// Controller
// ============================================================================

/// Handle of a scheduled reset. A new handle is issued every time a reset
/// is scheduled, so a stale handle never matches the pending one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResetHandle(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingReset {
    handle: ResetHandle,
    due: Instant,
}

/// State machine for the drawer menu.
///
/// At most one reset is pending. Every change of the `(drawer_open, state)`
/// pair cancels it and schedules a fresh one if the drawer is closed while
/// settings are showing.
#[derive(Debug)]
pub struct MenuController {
    state: MenuState,
    drawer_open: bool,
    reset_delay: Duration,
    pending: Option<PendingReset>,
    next_handle: u64,
}

impl MenuController {
    /// Creates a controller in the default state using [`SETTINGS_RESET_DELAY`].
    #[must_use]
    pub fn new(drawer_open: bool) -> Self {
        Self::with_reset_delay(drawer_open, SETTINGS_RESET_DELAY)
    }

    /// Creates a controller in the default state with a custom reset delay.
    #[must_use]
    pub fn with_reset_delay(drawer_open: bool, reset_delay: Duration) -> Self {
        Self {
            state: MenuState::Default,
            drawer_open,
            reset_delay,
            pending: None,
            next_handle: 0,
        }
    }

    #[must_use]
    pub const fn state(&self) -> MenuState {
        self.state
    }

    #[must_use]
    pub const fn is_drawer_open(&self) -> bool {
        self.drawer_open
    }

    #[must_use]
    pub const fn reset_delay(&self) -> Duration {
        self.reset_delay
    }

    /// Handle of the pending reset, if one is scheduled.
    #[must_use]
    pub fn pending_reset(&self) -> Option<ResetHandle> {
        self.pending.map(|pending| pending.handle)
    }

    /// When the pending reset is due, if one is scheduled.
    #[must_use]
    pub fn pending_reset_deadline(&self) -> Option<Instant> {
        self.pending.map(|pending| pending.due)
    }

    /// Shows the settings panel.
    pub fn open_settings(&mut self, now: Instant) -> Option<MenuTransition> {
        self.transition(MenuState::Settings, TransitionCause::OpenSettings, now)
    }

    /// Returns to the default panel immediately.
    pub fn close_settings(&mut self, now: Instant) -> Option<MenuTransition> {
        self.transition(MenuState::Default, TransitionCause::CloseSettings, now)
    }

    /// Records whether the drawer is open.
    pub fn set_drawer_open(&mut self, open: bool, now: Instant) {
        if self.drawer_open == open {
            return;
        }
        self.drawer_open = open;
        self.reevaluate(now);
    }

    /// Fires the pending reset if it is due at `now`.
    pub fn poll(&mut self, now: Instant) -> Option<MenuTransition> {
        let pending = self.pending?;
        if now < pending.due {
            return None;
        }
        self.pending = None;
        tracing::debug!(handle = pending.handle.0, "Settings reset fired");
        self.transition(MenuState::Default, TransitionCause::DrawerClosed, now)
    }

    /// Tears the controller down, cancelling any pending reset.
    ///
    /// Returns the final state.
    pub fn teardown(mut self) -> MenuState {
        self.cancel_pending();
        self.state
    }

    /// Selects the panel to render for the given wallet connection.
    #[must_use]
    pub fn visible_panel<'a>(&self, wallet: &'a WalletStatus) -> DrawerPanel<'a> {
        match (self.state, wallet) {
            (MenuState::Settings, _) => DrawerPanel::Settings,
            (MenuState::Default, WalletStatus::Connected { account }) => {
                DrawerPanel::AuthenticatedAccount(account)
            }
            (MenuState::Default, WalletStatus::Disconnected) => DrawerPanel::ConnectWallet,
        }
    }

    fn transition(
        &mut self,
        to: MenuState,
        cause: TransitionCause,
        now: Instant,
    ) -> Option<MenuTransition> {
        if self.state == to {
            return None;
        }
        let from = std::mem::replace(&mut self.state, to);
        self.reevaluate(now);
        Some(MenuTransition { from, to, cause })
    }

    fn reevaluate(&mut self, now: Instant) {
        self.cancel_pending();
        if !self.drawer_open && self.state == MenuState::Settings {
            let handle = ResetHandle(self.next_handle);
            self.next_handle += 1;
            self.pending = Some(PendingReset {
                handle,
                due: now + self.reset_delay,
            });
            tracing::debug!(
                handle = handle.0,
                delay = ?self.reset_delay,
                "Settings reset scheduled"
            );
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            tracing::debug!(handle = pending.handle.0, "Settings reset cancelled");
        }
    }
}

impl Default for MenuController {
    fn default() -> Self {
        Self::new(false)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    const DELAY: Duration = Duration::from_millis(250);

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[fixture]
    fn t0() -> Instant {
        Instant::now()
    }

    /// Open drawer showing settings.
    fn settings_open(t0: Instant) -> MenuController {
        let mut menu = MenuController::with_reset_delay(true, DELAY);
        menu.open_settings(t0);
        menu
    }

    #[rstest]
    fn test_starts_in_default(t0: Instant) {
        let mut menu = MenuController::new(true);
        assert_eq!(menu.state(), MenuState::Default);
        assert_eq!(menu.reset_delay(), SETTINGS_RESET_DELAY);
        assert_eq!(menu.pending_reset(), None);
        assert_eq!(menu.poll(t0 + ms(10_000)), None);
    }

    #[rstest]
    fn test_open_settings_is_synchronous(t0: Instant) {
        let mut menu = MenuController::with_reset_delay(true, DELAY);
        let transition = menu.open_settings(t0);
        assert_eq!(
            transition,
            Some(MenuTransition {
                from: MenuState::Default,
                to: MenuState::Settings,
                cause: TransitionCause::OpenSettings,
            })
        );
        assert_eq!(menu.state(), MenuState::Settings);
        assert_eq!(menu.pending_reset(), None);
    }

    #[rstest]
    fn test_open_settings_twice_is_noop(t0: Instant) {
        let mut menu = settings_open(t0);
        assert_eq!(menu.open_settings(t0), None);
    }

    #[rstest]
    fn test_close_settings_is_immediate(t0: Instant) {
        let mut menu = settings_open(t0);
        let transition = menu.close_settings(t0 + ms(1)).unwrap();
        assert_eq!(transition.to, MenuState::Default);
        assert_eq!(transition.cause, TransitionCause::CloseSettings);
        assert_eq!(menu.state(), MenuState::Default);
        assert_eq!(menu.close_settings(t0 + ms(2)), None);
    }

    #[rstest]
    fn test_settings_persist_while_drawer_open(t0: Instant) {
        let mut menu = settings_open(t0);
        assert_eq!(menu.poll(t0 + ms(60_000)), None);
        assert_eq!(menu.state(), MenuState::Settings);
    }

    #[rstest]
    fn test_drawer_close_resets_after_delay(t0: Instant) {
        let mut menu = settings_open(t0);
        menu.set_drawer_open(false, t0);
        assert_eq!(menu.pending_reset_deadline(), Some(t0 + DELAY));

        assert_eq!(menu.poll(t0 + ms(249)), None);
        assert_eq!(menu.state(), MenuState::Settings);

        let transition = menu.poll(t0 + DELAY).unwrap();
        assert_eq!(transition.from, MenuState::Settings);
        assert_eq!(transition.to, MenuState::Default);
        assert_eq!(transition.cause, TransitionCause::DrawerClosed);
        assert_eq!(menu.state(), MenuState::Default);
        assert_eq!(menu.pending_reset(), None);
    }

    #[rstest]
    fn test_reopen_cancels_reset(t0: Instant) {
        let mut menu = settings_open(t0);
        menu.set_drawer_open(false, t0);
        menu.set_drawer_open(true, t0 + ms(100));
        assert_eq!(menu.pending_reset(), None);

        assert_eq!(menu.poll(t0 + ms(1_000)), None);
        assert_eq!(menu.state(), MenuState::Settings);
    }

    #[rstest]
    fn test_explicit_close_cancels_reset(t0: Instant) {
        let mut menu = settings_open(t0);
        menu.set_drawer_open(false, t0);
        menu.close_settings(t0 + ms(10));
        assert_eq!(menu.pending_reset(), None);
        assert_eq!(menu.poll(t0 + ms(1_000)), None);
    }

    #[rstest]
    fn test_repeated_close_signal_keeps_original_deadline(t0: Instant) {
        let mut menu = settings_open(t0);
        menu.set_drawer_open(false, t0);
        let handle = menu.pending_reset();
        menu.set_drawer_open(false, t0 + ms(200));
        assert_eq!(menu.pending_reset(), handle);
        assert_eq!(menu.pending_reset_deadline(), Some(t0 + DELAY));
    }

    #[rstest]
    fn test_reschedule_supersedes_previous_handle(t0: Instant) {
        let mut menu = settings_open(t0);
        menu.set_drawer_open(false, t0);
        let first = menu.pending_reset().unwrap();

        menu.set_drawer_open(true, t0 + ms(100));
        menu.set_drawer_open(false, t0 + ms(200));
        let second = menu.pending_reset().unwrap();

        assert_ne!(first, second);
        assert!(second > first);
        assert_eq!(menu.poll(t0 + DELAY), None);
        assert_eq!(menu.pending_reset_deadline(), Some(t0 + ms(200) + DELAY));
        assert!(menu.poll(t0 + ms(450)).is_some());
    }

    #[rstest]
    fn test_settings_opened_while_closed_schedules_reset(t0: Instant) {
        let mut menu = MenuController::with_reset_delay(false, DELAY);
        menu.open_settings(t0);
        assert_eq!(menu.pending_reset_deadline(), Some(t0 + DELAY));
        assert!(menu.poll(t0 + DELAY).is_some());
        assert_eq!(menu.state(), MenuState::Default);
    }

    #[rstest]
    fn test_closing_in_default_state_schedules_nothing(t0: Instant) {
        let mut menu = MenuController::with_reset_delay(true, DELAY);
        menu.set_drawer_open(false, t0);
        assert_eq!(menu.pending_reset(), None);
    }

    #[rstest]
    fn test_teardown_cancels_pending_reset(t0: Instant) {
        let mut menu = settings_open(t0);
        menu.set_drawer_open(false, t0);
        assert!(menu.pending_reset().is_some());
        assert_eq!(menu.teardown(), MenuState::Settings);
    }

    #[rstest]
    #[case::connected_default(false, WalletStatus::connected("0xabc"), DrawerPanel::AuthenticatedAccount("0xabc"))]
    #[case::disconnected_default(false, WalletStatus::Disconnected, DrawerPanel::ConnectWallet)]
    #[case::connected_settings(true, WalletStatus::connected("0xabc"), DrawerPanel::Settings)]
    #[case::disconnected_settings(true, WalletStatus::Disconnected, DrawerPanel::Settings)]
    fn test_visible_panel(
        t0: Instant,
        #[case] settings: bool,
        #[case] wallet: WalletStatus,
        #[case] expected: DrawerPanel<'static>,
    ) {
        let mut menu = MenuController::new(true);
        if settings {
            menu.open_settings(t0);
        }
        assert_eq!(menu.visible_panel(&wallet), expected);
    }

    #[test]
    fn test_wallet_status_account() {
        assert_eq!(WalletStatus::connected("0x1").account(), Some("0x1"));
        assert_eq!(WalletStatus::Disconnected.account(), None);
        assert_eq!(WalletStatus::default(), WalletStatus::Disconnected);
    }

    #[test]
    fn test_menu_state_display() {
        assert_eq!(MenuState::Default.to_string(), "default");
        assert_eq!(MenuState::Settings.to_string(), "settings");
    }
}
