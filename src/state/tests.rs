//! Tests for drawer sessions running on a paused tokio clock.

use std::time::Duration;

use tokio::time::{Instant, sleep};

use super::{
    DrawerEvent, DrawerSnapshot, DrawerStep, MenuState, parse_script, run_script, spawn_drawer,
};

const DELAY: Duration = Duration::from_millis(250);

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

#[tokio::test(start_paused = true)]
async fn test_initial_snapshot() {
    let drawer = spawn_drawer(true, DELAY);
    assert_eq!(
        drawer.snapshot(),
        DrawerSnapshot {
            state: MenuState::Default,
            drawer_open: true,
            reset_pending: false,
        }
    );
    assert_eq!(drawer.unmount().await.unwrap(), MenuState::Default);
}

#[tokio::test(start_paused = true)]
async fn test_open_settings_applies_immediately() {
    let drawer = spawn_drawer(true, DELAY);
    let snapshot = drawer.dispatch(DrawerEvent::OpenSettings).await.unwrap();
    assert_eq!(snapshot.state, MenuState::Settings);
    assert_eq!(drawer.snapshot().state, MenuState::Settings);

    sleep(ms(60_000)).await;
    assert_eq!(drawer.snapshot().state, MenuState::Settings);
    drawer.unmount().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_reset_fires_after_delay() {
    let drawer = spawn_drawer(true, DELAY);
    drawer.dispatch(DrawerEvent::OpenSettings).await.unwrap();

    let closed = drawer.dispatch(DrawerEvent::Closed).await.unwrap();
    assert_eq!(closed.state, MenuState::Settings);
    assert!(!closed.drawer_open);
    assert!(closed.reset_pending);
    let start = Instant::now();

    sleep(ms(249)).await;
    assert_eq!(drawer.snapshot().state, MenuState::Settings);

    let mut snapshots = drawer.subscribe();
    snapshots
        .wait_for(|snapshot| snapshot.state == MenuState::Default)
        .await
        .expect("session should still be running");
    assert!(start.elapsed() >= DELAY);
    assert!(!drawer.snapshot().reset_pending);

    assert_eq!(drawer.unmount().await.unwrap(), MenuState::Default);
}

#[tokio::test(start_paused = true)]
async fn test_reopen_before_delay_keeps_settings() {
    let drawer = spawn_drawer(true, DELAY);
    drawer.dispatch(DrawerEvent::OpenSettings).await.unwrap();
    drawer.dispatch(DrawerEvent::Closed).await.unwrap();

    sleep(ms(100)).await;
    let reopened = drawer.dispatch(DrawerEvent::Opened).await.unwrap();
    assert!(reopened.drawer_open);
    assert!(!reopened.reset_pending);

    sleep(ms(1_000)).await;
    assert_eq!(drawer.snapshot().state, MenuState::Settings);
    drawer.unmount().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_explicit_close_beats_pending_reset() {
    let drawer = spawn_drawer(false, DELAY);
    let snapshot = drawer.dispatch(DrawerEvent::OpenSettings).await.unwrap();
    assert!(snapshot.reset_pending);

    let snapshot = drawer.dispatch(DrawerEvent::CloseSettings).await.unwrap();
    assert_eq!(snapshot.state, MenuState::Default);
    assert!(!snapshot.reset_pending);
    drawer.unmount().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_unmount_cancels_pending_reset() {
    let drawer = spawn_drawer(true, DELAY);
    drawer.dispatch(DrawerEvent::OpenSettings).await.unwrap();
    drawer.dispatch(DrawerEvent::Closed).await.unwrap();

    let snapshots = drawer.subscribe();
    assert_eq!(drawer.unmount().await.unwrap(), MenuState::Settings);

    sleep(ms(1_000)).await;
    assert_eq!(snapshots.borrow().state, MenuState::Settings);
}

#[tokio::test(start_paused = true)]
async fn test_send_is_applied_in_order() {
    let drawer = spawn_drawer(true, DELAY);
    drawer.send(DrawerEvent::OpenSettings).unwrap();
    drawer.send(DrawerEvent::CloseSettings).unwrap();
    drawer.send(DrawerEvent::OpenSettings).unwrap();

    let snapshot = drawer.dispatch(DrawerEvent::Opened).await.unwrap();
    assert_eq!(snapshot.state, MenuState::Settings);
    drawer.unmount().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_run_script_reports_each_step() {
    let drawer = spawn_drawer(true, DELAY);
    let steps = parse_script("settings,close,wait:100,open,close,wait:300").unwrap();

    let mut seen: Vec<(DrawerStep, MenuState, bool)> = Vec::new();
    run_script(&drawer, &steps, |step, snapshot| {
        seen.push((*step, snapshot.state, snapshot.drawer_open));
    })
    .await
    .unwrap();

    let states: Vec<_> = seen.iter().map(|(_, state, _)| *state).collect();
    assert_eq!(
        states,
        vec![
            MenuState::Settings,
            MenuState::Settings,
            MenuState::Settings,
            MenuState::Settings,
            MenuState::Settings,
            MenuState::Default,
        ]
    );
    assert!(!seen.last().unwrap().2);
    drawer.unmount().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_dropping_handle_ends_session() {
    let drawer = spawn_drawer(true, DELAY);
    drawer.dispatch(DrawerEvent::OpenSettings).await.unwrap();
    drawer.dispatch(DrawerEvent::Closed).await.unwrap();

    let mut snapshots = drawer.subscribe();
    drop(drawer);

    assert!(snapshots.changed().await.is_err());
    sleep(ms(1_000)).await;
    assert_eq!(snapshots.borrow().state, MenuState::Settings);
}
