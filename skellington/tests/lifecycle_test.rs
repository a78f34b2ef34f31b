//! Plugin lifecycle dispatch: ordering, arguments, and per-plugin failure isolation.

mod common;

use std::sync::Arc;

use common::*;
use skellington::lifecycle::{bot_connected, initialize};
use skellington::{BotHandle, Controller, Plugin};

fn controller() -> Arc<dyn Controller> {
    Arc::new(MockController::new())
}

/// **Test: A failing and a panicking init do not stop later plugins.**
///
/// **Setup:** Plugins `a` (returns error), `b` (panics), `c` (ok).
///
/// **Expected:** All three `init` hooks run in order; two failures are reported.
#[tokio::test]
async fn test_initialize_isolates_failures() {
    let log = call_log();
    let plugins: Vec<Arc<dyn Plugin>> = vec![
        Arc::new(RecordingPlugin::new("a", &log).failing_init()),
        Arc::new(RecordingPlugin::new("b", &log).panicking_init()),
        Arc::new(RecordingPlugin::new("c", &log)),
    ];

    let failed = initialize(&plugins, &controller(), None, None).await;

    assert_eq!(failed, 2);
    assert_eq!(
        *log.lock().unwrap(),
        vec!["a:init:none", "b:init:none", "c:init:none"]
    );
}

/// **Test: init receives the connected bot in single-team dispatch.**
#[tokio::test]
async fn test_initialize_passes_bot() {
    let log = call_log();
    let plugins: Vec<Arc<dyn Plugin>> = vec![Arc::new(RecordingPlugin::new("a", &log))];
    let bot: BotHandle = Arc::new(MockBot::connected(Some("T1")));

    let failed = initialize(&plugins, &controller(), Some(bot), None).await;

    assert_eq!(failed, 0);
    assert_eq!(*log.lock().unwrap(), vec!["a:init:T1"]);
}

/// **Test: bot_connected reaches every plugin even when one fails.**
#[tokio::test]
async fn test_bot_connected_isolates_failures() {
    let log = call_log();
    let plugins: Vec<Arc<dyn Plugin>> = vec![
        Arc::new(RecordingPlugin::new("a", &log).failing_connected()),
        Arc::new(RecordingPlugin::new("b", &log)),
    ];
    let bot: BotHandle = Arc::new(MockBot::connected(Some("T7")));

    let failed = bot_connected(&plugins, &controller(), bot).await;

    assert_eq!(failed, 1);
    assert_eq!(
        *log.lock().unwrap(),
        vec!["a:bot_connected:T7", "b:bot_connected:T7"]
    );
}

/// **Test: No plugins, nothing to do.**
#[tokio::test]
async fn test_empty_plugin_list() {
    let plugins: Vec<Arc<dyn Plugin>> = Vec::new();
    assert_eq!(initialize(&plugins, &controller(), None, None).await, 0);
}
