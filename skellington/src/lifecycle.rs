//! Plugin lifecycle dispatch: `init` once per process, `bot_connected` once per connected session.
//!
//! Each plugin call is isolated: a returned error or a panic is logged and dispatch moves on
//! to the next plugin.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use skellington_core::{BotHandle, Controller, Plugin, WebServer};
use tracing::{debug, instrument};

use crate::utils::log_error;

/// Calls `init` on every plugin. `bot` is `None` in multi-team mode.
#[instrument(skip_all, fields(plugins = plugins.len(), has_bot = bot.is_some()))]
pub async fn initialize(
    plugins: &[Arc<dyn Plugin>],
    controller: &Arc<dyn Controller>,
    bot: Option<BotHandle>,
    server: Option<WebServer>,
) -> usize {
    let mut failed = 0;
    for plugin in plugins {
        let call = plugin.init(controller.clone(), bot.clone(), server);
        if !run_isolated(plugin.as_ref(), "init", call).await {
            failed += 1;
        }
    }
    debug!(failed, "step: plugins initialized");
    failed
}

/// Calls `bot_connected` on every plugin.
#[instrument(skip_all, fields(plugins = plugins.len()))]
pub async fn bot_connected(
    plugins: &[Arc<dyn Plugin>],
    controller: &Arc<dyn Controller>,
    bot: BotHandle,
) -> usize {
    let mut failed = 0;
    for plugin in plugins {
        let call = plugin.bot_connected(controller.clone(), bot.clone());
        if !run_isolated(plugin.as_ref(), "botConnected", call).await {
            failed += 1;
        }
    }
    debug!(failed, "step: plugins notified of connected bot");
    failed
}

/// Runs one plugin hook. Returns false if it failed or panicked.
async fn run_isolated<F>(plugin: &dyn Plugin, hook: &str, call: F) -> bool
where
    F: Future<Output = anyhow::Result<()>>,
{
    match AssertUnwindSafe(call).catch_unwind().await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            log_error(&e, &format!("error calling {} on plugin {}", hook, plugin.name()));
            false
        }
        Err(panic) => {
            log_error(
                &panic_message(panic.as_ref()),
                &format!("plugin {} panicked in {}", plugin.name(), hook),
            );
            false
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
