//! Entry points: [`start`] builds and supervises a run, [`run`] adds logging setup and maps the
//! outcome to a process exit code.

use std::process::ExitCode;
use std::sync::Arc;

use skellington_core::{init_tracing, ControllerFactory, ControllerOptions, Result};
use tracing::{info, instrument, warn};

use crate::config::{Mode, Settings, SkellingtonConfig};
use crate::context::BotContext;
use crate::debug_logger::DebugLogger;
use crate::help::add_help_listeners;
use crate::server;
use crate::single_team::SingleTeamBot;
use crate::slack_app::SlackApp;
use crate::utils::log_error;

/// Normalizes `config`, builds the controller, registers help, starts the server (if a port is
/// set), then runs single-team or multi-team mode until the controller's event stream ends.
///
/// The caller's config is never modified. Invalid config fails before the factory is called.
#[instrument(skip_all)]
pub async fn start<F>(config: &SkellingtonConfig, factory: &F) -> Result<()>
where
    F: ControllerFactory + ?Sized,
{
    let settings = Arc::new(Settings::normalize(config)?);
    info!(
        mode = %settings.mode,
        plugins = settings.plugins.len(),
        scopes = settings.scopes.len(),
        "Starting bot"
    );

    let mut controller = factory.build(&ControllerOptions {
        debug: settings.debug,
        storage: settings.storage.clone(),
    })?;
    if settings.debug {
        controller = DebugLogger::wrap(controller, &settings.debug_options);
    }

    add_help_listeners(controller.as_ref(), &settings.plugins);

    let running = match settings.port {
        Some(port) => server::start(controller.clone(), &settings, port).await,
        None => None,
    };
    let ctx = BotContext::new(controller, settings.clone())
        .with_server(running.as_ref().map(|s| s.handle()));

    let outcome = match &settings.mode {
        Mode::SingleTeam { token } => SingleTeamBot::new(ctx, token.clone()).run().await,
        Mode::App { .. } => SlackApp::new(ctx).run().await,
    };

    if let Some(running) = running {
        running.shutdown().await;
    }
    outcome
}

/// Like [`start`], with tracing set up from `config.log_file`. Returns exit code 0 on a clean
/// finish and 1 on a fatal error.
pub async fn run<F>(config: SkellingtonConfig, factory: F) -> ExitCode
where
    F: ControllerFactory,
{
    if let Err(e) = init_tracing(config.log_file.as_deref()) {
        warn!(error = %e, "Tracing already initialized");
    }

    match start(&config, &factory).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log_error(&e, "Bot stopped");
            ExitCode::from(e.exit_code())
        }
    }
}
