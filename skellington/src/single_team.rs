//! Single-team mode: one statically configured token, one session.
//!
//! Connect, dispatch `init` + `bot_connected`, then reconnect on every close event. With
//! `exit_on_rtm_failure` set, a failed (re)connect ends the run with an error.

use skellington_core::{BotHandle, ControllerEvent, Result, SpawnConfig};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, instrument, warn};

use crate::context::BotContext;
use crate::lifecycle;
use crate::utils::{identity, log_error};

pub struct SingleTeamBot {
    ctx: BotContext,
    token: String,
}

impl SingleTeamBot {
    pub fn new(ctx: BotContext, token: impl Into<String>) -> Self {
        Self {
            ctx,
            token: token.into(),
        }
    }

    /// Runs until the controller's event stream ends, or a fatal connection failure.
    #[instrument(skip(self))]
    pub async fn run(self) -> Result<()> {
        let controller = &self.ctx.controller;
        let plugins = &self.ctx.settings.plugins;

        let bot = controller.spawn(SpawnConfig::Token(self.token.clone()));
        if let Err(e) = bot.start_rtm().await {
            log_error(&e, "Could not connect bot to RTM");
            if self.ctx.settings.exit_on_rtm_failure {
                return Err(e.into());
            }
            return Ok(());
        }
        info!(bot = %identity(bot.as_ref()), "Connected bot to RTM");

        let mut events = controller.subscribe();
        lifecycle::initialize(plugins, controller, Some(bot.clone()), self.ctx.server).await;
        lifecycle::bot_connected(plugins, controller, bot).await;

        loop {
            match events.recv().await {
                Ok(ControllerEvent::RtmClose(bot)) => self.reconnect(bot).await?,
                Ok(ControllerEvent::CreateBot(bot)) => {
                    debug!(team_id = ?bot.team_id(), "Ignoring create_bot in single-team mode");
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Missed controller events");
                }
                Err(RecvError::Closed) => {
                    info!("Controller event stream closed");
                    return Ok(());
                }
            }
        }
    }

    async fn reconnect(&self, bot: BotHandle) -> Result<()> {
        let who = identity(bot.as_ref());
        info!(bot = %who, "rtm closed, attempting to reconnect bot");

        match bot.start_rtm().await {
            Ok(()) => {
                info!(bot = %who, "reconnected bot");
                Ok(())
            }
            Err(e) => {
                log_error(&e, &format!("Could not re-connect bot to RTM {}", who));
                if self.ctx.settings.exit_on_rtm_failure {
                    return Err(e.into());
                }
                Ok(())
            }
        }
    }
}
