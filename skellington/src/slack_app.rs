//! Multi-team (app) mode.
//!
//! Configures the OAuth app, runs plugin `init` once with no bot, restores every stored team
//! that has a bot credential, then supervises `CreateBot` / `RtmClose` events. Per-team
//! failures are logged and isolated; only a storage read failure ends the run.

use std::sync::Arc;

use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use skellington_core::{
    AppOptions, BotHandle, ControllerEvent, Result, RtmError, SpawnConfig, TeamRecord,
    TeamStorage,
};
use storage::MemoryTeamStorage;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, instrument, warn};

use crate::config::Mode;
use crate::connected_teams::ConnectedTeams;
use crate::context::BotContext;
use crate::lifecycle;
use crate::utils::{identity, log_error};

/// Per-team connect work, polled by the supervision loop.
type Pending = FuturesUnordered<BoxFuture<'static, ()>>;

#[derive(Clone)]
pub struct SlackApp {
    ctx: BotContext,
    storage: Arc<dyn TeamStorage>,
    teams: Arc<ConnectedTeams>,
}

impl SlackApp {
    /// Team storage is the controller's, then the configured one, then an in-memory store.
    pub fn new(ctx: BotContext) -> Self {
        let storage = ctx
            .controller
            .storage()
            .or_else(|| ctx.settings.storage.clone())
            .unwrap_or_else(|| {
                warn!("No team storage configured, teams will not survive a restart");
                Arc::new(MemoryTeamStorage::new()) as Arc<dyn TeamStorage>
            });

        Self {
            ctx,
            storage,
            teams: Arc::new(ConnectedTeams::new()),
        }
    }

    pub fn connected_teams(&self) -> Arc<ConnectedTeams> {
        self.teams.clone()
    }

    pub fn storage(&self) -> Arc<dyn TeamStorage> {
        self.storage.clone()
    }

    /// Runs until the controller's event stream ends. Errors only on configuration or storage
    /// read failure.
    #[instrument(skip(self))]
    pub async fn run(self) -> Result<()> {
        let controller = &self.ctx.controller;
        controller.configure_app(self.app_options())?;

        let mut events = controller.subscribe();
        lifecycle::initialize(&self.ctx.settings.plugins, controller, None, self.ctx.server)
            .await;

        let stored = match self.storage.all().await {
            Ok(teams) => teams,
            Err(e) => {
                log_error(&e, "Could not reconnect teams");
                return Err(e.into());
            }
        };

        // Team work is interleaved on this task so plugin callbacks never run in parallel.
        let mut pending = Pending::new();
        for team in stored {
            if team.bot.is_none() {
                debug!(team_id = %team.id, "Skipping team without a bot");
                continue;
            }
            if !self.teams.begin(&team.id) {
                continue;
            }
            let app = self.clone();
            pending.push(async move { app.restore_team(team).await }.boxed());
        }

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Ok(ControllerEvent::CreateBot(bot)) => self.on_create_bot(bot, &mut pending),
                    Ok(ControllerEvent::RtmClose(bot)) => {
                        let app = self.clone();
                        pending.push(async move { app.reconnect(bot).await }.boxed());
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Missed controller events");
                    }
                    Err(RecvError::Closed) => {
                        info!("Controller event stream closed");
                        break;
                    }
                },
                Some(()) = pending.next() => {}
            }
        }

        while pending.next().await.is_some() {}
        Ok(())
    }

    fn app_options(&self) -> AppOptions {
        let settings = &self.ctx.settings;
        let (client_id, client_secret) = match &settings.mode {
            Mode::App {
                client_id,
                client_secret,
                ..
            } => (client_id.clone(), client_secret.clone()),
            Mode::SingleTeam { .. } => (String::new(), String::new()),
        };

        AppOptions {
            client_id,
            client_secret,
            redirect_uri: settings.redirect_uri.clone(),
            state: settings.state.clone(),
            scopes: settings.scopes.iter().cloned().collect(),
        }
    }

    fn on_create_bot(&self, bot: BotHandle, pending: &mut Pending) {
        let Some(team_id) = bot.team_id() else {
            warn!("Ignoring create_bot without a team id");
            return;
        };
        if !self.teams.begin(&team_id) {
            debug!(team_id = %team_id, "Team already connected, ignoring create_bot");
            return;
        }

        let app = self.clone();
        pending.push(async move { app.connect_new_team(team_id, bot).await }.boxed());
    }

    async fn connect_new_team(&self, team_id: String, bot: BotHandle) {
        match bot.start_rtm().await {
            Ok(()) => {
                self.teams.mark_connected(&team_id);
                lifecycle::bot_connected(&self.ctx.settings.plugins, &self.ctx.controller, bot)
                    .await;
                info!(team_id = %team_id, "bot connected to new team");
            }
            Err(e) => {
                self.teams.remove(&team_id);
                log_error(&e, &format!("Could not connect bot to team {}", team_id));
            }
        }
    }

    async fn restore_team(&self, mut team: TeamRecord) {
        let bot = self.ctx.controller.spawn(SpawnConfig::Team(team.clone()));

        match bot.start_rtm().await {
            Ok(()) => {
                self.teams.mark_connected(&team.id);
                lifecycle::bot_connected(&self.ctx.settings.plugins, &self.ctx.controller, bot)
                    .await;
                info!(team_id = %team.id, "bot added from storage");
            }
            Err(e) => {
                self.teams.remove(&team.id);
                log_error(&e, &format!("Could not reconnect bot to team {}", team.id));
                if e.is_auth_revoked() {
                    self.forget_bot(&mut team, &e).await;
                }
            }
        }
    }

    /// Drops the revoked bot credential from the stored team. Save failures are only logged.
    async fn forget_bot(&self, team: &mut TeamRecord, reason: &RtmError) {
        info!(team_id = %team.id, reason = %reason.reason, "removing revoked bot from team");
        team.bot = None;
        if let Err(e) = self.storage.save(team).await {
            log_error(&e, &format!("Could not remove bot from team {}", team.id));
        }
    }

    async fn reconnect(&self, bot: BotHandle) {
        let who = identity(bot.as_ref());
        info!(bot = %who, "rtm closed, attempting to reconnect bot");

        match bot.start_rtm().await {
            Ok(()) => {
                if let Some(team_id) = bot.team_id() {
                    self.teams.mark_connected(&team_id);
                }
                info!(bot = %who, "reconnected bot");
            }
            Err(e) => {
                log_error(&e, &format!("Could not reconnect bot {}", who));
                if let Some(team_id) = bot.team_id() {
                    self.teams.remove(&team_id);
                }
            }
        }
    }
}
