//! Caller-facing configuration. Build it in code or load it from env with [`SkellingtonConfig::from_env`].

use std::env;
use std::sync::Arc;

use skellington_core::{Plugin, Result, SkellingtonError, TeamStorage};

use super::Plugins;
use crate::debug_logger::DebugOptions;

/// Everything a run needs. All fields are optional; [`super::Settings::normalize`] validates the combination.
#[derive(Clone, Default)]
pub struct SkellingtonConfig {
    /// Single-team bot token. When present the run is single-team.
    pub slack_token: Option<String>,
    /// App client id (multi-team mode).
    pub client_id: Option<String>,
    /// App client secret (multi-team mode).
    pub client_secret: Option<String>,
    /// Webhook / OAuth server port. Required for multi-team mode.
    pub port: Option<u16>,
    pub plugins: Plugins,
    pub scopes: Vec<String>,
    /// Exit when the (re)connection of a single-team bot fails. Default true.
    pub exit_on_rtm_failure: Option<bool>,
    /// Log every message a listener matches.
    pub debug: bool,
    pub debug_options: DebugOptions,
    pub redirect_uri: Option<String>,
    /// OAuth `state` passed to the app configuration.
    pub state: Option<String>,
    pub success_redirect_uri: Option<String>,
    pub error_redirect_uri: Option<String>,
    /// Team storage for multi-team mode; the controller's own storage wins if it has one.
    pub storage: Option<Arc<dyn TeamStorage>>,
    pub log_file: Option<String>,
}

impl SkellingtonConfig {
    /// Single-team config with the given token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slack_token: Some(token.into()),
            ..Self::default()
        }
    }

    /// Multi-team config with the given app credentials and server port.
    pub fn with_app(client_id: impl Into<String>, client_secret: impl Into<String>, port: u16) -> Self {
        Self {
            client_id: Some(client_id.into()),
            client_secret: Some(client_secret.into()),
            port: Some(port),
            ..Self::default()
        }
    }

    pub fn plugin(mut self, plugin: Arc<dyn Plugin>) -> Self {
        self.plugins.push(plugin);
        self
    }

    pub fn plugins(mut self, plugins: impl Into<Plugins>) -> Self {
        self.plugins = plugins.into();
        self
    }

    pub fn storage(mut self, storage: Arc<dyn TeamStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Loads `.env` (if any), then reads config from the environment.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Reads config from environment variables:
    /// SLACK_TOKEN, SLACK_CLIENT_ID, SLACK_CLIENT_SECRET, PORT, SLACK_SCOPES (comma-separated),
    /// EXIT_ON_RTM_FAILURE, SKELLINGTON_DEBUG, SLACK_REDIRECT_URI, SLACK_OAUTH_STATE,
    /// SUCCESS_REDIRECT_URI, ERROR_REDIRECT_URI, LOG_FILE. Plugins are added in code.
    pub fn from_env() -> Result<Self> {
        let port = match non_empty_var("PORT") {
            Some(raw) => Some(raw.parse::<u16>().map_err(|_| {
                SkellingtonError::Config(format!("PORT is set but not a valid port: {}", raw))
            })?),
            None => None,
        };
        let scopes = non_empty_var("SLACK_SCOPES")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        let exit_on_rtm_failure = env::var("EXIT_ON_RTM_FAILURE")
            .ok()
            .and_then(|s| s.parse().ok());
        let debug = env::var("SKELLINGTON_DEBUG")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(false);

        Ok(Self {
            slack_token: non_empty_var("SLACK_TOKEN"),
            client_id: non_empty_var("SLACK_CLIENT_ID"),
            client_secret: non_empty_var("SLACK_CLIENT_SECRET"),
            port,
            plugins: Plugins::new(),
            scopes,
            exit_on_rtm_failure,
            debug,
            debug_options: DebugOptions::default(),
            redirect_uri: non_empty_var("SLACK_REDIRECT_URI"),
            state: non_empty_var("SLACK_OAUTH_STATE"),
            success_redirect_uri: non_empty_var("SUCCESS_REDIRECT_URI"),
            error_redirect_uri: non_empty_var("ERROR_REDIRECT_URI"),
            storage: None,
            log_file: non_empty_var("LOG_FILE"),
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.trim().is_empty())
}
