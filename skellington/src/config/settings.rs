//! Normalized, validated configuration. Built once at startup and shared read-only.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use skellington_core::{Plugin, Result, SkellingtonError, TeamStorage};

use super::SkellingtonConfig;
use crate::debug_logger::DebugOptions;

/// Which session manager runs.
#[derive(Clone, PartialEq, Eq)]
pub enum Mode {
    SingleTeam {
        token: String,
    },
    App {
        client_id: String,
        client_secret: String,
        port: u16,
    },
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::SingleTeam { .. } => f.write_str("single-team"),
            Mode::App { .. } => f.write_str("app"),
        }
    }
}

impl fmt::Debug for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::SingleTeam { .. } => f.write_str("SingleTeam { .. }"),
            Mode::App { client_id, port, .. } => f
                .debug_struct("App")
                .field("client_id", client_id)
                .field("port", port)
                .finish_non_exhaustive(),
        }
    }
}

#[derive(Clone)]
pub struct Settings {
    pub mode: Mode,
    pub plugins: Vec<Arc<dyn Plugin>>,
    /// Config scopes plus every plugin's scopes, deduplicated.
    pub scopes: BTreeSet<String>,
    pub port: Option<u16>,
    pub exit_on_rtm_failure: bool,
    pub debug: bool,
    pub debug_options: DebugOptions,
    pub redirect_uri: Option<String>,
    pub state: Option<String>,
    pub success_redirect_uri: Option<String>,
    pub error_redirect_uri: Option<String>,
    pub storage: Option<Arc<dyn TeamStorage>>,
}

impl Settings {
    /// Validates and normalizes `config`. The caller's config is only read.
    ///
    /// Requires either a token, or all of client id, client secret and port.
    pub fn normalize(config: &SkellingtonConfig) -> Result<Self> {
        let mode = match (&config.slack_token, &config.client_id, &config.client_secret, config.port) {
            (Some(token), _, _, _) if !token.is_empty() => Mode::SingleTeam {
                token: token.clone(),
            },
            (_, Some(client_id), Some(client_secret), Some(port))
                if !client_id.is_empty() && !client_secret.is_empty() =>
            {
                Mode::App {
                    client_id: client_id.clone(),
                    client_secret: client_secret.clone(),
                    port,
                }
            }
            _ => {
                return Err(SkellingtonError::Config(
                    "Missing configuration. Config must include either a slack token, \
                     or a client id, client secret, and port"
                        .to_string(),
                ))
            }
        };

        let plugins = config.plugins.as_slice().to_vec();

        let mut scopes: BTreeSet<String> = config.scopes.iter().cloned().collect();
        for plugin in &plugins {
            scopes.extend(plugin.scopes());
        }

        Ok(Self {
            mode,
            plugins,
            scopes,
            port: config.port,
            exit_on_rtm_failure: config.exit_on_rtm_failure.unwrap_or(true),
            debug: config.debug,
            debug_options: config.debug_options.clone(),
            redirect_uri: config.redirect_uri.clone(),
            state: config.state.clone(),
            success_redirect_uri: config.success_redirect_uri.clone(),
            error_redirect_uri: config.error_redirect_uri.clone(),
            storage: config.storage.clone(),
        })
    }

    pub fn is_app(&self) -> bool {
        matches!(self.mode, Mode::App { .. })
    }
}
