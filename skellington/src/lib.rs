//! # Skellington
//!
//! Bootstraps a chat bot from a plugin list: builds the platform controller, registers help
//! commands, serves webhooks and OAuth, connects one team (token) or many (app install), and
//! keeps plugins informed as sessions connect.
//!
//! The platform itself sits behind [`skellington_core::Controller`] and
//! [`skellington_core::BotSession`]; pass a [`ControllerFactory`] to [`run`] or [`start`].

pub mod config;
pub mod connected_teams;
pub mod context;
pub mod debug_logger;
pub mod help;
pub mod lifecycle;
pub mod runner;
pub mod server;
pub mod single_team;
pub mod slack_app;
pub mod utils;

pub use config::{Mode, Plugins, Settings, SkellingtonConfig};
pub use connected_teams::{ConnectedTeams, TeamState};
pub use context::BotContext;
pub use debug_logger::{DebugLogger, DebugOptions, ListenerMeta};
pub use runner::{run, start};
pub use server::RunningServer;
pub use single_team::SingleTeamBot;
pub use slack_app::SlackApp;

pub use skellington_core::{
    BotHandle, BotSession, Controller, ControllerEvent, ControllerFactory, ControllerOptions,
    Help, HelpText, Plugin, SkellingtonError, TeamStorage, WebServer,
};
