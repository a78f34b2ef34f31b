//! # skellington-core
//!
//! Core types and traits for the bot bootstrapper: [`Controller`], [`BotSession`], [`Plugin`],
//! [`TeamStorage`], message and identity types, errors, and tracing initialization.
//! Platform-agnostic; a platform SDK adapter implements the traits.

pub mod bot;
pub mod controller;
pub mod error;
pub mod logger;
pub mod plugin;
pub mod storage;
pub mod types;

pub use bot::{BotHandle, BotSession, SpawnConfig};
pub use controller::{
    default_hears_test, AppOptions, Controller, ControllerEvent, ControllerFactory,
    ControllerOptions, Listener, ListenerFn, ListenerFuture, MatchFn, OAuthCallback,
};
pub use error::{Result, RtmError, SkellingtonError, StorageError, REVOKED_AUTH_REASONS};
pub use logger::init_tracing;
pub use plugin::{Help, HelpText, Plugin, WebServer};
pub use storage::TeamStorage;
pub use types::{
    BotCredential, HelpContext, Identity, IncomingMessage, MessageEvent, TeamInfo, TeamRecord,
};
