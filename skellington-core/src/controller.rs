//! Platform controller abstraction: spawns sessions, registers chat listeners, exposes the
//! app OAuth / webhook surface and broadcasts session lifecycle events.

use std::fmt;
use std::future::Future;
use std::panic::Location;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use tokio::sync::broadcast;

use crate::bot::{BotHandle, SpawnConfig};
use crate::error::Result;
use crate::storage::TeamStorage;
use crate::types::{IncomingMessage, MessageEvent};

pub type ListenerFuture = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>>;
pub type ListenerFn = Arc<dyn Fn(BotHandle, IncomingMessage) -> ListenerFuture + Send + Sync>;
/// Decides whether a message matches a listener's patterns.
pub type MatchFn = Arc<dyn Fn(&[String], &IncomingMessage) -> bool + Send + Sync>;

/// A chat listener: patterns, accepted events, optional custom match test, and the handler.
#[derive(Clone)]
pub struct Listener {
    pub patterns: Vec<String>,
    pub events: Vec<MessageEvent>,
    /// Custom match test. `None` means the controller's [`Controller::hears_test`].
    pub matcher: Option<MatchFn>,
    pub handler: ListenerFn,
    origin: &'static Location<'static>,
}

impl Listener {
    /// Builds a listener. The caller's source location is recorded for debug logging.
    #[track_caller]
    pub fn new<P, F, Fut>(patterns: P, events: &[MessageEvent], handler: F) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        F: Fn(BotHandle, IncomingMessage) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
            events: events.to_vec(),
            matcher: None,
            handler: Arc::new(
                move |bot: BotHandle, message: IncomingMessage| -> ListenerFuture {
                    Box::pin(handler(bot, message))
                },
            ),
            origin: Location::caller(),
        }
    }

    pub fn with_matcher<M>(mut self, matcher: M) -> Self
    where
        M: Fn(&[String], &IncomingMessage) -> bool + Send + Sync + 'static,
    {
        self.matcher = Some(Arc::new(matcher));
        self
    }

    /// Source file that registered this listener.
    pub fn origin_file(&self) -> &'static str {
        self.origin.file()
    }

    /// `file:line` of the registration site.
    pub fn origin(&self) -> String {
        format!("{}:{}", self.origin.file(), self.origin.line())
    }

    pub fn accepts(&self, event: MessageEvent) -> bool {
        self.events.contains(&event)
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("patterns", &self.patterns)
            .field("events", &self.events)
            .field("custom_matcher", &self.matcher.is_some())
            .field("origin", &self.origin())
            .finish()
    }
}

/// Session lifecycle notifications broadcast by the controller.
#[derive(Clone)]
pub enum ControllerEvent {
    /// A session's real-time connection dropped.
    RtmClose(BotHandle),
    /// A bot was created for a team, e.g. after a fresh app install.
    CreateBot(BotHandle),
}

impl fmt::Debug for ControllerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (name, bot) = match self {
            ControllerEvent::RtmClose(bot) => ("RtmClose", bot),
            ControllerEvent::CreateBot(bot) => ("CreateBot", bot),
        };
        f.debug_tuple(name).field(&bot.team_id()).finish()
    }
}

/// OAuth app identity and requested scopes for multi-team mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppOptions {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: Option<String>,
    pub state: Option<String>,
    pub scopes: Vec<String>,
}

/// Query parameters of the OAuth redirect back from the platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OAuthCallback {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Options the controller is built with.
#[derive(Clone, Default)]
pub struct ControllerOptions {
    pub debug: bool,
    pub storage: Option<Arc<dyn TeamStorage>>,
}

impl fmt::Debug for ControllerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerOptions")
            .field("debug", &self.debug)
            .field("storage", &self.storage.is_some())
            .finish()
    }
}

/// The platform session factory. One per process.
#[async_trait]
pub trait Controller: Send + Sync {
    /// Creates a session bound to the given credentials. Does not connect.
    fn spawn(&self, config: SpawnConfig) -> BotHandle;

    /// Registers a chat listener.
    fn hears(&self, listener: Listener);

    /// Default match test used for listeners without a custom matcher.
    fn hears_test(&self, patterns: &[String], message: &IncomingMessage) -> bool {
        default_hears_test(patterns, message)
    }

    /// Registers the OAuth app identity (multi-team mode).
    fn configure_app(&self, options: AppOptions) -> Result<()>;

    /// Subscribes to session lifecycle events. The stream ends when the controller shuts down.
    fn subscribe(&self) -> broadcast::Receiver<ControllerEvent>;

    /// Team storage the controller was built with.
    fn storage(&self) -> Option<Arc<dyn TeamStorage>>;

    /// Handles an incoming webhook payload (slash command, interactive message, event).
    async fn handle_webhook(&self, payload: serde_json::Value) -> Result<Option<serde_json::Value>>;

    /// Completes the OAuth install flow for a redirect back from the platform.
    async fn complete_oauth(&self, callback: OAuthCallback) -> Result<()>;
}

/// Builds the controller from options.
pub trait ControllerFactory: Send + Sync {
    fn build(&self, options: &ControllerOptions) -> Result<Arc<dyn Controller>>;
}

impl<F> ControllerFactory for F
where
    F: Fn(&ControllerOptions) -> Result<Arc<dyn Controller>> + Send + Sync,
{
    fn build(&self, options: &ControllerOptions) -> Result<Arc<dyn Controller>> {
        self(options)
    }
}

/// Matches when any pattern (a case-sensitive regex) matches the message text. Invalid patterns never match.
pub fn default_hears_test(patterns: &[String], message: &IncomingMessage) -> bool {
    patterns.iter().any(|pattern| {
        Regex::new(pattern)
            .map(|re| re.is_match(&message.text))
            .unwrap_or(false)
    })
}
