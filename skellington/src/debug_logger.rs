//! Debug logging around listener registration: every message a listener matches is logged.
//!
//! [`DebugLogger`] decorates a controller; only `hears` changes, everything else is delegated.

use std::fmt;
use std::sync::{Arc, Weak};

use async_trait::async_trait;
use skellington_core::{
    AppOptions, BotHandle, Controller, ControllerEvent, IncomingMessage, Listener, MatchFn,
    OAuthCallback, Result, SpawnConfig, TeamStorage,
};
use tokio::sync::broadcast;
use tracing::info;

/// Where a matched listener was registered, handed to the formatter with the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerMeta {
    /// Source file that registered the listener.
    pub file: String,
    /// `file:line` of the registration.
    pub origin: String,
    pub patterns: Vec<String>,
}

pub type Formatter = Arc<dyn Fn(&IncomingMessage, &ListenerMeta) -> String + Send + Sync>;

#[derive(Clone, Default)]
pub struct DebugOptions {
    /// Replaces [`default_formatter`].
    pub formatter: Option<Formatter>,
}

impl DebugOptions {
    pub fn with_formatter<F>(formatter: F) -> Self
    where
        F: Fn(&IncomingMessage, &ListenerMeta) -> String + Send + Sync + 'static,
    {
        Self {
            formatter: Some(Arc::new(formatter)),
        }
    }
}

impl fmt::Debug for DebugOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebugOptions")
            .field("custom_formatter", &self.formatter.is_some())
            .finish()
    }
}

/// `team: T channel: C user: U text: ...`
pub fn default_formatter(message: &IncomingMessage, _meta: &ListenerMeta) -> String {
    format!(
        "team: {} channel: {} user: {} text: {}",
        message.team.as_deref().unwrap_or("-"),
        message.channel.as_deref().unwrap_or("-"),
        message.user.as_deref().unwrap_or("-"),
        message.text
    )
}

pub struct DebugLogger {
    inner: Arc<dyn Controller>,
    formatter: Formatter,
}

impl DebugLogger {
    /// Wraps `inner` so that listeners registered through the result log their matches.
    pub fn wrap(inner: Arc<dyn Controller>, options: &DebugOptions) -> Arc<dyn Controller> {
        let formatter = options
            .formatter
            .clone()
            .unwrap_or_else(|| Arc::new(default_formatter) as Formatter);
        Arc::new(Self { inner, formatter })
    }

    fn logging_matcher(&self, test: MatchFn, meta: ListenerMeta) -> MatchFn {
        let formatter = self.formatter.clone();
        Arc::new(move |patterns: &[String], message: &IncomingMessage| {
            if !test(patterns, message) {
                return false;
            }
            let line = formatter(message, &meta);
            info!(file = %meta.file, "{}", line);
            true
        })
    }
}

#[async_trait]
impl Controller for DebugLogger {
    fn spawn(&self, config: SpawnConfig) -> BotHandle {
        self.inner.spawn(config)
    }

    fn hears(&self, mut listener: Listener) {
        let meta = ListenerMeta {
            file: listener.origin_file().to_string(),
            origin: listener.origin(),
            patterns: listener.patterns.clone(),
        };
        let test = listener.matcher.take().unwrap_or_else(|| {
            // weak: the listener is stored inside the controller it refers to
            let controller: Weak<dyn Controller> = Arc::downgrade(&self.inner);
            Arc::new(move |patterns: &[String], message: &IncomingMessage| {
                controller
                    .upgrade()
                    .map(|c| c.hears_test(patterns, message))
                    .unwrap_or(false)
            }) as MatchFn
        });
        listener.matcher = Some(self.logging_matcher(test, meta));
        self.inner.hears(listener);
    }

    fn hears_test(&self, patterns: &[String], message: &IncomingMessage) -> bool {
        self.inner.hears_test(patterns, message)
    }

    fn configure_app(&self, options: AppOptions) -> Result<()> {
        self.inner.configure_app(options)
    }

    fn subscribe(&self) -> broadcast::Receiver<ControllerEvent> {
        self.inner.subscribe()
    }

    fn storage(&self) -> Option<Arc<dyn TeamStorage>> {
        self.inner.storage()
    }

    async fn handle_webhook(&self, payload: serde_json::Value) -> Result<Option<serde_json::Value>> {
        self.inner.handle_webhook(payload).await
    }

    async fn complete_oauth(&self, callback: OAuthCallback) -> Result<()> {
        self.inner.complete_oauth(callback).await
    }
}
