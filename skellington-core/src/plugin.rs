//! Plugin trait and help metadata.
//!
//! Every capability is optional: the default methods do nothing, so a plugin only overrides
//! the hooks it cares about.

use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;

use crate::bot::BotHandle;
use crate::controller::Controller;
use crate::types::HelpContext;

/// Handle to the running webhook / OAuth HTTP server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebServer {
    local_addr: SocketAddr,
}

impl WebServer {
    pub fn new(local_addr: SocketAddr) -> Self {
        Self { local_addr }
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn port(&self) -> u16 {
        self.local_addr.port()
    }
}

/// Help reply text: fixed, or computed from the message context.
#[derive(Clone)]
pub enum HelpText {
    Static(String),
    Dynamic(Arc<dyn Fn(&HelpContext) -> String + Send + Sync>),
}

impl HelpText {
    pub fn render(&self, ctx: &HelpContext) -> String {
        match self {
            HelpText::Static(text) => text.clone(),
            HelpText::Dynamic(f) => f(ctx),
        }
    }
}

impl fmt::Debug for HelpText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HelpText::Static(text) => f.debug_tuple("Static").field(text).finish(),
            HelpText::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

impl From<&str> for HelpText {
    fn from(text: &str) -> Self {
        HelpText::Static(text.to_string())
    }
}

impl From<String> for HelpText {
    fn from(text: String) -> Self {
        HelpText::Static(text)
    }
}

/// Help metadata a plugin declares. `command` is listed by `help`; `text` answers `help <command>`.
#[derive(Debug, Clone)]
pub struct Help {
    pub command: String,
    pub text: Option<HelpText>,
}

impl Help {
    pub fn new(command: impl Into<String>, text: impl Into<HelpText>) -> Self {
        Self {
            command: command.into(),
            text: Some(text.into()),
        }
    }

    pub fn dynamic<F>(command: impl Into<String>, text: F) -> Self
    where
        F: Fn(&HelpContext) -> String + Send + Sync + 'static,
    {
        Self {
            command: command.into(),
            text: Some(HelpText::Dynamic(Arc::new(text))),
        }
    }

    /// Listed by `help` but without its own `help <command>` reply.
    pub fn command_only(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            text: None,
        }
    }

    /// True when both a command and reply text are present.
    pub fn is_complete(&self) -> bool {
        !self.command.is_empty()
            && match &self.text {
                Some(HelpText::Static(text)) => !text.is_empty(),
                Some(HelpText::Dynamic(_)) => true,
                None => false,
            }
    }
}

/// A bot plugin. Hooks return errors (or panic) without affecting other plugins.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Called once per process. `bot` is `None` in multi-team mode.
    async fn init(
        &self,
        _controller: Arc<dyn Controller>,
        _bot: Option<BotHandle>,
        _server: Option<WebServer>,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called once per session on its first successful connection.
    async fn bot_connected(
        &self,
        _controller: Arc<dyn Controller>,
        _bot: BotHandle,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    fn help(&self) -> Option<Help> {
        None
    }

    /// Permission scopes this plugin needs in multi-team mode.
    fn scopes(&self) -> Vec<String> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_completeness() {
        assert!(Help::new("deploy", "ships it").is_complete());
        assert!(Help::dynamic("deploy", |ctx| ctx.bot_name.clone()).is_complete());
        assert!(!Help::new("deploy", "").is_complete());
        assert!(!Help::new("", "ships it").is_complete());
        assert!(!Help::command_only("deploy").is_complete());
    }

    #[test]
    fn test_help_text_render() {
        let ctx = HelpContext {
            bot_name: "skelly".to_string(),
            team: Some("T1".to_string()),
            channel: None,
            user: Some("U1".to_string()),
        };
        assert_eq!(HelpText::from("plain").render(&ctx), "plain");
        let dynamic = HelpText::Dynamic(Arc::new(|ctx: &HelpContext| {
            format!("ask @{} from {}", ctx.bot_name, ctx.user.as_deref().unwrap_or("?"))
        }));
        assert_eq!(dynamic.render(&ctx), "ask @skelly from U1");
    }
}
