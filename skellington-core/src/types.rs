//! Core types: bot identity, team info, incoming messages, help context, and persisted team records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Bot identity as reported by the platform once a session is connected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub name: String,
}

/// Team (workspace) a connected session belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamInfo {
    pub id: String,
    pub name: Option<String>,
    pub domain: Option<String>,
}

/// How a message reached the bot. Listeners declare which of these they accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageEvent {
    DirectMessage,
    DirectMention,
    Mention,
    Ambient,
}

impl MessageEvent {
    /// Events for messages addressed to the bot directly.
    pub const DIRECT: [MessageEvent; 2] = [MessageEvent::DirectMention, MessageEvent::DirectMessage];
}

/// A chat message delivered to a listener.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingMessage {
    pub event: MessageEvent,
    pub text: String,
    pub team: Option<String>,
    pub channel: Option<String>,
    pub user: Option<String>,
}

/// Context handed to computed help text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HelpContext {
    pub bot_name: String,
    pub team: Option<String>,
    pub channel: Option<String>,
    pub user: Option<String>,
}

impl HelpContext {
    pub fn from_message(bot_name: &str, message: &IncomingMessage) -> Self {
        Self {
            bot_name: bot_name.to_string(),
            team: message.team.clone(),
            channel: message.channel.clone(),
            user: message.user.clone(),
        }
    }
}

/// Bot credential stored with a team after an app install.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotCredential {
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

/// A persisted team. Fields other than `id`, `name` and `bot` are kept opaque in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot: Option<BotCredential>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TeamRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            bot: None,
            extra: Map::new(),
        }
    }

    pub fn with_bot(mut self, token: impl Into<String>) -> Self {
        self.bot = Some(BotCredential {
            token: token.into(),
            user_id: None,
            created_by: None,
        });
        self
    }
}
