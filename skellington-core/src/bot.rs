//! Bot session abstraction.
//!
//! [`BotSession`] is one authenticated connection to one team. The platform SDK implements it;
//! the session managers only drive its real-time connection and read its identity.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{Result, RtmError};
use crate::types::{Identity, IncomingMessage, TeamInfo, TeamRecord};

/// Shared handle to a bot session.
pub type BotHandle = Arc<dyn BotSession>;

/// Credentials a session is spawned with.
#[derive(Debug, Clone, PartialEq)]
pub enum SpawnConfig {
    /// Single-team mode: one statically configured token.
    Token(String),
    /// Multi-team mode: a team record restored from storage or created by an install.
    Team(TeamRecord),
}

/// One bot connection. Identity and team info are populated once `start_rtm` succeeds.
#[async_trait]
pub trait BotSession: Send + Sync {
    fn identity(&self) -> Option<Identity>;

    fn team_info(&self) -> Option<TeamInfo>;

    /// Team this session belongs to. Implementations fall back to the spawn record's id
    /// before the session has connected.
    fn team_id(&self) -> Option<String> {
        self.team_info().map(|team| team.id)
    }

    /// Opens (or re-opens) the real-time connection.
    async fn start_rtm(&self) -> std::result::Result<(), RtmError>;

    /// Replies in the conversation the message came from.
    async fn reply(&self, message: &IncomingMessage, text: &str) -> Result<()>;
}
