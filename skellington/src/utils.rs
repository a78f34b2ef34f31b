//! Log helpers shared by the session managers.

use std::fmt::Display;

use skellington_core::BotSession;
use tracing::error;

/// Logs an error with a user-facing message. Every caught failure is reported through here.
pub fn log_error<E: Display + ?Sized>(err: &E, message: &str) {
    error!(error = %err, "{}", message);
}

/// A bot's identity as a JSON string, e.g. `{"name":"skelly","id":"U123"}`.
pub fn identity(bot: &dyn BotSession) -> String {
    let identity = bot.identity();
    serde_json::json!({
        "name": identity.as_ref().map(|i| i.name.as_str()),
        "id": identity.as_ref().map(|i| i.id.as_str()),
    })
    .to_string()
}

/// Bot display name, empty before the session has connected.
pub fn bot_name(bot: &dyn BotSession) -> String {
    bot.identity().map(|i| i.name).unwrap_or_default()
}
