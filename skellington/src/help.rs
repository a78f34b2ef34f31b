//! Help listeners built from plugin help metadata.
//!
//! `help` lists every plugin command; `help <command>` answers with that plugin's help text.

use std::sync::Arc;

use skellington_core::{Controller, Help, HelpContext, Listener, MessageEvent, Plugin};
use tracing::debug;

use crate::utils::bot_name;

pub const HELP_HEADER: &str = "Here are some things I can help you with:\n";
pub const NO_HELP_REPLY: &str =
    "I can't help you with anything right now. I still like you though :heart:";

/// Registers one `help <command>` listener per plugin with complete help, plus the `help` listener.
pub fn add_help_listeners(controller: &dyn Controller, plugins: &[Arc<dyn Plugin>]) {
    let helps: Vec<Help> = plugins.iter().filter_map(|p| p.help()).collect();

    for help in helps.iter().filter(|h| h.is_complete()) {
        register_help_listener(controller, help.clone());
    }

    let commands: Vec<String> = helps
        .into_iter()
        .map(|h| h.command)
        .filter(|c| !c.is_empty())
        .collect();
    debug!(commands = commands.len(), "Registering help listeners");

    controller.hears(Listener::new(
        ["^help$"],
        &MessageEvent::DIRECT,
        move |bot, message| {
            let reply = help_summary(&bot_name(bot.as_ref()), &commands);
            async move {
                bot.reply(&message, &reply).await?;
                anyhow::Ok(())
            }
        },
    ));
}

/// Reply to a bare `help`. `bot_name` is read when the message arrives.
pub fn help_summary(bot_name: &str, commands: &[String]) -> String {
    if commands.is_empty() {
        return NO_HELP_REPLY.to_string();
    }

    let lines: Vec<String> = commands
        .iter()
        .map(|command| format!("`@{} help {}`", bot_name, command))
        .collect();
    format!("{}{}", HELP_HEADER, lines.join("\n"))
}

fn register_help_listener(controller: &dyn Controller, help: Help) {
    let Some(text) = help.text else {
        return;
    };
    let pattern = format!("^help {}$", regex::escape(&help.command));

    controller.hears(Listener::new(
        [pattern],
        &MessageEvent::DIRECT,
        move |bot, message| {
            let ctx = HelpContext::from_message(&bot_name(bot.as_ref()), &message);
            let reply = text.render(&ctx);
            async move {
                bot.reply(&message, &reply).await?;
                anyhow::Ok(())
            }
        },
    ));
}
