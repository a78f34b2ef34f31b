//! Run-time context shared by the session managers.

use std::sync::Arc;

use skellington_core::{Controller, WebServer};

use crate::config::Settings;

/// Controller, read-only settings, and the server handle (if one is running).
#[derive(Clone)]
pub struct BotContext {
    pub controller: Arc<dyn Controller>,
    pub settings: Arc<Settings>,
    pub server: Option<WebServer>,
}

impl BotContext {
    pub fn new(controller: Arc<dyn Controller>, settings: Arc<Settings>) -> Self {
        Self {
            controller,
            settings,
            server: None,
        }
    }

    pub fn with_server(mut self, server: Option<WebServer>) -> Self {
        self.server = server;
        self
    }
}
