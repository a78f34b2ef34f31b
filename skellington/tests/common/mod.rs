//! Test doubles shared by the integration tests: a scripted controller and bot session,
//! an inspectable team storage, and a plugin that records every hook call.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use skellington::{
    BotHandle, BotSession, Controller, ControllerEvent, Help, Plugin, SkellingtonError,
    TeamStorage, WebServer,
};
use skellington_core::{
    AppOptions, Identity, IncomingMessage, Listener, MessageEvent, OAuthCallback, Result,
    RtmError, SpawnConfig, StorageError, TeamInfo, TeamRecord,
};
use tokio::sync::broadcast;

/// Polls `condition` every 10ms for up to 2s.
pub async fn wait_until<F: Fn() -> bool>(condition: F) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not met within 2s");
}

pub fn message(event: MessageEvent, text: &str) -> IncomingMessage {
    IncomingMessage {
        event,
        text: text.to_string(),
        team: Some("T1".to_string()),
        channel: Some("C1".to_string()),
        user: Some("U1".to_string()),
    }
}

// ---------------------------------------------------------------------------
// MockBot
// ---------------------------------------------------------------------------

/// Bot session with scripted `start_rtm` outcomes. An empty script connects.
pub struct MockBot {
    name: String,
    team: Option<String>,
    connected: AtomicBool,
    script: Mutex<VecDeque<std::result::Result<(), RtmError>>>,
    start_calls: AtomicUsize,
    replies: Mutex<Vec<String>>,
}

impl MockBot {
    pub fn new(team: Option<&str>) -> Self {
        Self {
            name: "skelly".to_string(),
            team: team.map(str::to_string),
            connected: AtomicBool::new(false),
            script: Mutex::new(VecDeque::new()),
            start_calls: AtomicUsize::new(0),
            replies: Mutex::new(Vec::new()),
        }
    }

    /// Already connected, so identity is available.
    pub fn connected(team: Option<&str>) -> Self {
        let bot = Self::new(team);
        bot.connected.store(true, Ordering::SeqCst);
        bot
    }

    pub fn fail_next(&self, reason: &str) {
        self.script
            .lock()
            .unwrap()
            .push_back(Err(RtmError::new(reason)));
    }

    pub fn start_calls(&self) -> usize {
        self.start_calls.load(Ordering::SeqCst)
    }

    pub fn replies(&self) -> Vec<String> {
        self.replies.lock().unwrap().clone()
    }
}

#[async_trait]
impl BotSession for MockBot {
    fn identity(&self) -> Option<Identity> {
        self.connected.load(Ordering::SeqCst).then(|| Identity {
            id: "UBOT".to_string(),
            name: self.name.clone(),
        })
    }

    fn team_info(&self) -> Option<TeamInfo> {
        self.team.as_ref().map(|id| TeamInfo {
            id: id.clone(),
            name: None,
            domain: None,
        })
    }

    async fn start_rtm(&self) -> std::result::Result<(), RtmError> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self.script.lock().unwrap().pop_front().unwrap_or(Ok(()));
        if outcome.is_ok() {
            self.connected.store(true, Ordering::SeqCst);
        }
        outcome
    }

    async fn reply(&self, _message: &IncomingMessage, text: &str) -> Result<()> {
        self.replies.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MockController
// ---------------------------------------------------------------------------

pub struct MockController {
    events: Mutex<Option<broadcast::Sender<ControllerEvent>>>,
    listeners: Mutex<Vec<Listener>>,
    bots: Mutex<HashMap<String, Arc<MockBot>>>,
    spawned: Mutex<Vec<SpawnConfig>>,
    app_options: Mutex<Option<AppOptions>>,
    storage: Option<Arc<dyn TeamStorage>>,
    oauth_error: Mutex<Option<String>>,
    oauth_calls: Mutex<Vec<OAuthCallback>>,
}

impl MockController {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(16);
        Self {
            events: Mutex::new(Some(sender)),
            listeners: Mutex::new(Vec::new()),
            bots: Mutex::new(HashMap::new()),
            spawned: Mutex::new(Vec::new()),
            app_options: Mutex::new(None),
            storage: None,
            oauth_error: Mutex::new(None),
            oauth_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_storage(mut self, storage: Arc<dyn TeamStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// The bot `spawn` returns for a token or team id. Created on first use.
    pub fn bot(&self, key: &str) -> Arc<MockBot> {
        self.bots
            .lock()
            .unwrap()
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(MockBot::new(Some(key))))
            .clone()
    }

    pub fn emit(&self, event: ControllerEvent) {
        if let Some(sender) = self.events.lock().unwrap().as_ref() {
            let _ = sender.send(event);
        }
    }

    /// Closes the event stream, which ends the session manager's loop.
    pub fn shutdown(&self) {
        self.events.lock().unwrap().take();
    }

    pub fn receiver_count(&self) -> usize {
        self.events
            .lock()
            .unwrap()
            .as_ref()
            .map(|s| s.receiver_count())
            .unwrap_or(0)
    }

    pub fn spawned(&self) -> Vec<SpawnConfig> {
        self.spawned.lock().unwrap().clone()
    }

    pub fn spawned_teams(&self) -> Vec<String> {
        self.spawned()
            .into_iter()
            .filter_map(|config| match config {
                SpawnConfig::Team(team) => Some(team.id),
                SpawnConfig::Token(_) => None,
            })
            .collect()
    }

    pub fn app_options(&self) -> Option<AppOptions> {
        self.app_options.lock().unwrap().clone()
    }

    pub fn listener_patterns(&self) -> Vec<Vec<String>> {
        self.listeners
            .lock()
            .unwrap()
            .iter()
            .map(|l| l.patterns.clone())
            .collect()
    }

    pub fn fail_oauth(&self, reason: &str) {
        *self.oauth_error.lock().unwrap() = Some(reason.to_string());
    }

    pub fn oauth_calls(&self) -> Vec<OAuthCallback> {
        self.oauth_calls.lock().unwrap().clone()
    }

    /// Runs every registered listener that accepts and matches the message. Returns how many ran.
    pub async fn dispatch(&self, bot: BotHandle, message: IncomingMessage) -> usize {
        let listeners: Vec<Listener> = self.listeners.lock().unwrap().clone();
        let matched: Vec<Listener> = listeners
            .into_iter()
            .filter(|l| l.accepts(message.event))
            .filter(|l| match &l.matcher {
                Some(matcher) => matcher(&l.patterns, &message),
                None => self.hears_test(&l.patterns, &message),
            })
            .collect();

        for listener in &matched {
            (listener.handler)(bot.clone(), message.clone())
                .await
                .unwrap();
        }
        matched.len()
    }
}

#[async_trait]
impl Controller for MockController {
    fn spawn(&self, config: SpawnConfig) -> BotHandle {
        let key = match &config {
            SpawnConfig::Token(token) => token.clone(),
            SpawnConfig::Team(team) => team.id.clone(),
        };
        self.spawned.lock().unwrap().push(config);
        self.bot(&key)
    }

    fn hears(&self, listener: Listener) {
        self.listeners.lock().unwrap().push(listener);
    }

    fn configure_app(&self, options: AppOptions) -> Result<()> {
        *self.app_options.lock().unwrap() = Some(options);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<ControllerEvent> {
        match self.events.lock().unwrap().as_ref() {
            Some(sender) => sender.subscribe(),
            None => broadcast::channel(1).1,
        }
    }

    fn storage(&self) -> Option<Arc<dyn TeamStorage>> {
        self.storage.clone()
    }

    async fn handle_webhook(&self, payload: Value) -> Result<Option<Value>> {
        Ok(Some(json!({ "received": payload })))
    }

    async fn complete_oauth(&self, callback: OAuthCallback) -> Result<()> {
        self.oauth_calls.lock().unwrap().push(callback);
        match self.oauth_error.lock().unwrap().clone() {
            Some(reason) => Err(SkellingtonError::Controller(reason)),
            None => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// MockStorage
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MockStorage {
    teams: Mutex<Vec<TeamRecord>>,
    saves: Mutex<Vec<TeamRecord>>,
    fail_reads: bool,
}

impl MockStorage {
    pub fn with_teams(teams: Vec<TeamRecord>) -> Self {
        Self {
            teams: Mutex::new(teams),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_reads: true,
            ..Self::default()
        }
    }

    pub fn saves(&self) -> Vec<TeamRecord> {
        self.saves.lock().unwrap().clone()
    }
}

#[async_trait]
impl TeamStorage for MockStorage {
    async fn all(&self) -> std::result::Result<Vec<TeamRecord>, StorageError> {
        if self.fail_reads {
            return Err(StorageError::Unavailable("disk on fire".to_string()));
        }
        Ok(self.teams.lock().unwrap().clone())
    }

    async fn save(&self, team: &TeamRecord) -> std::result::Result<(), StorageError> {
        self.saves.lock().unwrap().push(team.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// RecordingPlugin
// ---------------------------------------------------------------------------

/// Shared, ordered log of hook calls across plugins, e.g. `a:init:none`, `a:bot_connected:T1`.
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(log: &CallLog, suffix: &str) -> Vec<String> {
    log.lock()
        .unwrap()
        .iter()
        .filter(|e| e.contains(suffix))
        .cloned()
        .collect()
}

pub struct RecordingPlugin {
    name: String,
    log: CallLog,
    fail_init: bool,
    panic_init: bool,
    fail_connected: bool,
    help: Option<Help>,
    scopes: Vec<String>,
    servers: Mutex<Vec<Option<WebServer>>>,
}

impl RecordingPlugin {
    pub fn new(name: &str, log: &CallLog) -> Self {
        Self {
            name: name.to_string(),
            log: log.clone(),
            fail_init: false,
            panic_init: false,
            fail_connected: false,
            help: None,
            scopes: Vec::new(),
            servers: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_init(mut self) -> Self {
        self.fail_init = true;
        self
    }

    pub fn panicking_init(mut self) -> Self {
        self.panic_init = true;
        self
    }

    pub fn failing_connected(mut self) -> Self {
        self.fail_connected = true;
        self
    }

    pub fn with_help(mut self, help: Help) -> Self {
        self.help = Some(help);
        self
    }

    pub fn with_scopes(mut self, scopes: &[&str]) -> Self {
        self.scopes = scopes.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn servers(&self) -> Vec<Option<WebServer>> {
        self.servers.lock().unwrap().clone()
    }

    fn record(&self, entry: String) {
        self.log.lock().unwrap().push(entry);
    }
}

#[async_trait]
impl Plugin for RecordingPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    async fn init(
        &self,
        _controller: Arc<dyn Controller>,
        bot: Option<BotHandle>,
        server: Option<WebServer>,
    ) -> anyhow::Result<()> {
        let bot = bot.map(|b| b.team_id().unwrap_or_else(|| "bot".to_string()));
        self.record(format!(
            "{}:init:{}",
            self.name,
            bot.as_deref().unwrap_or("none")
        ));
        self.servers.lock().unwrap().push(server);
        if self.panic_init {
            panic!("{} blew up", self.name);
        }
        if self.fail_init {
            anyhow::bail!("{} refused to start", self.name);
        }
        Ok(())
    }

    async fn bot_connected(
        &self,
        _controller: Arc<dyn Controller>,
        bot: BotHandle,
    ) -> anyhow::Result<()> {
        let team = bot.team_id().unwrap_or_else(|| "bot".to_string());
        self.record(format!("{}:bot_connected:{}", self.name, team));
        if self.fail_connected {
            anyhow::bail!("{} lost interest", self.name);
        }
        Ok(())
    }

    fn help(&self) -> Option<Help> {
        self.help.clone()
    }

    fn scopes(&self) -> Vec<String> {
        self.scopes.clone()
    }
}
