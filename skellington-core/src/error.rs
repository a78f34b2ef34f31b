//! Error types for the bot core.
//!
//! [`SkellingtonError`] is the top-level error; [`RtmError`] is what a platform reports when a
//! real-time connection cannot be established; [`StorageError`] comes from team storage.

use thiserror::Error;

/// Reasons the platform reports when a bot's credential is no longer valid.
pub const REVOKED_AUTH_REASONS: [&str; 2] = ["account_inactive", "invalid_auth"];

/// Top-level error (config, connection, storage, server, plugin, controller, IO).
#[derive(Error, Debug)]
pub enum SkellingtonError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Connection error: {0}")]
    Connect(#[from] RtmError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Plugin error: {0}")]
    Plugin(String),

    #[error("Controller error: {0}")]
    Controller(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SkellingtonError {
    /// Process exit status for an error that ends the run. Every error that reaches the top is fatal.
    pub fn exit_code(&self) -> u8 {
        1
    }
}

/// Failed real-time connection attempt, carrying the platform-reported reason.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("rtm connection failed: {reason}")]
pub struct RtmError {
    pub reason: String,
}

impl RtmError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// True when the reason is a revocation signal (`account_inactive` or `invalid_auth`).
    pub fn is_auth_revoked(&self) -> bool {
        REVOKED_AUTH_REASONS.contains(&self.reason.as_str())
    }
}

/// Errors produced by team storage implementations.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Result type for core operations; uses [`SkellingtonError`].
pub type Result<T> = std::result::Result<T, SkellingtonError>;
