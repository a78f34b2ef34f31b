//! Storage crate: team persistence for multi-team mode.
//!
//! ## Modules
//!
//! - [`memory`] – MemoryTeamStorage (in-process)
//! - [`team_repo`] – SqliteTeamStorage (SQLite)

mod memory;
mod team_repo;

pub use memory::MemoryTeamStorage;
pub use team_repo::SqliteTeamStorage;
