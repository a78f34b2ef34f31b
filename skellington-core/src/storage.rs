//! Team storage abstraction. Persistence format is up to the implementation.

use async_trait::async_trait;

use crate::error::StorageError;
use crate::types::TeamRecord;

#[async_trait]
pub trait TeamStorage: Send + Sync {
    /// Reads every stored team.
    async fn all(&self) -> Result<Vec<TeamRecord>, StorageError>;

    /// Inserts or replaces a team by id.
    async fn save(&self, team: &TeamRecord) -> Result<(), StorageError>;
}
