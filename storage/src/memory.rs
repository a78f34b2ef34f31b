//! In-process team storage. Nothing survives a restart.

use std::collections::BTreeMap;

use async_trait::async_trait;
use skellington_core::{StorageError, TeamRecord, TeamStorage};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemoryTeamStorage {
    teams: RwLock<BTreeMap<String, TeamRecord>>,
}

impl MemoryTeamStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeded with the given teams.
    pub fn with_teams(teams: impl IntoIterator<Item = TeamRecord>) -> Self {
        let teams = teams.into_iter().map(|t| (t.id.clone(), t)).collect();
        Self {
            teams: RwLock::new(teams),
        }
    }

    pub async fn get(&self, id: &str) -> Option<TeamRecord> {
        self.teams.read().await.get(id).cloned()
    }
}

#[async_trait]
impl TeamStorage for MemoryTeamStorage {
    async fn all(&self) -> Result<Vec<TeamRecord>, StorageError> {
        Ok(self.teams.read().await.values().cloned().collect())
    }

    async fn save(&self, team: &TeamRecord) -> Result<(), StorageError> {
        self.teams
            .write()
            .await
            .insert(team.id.clone(), team.clone());
        Ok(())
    }
}
