//! Registry of teams with a connecting or connected bot (multi-team mode).

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamState {
    Connecting,
    Connected,
}

/// Team id -> connection state. Each check-and-insert happens under one lock.
#[derive(Debug, Default)]
pub struct ConnectedTeams {
    teams: Mutex<HashMap<String, TeamState>>,
}

impl ConnectedTeams {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, TeamState>> {
        self.teams.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Claims the team for a connection attempt. False if it is already connecting or connected.
    pub fn begin(&self, team_id: &str) -> bool {
        let mut teams = self.lock();
        if teams.contains_key(team_id) {
            return false;
        }
        teams.insert(team_id.to_string(), TeamState::Connecting);
        true
    }

    pub fn mark_connected(&self, team_id: &str) {
        self.lock()
            .insert(team_id.to_string(), TeamState::Connected);
    }

    pub fn remove(&self, team_id: &str) -> Option<TeamState> {
        self.lock().remove(team_id)
    }

    pub fn state(&self, team_id: &str) -> Option<TeamState> {
        self.lock().get(team_id).copied()
    }

    pub fn is_connected(&self, team_id: &str) -> bool {
        self.state(team_id) == Some(TeamState::Connected)
    }

    /// Ids of connected teams, sorted.
    pub fn connected(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .lock()
            .iter()
            .filter(|(_, state)| **state == TeamState::Connected)
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Tracked teams in either state.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
