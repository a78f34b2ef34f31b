//! SQLite team storage: one row per team, the record kept as a JSON document.
//!
//! External: SQLite via sqlx; callers use `all` / `save` through [`TeamStorage`].

use async_trait::async_trait;
use skellington_core::{StorageError, TeamRecord, TeamStorage};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use sqlx::Row;
use tracing::{debug, info};

#[derive(Clone)]
pub struct SqliteTeamStorage {
    pool: SqlitePool,
}

impl SqliteTeamStorage {
    /// Opens (creating if missing) the database file and ensures the `teams` table exists.
    pub async fn new(database_path: &str) -> Result<Self, StorageError> {
        info!(database_path = %database_path, "Opening team storage");
        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await.map_err(db_error)?;

        let storage = Self { pool };
        storage.init().await?;
        Ok(storage)
    }

    /// Wraps an existing pool, e.g. one shared with other tables.
    pub async fn with_pool(pool: SqlitePool) -> Result<Self, StorageError> {
        let storage = Self { pool };
        storage.init().await?;
        Ok(storage)
    }

    async fn init(&self) -> Result<(), StorageError> {
        info!("Creating teams table if not exists");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS teams (
                id TEXT PRIMARY KEY,
                data TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    /// Looks up a single team by id.
    pub async fn get(&self, id: &str) -> Result<Option<TeamRecord>, StorageError> {
        let row = sqlx::query("SELECT data FROM teams WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        match row {
            Some(row) => {
                let data: String = row.try_get("data").map_err(db_error)?;
                Ok(Some(serde_json::from_str(&data)?))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl TeamStorage for SqliteTeamStorage {
    async fn all(&self) -> Result<Vec<TeamRecord>, StorageError> {
        let rows = sqlx::query("SELECT data FROM teams ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        let mut teams = Vec::with_capacity(rows.len());
        for row in rows {
            let data: String = row.try_get("data").map_err(db_error)?;
            teams.push(serde_json::from_str(&data)?);
        }

        debug!(count = teams.len(), "Loaded teams");
        Ok(teams)
    }

    async fn save(&self, team: &TeamRecord) -> Result<(), StorageError> {
        let data = serde_json::to_string(team)?;

        sqlx::query(
            r#"
            INSERT INTO teams (id, data) VALUES (?, ?)
            ON CONFLICT(id) DO UPDATE SET data = excluded.data
            "#,
        )
        .bind(&team.id)
        .bind(data)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        debug!(team_id = %team.id, "Saved team");
        Ok(())
    }
}

fn db_error(e: sqlx::Error) -> StorageError {
    StorageError::Database(e.to_string())
}
