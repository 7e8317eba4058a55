use async_trait::async_trait;
use chrono::Utc;
use engine::{MatchupStore, StoreError};
use league_core::{FixtureId, MatchupSet};
use sqlx::SqlitePool;

use crate::error::backend;
use crate::models::{datetime_to_timestamp, MatchupSetRow};

#[derive(Clone)]
pub struct SqliteMatchupStore {
    pool: SqlitePool,
}

impl SqliteMatchupStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MatchupStore for SqliteMatchupStore {
    async fn get(&self, fixture: FixtureId) -> Result<Option<MatchupSet>, StoreError> {
        let row: Option<MatchupSetRow> = sqlx::query_as(
            r#"
            SELECT fixture_id, created_by, version, pairings, created_at, updated_at
            FROM matchup_sets
            WHERE fixture_id = ?
            "#,
        )
        .bind(fixture.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        Ok(row.map(|r| r.into_domain()))
    }

    async fn create_if_absent(&self, set: &MatchupSet) -> Result<(), StoreError> {
        let row = MatchupSetRow::from(set);
        // The primary key on fixture_id makes this the single
        // mutual-exclusion point: whichever insert lands first wins, all
        // later ones affect zero rows.
        let result = sqlx::query(
            r#"
            INSERT INTO matchup_sets (fixture_id, created_by, version, pairings, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(fixture_id) DO NOTHING
            "#,
        )
        .bind(&row.fixture_id)
        .bind(&row.created_by)
        .bind(row.version)
        .bind(&row.pairings)
        .bind(row.created_at)
        .bind(row.updated_at)
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        if result.rows_affected() == 0 {
            tracing::debug!(fixture = %set.fixture_id, "matchup batch insert lost the race");
            return Err(StoreError::AlreadyExists(set.fixture_id));
        }
        Ok(())
    }

    async fn update_if_version(&self, set: &MatchupSet) -> Result<u64, StoreError> {
        let row = MatchupSetRow::from(set);
        let next = row.version + 1;
        let result = sqlx::query(
            r#"
            UPDATE matchup_sets
            SET version = ?, pairings = ?, updated_at = ?
            WHERE fixture_id = ? AND version = ?
            "#,
        )
        .bind(next)
        .bind(&row.pairings)
        .bind(datetime_to_timestamp(Utc::now()))
        .bind(&row.fixture_id)
        .bind(row.version)
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        if result.rows_affected() == 0 {
            let exists: Option<i64> =
                sqlx::query_scalar("SELECT version FROM matchup_sets WHERE fixture_id = ?")
                    .bind(&row.fixture_id)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(backend)?;
            return Err(match exists {
                Some(_) => StoreError::VersionConflict(set.fixture_id),
                None => StoreError::NotFound(format!("matchups for {}", set.fixture_id)),
            });
        }
        Ok(next as u64)
    }

    async fn delete(&self, fixture: FixtureId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM matchup_sets WHERE fixture_id = ?")
            .bind(fixture.to_string())
            .execute(&self.pool)
            .await
            .map_err(backend)?;

        Ok(result.rows_affected() > 0)
    }
}
