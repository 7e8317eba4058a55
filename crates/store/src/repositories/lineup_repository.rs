use async_trait::async_trait;
use engine::{LineupStore, StoreError};
use league_core::{FixtureId, Lineup, TeamId};
use sqlx::SqlitePool;

use crate::error::backend;
use crate::models::LineupRow;

#[derive(Clone)]
pub struct SqliteLineupStore {
    pool: SqlitePool,
}

impl SqliteLineupStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LineupStore for SqliteLineupStore {
    async fn get(&self, fixture: FixtureId, team: TeamId) -> Result<Option<Lineup>, StoreError> {
        let row: Option<LineupRow> = sqlx::query_as(
            r#"
            SELECT fixture_id, team_id, starters, reserves, submitted_at
            FROM lineups
            WHERE fixture_id = ? AND team_id = ?
            "#,
        )
        .bind(fixture.to_string())
        .bind(team.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        Ok(row.map(|r| r.into_domain()))
    }

    async fn put(&self, lineup: &Lineup) -> Result<(), StoreError> {
        let row = LineupRow::from(lineup);
        sqlx::query(
            r#"
            INSERT INTO lineups (fixture_id, team_id, starters, reserves, submitted_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(fixture_id, team_id) DO UPDATE SET
                starters = excluded.starters,
                reserves = excluded.reserves,
                submitted_at = excluded.submitted_at
            "#,
        )
        .bind(&row.fixture_id)
        .bind(&row.team_id)
        .bind(&row.starters)
        .bind(&row.reserves)
        .bind(row.submitted_at)
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        Ok(())
    }
}
