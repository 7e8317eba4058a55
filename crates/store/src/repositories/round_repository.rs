use async_trait::async_trait;
use engine::{RoundStore, StoreError};
use league_core::{Round, RoundId, SeasonId};
use sqlx::SqlitePool;

use crate::error::backend;
use crate::models::RoundRow;

#[derive(Clone)]
pub struct SqliteRoundStore {
    pool: SqlitePool,
}

impl SqliteRoundStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoundStore for SqliteRoundStore {
    async fn get(&self, id: RoundId) -> Result<Option<Round>, StoreError> {
        let row: Option<RoundRow> = sqlx::query_as(
            r#"
            SELECT id, season_id, number, leg, status, schedule
            FROM rounds
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        Ok(row.map(|r| r.into_domain()))
    }

    async fn by_season(&self, season: SeasonId) -> Result<Vec<Round>, StoreError> {
        let rows: Vec<RoundRow> = sqlx::query_as(
            r#"
            SELECT id, season_id, number, leg, status, schedule
            FROM rounds
            WHERE season_id = ?
            ORDER BY leg, number
            "#,
        )
        .bind(season.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        Ok(rows.into_iter().map(|r| r.into_domain()).collect())
    }

    async fn upsert(&self, round: &Round) -> Result<(), StoreError> {
        let row = RoundRow::from(round);
        sqlx::query(
            r#"
            INSERT INTO rounds (id, season_id, number, leg, status, schedule)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                season_id = excluded.season_id,
                number = excluded.number,
                leg = excluded.leg,
                status = excluded.status,
                schedule = excluded.schedule
            "#,
        )
        .bind(&row.id)
        .bind(&row.season_id)
        .bind(row.number)
        .bind(&row.leg)
        .bind(&row.status)
        .bind(&row.schedule)
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        Ok(())
    }
}
