use async_trait::async_trait;
use engine::{FixtureStore, StoreError};
use league_core::{Fixture, FixtureId, RoundId};
use sqlx::SqlitePool;

use crate::error::backend;
use crate::models::FixtureRow;

const FIXTURE_COLUMNS: &str = "id, round_id, match_number, home_team, away_team, status, \
     home_fine_goals, away_fine_goals, motm, home_score, away_score, outcome, \
     result_entered_by, result_entered_at, created_at, updated_at";

#[derive(Clone)]
pub struct SqliteFixtureStore {
    pool: SqlitePool,
}

impl SqliteFixtureStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FixtureStore for SqliteFixtureStore {
    async fn get(&self, id: FixtureId) -> Result<Option<Fixture>, StoreError> {
        let row: Option<FixtureRow> = sqlx::query_as(&format!(
            "SELECT {FIXTURE_COLUMNS} FROM fixtures WHERE id = ?"
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        Ok(row.map(|r| r.into_domain()))
    }

    async fn by_round(&self, round: RoundId) -> Result<Vec<Fixture>, StoreError> {
        let rows: Vec<FixtureRow> = sqlx::query_as(&format!(
            "SELECT {FIXTURE_COLUMNS} FROM fixtures WHERE round_id = ? ORDER BY match_number"
        ))
        .bind(round.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        Ok(rows.into_iter().map(|r| r.into_domain()).collect())
    }

    async fn insert_batch(&self, fixtures: &[Fixture]) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(backend)?;
        for fixture in fixtures {
            let row = FixtureRow::from(fixture);
            sqlx::query(
                r#"
                INSERT INTO fixtures (
                    id, round_id, match_number, home_team, away_team, status,
                    home_fine_goals, away_fine_goals, motm, home_score, away_score,
                    outcome, result_entered_by, result_entered_at, created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&row.id)
            .bind(&row.round_id)
            .bind(row.match_number)
            .bind(&row.home_team)
            .bind(&row.away_team)
            .bind(&row.status)
            .bind(row.home_fine_goals)
            .bind(row.away_fine_goals)
            .bind(&row.motm)
            .bind(row.home_score)
            .bind(row.away_score)
            .bind(&row.outcome)
            .bind(&row.result_entered_by)
            .bind(row.result_entered_at)
            .bind(row.created_at)
            .bind(row.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(backend)?;
        }
        tx.commit().await.map_err(backend)?;
        Ok(())
    }

    async fn update(&self, fixture: &Fixture) -> Result<(), StoreError> {
        let row = FixtureRow::from(fixture);
        let result = sqlx::query(
            r#"
            UPDATE fixtures SET
                status = ?, home_fine_goals = ?, away_fine_goals = ?, motm = ?,
                home_score = ?, away_score = ?, outcome = ?,
                result_entered_by = ?, result_entered_at = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&row.status)
        .bind(row.home_fine_goals)
        .bind(row.away_fine_goals)
        .bind(&row.motm)
        .bind(row.home_score)
        .bind(row.away_score)
        .bind(&row.outcome)
        .bind(&row.result_entered_by)
        .bind(row.result_entered_at)
        .bind(row.updated_at)
        .bind(&row.id)
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("fixture {}", fixture.id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_pool;
    use engine::RoundStore;
    use crate::repositories::SqliteRoundStore;
    use league_core::{FixtureStatus, Leg, Outcome, Round};
    use uuid::Uuid;

    async fn seeded_round(pool: &SqlitePool) -> Round {
        let round = Round::new(Uuid::new_v4(), 1, Leg::First);
        SqliteRoundStore::new(pool.clone())
            .upsert(&round)
            .await
            .unwrap();
        round
    }

    #[tokio::test]
    async fn test_insert_batch_and_fetch_by_round() {
        let (pool, _dir) = test_pool().await;
        let store = SqliteFixtureStore::new(pool.clone());
        let round = seeded_round(&pool).await;

        let fixtures: Vec<Fixture> = (1..=3)
            .map(|n| Fixture::new(round.id, n, Uuid::new_v4(), Uuid::new_v4()))
            .collect();
        store.insert_batch(&fixtures).await.unwrap();

        let fetched = store.by_round(round.id).await.unwrap();
        assert_eq!(fetched.len(), 3);
        assert_eq!(fetched[0].match_number, 1);
        assert_eq!(fetched[2].match_number, 3);
    }

    #[tokio::test]
    async fn test_update_completion_fields() {
        let (pool, _dir) = test_pool().await;
        let store = SqliteFixtureStore::new(pool.clone());
        let round = seeded_round(&pool).await;

        let mut fixture = Fixture::new(round.id, 1, Uuid::new_v4(), Uuid::new_v4());
        store.insert_batch(&[fixture.clone()]).await.unwrap();

        fixture.status = FixtureStatus::Completed;
        fixture.home_score = Some(3);
        fixture.away_score = Some(1);
        fixture.outcome = Some(Outcome::HomeWin);
        fixture.motm = Some(Uuid::new_v4());
        store.update(&fixture).await.unwrap();

        let fetched = store.get(fixture.id).await.unwrap().unwrap();
        assert!(fetched.is_completed());
        assert_eq!(fetched.home_score, Some(3));
        assert_eq!(fetched.outcome, Some(Outcome::HomeWin));

        // Updating a fixture that was never inserted is an error.
        let ghost = Fixture::new(round.id, 9, Uuid::new_v4(), Uuid::new_v4());
        assert!(matches!(
            store.update(&ghost).await,
            Err(StoreError::NotFound(_))
        ));
    }
}
