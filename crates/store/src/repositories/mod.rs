mod fixture_repository;
mod lineup_repository;
mod matchup_repository;
mod round_repository;

pub use fixture_repository::SqliteFixtureStore;
pub use lineup_repository::SqliteLineupStore;
pub use matchup_repository::SqliteMatchupStore;
pub use round_repository::SqliteRoundStore;

use engine::Stores;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Bundle of SQLite-backed implementations for all engine ports.
#[derive(Clone)]
pub struct SqliteStores {
    pool: SqlitePool,
}

impl SqliteStores {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn stores(&self) -> Stores {
        Stores {
            rounds: Arc::new(SqliteRoundStore::new(self.pool.clone())),
            fixtures: Arc::new(SqliteFixtureStore::new(self.pool.clone())),
            lineups: Arc::new(SqliteLineupStore::new(self.pool.clone())),
            matchups: Arc::new(SqliteMatchupStore::new(self.pool.clone())),
        }
    }
}

#[cfg(test)]
pub(crate) async fn test_pool() -> (SqlitePool, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}/test.db", dir.path().display());
    let pool = crate::pool::create_pool(&url).await.unwrap();
    crate::pool::run_migrations(&pool).await.unwrap();
    (pool, dir)
}
