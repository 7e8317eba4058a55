//! SQLite persistence adapter for the engine's store ports.
//!
//! Maps the abstract store contract onto sqlx/SQLite: matchup batches
//! live as single versioned rows (pairings as a JSON document), so
//! create-if-absent is an `INSERT ... ON CONFLICT DO NOTHING` and the
//! batch compare-and-swap is a conditional `UPDATE` on the version
//! column.

mod error;
pub mod models;
mod pool;
pub mod repositories;

pub use error::StoreInitError;
pub use pool::{create_pool, run_migrations};
pub use repositories::{
    SqliteFixtureStore, SqliteLineupStore, SqliteMatchupStore, SqliteRoundStore, SqliteStores,
};
