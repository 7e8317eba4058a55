use engine::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreInitError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Map a backend failure into the engine's port error.
pub(crate) fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}
