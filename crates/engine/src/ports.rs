//! Storage ports for the engine's external collaborators.
//!
//! The engine talks to an abstract transactional store through these
//! traits. The one hard requirement is that [`MatchupStore`] provides a
//! genuinely atomic create-if-absent and a versioned compare-and-swap;
//! application-level read-then-write is not an acceptable implementation
//! for either.

use async_trait::async_trait;
use league_core::{Fixture, FixtureId, Lineup, MatchupSet, Round, RoundId, SeasonId, TeamId};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("matchup batch already exists for fixture {0}")]
    AlreadyExists(FixtureId),

    #[error("stale version for fixture {0}")]
    VersionConflict(FixtureId),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("backend error: {0}")]
    Backend(String),
}

/// Read/write access to round configuration (schedule, deadlines, status).
#[async_trait]
pub trait RoundStore: Send + Sync {
    async fn get(&self, id: RoundId) -> Result<Option<Round>, StoreError>;
    async fn by_season(&self, season: SeasonId) -> Result<Vec<Round>, StoreError>;
    async fn upsert(&self, round: &Round) -> Result<(), StoreError>;
}

#[async_trait]
pub trait FixtureStore: Send + Sync {
    async fn get(&self, id: FixtureId) -> Result<Option<Fixture>, StoreError>;
    async fn by_round(&self, round: RoundId) -> Result<Vec<Fixture>, StoreError>;
    /// Insert a generated batch of fixtures; all or nothing.
    async fn insert_batch(&self, fixtures: &[Fixture]) -> Result<(), StoreError>;
    async fn update(&self, fixture: &Fixture) -> Result<(), StoreError>;
}

/// Lineups keyed by (fixture, team). Opponent visibility is the engine's
/// concern, not the store's.
#[async_trait]
pub trait LineupStore: Send + Sync {
    async fn get(&self, fixture: FixtureId, team: TeamId) -> Result<Option<Lineup>, StoreError>;
    async fn put(&self, lineup: &Lineup) -> Result<(), StoreError>;
}

#[async_trait]
pub trait MatchupStore: Send + Sync {
    async fn get(&self, fixture: FixtureId) -> Result<Option<MatchupSet>, StoreError>;

    /// Atomically persist a new batch only if none exists for the fixture.
    /// At most one creation ever succeeds per fixture; every later attempt
    /// fails with [`StoreError::AlreadyExists`], even when racing within
    /// milliseconds.
    async fn create_if_absent(&self, set: &MatchupSet) -> Result<(), StoreError>;

    /// Compare-and-swap keyed on `set.version`: persists the batch with
    /// `version + 1` iff the stored version still equals `set.version`.
    /// Returns the new version.
    async fn update_if_version(&self, set: &MatchupSet) -> Result<u64, StoreError>;

    /// Remove the batch, returning whether one existed.
    async fn delete(&self, fixture: FixtureId) -> Result<bool, StoreError>;
}

/// The engine's bundle of store handles.
#[derive(Clone)]
pub struct Stores {
    pub rounds: Arc<dyn RoundStore>,
    pub fixtures: Arc<dyn FixtureStore>,
    pub lineups: Arc<dyn LineupStore>,
    pub matchups: Arc<dyn MatchupStore>,
}
