//! In-memory store adapter.
//!
//! Backs the engine with `RwLock`-guarded maps. The matchup map's
//! create-if-absent and versioned update run under a single write lock,
//! so the concurrency guarantees match what a transactional backend
//! provides. Used by tests and as the default adapter.

use async_trait::async_trait;
use chrono::Utc;
use league_core::{Fixture, FixtureId, Lineup, MatchupSet, Round, RoundId, SeasonId, TeamId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::ports::{FixtureStore, LineupStore, MatchupStore, RoundStore, StoreError, Stores};

#[derive(Clone, Default)]
pub struct MemoryStores {
    rounds: Arc<RwLock<HashMap<RoundId, Round>>>,
    fixtures: Arc<RwLock<HashMap<FixtureId, Fixture>>>,
    lineups: Arc<RwLock<HashMap<(FixtureId, TeamId), Lineup>>>,
    matchups: Arc<RwLock<HashMap<FixtureId, MatchupSet>>>,
}

impl MemoryStores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bundle this adapter behind the engine's port handles.
    pub fn stores(&self) -> Stores {
        Stores {
            rounds: Arc::new(self.clone()),
            fixtures: Arc::new(self.clone()),
            lineups: Arc::new(self.clone()),
            matchups: Arc::new(self.clone()),
        }
    }
}

#[async_trait]
impl RoundStore for MemoryStores {
    async fn get(&self, id: RoundId) -> Result<Option<Round>, StoreError> {
        Ok(self.rounds.read().unwrap().get(&id).cloned())
    }

    async fn by_season(&self, season: SeasonId) -> Result<Vec<Round>, StoreError> {
        let mut rounds: Vec<Round> = self
            .rounds
            .read()
            .unwrap()
            .values()
            .filter(|r| r.season_id == season)
            .cloned()
            .collect();
        rounds.sort_by_key(|r| (r.leg, r.number));
        Ok(rounds)
    }

    async fn upsert(&self, round: &Round) -> Result<(), StoreError> {
        self.rounds
            .write()
            .unwrap()
            .insert(round.id, round.clone());
        Ok(())
    }
}

#[async_trait]
impl FixtureStore for MemoryStores {
    async fn get(&self, id: FixtureId) -> Result<Option<Fixture>, StoreError> {
        Ok(self.fixtures.read().unwrap().get(&id).cloned())
    }

    async fn by_round(&self, round: RoundId) -> Result<Vec<Fixture>, StoreError> {
        let mut fixtures: Vec<Fixture> = self
            .fixtures
            .read()
            .unwrap()
            .values()
            .filter(|f| f.round_id == round)
            .cloned()
            .collect();
        fixtures.sort_by_key(|f| f.match_number);
        Ok(fixtures)
    }

    async fn insert_batch(&self, fixtures: &[Fixture]) -> Result<(), StoreError> {
        let mut map = self.fixtures.write().unwrap();
        for fixture in fixtures {
            map.insert(fixture.id, fixture.clone());
        }
        Ok(())
    }

    async fn update(&self, fixture: &Fixture) -> Result<(), StoreError> {
        let mut map = self.fixtures.write().unwrap();
        if !map.contains_key(&fixture.id) {
            return Err(StoreError::NotFound(format!("fixture {}", fixture.id)));
        }
        map.insert(fixture.id, fixture.clone());
        Ok(())
    }
}

#[async_trait]
impl LineupStore for MemoryStores {
    async fn get(&self, fixture: FixtureId, team: TeamId) -> Result<Option<Lineup>, StoreError> {
        Ok(self
            .lineups
            .read()
            .unwrap()
            .get(&(fixture, team))
            .cloned())
    }

    async fn put(&self, lineup: &Lineup) -> Result<(), StoreError> {
        self.lineups
            .write()
            .unwrap()
            .insert((lineup.fixture_id, lineup.team_id), lineup.clone());
        Ok(())
    }
}

#[async_trait]
impl MatchupStore for MemoryStores {
    async fn get(&self, fixture: FixtureId) -> Result<Option<MatchupSet>, StoreError> {
        Ok(self.matchups.read().unwrap().get(&fixture).cloned())
    }

    async fn create_if_absent(&self, set: &MatchupSet) -> Result<(), StoreError> {
        let mut map = self.matchups.write().unwrap();
        if map.contains_key(&set.fixture_id) {
            return Err(StoreError::AlreadyExists(set.fixture_id));
        }
        map.insert(set.fixture_id, set.clone());
        Ok(())
    }

    async fn update_if_version(&self, set: &MatchupSet) -> Result<u64, StoreError> {
        let mut map = self.matchups.write().unwrap();
        let stored = map
            .get_mut(&set.fixture_id)
            .ok_or_else(|| StoreError::NotFound(format!("matchups for {}", set.fixture_id)))?;
        if stored.version != set.version {
            return Err(StoreError::VersionConflict(set.fixture_id));
        }
        let mut next = set.clone();
        next.version = set.version + 1;
        next.updated_at = Utc::now();
        let version = next.version;
        *stored = next;
        Ok(version)
    }

    async fn delete(&self, fixture: FixtureId) -> Result<bool, StoreError> {
        Ok(self.matchups.write().unwrap().remove(&fixture).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use league_core::Matchup;
    use uuid::Uuid;

    fn sample_set(fixture: FixtureId) -> MatchupSet {
        let pairings = (1..=3)
            .map(|pos| Matchup::new(pos, Uuid::new_v4(), Uuid::new_v4(), 6))
            .collect();
        MatchupSet::new(fixture, Uuid::new_v4(), pairings)
    }

    #[tokio::test]
    async fn test_create_if_absent_is_exclusive() {
        let stores = MemoryStores::new();
        let fixture = Uuid::new_v4();

        let first = sample_set(fixture);
        let second = sample_set(fixture);

        assert!(stores.create_if_absent(&first).await.is_ok());
        let err = stores.create_if_absent(&second).await.unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists(id) if id == fixture));

        // The winner's batch is the one that stuck.
        let stored = MatchupStore::get(&stores, fixture).await.unwrap().unwrap();
        assert_eq!(stored.created_by, first.created_by);
    }

    #[tokio::test]
    async fn test_update_if_version_detects_stale_writer() {
        let stores = MemoryStores::new();
        let fixture = Uuid::new_v4();
        let set = sample_set(fixture);
        stores.create_if_absent(&set).await.unwrap();

        // First writer succeeds and bumps the version.
        let v2 = stores.update_if_version(&set).await.unwrap();
        assert_eq!(v2, 2);

        // A writer still holding version 1 must lose.
        let err = stores.update_if_version(&set).await.unwrap_err();
        assert!(matches!(err, StoreError::VersionConflict(id) if id == fixture));
    }

    #[tokio::test]
    async fn test_delete_reports_existence() {
        let stores = MemoryStores::new();
        let fixture = Uuid::new_v4();
        assert!(!stores.delete(fixture).await.unwrap());

        stores.create_if_absent(&sample_set(fixture)).await.unwrap();
        assert!(stores.delete(fixture).await.unwrap());
        assert!(MatchupStore::get(&stores, fixture).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_lineup_keyed_by_fixture_and_team() {
        let stores = MemoryStores::new();
        let fixture = Uuid::new_v4();
        let team_a = Uuid::new_v4();
        let team_b = Uuid::new_v4();

        let lineup = Lineup::new(fixture, team_a, vec![Uuid::new_v4()], vec![]);
        stores.put(&lineup).await.unwrap();

        assert!(LineupStore::get(&stores, fixture, team_a)
            .await
            .unwrap()
            .is_some());
        assert!(LineupStore::get(&stores, fixture, team_b)
            .await
            .unwrap()
            .is_none());
    }
}
