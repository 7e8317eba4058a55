//! Matchup batch creation, editing and swapping.
//!
//! Creation is the one true mutual-exclusion point in the engine: two
//! clients may race to create the batch for the same fixture, and the
//! store's atomic create-if-absent decides the winner. The loser gets a
//! conflict it can distinguish from ordinary failure, so it reloads the
//! authoritative batch instead of overwriting. Edits and swaps go
//! through a versioned compare-and-swap on the whole batch.

use chrono::{DateTime, Utc};
use events::{Event, EventBus, EventEnvelope};
use league_core::{
    Fixture, FixtureId, Lineup, Matchup, MatchupSet, Phase, PlayerId, Round, TeamId, TeamSide,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::phase_clock::current_phase;
use crate::ports::{StoreError, Stores};

/// One pairing as chosen by the creating team: explicit index order, home
/// starter against away starter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairingAssignment {
    pub home_player: PlayerId,
    pub away_player: PlayerId,
    pub duration_minutes: Option<u32>,
}

/// How the acting team may change an existing batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditRights {
    /// Home team before its lineup deadline: discard the batch and start
    /// over from a fresh lineup submission.
    Recreate,
    /// Original creator during the late-entry window: edit pairings in
    /// place.
    EditInPlace,
}

#[derive(Clone)]
pub struct MatchupCoordinator {
    stores: Stores,
    config: EngineConfig,
    bus: EventBus,
}

impl MatchupCoordinator {
    pub fn new(stores: Stores, config: EngineConfig, bus: EventBus) -> Self {
        Self {
            stores,
            config,
            bus,
        }
    }

    /// Create the pairing batch for a fixture in one atomic write.
    ///
    /// Permitted while the round is running and lineups are open: before
    /// the home deadline only the home team may create; during the
    /// late-entry window either team may, first writer wins. At most one
    /// creation ever succeeds per fixture.
    pub async fn create_matchups(
        &self,
        fixture_id: FixtureId,
        acting_team: TeamId,
        assignments: Vec<PairingAssignment>,
        now: DateTime<Utc>,
    ) -> Result<MatchupSet> {
        let (fixture, round) = self.load(fixture_id).await?;
        let side = self.side_of(&fixture, acting_team)?;

        let phase = current_phase(&round, now);
        match phase {
            Phase::Draft => return Err(EngineError::phase(Phase::Draft, None)),
            Phase::ResultEntry | Phase::Closed => {
                let deadline = round.schedule.as_ref().map(|s| s.away_deadline());
                return Err(EngineError::phase(phase, deadline));
            }
            Phase::HomeFixture => {
                if side != TeamSide::Home {
                    return Err(EngineError::not_authorized(
                        "only the home team may create matchups before the home deadline",
                    ));
                }
            }
            Phase::FixtureEntry => {}
        }

        let home_lineup = self.require_lineup(&fixture, fixture.home_team).await?;
        let away_lineup = self.require_lineup(&fixture, fixture.away_team).await?;
        let pairings = self.build_pairings(&home_lineup, &away_lineup, &assignments)?;

        let set = MatchupSet::new(fixture_id, acting_team, pairings);
        if let Err(err) = self.stores.matchups.create_if_absent(&set).await {
            if matches!(err, StoreError::AlreadyExists(_)) {
                warn!(%fixture_id, team = %acting_team, "matchup creation race lost");
            }
            return Err(err.into());
        }

        info!(%fixture_id, team = %acting_team, pairings = set.pairings.len(), "matchups created");
        self.publish(Event::MatchupsCreated {
            fixture_id,
            created_by: acting_team,
        });
        Ok(set)
    }

    /// What the acting team may currently do to the existing batch.
    pub async fn edit_rights(
        &self,
        fixture_id: FixtureId,
        acting_team: TeamId,
        now: DateTime<Utc>,
    ) -> Result<EditRights> {
        let (fixture, round) = self.load(fixture_id).await?;
        let set = self.require_set(fixture_id).await?;
        self.rights(&fixture, &round, &set, acting_team, now)
    }

    /// Reassign a pairing's away player and/or adjust its duration.
    pub async fn update_pairing(
        &self,
        fixture_id: FixtureId,
        acting_team: TeamId,
        position: u32,
        new_away_player: Option<PlayerId>,
        duration_minutes: Option<u32>,
        now: DateTime<Utc>,
    ) -> Result<MatchupSet> {
        let (fixture, round) = self.load(fixture_id).await?;
        let mut set = self.require_set(fixture_id).await?;
        self.require_in_place_rights(&fixture, &round, &set, acting_team, now)?;

        if let Some(player) = new_away_player {
            let away_lineup = self.require_lineup(&fixture, fixture.away_team).await?;
            if !away_lineup.starters.contains(&player) {
                return Err(EngineError::validation(format!(
                    "player {player} is not an away starter"
                )));
            }
        }

        {
            let pairing = set
                .get_mut(position)
                .ok_or_else(|| EngineError::validation(format!("no pairing at position {position}")))?;
            if let Some(player) = new_away_player {
                pairing.away_player = player;
            }
            if let Some(duration) = duration_minutes {
                pairing.duration_minutes = duration;
            }
        }
        if let Some(player) = set.duplicate_away_player() {
            return Err(EngineError::validation(format!(
                "player {player} would be assigned to more than one pairing"
            )));
        }

        self.commit(&mut set).await?;
        Ok(set)
    }

    /// Exchange the away players of two pairings atomically: either both
    /// positions update or neither does.
    pub async fn swap_away_players(
        &self,
        fixture_id: FixtureId,
        acting_team: TeamId,
        position_a: u32,
        position_b: u32,
        now: DateTime<Utc>,
    ) -> Result<MatchupSet> {
        let (fixture, round) = self.load(fixture_id).await?;
        let mut set = self.require_set(fixture_id).await?;
        self.require_in_place_rights(&fixture, &round, &set, acting_team, now)?;

        set.swap_away_players(position_a, position_b)?;
        if let Some(player) = set.duplicate_away_player() {
            return Err(EngineError::validation(format!(
                "player {player} would be assigned to more than one pairing"
            )));
        }

        self.commit(&mut set).await?;
        Ok(set)
    }

    /// Discard the batch, returning the fixture to its pre-matchup state.
    /// Home-team recreate mode only.
    pub async fn discard_matchups(
        &self,
        fixture_id: FixtureId,
        acting_team: TeamId,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let (fixture, round) = self.load(fixture_id).await?;
        let set = self.require_set(fixture_id).await?;
        match self.rights(&fixture, &round, &set, acting_team, now)? {
            EditRights::Recreate => {}
            EditRights::EditInPlace => {
                return Err(EngineError::not_authorized(
                    "only the home team may discard matchups, before its lineup deadline",
                ));
            }
        }

        self.stores.matchups.delete(fixture_id).await?;
        info!(%fixture_id, team = %acting_team, "matchups discarded");
        self.publish(Event::MatchupsDiscarded {
            fixture_id,
            discarded_by: acting_team,
        });
        Ok(())
    }

    /// Plain read of the current batch.
    pub async fn matchups(&self, fixture_id: FixtureId) -> Result<Option<MatchupSet>> {
        Ok(self.stores.matchups.get(fixture_id).await?)
    }

    fn rights(
        &self,
        fixture: &Fixture,
        round: &Round,
        set: &MatchupSet,
        acting_team: TeamId,
        now: DateTime<Utc>,
    ) -> Result<EditRights> {
        let side = self.side_of(fixture, acting_team)?;
        let phase = current_phase(round, now);
        match phase {
            Phase::Draft => Err(EngineError::phase(Phase::Draft, None)),
            Phase::ResultEntry | Phase::Closed => {
                let deadline = round.schedule.as_ref().map(|s| s.away_deadline());
                Err(EngineError::phase(phase, deadline))
            }
            Phase::HomeFixture | Phase::FixtureEntry => {
                // Schedule must exist for these phases to be reachable.
                let home_deadline = round
                    .schedule
                    .as_ref()
                    .map(|s| s.home_deadline())
                    .unwrap_or(now);
                if side == TeamSide::Home && now < home_deadline {
                    Ok(EditRights::Recreate)
                } else if acting_team == set.created_by && phase == Phase::FixtureEntry {
                    Ok(EditRights::EditInPlace)
                } else {
                    Err(EngineError::not_authorized(
                        "team holds no matchup edit rights right now",
                    ))
                }
            }
        }
    }

    fn require_in_place_rights(
        &self,
        fixture: &Fixture,
        round: &Round,
        set: &MatchupSet,
        acting_team: TeamId,
        now: DateTime<Utc>,
    ) -> Result<()> {
        match self.rights(fixture, round, set, acting_team, now)? {
            EditRights::EditInPlace => Ok(()),
            EditRights::Recreate => Err(EngineError::not_authorized(
                "before the home deadline the home team edits by discarding and recreating the batch",
            )),
        }
    }

    fn build_pairings(
        &self,
        home_lineup: &Lineup,
        away_lineup: &Lineup,
        assignments: &[PairingAssignment],
    ) -> Result<Vec<Matchup>> {
        let squad_size = self.config.squad_size;
        if assignments.len() != squad_size {
            return Err(EngineError::validation(format!(
                "expected {} pairings, got {}",
                squad_size,
                assignments.len()
            )));
        }

        let home_starters: HashSet<PlayerId> = home_lineup.starters.iter().copied().collect();
        let mut home_seen = HashSet::new();
        let mut away_seen = HashSet::new();
        for assignment in assignments {
            if !home_starters.contains(&assignment.home_player) {
                return Err(EngineError::validation(format!(
                    "player {} is not a home starter",
                    assignment.home_player
                )));
            }
            if !home_seen.insert(assignment.home_player) {
                return Err(EngineError::validation(format!(
                    "home starter {} is paired more than once",
                    assignment.home_player
                )));
            }
            if !away_lineup.starters.contains(&assignment.away_player) {
                return Err(EngineError::validation(format!(
                    "player {} is not an away starter",
                    assignment.away_player
                )));
            }
            if !away_seen.insert(assignment.away_player) {
                return Err(EngineError::validation(format!(
                    "away player {} is assigned to more than one pairing",
                    assignment.away_player
                )));
            }
        }

        Ok(assignments
            .iter()
            .enumerate()
            .map(|(idx, assignment)| {
                Matchup::new(
                    idx as u32 + 1,
                    assignment.home_player,
                    assignment.away_player,
                    assignment
                        .duration_minutes
                        .unwrap_or(self.config.default_duration_minutes),
                )
            })
            .collect())
    }

    async fn commit(&self, set: &mut MatchupSet) -> Result<()> {
        let version = self.stores.matchups.update_if_version(set).await?;
        set.version = version;
        self.publish(Event::MatchupsUpdated {
            fixture_id: set.fixture_id,
            version,
        });
        Ok(())
    }

    fn side_of(&self, fixture: &Fixture, team: TeamId) -> Result<TeamSide> {
        fixture
            .side_of(team)
            .ok_or_else(|| EngineError::not_authorized("team is not part of this fixture"))
    }

    async fn require_lineup(&self, fixture: &Fixture, team: TeamId) -> Result<Lineup> {
        self.stores
            .lineups
            .get(fixture.id, team)
            .await?
            .ok_or(EngineError::LineupMissing {
                fixture: fixture.id,
                team,
            })
    }

    async fn require_set(&self, fixture_id: FixtureId) -> Result<MatchupSet> {
        self.stores
            .matchups
            .get(fixture_id)
            .await?
            .ok_or(EngineError::MatchupsMissing(fixture_id))
    }

    async fn load(&self, fixture_id: FixtureId) -> Result<(Fixture, Round)> {
        let fixture = self
            .stores
            .fixtures
            .get(fixture_id)
            .await?
            .ok_or(EngineError::FixtureNotFound(fixture_id))?;
        let round = self
            .stores
            .rounds
            .get(fixture.round_id)
            .await?
            .ok_or(EngineError::RoundNotFound(fixture.round_id))?;
        Ok((fixture, round))
    }

    fn publish(&self, event: Event) {
        self.bus.publish(EventEnvelope::new(event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn lineup(fixture: FixtureId, team: TeamId, starters: &[PlayerId]) -> Lineup {
        Lineup::new(fixture, team, starters.to_vec(), vec![Uuid::new_v4()])
    }

    fn coordinator() -> MatchupCoordinator {
        let stores = crate::memory::MemoryStores::new().stores();
        MatchupCoordinator::new(stores, EngineConfig::default(), EventBus::new())
    }

    fn players(n: usize) -> Vec<PlayerId> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    fn assignments(home: &[PlayerId], away: &[PlayerId]) -> Vec<PairingAssignment> {
        home.iter()
            .zip(away.iter())
            .map(|(h, a)| PairingAssignment {
                home_player: *h,
                away_player: *a,
                duration_minutes: None,
            })
            .collect()
    }

    #[test]
    fn test_build_pairings_validates_structure() {
        let coordinator = coordinator();
        let fixture = Uuid::new_v4();
        let home_team = Uuid::new_v4();
        let away_team = Uuid::new_v4();
        let home = players(5);
        let away = players(5);
        let home_lineup = lineup(fixture, home_team, &home);
        let away_lineup = lineup(fixture, away_team, &away);

        // Happy path: positions assigned in order, default duration.
        let pairings = coordinator
            .build_pairings(&home_lineup, &away_lineup, &assignments(&home, &away))
            .unwrap();
        assert_eq!(pairings.len(), 5);
        assert_eq!(pairings[0].position, 1);
        assert_eq!(pairings[4].position, 5);
        assert_eq!(pairings[0].duration_minutes, 6);

        // Wrong batch size.
        let short = assignments(&home[..4], &away[..4]);
        assert!(matches!(
            coordinator.build_pairings(&home_lineup, &away_lineup, &short),
            Err(EngineError::Validation(_))
        ));

        // Duplicate away player.
        let mut dup = assignments(&home, &away);
        dup[4].away_player = dup[0].away_player;
        assert!(matches!(
            coordinator.build_pairings(&home_lineup, &away_lineup, &dup),
            Err(EngineError::Validation(_))
        ));

        // Home starter paired twice (and one left unpaired).
        let mut twice = assignments(&home, &away);
        twice[4].home_player = twice[0].home_player;
        assert!(matches!(
            coordinator.build_pairings(&home_lineup, &away_lineup, &twice),
            Err(EngineError::Validation(_))
        ));

        // Stranger in the lineup.
        let mut stranger = assignments(&home, &away);
        stranger[2].away_player = Uuid::new_v4();
        assert!(matches!(
            coordinator.build_pairings(&home_lineup, &away_lineup, &stranger),
            Err(EngineError::Validation(_))
        ));
    }
}
