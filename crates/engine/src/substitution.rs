//! Player substitutions with opponent penalties.
//!
//! After lineups lock, a team may replace a player in one of its
//! pairings until that side's substitution cutoff. The declared penalty
//! goals are credited to the opposing team's total at result time. The
//! first substitution of a side fixes the original-player audit record;
//! later substitutions of the same slot never overwrite it.

use chrono::{DateTime, Utc};
use events::{Event, EventBus, EventEnvelope};
use league_core::{FixtureId, MatchupSet, PlayerId, TeamId, TeamSide};
use tracing::info;

use crate::error::{EngineError, Result};
use crate::phase_clock::current_phase;
use crate::ports::Stores;

#[derive(Clone)]
pub struct SubstitutionEngine {
    stores: Stores,
    bus: EventBus,
}

impl SubstitutionEngine {
    pub fn new(stores: Stores, bus: EventBus) -> Self {
        Self { stores, bus }
    }

    /// Substitute the player on `side` of the pairing at `position`.
    ///
    /// `penalty_goals` is the non-negative count the submitting team
    /// declares under fair-play rules; it is awarded to the opponent's
    /// total, never the substituting team's own.
    pub async fn substitute(
        &self,
        fixture_id: FixtureId,
        acting_team: TeamId,
        position: u32,
        side: TeamSide,
        replacement: PlayerId,
        penalty_goals: u32,
        now: DateTime<Utc>,
    ) -> Result<MatchupSet> {
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

        let acting_side = fixture
            .side_of(acting_team)
            .ok_or_else(|| EngineError::not_authorized("team is not part of this fixture"))?;
        if acting_side != side {
            return Err(EngineError::not_authorized(
                "a team may only substitute players on its own side",
            ));
        }

        let schedule = round
            .schedule
            .as_ref()
            .ok_or_else(|| EngineError::phase(current_phase(&round, now), None))?;
        let deadline = schedule.substitution_deadline(side);
        if now >= deadline {
            return Err(EngineError::phase(current_phase(&round, now), Some(deadline)));
        }

        let mut set = self
            .stores
            .matchups
            .get(fixture_id)
            .await?
            .ok_or(EngineError::MatchupsMissing(fixture_id))?;

        let lineup = self
            .stores
            .lineups
            .get(fixture_id, acting_team)
            .await?
            .ok_or(EngineError::LineupMissing {
                fixture: fixture_id,
                team: acting_team,
            })?;
        if !lineup.contains(replacement) {
            return Err(EngineError::validation(format!(
                "player {replacement} is not in the team's lineup"
            )));
        }
        if set.contains_player(replacement) {
            return Err(EngineError::validation(format!(
                "player {replacement} is already assigned to a pairing"
            )));
        }

        let pairing = set
            .get_mut(position)
            .ok_or_else(|| EngineError::validation(format!("no pairing at position {position}")))?;
        pairing.record_substitution(side, replacement, penalty_goals, now);

        let version = self.stores.matchups.update_if_version(&set).await?;
        set.version = version;

        info!(
            %fixture_id,
            position,
            side = side.as_str(),
            penalty_goals,
            "substitution recorded"
        );
        self.bus
            .publish(EventEnvelope::new(Event::SubstitutionRecorded {
                fixture_id,
                position,
                side,
                penalty_goals,
            }));
        Ok(set)
    }
}
