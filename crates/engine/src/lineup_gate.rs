//! Lineup submission windows.
//!
//! Decides whether a team may submit or replace its lineup right now, and
//! owns the one destructive side effect in that path: a home-team
//! resubmission while matchups exist discards the existing batch.

use chrono::{DateTime, Utc};
use events::{Event, EventBus, EventEnvelope};
use league_core::{
    Fixture, FixtureId, Lineup, Phase, PlayerId, Round, RoundSchedule, TeamId, TeamSide,
};
use tracing::info;

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::phase_clock::current_phase;
use crate::ports::Stores;

/// Pure gate decision, in the priority order of the submission rules.
///
/// 1. Matchups exist: only the home team, strictly before its deadline.
/// 2. No matchups and before the home deadline: either team.
/// 3. No matchups during the late-recovery window (home deadline passed,
///    away deadline not): either team.
/// 4. Otherwise locked.
pub fn can_submit(
    side: TeamSide,
    matchups_exist: bool,
    now: DateTime<Utc>,
    schedule: &RoundSchedule,
) -> bool {
    if matchups_exist {
        return side == TeamSide::Home && now < schedule.home_deadline();
    }
    now < schedule.away_deadline()
}

#[derive(Clone)]
pub struct LineupGate {
    stores: Stores,
    config: EngineConfig,
    bus: EventBus,
}

impl LineupGate {
    pub fn new(stores: Stores, config: EngineConfig, bus: EventBus) -> Self {
        Self {
            stores,
            config,
            bus,
        }
    }

    /// Submit or replace a team's lineup for a fixture.
    ///
    /// `now` is the moment of the write; the gate is evaluated against it,
    /// not against whenever the client started composing the request.
    /// Draft-phase submissions persist without enabling any matchup
    /// operation. A home resubmission while matchups exist discards them.
    pub async fn submit_lineup(
        &self,
        fixture_id: FixtureId,
        acting_team: TeamId,
        starters: Vec<PlayerId>,
        reserves: Vec<PlayerId>,
        now: DateTime<Utc>,
    ) -> Result<Lineup> {
        let (fixture, round) = self.load(fixture_id).await?;
        let side = fixture
            .side_of(acting_team)
            .ok_or_else(|| EngineError::not_authorized("team is not part of this fixture"))?;

        let lineup = Lineup::new(fixture_id, acting_team, starters, reserves);
        lineup.validate(self.config.squad_size)?;

        let phase = current_phase(&round, now);
        match phase {
            Phase::Draft => {
                // Pure storage; no gate state changes while the round has
                // not started.
                self.stores.lineups.put(&lineup).await?;
                self.publish(Event::LineupSubmitted {
                    fixture_id,
                    team_id: acting_team,
                    draft: true,
                });
                return Ok(lineup);
            }
            Phase::ResultEntry | Phase::Closed => {
                let deadline = round.schedule.as_ref().map(|s| s.away_deadline());
                return Err(EngineError::phase(phase, deadline));
            }
            Phase::HomeFixture | Phase::FixtureEntry => {}
        }

        // The schedule exists in every non-draft phase.
        let Some(schedule) = round.schedule.as_ref() else {
            return Err(EngineError::phase(Phase::Draft, None));
        };
        let matchups_exist = self.stores.matchups.get(fixture_id).await?.is_some();

        if !can_submit(side, matchups_exist, now, schedule) {
            if matchups_exist && side == TeamSide::Home {
                return Err(EngineError::phase(phase, Some(schedule.home_deadline())));
            }
            return Err(EngineError::not_authorized(
                "lineup is locked while matchups exist",
            ));
        }

        if matchups_exist {
            // Home resubmission before the home deadline invalidates the
            // batch built on the old lineup.
            self.stores.matchups.delete(fixture_id).await?;
            info!(%fixture_id, team = %acting_team, "matchups discarded by lineup resubmission");
            self.publish(Event::MatchupsDiscarded {
                fixture_id,
                discarded_by: acting_team,
            });
        }

        self.stores.lineups.put(&lineup).await?;
        self.publish(Event::LineupSubmitted {
            fixture_id,
            team_id: acting_team,
            draft: false,
        });
        Ok(lineup)
    }

    /// Read a lineup as seen by `viewer_team`.
    ///
    /// The owner always sees its own lineup; the opponent sees it only
    /// once matchups exist. Returns `Ok(None)` while it is still hidden.
    pub async fn read_lineup(
        &self,
        fixture_id: FixtureId,
        owner_team: TeamId,
        viewer_team: TeamId,
    ) -> Result<Option<Lineup>> {
        let lineup = self.stores.lineups.get(fixture_id, owner_team).await?;
        if viewer_team == owner_team {
            return Ok(lineup);
        }
        let matchups_exist = self.stores.matchups.get(fixture_id).await?.is_some();
        if matchups_exist {
            Ok(lineup)
        } else {
            Ok(None)
        }
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
