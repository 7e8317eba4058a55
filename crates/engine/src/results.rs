//! Result entry and aggregation.
//!
//! Collects per-pairing goals, substitution penalties and fine goals
//! into team totals, validates the man-of-the-match selection, marks the
//! fixture completed and publishes the finalized result for downstream
//! consumers. Publication is best effort: a missing or failing listener
//! never rolls back the completion.

use chrono::{DateTime, Utc};
use events::{Event, EventBus, EventEnvelope};
use league_core::{
    Fixture, FixtureId, FixtureResult, FixtureStatus, MatchupSet, Outcome, PairingLine, Phase,
    PlayerId, SideBreakdown, SubstitutionAudit, TeamId, TeamSide,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{EngineError, Result};
use crate::phase_clock::current_phase;
use crate::ports::Stores;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PairingScoreEntry {
    pub position: u32,
    pub home_goals: u32,
    pub away_goals: u32,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FineGoals {
    pub home: u32,
    pub away: u32,
}

#[derive(Clone)]
pub struct ResultAggregator {
    stores: Stores,
    bus: EventBus,
}

impl ResultAggregator {
    pub fn new(stores: Stores, bus: EventBus) -> Self {
        Self { stores, bus }
    }

    /// Enter (or, while the window is still open, correct) the fixture's
    /// results and finalize it.
    ///
    /// Every pairing must end up with a score and the man of the match
    /// must be one of the players who actually played. On success the
    /// fixture is completed and a finalized-result event is published.
    pub async fn enter_results(
        &self,
        fixture_id: FixtureId,
        acting_team: TeamId,
        scores: Vec<PairingScoreEntry>,
        fine_goals: FineGoals,
        motm: Option<PlayerId>,
        now: DateTime<Utc>,
    ) -> Result<FixtureResult> {
        let mut fixture = self
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
        if fixture.side_of(acting_team).is_none() {
            return Err(EngineError::not_authorized("team is not part of this fixture"));
        }

        // Re-checked at the moment of the write; a stale client that
        // composed its request minutes ago gets the deadline error here.
        let phase = current_phase(&round, now);
        if !phase.allows_result_entry() {
            let deadline = match phase {
                Phase::Closed => round.schedule.as_ref().map(|s| s.result_deadline()),
                _ => None,
            };
            return Err(EngineError::phase(phase, deadline));
        }

        let mut set = self
            .stores
            .matchups
            .get(fixture_id)
            .await?
            .ok_or(EngineError::MatchupsMissing(fixture_id))?;

        for entry in &scores {
            let pairing = set.get_mut(entry.position).ok_or_else(|| {
                EngineError::validation(format!("no pairing at position {}", entry.position))
            })?;
            pairing.score = Some(league_core::PairingScore {
                home_goals: entry.home_goals,
                away_goals: entry.away_goals,
            });
        }
        if !set.all_scored() {
            return Err(EngineError::validation(
                "every pairing needs a result before the fixture can be finalized",
            ));
        }

        let motm = motm.ok_or_else(|| {
            EngineError::validation("man of the match selection is required")
        })?;
        if !set.contains_player(motm) {
            return Err(EngineError::validation(
                "man of the match must be one of the players who played",
            ));
        }

        let version = self.stores.matchups.update_if_version(&set).await?;
        set.version = version;

        let result = build_result(&fixture, &set, fine_goals, motm, acting_team, now);

        fixture.status = FixtureStatus::Completed;
        fixture.home_fine_goals = fine_goals.home;
        fixture.away_fine_goals = fine_goals.away;
        fixture.home_score = Some(result.home.total);
        fixture.away_score = Some(result.away.total);
        fixture.outcome = Some(result.outcome);
        fixture.motm = Some(motm);
        fixture.result_entered_by = Some(acting_team);
        fixture.result_entered_at = Some(now);
        fixture.updated_at = now;
        self.stores.fixtures.update(&fixture).await?;

        info!(
            %fixture_id,
            home = result.home.total,
            away = result.away.total,
            outcome = result.outcome.as_str(),
            "fixture completed"
        );
        // Fire and forget: statistics/standings listeners cannot fail the
        // commit that just happened.
        let delivered = self.bus.publish(EventEnvelope::new(Event::FixtureCompleted {
            result: Box::new(result.clone()),
        }));
        if delivered == 0 {
            debug!(%fixture_id, "finalized result published with no listeners");
        }

        Ok(result)
    }
}

/// Fold a fully-scored batch into the finalized result payload.
///
/// Each side's total is its own player goals, plus the penalties from the
/// *opponent's* substitutions, plus its own fine goals.
fn build_result(
    fixture: &Fixture,
    set: &MatchupSet,
    fine_goals: FineGoals,
    motm: PlayerId,
    entered_by: TeamId,
    entered_at: DateTime<Utc>,
) -> FixtureResult {
    let home = SideBreakdown::new(
        set.player_goals(TeamSide::Home),
        set.substitution_penalties(TeamSide::Away),
        fine_goals.home,
    );
    let away = SideBreakdown::new(
        set.player_goals(TeamSide::Away),
        set.substitution_penalties(TeamSide::Home),
        fine_goals.away,
    );

    let pairings = set
        .pairings
        .iter()
        .map(|m| {
            let score = m.score.unwrap_or(league_core::PairingScore {
                home_goals: 0,
                away_goals: 0,
            });
            PairingLine {
                position: m.position,
                home_player: m.home_player,
                away_player: m.away_player,
                home_goals: score.home_goals,
                away_goals: score.away_goals,
            }
        })
        .collect();

    let mut substitutions = Vec::new();
    for pairing in &set.pairings {
        for side in [TeamSide::Home, TeamSide::Away] {
            if let Some(record) = pairing.substitution_on(side) {
                substitutions.push(SubstitutionAudit {
                    position: pairing.position,
                    side,
                    original_player: record.original_player,
                    replacement_player: pairing.player_on(side),
                    penalty_goals: record.penalty_goals,
                });
            }
        }
    }

    FixtureResult {
        fixture_id: fixture.id,
        round_id: fixture.round_id,
        home_team: fixture.home_team,
        away_team: fixture.away_team,
        pairings,
        outcome: Outcome::from_totals(home.total, away.total),
        home,
        away,
        motm,
        substitutions,
        entered_by,
        entered_at,
    }
}
