//! Season schedule generation.
//!
//! Round-robin fixture generation with the circle method: every team
//! meets every other team once per leg, with a bye slot inserted for odd
//! team counts. Two-legged seasons repeat the pairings with home and
//! away swapped and round numbering continued.

use league_core::{Fixture, Leg, Round, SeasonId, TeamId};
use tracing::info;

use crate::error::{EngineError, Result};
use crate::ports::Stores;

#[derive(Debug, Clone)]
pub struct GeneratedSeason {
    pub rounds: Vec<Round>,
    pub fixtures: Vec<Fixture>,
}

/// Pure round-robin generation for one leg.
fn round_robin_leg(
    season_id: SeasonId,
    teams: &[TeamId],
    leg: Leg,
    first_round_number: u32,
) -> (Vec<Round>, Vec<Fixture>) {
    // Odd team counts get a phantom bye slot; pairings against it are
    // skipped.
    let mut slots: Vec<Option<TeamId>> = teams.iter().copied().map(Some).collect();
    if slots.len() % 2 != 0 {
        slots.push(None);
    }

    let total = slots.len();
    let rounds_per_leg = total - 1;
    let matches_per_round = total / 2;

    let mut rounds = Vec::with_capacity(rounds_per_leg);
    let mut fixtures = Vec::new();

    for round_idx in 0..rounds_per_leg {
        let round = Round::new(season_id, first_round_number + round_idx as u32, leg);
        let mut match_number = 0u32;

        for match_idx in 0..matches_per_round {
            let (home_slot, away_slot) = if match_idx == 0 {
                // The first slot stays fixed while the others rotate.
                (0, round_idx + 1)
            } else {
                (
                    (round_idx + match_idx) % (total - 1) + 1,
                    (round_idx + (total - 1) - match_idx) % (total - 1) + 1,
                )
            };

            let (Some(mut home), Some(mut away)) = (slots[home_slot], slots[away_slot]) else {
                continue;
            };
            if leg == Leg::Second {
                std::mem::swap(&mut home, &mut away);
            }

            match_number += 1;
            fixtures.push(Fixture::new(round.id, match_number, home, away));
        }

        rounds.push(round);
    }

    (rounds, fixtures)
}

/// Generate the full round-robin schedule for a season.
pub fn round_robin(
    season_id: SeasonId,
    teams: &[TeamId],
    two_legged: bool,
) -> Result<GeneratedSeason> {
    if teams.len() < 2 {
        return Err(EngineError::validation(
            "at least 2 teams are required to generate fixtures",
        ));
    }

    let (mut rounds, mut fixtures) = round_robin_leg(season_id, teams, Leg::First, 1);

    if two_legged {
        let next_number = rounds.len() as u32 + 1;
        let (second_rounds, second_fixtures) =
            round_robin_leg(season_id, teams, Leg::Second, next_number);
        rounds.extend(second_rounds);
        fixtures.extend(second_fixtures);
    }

    Ok(GeneratedSeason { rounds, fixtures })
}

#[derive(Clone)]
pub struct SeasonScheduler {
    stores: Stores,
}

impl SeasonScheduler {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    /// Generate and persist the season's rounds and fixtures.
    ///
    /// Rejected when the season already has rounds; delete them first to
    /// regenerate.
    pub async fn generate_season(
        &self,
        season_id: SeasonId,
        teams: &[TeamId],
        two_legged: bool,
    ) -> Result<GeneratedSeason> {
        let existing = self.stores.rounds.by_season(season_id).await?;
        if !existing.is_empty() {
            return Err(EngineError::validation(
                "fixtures already exist for this season",
            ));
        }

        let generated = round_robin(season_id, teams, two_legged)?;
        for round in &generated.rounds {
            self.stores.rounds.upsert(round).await?;
        }
        self.stores.fixtures.insert_batch(&generated.fixtures).await?;

        info!(
            %season_id,
            rounds = generated.rounds.len(),
            fixtures = generated.fixtures.len(),
            "season schedule generated"
        );
        Ok(generated)
    }
}
