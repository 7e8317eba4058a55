use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::{FixtureId, PlayerId, TeamId};
use crate::error::CoreError;

/// One team's submission for a fixture: the ordered starters plus reserves.
///
/// A lineup is owned by the submitting team. It becomes visible to the
/// opponent only once a matchup batch referencing it exists; the engine
/// enforces that at the read path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lineup {
    pub fixture_id: FixtureId,
    pub team_id: TeamId,
    pub starters: Vec<PlayerId>,
    pub reserves: Vec<PlayerId>,
    pub submitted_at: DateTime<Utc>,
}

impl Lineup {
    pub fn new(
        fixture_id: FixtureId,
        team_id: TeamId,
        starters: Vec<PlayerId>,
        reserves: Vec<PlayerId>,
    ) -> Self {
        Self {
            fixture_id,
            team_id,
            starters,
            reserves,
            submitted_at: Utc::now(),
        }
    }

    pub fn validate(&self, squad_size: usize) -> Result<(), CoreError> {
        if self.starters.len() != squad_size {
            return Err(CoreError::Validation(format!(
                "lineup must name exactly {} starters, got {}",
                squad_size,
                self.starters.len()
            )));
        }
        let mut seen = HashSet::new();
        for player in self.starters.iter().chain(self.reserves.iter()) {
            if !seen.insert(*player) {
                return Err(CoreError::Validation(format!(
                    "player {player} appears more than once in lineup"
                )));
            }
        }
        Ok(())
    }

    pub fn contains(&self, player: PlayerId) -> bool {
        self.starters.contains(&player) || self.reserves.contains(&player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn players(n: usize) -> Vec<PlayerId> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn test_valid_lineup() {
        let lineup = Lineup::new(Uuid::new_v4(), Uuid::new_v4(), players(5), players(2));
        assert!(lineup.validate(5).is_ok());
    }

    #[test]
    fn test_wrong_starter_count() {
        let lineup = Lineup::new(Uuid::new_v4(), Uuid::new_v4(), players(4), vec![]);
        assert!(lineup.validate(5).is_err());
    }

    #[test]
    fn test_duplicate_player_rejected() {
        let mut starters = players(5);
        let reserves = vec![starters[0]];
        let lineup = Lineup::new(Uuid::new_v4(), Uuid::new_v4(), starters.clone(), reserves);
        assert!(lineup.validate(5).is_err());

        starters[4] = starters[0];
        let lineup = Lineup::new(Uuid::new_v4(), Uuid::new_v4(), starters, vec![]);
        assert!(lineup.validate(5).is_err());
    }

    #[test]
    fn test_contains() {
        let starters = players(5);
        let reserves = players(1);
        let lineup = Lineup::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            starters.clone(),
            reserves.clone(),
        );
        assert!(lineup.contains(starters[2]));
        assert!(lineup.contains(reserves[0]));
        assert!(!lineup.contains(Uuid::new_v4()));
    }
}
