use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::{FixtureId, PlayerId, TeamId, TeamSide};
use crate::error::CoreError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PairingScore {
    pub home_goals: u32,
    pub away_goals: u32,
}

/// Audit record for one side of a pairing.
///
/// `original_player` is captured on the first substitution of that side and
/// never overwritten; later substitutions replace the current player and the
/// penalty, not the original identity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubstitutionRecord {
    pub original_player: PlayerId,
    pub penalty_goals: u32,
    pub substituted_at: DateTime<Utc>,
}

/// One player-vs-player pairing within a fixture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Matchup {
    pub position: u32,
    pub home_player: PlayerId,
    pub away_player: PlayerId,
    /// Informational only; no constraint ties scores to it.
    pub duration_minutes: u32,
    pub score: Option<PairingScore>,
    pub home_substitution: Option<SubstitutionRecord>,
    pub away_substitution: Option<SubstitutionRecord>,
}

impl Matchup {
    pub fn new(
        position: u32,
        home_player: PlayerId,
        away_player: PlayerId,
        duration_minutes: u32,
    ) -> Self {
        Self {
            position,
            home_player,
            away_player,
            duration_minutes,
            score: None,
            home_substitution: None,
            away_substitution: None,
        }
    }

    pub fn player_on(&self, side: TeamSide) -> PlayerId {
        match side {
            TeamSide::Home => self.home_player,
            TeamSide::Away => self.away_player,
        }
    }

    pub fn substitution_on(&self, side: TeamSide) -> Option<&SubstitutionRecord> {
        match side {
            TeamSide::Home => self.home_substitution.as_ref(),
            TeamSide::Away => self.away_substitution.as_ref(),
        }
    }

    /// Replace the player on `side`, keeping the first substitution's
    /// original-player record intact across repeated substitutions.
    pub fn record_substitution(
        &mut self,
        side: TeamSide,
        replacement: PlayerId,
        penalty_goals: u32,
        now: DateTime<Utc>,
    ) {
        let current = self.player_on(side);
        let slot = match side {
            TeamSide::Home => &mut self.home_substitution,
            TeamSide::Away => &mut self.away_substitution,
        };
        match slot {
            Some(record) => {
                record.penalty_goals = penalty_goals;
                record.substituted_at = now;
            }
            None => {
                *slot = Some(SubstitutionRecord {
                    original_player: current,
                    penalty_goals,
                    substituted_at: now,
                });
            }
        }
        match side {
            TeamSide::Home => self.home_player = replacement,
            TeamSide::Away => self.away_player = replacement,
        }
    }
}

/// The full pairing batch for a fixture, created atomically and versioned
/// for compare-and-swap updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchupSet {
    pub fixture_id: FixtureId,
    /// Stamped at creation; edit rights key off this, never off pairing
    /// contents.
    pub created_by: TeamId,
    pub version: u64,
    pub pairings: Vec<Matchup>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MatchupSet {
    pub fn new(fixture_id: FixtureId, created_by: TeamId, pairings: Vec<Matchup>) -> Self {
        let now = Utc::now();
        Self {
            fixture_id,
            created_by,
            version: 1,
            pairings,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn get(&self, position: u32) -> Option<&Matchup> {
        self.pairings.iter().find(|m| m.position == position)
    }

    pub fn get_mut(&mut self, position: u32) -> Option<&mut Matchup> {
        self.pairings.iter_mut().find(|m| m.position == position)
    }

    /// First away player assigned to more than one pairing, if any.
    pub fn duplicate_away_player(&self) -> Option<PlayerId> {
        let mut seen = HashSet::new();
        self.pairings
            .iter()
            .find(|m| !seen.insert(m.away_player))
            .map(|m| m.away_player)
    }

    /// Whether `player` currently plays in any pairing, on either side.
    pub fn contains_player(&self, player: PlayerId) -> bool {
        self.pairings
            .iter()
            .any(|m| m.home_player == player || m.away_player == player)
    }

    pub fn all_scored(&self) -> bool {
        !self.pairings.is_empty() && self.pairings.iter().all(|m| m.score.is_some())
    }

    /// Sum of entered goals for one side across all pairings.
    pub fn player_goals(&self, side: TeamSide) -> u32 {
        self.pairings
            .iter()
            .filter_map(|m| m.score)
            .map(|s| match side {
                TeamSide::Home => s.home_goals,
                TeamSide::Away => s.away_goals,
            })
            .sum()
    }

    /// Penalty goals recorded on `side`'s substitutions. These are awarded
    /// to the opposing team's total.
    pub fn substitution_penalties(&self, side: TeamSide) -> u32 {
        self.pairings
            .iter()
            .filter_map(|m| m.substitution_on(side))
            .map(|r| r.penalty_goals)
            .sum()
    }

    /// Exchange the away-player assignments of two positions.
    pub fn swap_away_players(&mut self, pos_a: u32, pos_b: u32) -> Result<(), CoreError> {
        if pos_a == pos_b {
            return Err(CoreError::Validation(
                "cannot swap a pairing with itself".into(),
            ));
        }
        let a = self
            .get(pos_a)
            .ok_or(CoreError::PositionNotFound(pos_a))?
            .away_player;
        let b = self
            .get(pos_b)
            .ok_or(CoreError::PositionNotFound(pos_b))?
            .away_player;
        if let Some(m) = self.get_mut(pos_a) {
            m.away_player = b;
        }
        if let Some(m) = self.get_mut(pos_b) {
            m.away_player = a;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn set_of(n: u32) -> MatchupSet {
        let pairings = (1..=n)
            .map(|pos| Matchup::new(pos, Uuid::new_v4(), Uuid::new_v4(), 6))
            .collect();
        MatchupSet::new(Uuid::new_v4(), Uuid::new_v4(), pairings)
    }

    #[test]
    fn test_new_set_starts_at_version_one() {
        let set = set_of(5);
        assert_eq!(set.version, 1);
        assert_eq!(set.pairings.len(), 5);
        assert!(set.duplicate_away_player().is_none());
    }

    #[test]
    fn test_duplicate_away_player_detected() {
        let mut set = set_of(3);
        let dup = set.pairings[0].away_player;
        set.pairings[2].away_player = dup;
        assert_eq!(set.duplicate_away_player(), Some(dup));
    }

    #[test]
    fn test_swap_away_players() {
        let mut set = set_of(3);
        let first = set.get(1).unwrap().away_player;
        let third = set.get(3).unwrap().away_player;

        set.swap_away_players(1, 3).unwrap();
        assert_eq!(set.get(1).unwrap().away_player, third);
        assert_eq!(set.get(3).unwrap().away_player, first);
        assert!(set.duplicate_away_player().is_none());

        assert!(set.swap_away_players(1, 1).is_err());
        assert!(set.swap_away_players(1, 9).is_err());
    }

    #[test]
    fn test_substitution_preserves_first_original() {
        let mut set = set_of(1);
        let original = set.get(1).unwrap().away_player;
        let second = Uuid::new_v4();
        let third = Uuid::new_v4();
        let now = Utc::now();

        set.get_mut(1)
            .unwrap()
            .record_substitution(TeamSide::Away, second, 2, now);
        set.get_mut(1)
            .unwrap()
            .record_substitution(TeamSide::Away, third, 3, now);

        let pairing = set.get(1).unwrap();
        assert_eq!(pairing.away_player, third);
        let record = pairing.substitution_on(TeamSide::Away).unwrap();
        // The audit trail keeps the first original, not the intermediate.
        assert_eq!(record.original_player, original);
        assert_eq!(record.penalty_goals, 3);
    }

    #[test]
    fn test_goal_and_penalty_sums() {
        let mut set = set_of(3);
        set.get_mut(1).unwrap().score = Some(PairingScore {
            home_goals: 2,
            away_goals: 1,
        });
        set.get_mut(2).unwrap().score = Some(PairingScore {
            home_goals: 0,
            away_goals: 4,
        });
        assert!(!set.all_scored());
        set.get_mut(3).unwrap().score = Some(PairingScore {
            home_goals: 1,
            away_goals: 0,
        });
        assert!(set.all_scored());

        assert_eq!(set.player_goals(TeamSide::Home), 3);
        assert_eq!(set.player_goals(TeamSide::Away), 5);

        let sub = Uuid::new_v4();
        set.get_mut(2)
            .unwrap()
            .record_substitution(TeamSide::Away, sub, 2, Utc::now());
        assert_eq!(set.substitution_penalties(TeamSide::Away), 2);
        assert_eq!(set.substitution_penalties(TeamSide::Home), 0);
    }
}
