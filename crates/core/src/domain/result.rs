use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{FixtureId, Outcome, PlayerId, RoundId, TeamId, TeamSide};

/// One side's share of a finalized result. Player goals and penalty/fine
/// goals stay separate so downstream statistics never double-count.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SideBreakdown {
    pub player_goals: u32,
    /// Penalty goals credited to this side from the opponent's
    /// substitutions.
    pub substitution_penalties: u32,
    pub fine_goals: u32,
    pub total: u32,
}

impl SideBreakdown {
    pub fn new(player_goals: u32, substitution_penalties: u32, fine_goals: u32) -> Self {
        Self {
            player_goals,
            substitution_penalties,
            fine_goals,
            total: player_goals + substitution_penalties + fine_goals,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PairingLine {
    pub position: u32,
    pub home_player: PlayerId,
    pub away_player: PlayerId,
    pub home_goals: u32,
    pub away_goals: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SubstitutionAudit {
    pub position: u32,
    pub side: TeamSide,
    pub original_player: PlayerId,
    pub replacement_player: PlayerId,
    pub penalty_goals: u32,
}

/// Finalized result event payload published for statistics and standings
/// consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureResult {
    pub fixture_id: FixtureId,
    pub round_id: RoundId,
    pub home_team: TeamId,
    pub away_team: TeamId,
    pub pairings: Vec<PairingLine>,
    pub home: SideBreakdown,
    pub away: SideBreakdown,
    pub outcome: Outcome,
    pub motm: PlayerId,
    pub substitutions: Vec<SubstitutionAudit>,
    pub entered_by: TeamId,
    pub entered_at: DateTime<Utc>,
}

impl FixtureResult {
    pub fn total(&self, side: TeamSide) -> u32 {
        match side {
            TeamSide::Home => self.home.total,
            TeamSide::Away => self.away.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakdown_total() {
        // Scenario from the engine contract: 7 player goals, one opposing
        // substitution penalty of 2, one fine goal.
        let breakdown = SideBreakdown::new(7, 2, 1);
        assert_eq!(breakdown.total, 10);
    }

    #[test]
    fn test_breakdown_serialization_keeps_fields_distinct() {
        let breakdown = SideBreakdown::new(3, 1, 0);
        let json = serde_json::to_string(&breakdown).unwrap();
        assert!(json.contains("player_goals"));
        assert!(json.contains("substitution_penalties"));
        assert!(json.contains("fine_goals"));
    }
}
