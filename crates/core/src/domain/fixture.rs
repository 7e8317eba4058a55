use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{FixtureId, PlayerId, RoundId, TeamId};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    Home,
    Away,
}

impl TeamSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Away => "away",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "home" => Some(Self::Home),
            "away" => Some(Self::Away),
            _ => None,
        }
    }

    pub fn opponent(&self) -> Self {
        match self {
            Self::Home => Self::Away,
            Self::Away => Self::Home,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FixtureStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
    Postponed,
    Cancelled,
}

impl FixtureStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Postponed => "postponed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "scheduled" => Some(Self::Scheduled),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "postponed" => Some(Self::Postponed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    HomeWin,
    AwayWin,
    Draw,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HomeWin => "home_win",
            Self::AwayWin => "away_win",
            Self::Draw => "draw",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "home_win" => Some(Self::HomeWin),
            "away_win" => Some(Self::AwayWin),
            "draw" => Some(Self::Draw),
            _ => None,
        }
    }

    /// Outcome by strict comparison of team totals; equal totals draw.
    pub fn from_totals(home: u32, away: u32) -> Self {
        match home.cmp(&away) {
            std::cmp::Ordering::Greater => Self::HomeWin,
            std::cmp::Ordering::Less => Self::AwayWin,
            std::cmp::Ordering::Equal => Self::Draw,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fixture {
    pub id: FixtureId,
    pub round_id: RoundId,
    pub match_number: u32,
    pub home_team: TeamId,
    pub away_team: TeamId,
    pub status: FixtureStatus,
    pub home_fine_goals: u32,
    pub away_fine_goals: u32,
    pub motm: Option<PlayerId>,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub outcome: Option<Outcome>,
    pub result_entered_by: Option<TeamId>,
    pub result_entered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Fixture {
    pub fn new(round_id: RoundId, match_number: u32, home_team: TeamId, away_team: TeamId) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            round_id,
            match_number,
            home_team,
            away_team,
            status: FixtureStatus::default(),
            home_fine_goals: 0,
            away_fine_goals: 0,
            motm: None,
            home_score: None,
            away_score: None,
            outcome: None,
            result_entered_by: None,
            result_entered_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn side_of(&self, team: TeamId) -> Option<TeamSide> {
        if team == self.home_team {
            Some(TeamSide::Home)
        } else if team == self.away_team {
            Some(TeamSide::Away)
        } else {
            None
        }
    }

    pub fn team_on(&self, side: TeamSide) -> TeamId {
        match side {
            TeamSide::Home => self.home_team,
            TeamSide::Away => self.away_team,
        }
    }

    pub fn fine_goals(&self, side: TeamSide) -> u32 {
        match side {
            TeamSide::Home => self.home_fine_goals,
            TeamSide::Away => self.away_fine_goals,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == FixtureStatus::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_of() {
        let home = Uuid::new_v4();
        let away = Uuid::new_v4();
        let fixture = Fixture::new(Uuid::new_v4(), 1, home, away);

        assert_eq!(fixture.side_of(home), Some(TeamSide::Home));
        assert_eq!(fixture.side_of(away), Some(TeamSide::Away));
        assert_eq!(fixture.side_of(Uuid::new_v4()), None);
        assert_eq!(fixture.team_on(TeamSide::Away), away);
    }

    #[test]
    fn test_outcome_from_totals() {
        assert_eq!(Outcome::from_totals(3, 1), Outcome::HomeWin);
        assert_eq!(Outcome::from_totals(0, 2), Outcome::AwayWin);
        assert_eq!(Outcome::from_totals(2, 2), Outcome::Draw);
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [
            FixtureStatus::Scheduled,
            FixtureStatus::InProgress,
            FixtureStatus::Completed,
            FixtureStatus::Postponed,
            FixtureStatus::Cancelled,
        ] {
            assert_eq!(FixtureStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_side_serialization() {
        assert_eq!(serde_json::to_string(&TeamSide::Home).unwrap(), "\"home\"");
        assert_eq!(
            serde_json::to_string(&Outcome::AwayWin).unwrap(),
            "\"away_win\""
        );
    }
}
