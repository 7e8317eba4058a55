use league_core::{Fixture, FixtureStatus, Outcome};
use uuid::Uuid;

use super::{datetime_to_timestamp, timestamp_to_datetime};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FixtureRow {
    pub id: String,
    pub round_id: String,
    pub match_number: i64,
    pub home_team: String,
    pub away_team: String,
    pub status: String,
    pub home_fine_goals: i64,
    pub away_fine_goals: i64,
    pub motm: Option<String>,
    pub home_score: Option<i64>,
    pub away_score: Option<i64>,
    pub outcome: Option<String>,
    pub result_entered_by: Option<String>,
    pub result_entered_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl FixtureRow {
    pub fn into_domain(self) -> Fixture {
        Fixture {
            id: Uuid::parse_str(&self.id).unwrap_or_default(),
            round_id: Uuid::parse_str(&self.round_id).unwrap_or_default(),
            match_number: self.match_number as u32,
            home_team: Uuid::parse_str(&self.home_team).unwrap_or_default(),
            away_team: Uuid::parse_str(&self.away_team).unwrap_or_default(),
            status: FixtureStatus::parse(&self.status).unwrap_or_default(),
            home_fine_goals: self.home_fine_goals as u32,
            away_fine_goals: self.away_fine_goals as u32,
            motm: self
                .motm
                .as_deref()
                .and_then(|s| Uuid::parse_str(s).ok()),
            home_score: self.home_score.map(|v| v as u32),
            away_score: self.away_score.map(|v| v as u32),
            outcome: self.outcome.as_deref().and_then(Outcome::parse),
            result_entered_by: self
                .result_entered_by
                .as_deref()
                .and_then(|s| Uuid::parse_str(s).ok()),
            result_entered_at: self.result_entered_at.map(timestamp_to_datetime),
            created_at: timestamp_to_datetime(self.created_at),
            updated_at: timestamp_to_datetime(self.updated_at),
        }
    }
}

impl From<&Fixture> for FixtureRow {
    fn from(fixture: &Fixture) -> Self {
        Self {
            id: fixture.id.to_string(),
            round_id: fixture.round_id.to_string(),
            match_number: fixture.match_number as i64,
            home_team: fixture.home_team.to_string(),
            away_team: fixture.away_team.to_string(),
            status: fixture.status.as_str().to_string(),
            home_fine_goals: fixture.home_fine_goals as i64,
            away_fine_goals: fixture.away_fine_goals as i64,
            motm: fixture.motm.map(|id| id.to_string()),
            home_score: fixture.home_score.map(|v| v as i64),
            away_score: fixture.away_score.map(|v| v as i64),
            outcome: fixture.outcome.map(|o| o.as_str().to_string()),
            result_entered_by: fixture.result_entered_by.map(|id| id.to_string()),
            result_entered_at: fixture.result_entered_at.map(datetime_to_timestamp),
            created_at: datetime_to_timestamp(fixture.created_at),
            updated_at: datetime_to_timestamp(fixture.updated_at),
        }
    }
}
