use league_core::{Matchup, MatchupSet};
use uuid::Uuid;

use super::{datetime_to_timestamp, timestamp_to_datetime};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MatchupSetRow {
    pub fixture_id: String,
    pub created_by: String,
    pub version: i64,
    pub pairings: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl MatchupSetRow {
    pub fn into_domain(self) -> MatchupSet {
        let pairings: Vec<Matchup> = serde_json::from_str(&self.pairings).unwrap_or_default();
        MatchupSet {
            fixture_id: Uuid::parse_str(&self.fixture_id).unwrap_or_default(),
            created_by: Uuid::parse_str(&self.created_by).unwrap_or_default(),
            version: self.version as u64,
            pairings,
            created_at: timestamp_to_datetime(self.created_at),
            updated_at: timestamp_to_datetime(self.updated_at),
        }
    }
}

impl From<&MatchupSet> for MatchupSetRow {
    fn from(set: &MatchupSet) -> Self {
        Self {
            fixture_id: set.fixture_id.to_string(),
            created_by: set.created_by.to_string(),
            version: set.version as i64,
            pairings: serde_json::to_string(&set.pairings).unwrap_or_else(|_| "[]".into()),
            created_at: datetime_to_timestamp(set.created_at),
            updated_at: datetime_to_timestamp(set.updated_at),
        }
    }
}
