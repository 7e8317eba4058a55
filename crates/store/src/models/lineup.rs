use league_core::{Lineup, PlayerId};
use uuid::Uuid;

use super::{datetime_to_timestamp, timestamp_to_datetime};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LineupRow {
    pub fixture_id: String,
    pub team_id: String,
    pub starters: String,
    pub reserves: String,
    pub submitted_at: i64,
}

fn parse_players(json: &str) -> Vec<PlayerId> {
    serde_json::from_str(json).unwrap_or_default()
}

impl LineupRow {
    pub fn into_domain(self) -> Lineup {
        Lineup {
            fixture_id: Uuid::parse_str(&self.fixture_id).unwrap_or_default(),
            team_id: Uuid::parse_str(&self.team_id).unwrap_or_default(),
            starters: parse_players(&self.starters),
            reserves: parse_players(&self.reserves),
            submitted_at: timestamp_to_datetime(self.submitted_at),
        }
    }
}

impl From<&Lineup> for LineupRow {
    fn from(lineup: &Lineup) -> Self {
        Self {
            fixture_id: lineup.fixture_id.to_string(),
            team_id: lineup.team_id.to_string(),
            starters: serde_json::to_string(&lineup.starters).unwrap_or_else(|_| "[]".into()),
            reserves: serde_json::to_string(&lineup.reserves).unwrap_or_else(|_| "[]".into()),
            submitted_at: datetime_to_timestamp(lineup.submitted_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lineup_row_roundtrip() {
        let starters: Vec<PlayerId> = (0..5).map(|_| Uuid::new_v4()).collect();
        let reserves: Vec<PlayerId> = vec![Uuid::new_v4()];
        let lineup = Lineup::new(Uuid::new_v4(), Uuid::new_v4(), starters.clone(), reserves);

        let restored = LineupRow::from(&lineup).into_domain();
        assert_eq!(restored.fixture_id, lineup.fixture_id);
        assert_eq!(restored.starters, starters);
        assert_eq!(restored.reserves.len(), 1);
    }
}
