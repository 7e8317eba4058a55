use league_core::{Leg, Round, RoundStatus};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RoundRow {
    pub id: String,
    pub season_id: String,
    pub number: i64,
    pub leg: String,
    pub status: String,
    pub schedule: Option<String>,
}

impl RoundRow {
    pub fn into_domain(self) -> Round {
        Round {
            id: Uuid::parse_str(&self.id).unwrap_or_default(),
            season_id: Uuid::parse_str(&self.season_id).unwrap_or_default(),
            number: self.number as u32,
            leg: Leg::parse(&self.leg).unwrap_or_default(),
            status: RoundStatus::parse(&self.status).unwrap_or_default(),
            schedule: self
                .schedule
                .as_deref()
                .and_then(|s| serde_json::from_str(s).ok()),
        }
    }
}

impl From<&Round> for RoundRow {
    fn from(round: &Round) -> Self {
        Self {
            id: round.id.to_string(),
            season_id: round.season_id.to_string(),
            number: round.number as i64,
            leg: round.leg.as_str().to_string(),
            status: round.status.as_str().to_string(),
            schedule: round
                .schedule
                .as_ref()
                .and_then(|s| serde_json::to_string(s).ok()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use league_core::{DayTime, DeadlineConfig, RoundSchedule};

    #[test]
    fn test_round_row_roundtrip() {
        let schedule = RoundSchedule::new(
            NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            DeadlineConfig {
                utc_offset_minutes: 330,
                home_lineup: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
                away_lineup: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
                home_substitution: None,
                away_substitution: Some(DayTime::new(1, NaiveTime::from_hms_opt(9, 0, 0).unwrap())),
                result_entry: DayTime::new(2, NaiveTime::from_hms_opt(0, 30, 0).unwrap()),
            },
        )
        .unwrap();
        let mut round = Round::new(Uuid::new_v4(), 4, Leg::Second).with_schedule(schedule);
        round.status = RoundStatus::Active;

        let restored = RoundRow::from(&round).into_domain();
        assert_eq!(restored.id, round.id);
        assert_eq!(restored.number, 4);
        assert_eq!(restored.leg, Leg::Second);
        assert_eq!(restored.status, RoundStatus::Active);
        assert_eq!(restored.schedule, round.schedule);
    }
}
