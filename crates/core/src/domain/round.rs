use chrono::{DateTime, Days, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::{RoundId, SeasonId, TeamSide};
use crate::error::CoreError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Leg {
    #[default]
    First,
    Second,
}

impl Leg {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Second => "second",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "first" => Some(Self::First),
            "second" => Some(Self::Second),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoundStatus {
    #[default]
    Scheduled,
    Active,
    Paused,
    Completed,
}

impl RoundStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "scheduled" => Some(Self::Scheduled),
            "active" => Some(Self::Active),
            "paused" => Some(Self::Paused),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// A deadline expressed relative to the round's scheduled date: the time of
/// day applies on `scheduled date + day_offset`, not on the date itself.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayTime {
    pub day_offset: u32,
    pub time: NaiveTime,
}

impl DayTime {
    pub fn new(day_offset: u32, time: NaiveTime) -> Self {
        Self { day_offset, time }
    }
}

/// Deadline configuration for one round.
///
/// All times are wall-clock times in the league's single fixed time zone
/// (`utc_offset_minutes` east of UTC); no ambient local-time dependence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeadlineConfig {
    pub utc_offset_minutes: i32,
    /// Same-day cutoff for the home team's lineup.
    pub home_lineup: NaiveTime,
    /// Same-day cutoff for the away team's lineup (and the late-recovery
    /// window for matchup creation).
    pub away_lineup: NaiveTime,
    /// Substitution cutoffs per side. The home side's is conventionally the
    /// later of the two. Unset means substitutions stay open until the
    /// result-entry deadline.
    pub home_substitution: Option<DayTime>,
    pub away_substitution: Option<DayTime>,
    /// Result-entry cutoff, offset by whole days from the scheduled date.
    pub result_entry: DayTime,
}

impl DeadlineConfig {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.utc_offset_minutes.abs() >= 24 * 60 {
            return Err(CoreError::InvalidDeadlines(format!(
                "utc offset {} minutes out of range",
                self.utc_offset_minutes
            )));
        }
        if self.away_lineup < self.home_lineup {
            return Err(CoreError::InvalidDeadlines(
                "away lineup deadline precedes home lineup deadline".into(),
            ));
        }
        if self.result_entry.day_offset == 0 && self.result_entry.time < self.away_lineup {
            return Err(CoreError::InvalidDeadlines(
                "result entry deadline precedes away lineup deadline".into(),
            ));
        }
        Ok(())
    }
}

/// A round's scheduled date together with its deadline configuration.
/// Rounds without a schedule are permanently in the draft phase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundSchedule {
    pub date: NaiveDate,
    pub deadlines: DeadlineConfig,
}

impl RoundSchedule {
    pub fn new(date: NaiveDate, deadlines: DeadlineConfig) -> Result<Self, CoreError> {
        deadlines.validate()?;
        Ok(Self { date, deadlines })
    }

    fn to_utc(&self, date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
        let local = date.and_time(time);
        (local - Duration::seconds(self.deadlines.utc_offset_minutes as i64 * 60)).and_utc()
    }

    fn offset_date(&self, day_offset: u32) -> NaiveDate {
        self.date
            .checked_add_days(Days::new(day_offset as u64))
            .unwrap_or(self.date)
    }

    pub fn home_deadline(&self) -> DateTime<Utc> {
        self.to_utc(self.date, self.deadlines.home_lineup)
    }

    pub fn away_deadline(&self) -> DateTime<Utc> {
        self.to_utc(self.date, self.deadlines.away_lineup)
    }

    pub fn result_deadline(&self) -> DateTime<Utc> {
        let date = self.offset_date(self.deadlines.result_entry.day_offset);
        self.to_utc(date, self.deadlines.result_entry.time)
    }

    /// Substitution cutoff for one side, falling back to the result-entry
    /// deadline when that side has no explicit cutoff configured.
    pub fn substitution_deadline(&self, side: TeamSide) -> DateTime<Utc> {
        let configured = match side {
            TeamSide::Home => self.deadlines.home_substitution,
            TeamSide::Away => self.deadlines.away_substitution,
        };
        match configured {
            Some(daytime) => self.to_utc(self.offset_date(daytime.day_offset), daytime.time),
            None => self.result_deadline(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    pub id: RoundId,
    pub season_id: SeasonId,
    pub number: u32,
    pub leg: Leg,
    pub status: RoundStatus,
    pub schedule: Option<RoundSchedule>,
}

impl Round {
    pub fn new(season_id: SeasonId, number: u32, leg: Leg) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            season_id,
            number,
            leg,
            status: RoundStatus::default(),
            schedule: None,
        }
    }

    pub fn with_schedule(mut self, schedule: RoundSchedule) -> Self {
        self.schedule = Some(schedule);
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == RoundStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn config() -> DeadlineConfig {
        DeadlineConfig {
            utc_offset_minutes: 0,
            home_lineup: time(18, 0),
            away_lineup: time(20, 0),
            home_substitution: None,
            away_substitution: None,
            result_entry: DayTime::new(2, time(21, 0)),
        }
    }

    #[test]
    fn test_deadline_computation() {
        let schedule =
            RoundSchedule::new(NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(), config()).unwrap();

        assert_eq!(
            schedule.home_deadline(),
            Utc.with_ymd_and_hms(2025, 1, 10, 18, 0, 0).unwrap()
        );
        assert_eq!(
            schedule.away_deadline(),
            Utc.with_ymd_and_hms(2025, 1, 10, 20, 0, 0).unwrap()
        );
        // Day offset applies to the date, then the configured time of day.
        assert_eq!(
            schedule.result_deadline(),
            Utc.with_ymd_and_hms(2025, 1, 12, 21, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_fixed_offset_shifts_deadlines() {
        let mut cfg = config();
        cfg.utc_offset_minutes = 330; // UTC+05:30
        let schedule =
            RoundSchedule::new(NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(), cfg).unwrap();

        // 18:00 at +05:30 is 12:30 UTC.
        assert_eq!(
            schedule.home_deadline(),
            Utc.with_ymd_and_hms(2025, 1, 10, 12, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_substitution_deadline_falls_back_to_result_deadline() {
        let mut cfg = config();
        cfg.away_substitution = Some(DayTime::new(1, time(12, 0)));
        let schedule =
            RoundSchedule::new(NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(), cfg).unwrap();

        assert_eq!(
            schedule.substitution_deadline(TeamSide::Away),
            Utc.with_ymd_and_hms(2025, 1, 11, 12, 0, 0).unwrap()
        );
        assert_eq!(
            schedule.substitution_deadline(TeamSide::Home),
            schedule.result_deadline()
        );
    }

    #[test]
    fn test_rejects_unordered_deadlines() {
        let mut cfg = config();
        cfg.away_lineup = time(17, 0);
        assert!(RoundSchedule::new(NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(), cfg).is_err());

        let mut cfg = config();
        cfg.result_entry = DayTime::new(0, time(19, 0));
        assert!(RoundSchedule::new(NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(), cfg).is_err());
    }

    #[test]
    fn test_round_status_roundtrip() {
        for status in [
            RoundStatus::Scheduled,
            RoundStatus::Active,
            RoundStatus::Paused,
            RoundStatus::Completed,
        ] {
            assert_eq!(RoundStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(RoundStatus::parse("cancelled"), None);
    }

    #[test]
    fn test_round_creation() {
        let round = Round::new(Uuid::new_v4(), 3, Leg::Second);
        assert_eq!(round.number, 3);
        assert_eq!(round.status, RoundStatus::Scheduled);
        assert!(round.schedule.is_none());
    }
}
