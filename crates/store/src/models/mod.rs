mod fixture;
mod lineup;
mod matchup_set;
mod round;

pub use fixture::FixtureRow;
pub use lineup::LineupRow;
pub use matchup_set::MatchupSetRow;
pub use round::RoundRow;

use chrono::{DateTime, TimeZone, Utc};

pub(crate) fn timestamp_to_datetime(ts: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(ts, 0).unwrap()
}

pub(crate) fn datetime_to_timestamp(dt: DateTime<Utc>) -> i64 {
    dt.timestamp()
}
