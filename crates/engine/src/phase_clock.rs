//! Phase computation from round configuration and wall-clock time.
//!
//! Phase is a pure function of the round's deadline configuration and
//! `now`. It is never stored: callers recompute it on every read and at
//! the moment of every write, so crossing a deadline invalidates stale
//! operations without any cancellation signal.

use chrono::{DateTime, Utc};
use league_core::{Phase, Round, RoundStatus, TeamSide};

/// Current phase of a round's fixtures.
///
/// A round without a schedule is permanently in draft, whatever its
/// status claims. A paused round reads as closed (fail safe: read-only).
pub fn current_phase(round: &Round, now: DateTime<Utc>) -> Phase {
    let Some(schedule) = round.schedule.as_ref() else {
        return Phase::Draft;
    };
    match round.status {
        RoundStatus::Scheduled => Phase::Draft,
        RoundStatus::Active => {
            if now < schedule.home_deadline() {
                Phase::HomeFixture
            } else if now < schedule.away_deadline() {
                Phase::FixtureEntry
            } else if now < schedule.result_deadline() {
                Phase::ResultEntry
            } else {
                Phase::Closed
            }
        }
        RoundStatus::Paused | RoundStatus::Completed => Phase::Closed,
    }
}

/// The deadline that ends the given phase, when the round has one.
pub fn phase_deadline(round: &Round, phase: Phase) -> Option<DateTime<Utc>> {
    let schedule = round.schedule.as_ref()?;
    match phase {
        Phase::HomeFixture => Some(schedule.home_deadline()),
        Phase::FixtureEntry => Some(schedule.away_deadline()),
        Phase::ResultEntry => Some(schedule.result_deadline()),
        Phase::Draft | Phase::Closed => None,
    }
}

/// Substitution cutoff for one side of the round's fixtures.
pub fn substitution_deadline(round: &Round, side: TeamSide) -> Option<DateTime<Utc>> {
    round
        .schedule
        .as_ref()
        .map(|schedule| schedule.substitution_deadline(side))
}
