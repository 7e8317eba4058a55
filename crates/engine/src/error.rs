use chrono::{DateTime, Utc};
use league_core::{CoreError, FixtureId, Phase, RoundId, TeamId};
use thiserror::Error;

use crate::ports::StoreError;

#[derive(Error, Debug)]
pub enum EngineError {
    /// Operation attempted outside its valid phase window. Carries the
    /// deadline that was missed when one applies.
    #[error("operation not allowed in {} phase{}", .phase.as_str(), fmt_deadline(.deadline))]
    PhaseViolation {
        phase: Phase,
        deadline: Option<DateTime<Utc>>,
    },

    /// Matchup-creation race lost: a batch already exists for this
    /// fixture. The caller must discard its local draft and reload the
    /// authoritative batch, never retry the same write.
    #[error("matchups already exist for fixture {0}; reload the authoritative batch")]
    AlreadyExists(FixtureId),

    /// Versioned update lost against a concurrent writer; reload and
    /// reapply.
    #[error("matchup batch for fixture {0} was changed concurrently; reload and retry")]
    ConcurrentUpdate(FixtureId),

    /// Structural invariant violated; rejected before any write.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Caller does not hold the required creation/edit rights right now.
    #[error("not authorized: {0}")]
    NotAuthorized(String),

    #[error("fixture not found: {0}")]
    FixtureNotFound(FixtureId),

    #[error("round not found: {0}")]
    RoundNotFound(RoundId),

    #[error("no lineup submitted for team {team} in fixture {fixture}")]
    LineupMissing { fixture: FixtureId, team: TeamId },

    #[error("no matchups exist for fixture {0}")]
    MatchupsMissing(FixtureId),

    #[error("store error: {0}")]
    Store(String),
}

impl EngineError {
    pub fn phase(phase: Phase, deadline: Option<DateTime<Utc>>) -> Self {
        Self::PhaseViolation { phase, deadline }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_authorized(msg: impl Into<String>) -> Self {
        Self::NotAuthorized(msg.into())
    }

    /// Whether the caller should reload authoritative state before any
    /// further attempt.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::AlreadyExists(_) | Self::ConcurrentUpdate(_))
    }
}

fn fmt_deadline(deadline: &Option<DateTime<Utc>>) -> String {
    match deadline {
        Some(at) => format!(" (deadline was {at})"),
        None => String::new(),
    }
}

impl From<CoreError> for EngineError {
    fn from(err: CoreError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AlreadyExists(fixture) => Self::AlreadyExists(fixture),
            StoreError::VersionConflict(fixture) => Self::ConcurrentUpdate(fixture),
            StoreError::NotFound(what) => Self::Store(format!("not found: {what}")),
            StoreError::Backend(msg) => Self::Store(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
