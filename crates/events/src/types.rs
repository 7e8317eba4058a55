//! Event types for the fixture lifecycle engine.

use chrono::{DateTime, Utc};
use league_core::{FixtureId, FixtureResult, RoundId, RoundStatus, TeamId, TeamSide};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Envelope wrapping all events with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique event ID
    pub id: Uuid,
    /// When the event occurred
    pub timestamp: DateTime<Utc>,
    /// The actual event
    pub event: Event,
}

impl EventEnvelope {
    pub fn new(event: Event) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// All events emitted by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Administrative round transition (start/pause/resume/complete)
    #[serde(rename = "round.status_changed")]
    RoundStatusChanged {
        round_id: RoundId,
        from: RoundStatus,
        to: RoundStatus,
    },

    /// A team saved or replaced its lineup; `draft` marks pre-activation
    /// saves that enable no matchup operation
    #[serde(rename = "lineup.submitted")]
    LineupSubmitted {
        fixture_id: FixtureId,
        team_id: TeamId,
        draft: bool,
    },

    /// The pairing batch for a fixture was created (exactly once per
    /// fixture)
    #[serde(rename = "matchups.created")]
    MatchupsCreated {
        fixture_id: FixtureId,
        created_by: TeamId,
    },

    /// An existing batch was discarded by a home-team resubmission
    #[serde(rename = "matchups.discarded")]
    MatchupsDiscarded {
        fixture_id: FixtureId,
        discarded_by: TeamId,
    },

    /// A pairing was edited or two away assignments swapped
    #[serde(rename = "matchups.updated")]
    MatchupsUpdated { fixture_id: FixtureId, version: u64 },

    /// A player was substituted on one side of a pairing
    #[serde(rename = "substitution.recorded")]
    SubstitutionRecorded {
        fixture_id: FixtureId,
        position: u32,
        side: TeamSide,
        penalty_goals: u32,
    },

    /// Results committed and the fixture completed; the payload is the
    /// finalized result consumed by statistics/standings listeners
    #[serde(rename = "fixture.completed")]
    FixtureCompleted { result: Box<FixtureResult> },
}

impl Event {
    /// Extract the fixture ID if this event relates to a fixture.
    pub fn fixture_id(&self) -> Option<FixtureId> {
        match self {
            Self::RoundStatusChanged { .. } => None,
            Self::LineupSubmitted { fixture_id, .. }
            | Self::MatchupsCreated { fixture_id, .. }
            | Self::MatchupsDiscarded { fixture_id, .. }
            | Self::MatchupsUpdated { fixture_id, .. }
            | Self::SubstitutionRecorded { fixture_id, .. } => Some(*fixture_id),
            Self::FixtureCompleted { result } => Some(result.fixture_id),
        }
    }
}
