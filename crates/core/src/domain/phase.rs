use serde::{Deserialize, Serialize};

/// Lifecycle stage of a fixture, derived from round deadlines and status.
///
/// Ordered: a fixture only ever moves forward through these stages as
/// wall-clock time advances.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Default, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Draft,
    HomeFixture,
    FixtureEntry,
    ResultEntry,
    Closed,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::HomeFixture => "home_fixture",
            Self::FixtureEntry => "fixture_entry",
            Self::ResultEntry => "result_entry",
            Self::Closed => "closed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(Self::Draft),
            "home_fixture" => Some(Self::HomeFixture),
            "fixture_entry" => Some(Self::FixtureEntry),
            "result_entry" => Some(Self::ResultEntry),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }

    /// Matchup batches may only be created while lineups are still open.
    pub fn allows_matchup_creation(&self) -> bool {
        matches!(self, Self::HomeFixture | Self::FixtureEntry)
    }

    pub fn allows_result_entry(&self) -> bool {
        matches!(self, Self::ResultEntry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_roundtrip() {
        for phase in [
            Phase::Draft,
            Phase::HomeFixture,
            Phase::FixtureEntry,
            Phase::ResultEntry,
            Phase::Closed,
        ] {
            assert_eq!(Phase::parse(phase.as_str()), Some(phase));
        }
        assert_eq!(Phase::parse("unknown"), None);
    }

    #[test]
    fn test_phase_ordering() {
        assert!(Phase::Draft < Phase::HomeFixture);
        assert!(Phase::HomeFixture < Phase::FixtureEntry);
        assert!(Phase::FixtureEntry < Phase::ResultEntry);
        assert!(Phase::ResultEntry < Phase::Closed);
    }

    #[test]
    fn test_phase_serialization() {
        let json = serde_json::to_string(&Phase::HomeFixture).unwrap();
        assert_eq!(json, "\"home_fixture\"");
    }
}
