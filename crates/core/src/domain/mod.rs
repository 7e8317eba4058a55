mod fixture;
mod lineup;
mod matchup;
mod phase;
mod result;
mod round;

pub use fixture::{Fixture, FixtureStatus, Outcome, TeamSide};
pub use lineup::Lineup;
pub use matchup::{Matchup, MatchupSet, PairingScore, SubstitutionRecord};
pub use phase::Phase;
pub use result::{FixtureResult, PairingLine, SideBreakdown, SubstitutionAudit};
pub use round::{DayTime, DeadlineConfig, Leg, Round, RoundSchedule, RoundStatus};

use uuid::Uuid;

pub type SeasonId = Uuid;
pub type RoundId = Uuid;
pub type FixtureId = Uuid;
pub type TeamId = Uuid;
pub type PlayerId = Uuid;
