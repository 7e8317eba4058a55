//! Fixture lifecycle and matchup coordination engine.
//!
//! Governs one head-to-head fixture between two teams across a round:
//! the deadline-driven phase machine ([`phase_clock`]), lineup submission
//! windows ([`lineup_gate`]), race-safe pairing creation and editing
//! ([`coordinator`]), substitutions with opponent penalties
//! ([`substitution`]) and result aggregation ([`results`]).
//!
//! Storage is reached through the async ports in [`ports`]; the engine
//! never does read-then-write for contended state — creation goes through
//! an atomic create-if-absent and every edit through a versioned
//! compare-and-swap. Phase is recomputed from wall-clock time at the
//! moment of every write, never cached.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod lineup_gate;
pub mod memory;
pub mod phase_clock;
pub mod ports;
pub mod results;
pub mod rounds;
pub mod schedule;
pub mod substitution;

pub use config::EngineConfig;
pub use coordinator::{EditRights, MatchupCoordinator, PairingAssignment};
pub use error::{EngineError, Result};
pub use lineup_gate::LineupGate;
pub use memory::MemoryStores;
pub use ports::{FixtureStore, LineupStore, MatchupStore, RoundStore, StoreError, Stores};
pub use results::{FineGoals, PairingScoreEntry, ResultAggregator};
pub use rounds::RoundAdmin;
pub use schedule::{GeneratedSeason, SeasonScheduler};
pub use substitution::SubstitutionEngine;
