//! Domain model for the fixture lifecycle and matchup coordination engine.
//!
//! Pure types only: rounds and their deadline configuration, fixtures,
//! lineups, matchup batches and finalized results. No I/O lives here.

pub mod domain;
pub mod error;

pub use domain::*;
pub use error::CoreError;
