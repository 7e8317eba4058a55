//! Event system for the fixture lifecycle engine.
//!
//! This crate provides the broadcast bus and the event vocabulary emitted
//! by the engine. Publication is fire-and-forget: downstream consumers
//! (statistics, standings, fantasy scoring) subscribe and must never be
//! able to fail an engine commit.

mod bus;
mod types;

pub use bus::EventBus;
pub use types::*;
