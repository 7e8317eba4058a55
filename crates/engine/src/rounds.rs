//! Administrative round lifecycle.
//!
//! Rounds move scheduled → active → (paused ⇄ active) → completed. At
//! most one round per season may be active at a time; activation against
//! a season with another running round is rejected.

use events::{Event, EventBus, EventEnvelope};
use league_core::{Round, RoundId, RoundSchedule, RoundStatus};
use tracing::info;

use crate::error::{EngineError, Result};
use crate::ports::Stores;

#[derive(Clone)]
pub struct RoundAdmin {
    stores: Stores,
    bus: EventBus,
}

impl RoundAdmin {
    pub fn new(stores: Stores, bus: EventBus) -> Self {
        Self { stores, bus }
    }

    pub async fn start_round(&self, round_id: RoundId) -> Result<Round> {
        self.activate(round_id, RoundStatus::Scheduled).await
    }

    pub async fn resume_round(&self, round_id: RoundId) -> Result<Round> {
        self.activate(round_id, RoundStatus::Paused).await
    }

    pub async fn pause_round(&self, round_id: RoundId) -> Result<Round> {
        self.transition(round_id, RoundStatus::Active, RoundStatus::Paused)
            .await
    }

    pub async fn complete_round(&self, round_id: RoundId) -> Result<Round> {
        let round = self.require(round_id).await?;
        match round.status {
            RoundStatus::Active | RoundStatus::Paused => {}
            other => {
                return Err(EngineError::validation(format!(
                    "cannot complete a {} round",
                    other.as_str()
                )))
            }
        }
        self.store_transition(round, RoundStatus::Completed).await
    }

    /// Attach or replace the round's schedule and deadline configuration.
    pub async fn set_schedule(&self, round_id: RoundId, schedule: RoundSchedule) -> Result<Round> {
        let mut round = self.require(round_id).await?;
        if round.status == RoundStatus::Completed {
            return Err(EngineError::validation(
                "cannot reschedule a completed round",
            ));
        }
        round.schedule = Some(schedule);
        self.stores.rounds.upsert(&round).await?;
        Ok(round)
    }

    async fn activate(&self, round_id: RoundId, expected_from: RoundStatus) -> Result<Round> {
        let round = self.require(round_id).await?;
        if round.status != expected_from {
            return Err(EngineError::validation(format!(
                "cannot activate a {} round",
                round.status.as_str()
            )));
        }

        // Only one live round per season.
        let siblings = self.stores.rounds.by_season(round.season_id).await?;
        if let Some(active) = siblings
            .iter()
            .find(|r| r.id != round.id && r.status == RoundStatus::Active)
        {
            return Err(EngineError::validation(format!(
                "round {} ({} leg) is already active",
                active.number,
                active.leg.as_str()
            )));
        }

        self.store_transition(round, RoundStatus::Active).await
    }

    async fn transition(
        &self,
        round_id: RoundId,
        from: RoundStatus,
        to: RoundStatus,
    ) -> Result<Round> {
        let round = self.require(round_id).await?;
        if round.status != from {
            return Err(EngineError::validation(format!(
                "cannot move a {} round to {}",
                round.status.as_str(),
                to.as_str()
            )));
        }
        self.store_transition(round, to).await
    }

    async fn store_transition(&self, mut round: Round, to: RoundStatus) -> Result<Round> {
        let from = round.status;
        round.status = to;
        self.stores.rounds.upsert(&round).await?;
        info!(
            round = %round.id,
            from = from.as_str(),
            to = to.as_str(),
            "round status changed"
        );
        self.bus
            .publish(EventEnvelope::new(Event::RoundStatusChanged {
                round_id: round.id,
                from,
                to,
            }));
        Ok(round)
    }

    async fn require(&self, round_id: RoundId) -> Result<Round> {
        self.stores
            .rounds
            .get(round_id)
            .await?
            .ok_or(EngineError::RoundNotFound(round_id))
    }
}
