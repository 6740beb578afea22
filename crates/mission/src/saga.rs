//! Saga steps and the per-mission-type plans.

use exchange_core::GameDuration;
use exchange_gamecomm::MissionType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single state of a mission saga
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SagaStep {
    /// Squad reached the target planet
    Arriving,
    /// Squad strips the planet of the mission resources
    Harvesting,
    /// Squad unloads its cargo into the home base
    Returning,
    /// Squad loads goods from the base and departs
    Leaving,
    /// Squad sells its cargo to the target planet
    Arrival,
    /// Squad is home again
    BackToBase,
}

/// Harvest run: arrive, harvest two days later, home a day after that
pub const SQUAD_MISSION_PLAN: &[(SagaStep, GameDuration)] = &[
    (SagaStep::Arriving, GameDuration::ZERO),
    (SagaStep::Harvesting, GameDuration::days(2)),
    (SagaStep::Returning, GameDuration::days(3)),
];

/// Sell run: three days out, three days back
pub const TRANSFER_MISSION_PLAN: &[(SagaStep, GameDuration)] = &[
    (SagaStep::Leaving, GameDuration::ZERO),
    (SagaStep::Arrival, GameDuration::days(3)),
    (SagaStep::BackToBase, GameDuration::days(6)),
];

impl SagaStep {
    pub fn name(self) -> &'static str {
        match self {
            SagaStep::Arriving => "Arriving",
            SagaStep::Harvesting => "Harvesting",
            SagaStep::Returning => "Returning",
            SagaStep::Leaving => "Leaving",
            SagaStep::Arrival => "Arrival",
            SagaStep::BackToBase => "BackToBase",
        }
    }

    /// Last step of its saga
    pub fn is_terminal(self) -> bool {
        matches!(self, SagaStep::Returning | SagaStep::BackToBase)
    }
}

impl fmt::Display for SagaStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Steps and their offsets from the mission start, or `None` when the
/// mission type has no saga.
pub fn plan(mission_type: MissionType) -> Option<&'static [(SagaStep, GameDuration)]> {
    match mission_type {
        MissionType::Squad => Some(SQUAD_MISSION_PLAN),
        MissionType::Transfer => Some(TRANSFER_MISSION_PLAN),
        MissionType::Quest => None,
    }
}
