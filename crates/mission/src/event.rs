//! Scheduled saga steps.

use crate::saga::SagaStep;
use exchange_core::GameTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier assigned to an event when it is scheduled
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mission identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MissionId(String);

impl MissionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random id
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One saga step registered for execution at a game time.
///
/// Events are owned by the scheduler once scheduled; missions refer to them
/// only by id.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Empty until the scheduler assigns one
    pub id: EventId,
    pub mission_id: MissionId,
    pub scheduled_time: GameTime,
    /// Cancelled events are discarded when they come due
    pub cancelled: bool,
    /// Position in the event heap, `None` when not queued
    pub heap_index: Option<usize>,
    pub step: SagaStep,
}

impl Event {
    pub fn new(mission_id: MissionId, scheduled_time: GameTime, step: SagaStep) -> Self {
        Self {
            id: EventId::default(),
            mission_id,
            scheduled_time,
            cancelled: false,
            heap_index: None,
            step,
        }
    }

    /// An event is due once the clock has moved strictly past its time
    pub fn is_due(&self, now: GameTime) -> bool {
        now.after(self.scheduled_time)
    }
}
