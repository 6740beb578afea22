//! Error types for the mission crate

use crate::event::{EventId, MissionId};
use exchange_gamecomm::{CommandError, MissionType};
use thiserror::Error;

/// Event scheduler errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// No usable event id could be produced
    #[error("Event id generation failed: {0}")]
    IdGeneration(String),

    /// The event is not registered
    #[error("Event not found: {0}")]
    NotFound(EventId),

    /// The scheduler task has stopped
    #[error("Event scheduler is not running")]
    Unavailable,
}

/// Mission errors
#[derive(Debug, Error)]
pub enum MissionError {
    /// The request was rejected before any step was scheduled
    #[error("Invalid mission: {0}")]
    Validation(String),

    /// A saga step could not be scheduled; earlier steps were rolled back
    #[error("Scheduling failed: {0}")]
    Scheduling(#[from] SchedulerError),

    /// No saga exists for this mission type
    #[error("{0} is not supported")]
    Unsupported(MissionType),

    /// Unknown mission
    #[error("Mission not found: {0}")]
    NotFound(MissionId),

    /// A subsystem call made while preparing the mission failed
    #[error(transparent)]
    Command(#[from] CommandError),
}

/// Result type alias for mission operations
pub type Result<T> = std::result::Result<T, MissionError>;
