//! Errors returned across the command bus.

use thiserror::Error;

/// Error half of every command response.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    /// Corporation does not exist
    #[error("Corporation not found: {0}")]
    CorporationNotFound(u64),

    /// Squad index is out of range for the corporation
    #[error("Squad {squad_index} not found in corporation {corporation_id}")]
    SquadNotFound {
        /// Owning corporation
        corporation_id: u64,
        /// Requested squad index
        squad_index: usize,
    },

    /// Corporation has no base to store goods in
    #[error("Corporation {0} has no base")]
    NoBase(u64),

    /// Planet does not exist
    #[error("Planet not found: {0}")]
    PlanetNotFound(String),

    /// Not enough of a resource to remove the requested amount
    #[error("Not enough {resource}: requested {requested}, available {available}")]
    InsufficientResources {
        /// Resource name
        resource: String,
        /// Amount asked for
        requested: u32,
        /// Amount actually held
        available: u32,
    },

    /// Not enough credits to remove the requested amount
    #[error("Not enough credits: requested {requested}, available {available}")]
    InsufficientCredits {
        /// Credits asked for
        requested: f64,
        /// Current balance
        available: f64,
    },

    /// Amount is negative or not a number
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Subsystem intake queue is closed
    #[error("Subsystem unavailable for {0}")]
    Unavailable(&'static str),

    /// Responder was dropped without answering
    #[error("No response for {0}")]
    NoResponse(&'static str),

    /// Round-trip exceeded its deadline
    #[error("{command} timed out after {after_ms}ms")]
    Timeout {
        /// Command name
        command: &'static str,
        /// Deadline that elapsed
        after_ms: u64,
    },
}

/// Result type carried by every responder.
pub type CommandResult<T> = Result<T, CommandError>;
