//! Game communication contract
//!
//! Every subsystem (world, corporations, missions) is reached through one
//! intake queue of typed commands. Each command carries a single-use
//! `oneshot` responder typed to its result, so a response is delivered
//! exactly once and the channel is closed by the responder dropping it.
//!
//! # Architecture
//!
//! - [`commands`]: the command enums and the mission intake request
//! - [`types`]: owned snapshots returned across the bus
//! - [`bus`]: [`GameChannels`] wiring and the [`CommandBus`] client, which
//!   bounds every round-trip with a deadline
//! - [`error`]: [`CommandError`], the error half of every response

#![warn(missing_docs)]

pub mod bus;
pub mod commands;
pub mod error;
pub mod types;

pub use bus::{CommandBus, GameChannels, GameReceivers};
pub use commands::{
    CorpCommand, MissionCommand, MissionType, Responder, StepError, WorldCommand,
};
pub use error::{CommandError, CommandResult};
pub use types::{Coordinates, CorporationSummary, CrewMember, Planet, Ship, Squad};
