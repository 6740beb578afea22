//! Command definitions for every subsystem intake queue.

use crate::error::{CommandError, CommandResult};
use crate::types::{CorporationSummary, Planet, Squad};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

/// Single-use reply channel carried by every command.
pub type Responder<T> = oneshot::Sender<CommandResult<T>>;

/// Commands served by the world subsystem
#[derive(Debug)]
pub enum WorldCommand {
    /// Snapshot of a planet
    GetPlanet {
        /// Planet identifier
        planet_id: String,
        /// Reply channel
        respond_to: Responder<Planet>,
    },
    /// Add stock to a planet; replies with the new stock
    AddResourcesToPlanet {
        /// Planet identifier
        planet_id: String,
        /// Resource name
        resource: String,
        /// Units to add
        amount: u32,
        /// Reply channel
        respond_to: Responder<u32>,
    },
    /// Take stock from a planet; replies with the removed amount
    RemoveResourcesFromPlanet {
        /// Planet identifier
        planet_id: String,
        /// Resource name
        resource: String,
        /// Units to remove
        amount: u32,
        /// Reply channel
        respond_to: Responder<u32>,
    },
}

impl WorldCommand {
    /// Command name for logs and errors
    pub fn name(&self) -> &'static str {
        match self {
            WorldCommand::GetPlanet { .. } => "GetPlanet",
            WorldCommand::AddResourcesToPlanet { .. } => "AddResourcesToPlanet",
            WorldCommand::RemoveResourcesFromPlanet { .. } => "RemoveResourcesFromPlanet",
        }
    }
}

/// Commands served by the corporation subsystem
#[derive(Debug)]
pub enum CorpCommand {
    /// Summary of a corporation
    GetCorporation {
        /// Corporation identifier
        corporation_id: u64,
        /// Reply channel
        respond_to: Responder<CorporationSummary>,
    },
    /// Snapshot of one squad
    GetSquad {
        /// Corporation identifier
        corporation_id: u64,
        /// Squad index within the corporation
        squad_index: usize,
        /// Reply channel
        respond_to: Responder<Squad>,
    },
    /// Load cargo; replies with the squad's new cargo for the resource
    AddResourcesToSquad {
        /// Corporation identifier
        corporation_id: u64,
        /// Squad index within the corporation
        squad_index: usize,
        /// Resource name
        resource: String,
        /// Units to add
        amount: u32,
        /// Reply channel
        respond_to: Responder<u32>,
    },
    /// Unload part of the cargo; replies with the remaining cargo
    RemoveResourcesFromSquad {
        /// Corporation identifier
        corporation_id: u64,
        /// Squad index within the corporation
        squad_index: usize,
        /// Resource name
        resource: String,
        /// Units to remove
        amount: u32,
        /// Reply channel
        respond_to: Responder<u32>,
    },
    /// Unload all cargo of a resource; replies with the removed amount
    RemoveAllResourcesFromSquad {
        /// Corporation identifier
        corporation_id: u64,
        /// Squad index within the corporation
        squad_index: usize,
        /// Resource name
        resource: String,
        /// Reply channel
        respond_to: Responder<u32>,
    },
    /// Store goods in the base; replies with the new stored total
    AddResourcesToBase {
        /// Corporation identifier
        corporation_id: u64,
        /// Resource name
        resource: String,
        /// Units to add
        amount: u32,
        /// Reply channel
        respond_to: Responder<u32>,
    },
    /// Take goods out of the base; replies with the removed amount
    RemoveResourcesFromBase {
        /// Corporation identifier
        corporation_id: u64,
        /// Resource name
        resource: String,
        /// Units to remove
        amount: u32,
        /// Reply channel
        respond_to: Responder<u32>,
    },
    /// Credit the corporation; replies with the new balance
    AddCredits {
        /// Corporation identifier
        corporation_id: u64,
        /// Credits to add
        amount: f64,
        /// Reply channel
        respond_to: Responder<f64>,
    },
    /// Debit the corporation; replies with the new balance
    RemoveCredits {
        /// Corporation identifier
        corporation_id: u64,
        /// Credits to remove
        amount: f64,
        /// Reply channel
        respond_to: Responder<f64>,
    },
}

impl CorpCommand {
    /// Command name for logs and errors
    pub fn name(&self) -> &'static str {
        match self {
            CorpCommand::GetCorporation { .. } => "GetCorporation",
            CorpCommand::GetSquad { .. } => "GetSquad",
            CorpCommand::AddResourcesToSquad { .. } => "AddResourcesToSquad",
            CorpCommand::RemoveResourcesFromSquad { .. } => "RemoveResourcesFromSquad",
            CorpCommand::RemoveAllResourcesFromSquad { .. } => "RemoveAllResourcesFromSquad",
            CorpCommand::AddResourcesToBase { .. } => "AddResourcesToBase",
            CorpCommand::RemoveResourcesFromBase { .. } => "RemoveResourcesFromBase",
            CorpCommand::AddCredits { .. } => "AddCredits",
            CorpCommand::RemoveCredits { .. } => "RemoveCredits",
        }
    }
}

/// Kind of mission a request asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MissionType {
    /// Fly to a planet, harvest, bring the goods home
    Squad,
    /// Carry goods from the base to a planet and sell them
    Transfer,
    /// Story quest
    Quest,
}

impl fmt::Display for MissionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MissionType::Squad => "SquadMission",
            MissionType::Transfer => "TransferMission",
            MissionType::Quest => "QuestMission",
        };
        f.write_str(name)
    }
}

/// A subsystem failure reported by a saga step that chose to continue
#[derive(Debug, Error)]
#[error("{step} step of mission {mission_id} failed: {source}")]
pub struct StepError {
    /// Mission the step belongs to
    pub mission_id: String,
    /// Step name
    pub step: &'static str,
    /// Underlying bus error
    #[source]
    pub source: CommandError,
}

/// Request to start a mission, consumed by the mission scheduler
#[derive(Debug, Clone)]
pub struct MissionCommand {
    /// Corporation running the mission
    pub corporation_id: u64,
    /// Squad indices taking part; the first one carries the cargo
    pub squads: Vec<usize>,
    /// Target planet
    pub planet_id: String,
    /// Mission kind
    pub mission_type: MissionType,
    /// Resources involved
    pub resources: Vec<String>,
    /// Units per resource for transfer missions
    pub amount: u32,
    /// Progress and failure text
    pub notifications: mpsc::UnboundedSender<String>,
    /// Structured step failures; rendered onto `notifications` when absent
    pub errors: Option<mpsc::UnboundedSender<StepError>>,
}
