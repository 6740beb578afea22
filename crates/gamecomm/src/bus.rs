//! Channel wiring and the typed bus client used by saga steps.

use crate::commands::{CorpCommand, MissionCommand, Responder, WorldCommand};
use crate::error::{CommandError, CommandResult};
use crate::types::{CorporationSummary, Planet, Squad};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::warn;

/// Sending halves of every subsystem intake queue
#[derive(Debug, Clone)]
pub struct GameChannels {
    /// World subsystem intake
    pub world: mpsc::Sender<WorldCommand>,
    /// Corporation subsystem intake
    pub corp: mpsc::Sender<CorpCommand>,
    /// Mission scheduler intake
    pub mission: mpsc::Sender<MissionCommand>,
}

/// Receiving halves, handed to the subsystems that serve them
#[derive(Debug)]
pub struct GameReceivers {
    /// World subsystem intake
    pub world: mpsc::Receiver<WorldCommand>,
    /// Corporation subsystem intake
    pub corp: mpsc::Receiver<CorpCommand>,
    /// Mission scheduler intake
    pub mission: mpsc::Receiver<MissionCommand>,
}

impl GameChannels {
    /// Create all intake queues with the same bounded capacity
    pub fn new(capacity: usize) -> (GameChannels, GameReceivers) {
        let (world_tx, world_rx) = mpsc::channel(capacity);
        let (corp_tx, corp_rx) = mpsc::channel(capacity);
        let (mission_tx, mission_rx) = mpsc::channel(capacity);

        (
            GameChannels {
                world: world_tx,
                corp: corp_tx,
                mission: mission_tx,
            },
            GameReceivers {
                world: world_rx,
                corp: corp_rx,
                mission: mission_rx,
            },
        )
    }
}

/// Typed client over [`GameChannels`].
///
/// Each call creates a private oneshot, enqueues the command and waits for the
/// single reply. The whole exchange, including waiting for queue capacity, is
/// bounded by the configured timeout so a stuck subsystem cannot hold the
/// caller forever.
#[derive(Debug, Clone)]
pub struct CommandBus {
    channels: GameChannels,
    timeout: Duration,
}

impl CommandBus {
    /// Create a client with a per-call deadline
    pub fn new(channels: GameChannels, timeout: Duration) -> Self {
        Self { channels, timeout }
    }

    /// Underlying channels
    pub fn channels(&self) -> &GameChannels {
        &self.channels
    }

    /// Per-call deadline
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn request<C, T>(
        &self,
        queue: &mpsc::Sender<C>,
        command: &'static str,
        build: impl FnOnce(Responder<T>) -> C,
    ) -> CommandResult<T> {
        let (respond_to, response) = oneshot::channel();

        let exchange = async {
            queue
                .send(build(respond_to))
                .await
                .map_err(|_| CommandError::Unavailable(command))?;
            let result: CommandResult<T> = response
                .await
                .map_err(|_| CommandError::NoResponse(command))?;
            result
        };

        match tokio::time::timeout(self.timeout, exchange).await {
            Ok(result) => result,
            Err(_) => {
                let after_ms = self.timeout.as_millis() as u64;
                warn!(command, after_ms, "command bus call timed out");
                Err(CommandError::Timeout { command, after_ms })
            }
        }
    }

    /// Fetch a planet snapshot
    pub async fn get_planet(&self, planet_id: &str) -> CommandResult<Planet> {
        self.request(&self.channels.world, "GetPlanet", |respond_to| {
            WorldCommand::GetPlanet {
                planet_id: planet_id.to_string(),
                respond_to,
            }
        })
        .await
    }

    /// Add stock to a planet, returning the new stock
    pub async fn add_resources_to_planet(
        &self,
        planet_id: &str,
        resource: &str,
        amount: u32,
    ) -> CommandResult<u32> {
        self.request(&self.channels.world, "AddResourcesToPlanet", |respond_to| {
            WorldCommand::AddResourcesToPlanet {
                planet_id: planet_id.to_string(),
                resource: resource.to_string(),
                amount,
                respond_to,
            }
        })
        .await
    }

    /// Take stock from a planet, returning the removed amount
    pub async fn remove_resources_from_planet(
        &self,
        planet_id: &str,
        resource: &str,
        amount: u32,
    ) -> CommandResult<u32> {
        self.request(&self.channels.world, "RemoveResourcesFromPlanet", |respond_to| {
            WorldCommand::RemoveResourcesFromPlanet {
                planet_id: planet_id.to_string(),
                resource: resource.to_string(),
                amount,
                respond_to,
            }
        })
        .await
    }

    /// Fetch a corporation summary
    pub async fn get_corporation(&self, corporation_id: u64) -> CommandResult<CorporationSummary> {
        self.request(&self.channels.corp, "GetCorporation", |respond_to| {
            CorpCommand::GetCorporation {
                corporation_id,
                respond_to,
            }
        })
        .await
    }

    /// Fetch a squad snapshot
    pub async fn get_squad(&self, corporation_id: u64, squad_index: usize) -> CommandResult<Squad> {
        self.request(&self.channels.corp, "GetSquad", |respond_to| {
            CorpCommand::GetSquad {
                corporation_id,
                squad_index,
                respond_to,
            }
        })
        .await
    }

    /// Load cargo, returning the squad's new cargo for the resource
    pub async fn add_resources_to_squad(
        &self,
        corporation_id: u64,
        squad_index: usize,
        resource: &str,
        amount: u32,
    ) -> CommandResult<u32> {
        self.request(&self.channels.corp, "AddResourcesToSquad", |respond_to| {
            CorpCommand::AddResourcesToSquad {
                corporation_id,
                squad_index,
                resource: resource.to_string(),
                amount,
                respond_to,
            }
        })
        .await
    }

    /// Unload part of the cargo, returning what is left
    pub async fn remove_resources_from_squad(
        &self,
        corporation_id: u64,
        squad_index: usize,
        resource: &str,
        amount: u32,
    ) -> CommandResult<u32> {
        self.request(&self.channels.corp, "RemoveResourcesFromSquad", |respond_to| {
            CorpCommand::RemoveResourcesFromSquad {
                corporation_id,
                squad_index,
                resource: resource.to_string(),
                amount,
                respond_to,
            }
        })
        .await
    }

    /// Unload all cargo of a resource, returning the removed amount
    pub async fn remove_all_resources_from_squad(
        &self,
        corporation_id: u64,
        squad_index: usize,
        resource: &str,
    ) -> CommandResult<u32> {
        self.request(&self.channels.corp, "RemoveAllResourcesFromSquad", |respond_to| {
            CorpCommand::RemoveAllResourcesFromSquad {
                corporation_id,
                squad_index,
                resource: resource.to_string(),
                respond_to,
            }
        })
        .await
    }

    /// Store goods in the base, returning the new stored total
    pub async fn add_resources_to_base(
        &self,
        corporation_id: u64,
        resource: &str,
        amount: u32,
    ) -> CommandResult<u32> {
        self.request(&self.channels.corp, "AddResourcesToBase", |respond_to| {
            CorpCommand::AddResourcesToBase {
                corporation_id,
                resource: resource.to_string(),
                amount,
                respond_to,
            }
        })
        .await
    }

    /// Take goods out of the base, returning the removed amount
    pub async fn remove_resources_from_base(
        &self,
        corporation_id: u64,
        resource: &str,
        amount: u32,
    ) -> CommandResult<u32> {
        self.request(&self.channels.corp, "RemoveResourcesFromBase", |respond_to| {
            CorpCommand::RemoveResourcesFromBase {
                corporation_id,
                resource: resource.to_string(),
                amount,
                respond_to,
            }
        })
        .await
    }

    /// Credit the corporation, returning the new balance
    pub async fn add_credits(&self, corporation_id: u64, amount: f64) -> CommandResult<f64> {
        self.request(&self.channels.corp, "AddCredits", |respond_to| {
            CorpCommand::AddCredits {
                corporation_id,
                amount,
                respond_to,
            }
        })
        .await
    }

    /// Debit the corporation, returning the new balance
    pub async fn remove_credits(&self, corporation_id: u64, amount: f64) -> CommandResult<f64> {
        self.request(&self.channels.corp, "RemoveCredits", |respond_to| {
            CorpCommand::RemoveCredits {
                corporation_id,
                amount,
                respond_to,
            }
        })
        .await
    }
}
