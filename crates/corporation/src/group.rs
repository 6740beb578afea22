//! Shared registry of corporations.

use crate::corporation::Corporation;
use exchange_gamecomm::{CommandError, CommandResult, CorpCommand, CorporationSummary, Squad};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// All corporations, keyed by id
#[derive(Debug, Default)]
pub struct CorpGroup {
    corporations: RwLock<HashMap<u64, Corporation>>,
}

impl CorpGroup {
    /// Create an empty group
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a group from an initial roster
    pub fn with_corporations(corporations: impl IntoIterator<Item = Corporation>) -> Self {
        Self {
            corporations: RwLock::new(corporations.into_iter().map(|c| (c.id, c)).collect()),
        }
    }

    /// Add or replace a corporation
    pub async fn insert(&self, corporation: Corporation) {
        self.corporations
            .write()
            .await
            .insert(corporation.id, corporation);
    }

    /// Full copy of a corporation
    pub async fn corporation(&self, corporation_id: u64) -> Option<Corporation> {
        self.corporations.read().await.get(&corporation_id).cloned()
    }

    /// Number of registered corporations
    pub async fn len(&self) -> usize {
        self.corporations.read().await.len()
    }

    /// True when no corporation is registered
    pub async fn is_empty(&self) -> bool {
        self.corporations.read().await.is_empty()
    }

    async fn read<T>(
        &self,
        corporation_id: u64,
        f: impl FnOnce(&Corporation) -> CommandResult<T>,
    ) -> CommandResult<T> {
        let corporations = self.corporations.read().await;
        let corporation = corporations
            .get(&corporation_id)
            .ok_or(CommandError::CorporationNotFound(corporation_id))?;
        f(corporation)
    }

    async fn write<T>(
        &self,
        corporation_id: u64,
        f: impl FnOnce(&mut Corporation) -> CommandResult<T>,
    ) -> CommandResult<T> {
        let mut corporations = self.corporations.write().await;
        let corporation = corporations
            .get_mut(&corporation_id)
            .ok_or(CommandError::CorporationNotFound(corporation_id))?;
        f(corporation)
    }

    /// Corporation summary
    pub async fn summary(&self, corporation_id: u64) -> CommandResult<CorporationSummary> {
        self.read(corporation_id, |c| Ok(c.summary())).await
    }

    /// Squad snapshot
    pub async fn squad(&self, corporation_id: u64, squad_index: usize) -> CommandResult<Squad> {
        self.read(corporation_id, |c| c.squad(squad_index)).await
    }

    /// Serve one command and send its reply
    pub async fn handle(&self, command: CorpCommand) {
        let name = command.name();
        debug!(command = name, "handling corporation command");

        let delivered = match command {
            CorpCommand::GetCorporation {
                corporation_id,
                respond_to,
            } => respond_to
                .send(self.summary(corporation_id).await)
                .is_ok(),
            CorpCommand::GetSquad {
                corporation_id,
                squad_index,
                respond_to,
            } => respond_to
                .send(self.squad(corporation_id, squad_index).await)
                .is_ok(),
            CorpCommand::AddResourcesToSquad {
                corporation_id,
                squad_index,
                resource,
                amount,
                respond_to,
            } => {
                let result = self
                    .write(corporation_id, |c| {
                        c.add_resources_to_squad(squad_index, &resource, amount)
                    })
                    .await;
                respond_to.send(result).is_ok()
            }
            CorpCommand::RemoveResourcesFromSquad {
                corporation_id,
                squad_index,
                resource,
                amount,
                respond_to,
            } => {
                let result = self
                    .write(corporation_id, |c| {
                        c.remove_resources_from_squad(squad_index, &resource, amount)
                    })
                    .await;
                respond_to.send(result).is_ok()
            }
            CorpCommand::RemoveAllResourcesFromSquad {
                corporation_id,
                squad_index,
                resource,
                respond_to,
            } => {
                let result = self
                    .write(corporation_id, |c| {
                        c.remove_all_resources_from_squad(squad_index, &resource)
                    })
                    .await;
                respond_to.send(result).is_ok()
            }
            CorpCommand::AddResourcesToBase {
                corporation_id,
                resource,
                amount,
                respond_to,
            } => {
                let result = self
                    .write(corporation_id, |c| c.add_resources_to_base(&resource, amount))
                    .await;
                respond_to.send(result).is_ok()
            }
            CorpCommand::RemoveResourcesFromBase {
                corporation_id,
                resource,
                amount,
                respond_to,
            } => {
                let result = self
                    .write(corporation_id, |c| {
                        c.remove_resources_from_base(&resource, amount)
                    })
                    .await;
                respond_to.send(result).is_ok()
            }
            CorpCommand::AddCredits {
                corporation_id,
                amount,
                respond_to,
            } => {
                let result = self.write(corporation_id, |c| c.add_credits(amount)).await;
                respond_to.send(result).is_ok()
            }
            CorpCommand::RemoveCredits {
                corporation_id,
                amount,
                respond_to,
            } => {
                let result = self
                    .write(corporation_id, |c| c.remove_credits(amount))
                    .await;
                respond_to.send(result).is_ok()
            }
        };

        if !delivered {
            warn!(command = name, "caller went away before the reply");
        }
    }
}
