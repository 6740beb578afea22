//! Corporation state and the rules for changing it.
//!
//! Base operations act on the corporation's first base; corporations without
//! a base cannot store goods.

use exchange_gamecomm::{CommandError, CommandResult, Coordinates, CorporationSummary, Squad};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A storage and production site owned by a corporation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Base {
    /// Base identifier
    pub id: u64,
    /// Display name
    pub name: String,
    /// Location in the galaxy
    pub location: Coordinates,
    /// Maximum units stored across all resources
    pub storage_capacity: u32,
    /// Stored goods by resource name
    pub stored_resources: HashMap<String, u32>,
}

/// A trading corporation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Corporation {
    /// Corporation identifier
    pub id: u64,
    /// Display name
    pub name: String,
    /// Standing with the galaxy
    pub reputation: i32,
    /// Credit balance
    pub credits: f64,
    /// Owned bases; the first one is the home base
    pub bases: Vec<Base>,
    /// Squads, addressed by index
    pub squads: Vec<Squad>,
    /// Whether the player controls it
    pub is_player: bool,
}

fn validate_credits(amount: f64) -> CommandResult<f64> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(amount)
    } else {
        Err(CommandError::InvalidAmount(amount.to_string()))
    }
}

impl Corporation {
    /// Summary sent across the bus
    pub fn summary(&self) -> CorporationSummary {
        CorporationSummary {
            id: self.id,
            name: self.name.clone(),
            reputation: self.reputation,
            credits: self.credits,
            stored_resources: self
                .bases
                .first()
                .map(|b| b.stored_resources.clone())
                .unwrap_or_default(),
            is_player: self.is_player,
        }
    }

    fn squad_mut(&mut self, squad_index: usize) -> CommandResult<&mut Squad> {
        let corporation_id = self.id;
        self.squads
            .get_mut(squad_index)
            .ok_or(CommandError::SquadNotFound {
                corporation_id,
                squad_index,
            })
    }

    fn home_base_mut(&mut self) -> CommandResult<&mut Base> {
        let corporation_id = self.id;
        self.bases
            .first_mut()
            .ok_or(CommandError::NoBase(corporation_id))
    }

    /// Copy of one squad
    pub fn squad(&self, squad_index: usize) -> CommandResult<Squad> {
        self.squads
            .get(squad_index)
            .cloned()
            .ok_or(CommandError::SquadNotFound {
                corporation_id: self.id,
                squad_index,
            })
    }

    /// Load cargo, returning the new cargo for the resource
    pub fn add_resources_to_squad(
        &mut self,
        squad_index: usize,
        resource: &str,
        amount: u32,
    ) -> CommandResult<u32> {
        let squad = self.squad_mut(squad_index)?;
        let cargo = squad.cargo.entry(resource.to_string()).or_insert(0);
        *cargo = cargo.saturating_add(amount);
        Ok(*cargo)
    }

    /// Unload `amount` of cargo, returning what is left
    pub fn remove_resources_from_squad(
        &mut self,
        squad_index: usize,
        resource: &str,
        amount: u32,
    ) -> CommandResult<u32> {
        let squad = self.squad_mut(squad_index)?;
        let available = squad.cargo_of(resource);
        if available < amount {
            return Err(CommandError::InsufficientResources {
                resource: resource.to_string(),
                requested: amount,
                available,
            });
        }
        let left = available - amount;
        squad.cargo.insert(resource.to_string(), left);
        Ok(left)
    }

    /// Unload all cargo of a resource, returning the removed amount
    pub fn remove_all_resources_from_squad(
        &mut self,
        squad_index: usize,
        resource: &str,
    ) -> CommandResult<u32> {
        let squad = self.squad_mut(squad_index)?;
        Ok(squad.cargo.insert(resource.to_string(), 0).unwrap_or(0))
    }

    /// Store goods in the home base, returning the new stored total
    pub fn add_resources_to_base(&mut self, resource: &str, amount: u32) -> CommandResult<u32> {
        let base = self.home_base_mut()?;
        let stored = base.stored_resources.entry(resource.to_string()).or_insert(0);
        *stored = stored.saturating_add(amount);
        Ok(*stored)
    }

    /// Take goods out of the home base, returning the removed amount
    pub fn remove_resources_from_base(&mut self, resource: &str, amount: u32) -> CommandResult<u32> {
        let base = self.home_base_mut()?;
        let available = base.stored_resources.get(resource).copied().unwrap_or(0);
        if available < amount {
            return Err(CommandError::InsufficientResources {
                resource: resource.to_string(),
                requested: amount,
                available,
            });
        }
        base.stored_resources
            .insert(resource.to_string(), available - amount);
        Ok(amount)
    }

    /// Returns the new balance
    pub fn add_credits(&mut self, amount: f64) -> CommandResult<f64> {
        self.credits += validate_credits(amount)?;
        Ok(self.credits)
    }

    /// Returns the new balance
    pub fn remove_credits(&mut self, amount: f64) -> CommandResult<f64> {
        let amount = validate_credits(amount)?;
        if amount > self.credits {
            return Err(CommandError::InsufficientCredits {
                requested: amount,
                available: self.credits,
            });
        }
        self.credits -= amount;
        Ok(self.credits)
    }
}
