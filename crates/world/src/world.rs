use exchange_gamecomm::{CommandError, CommandResult, Planet, WorldCommand};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Planets keyed by id
#[derive(Debug, Default)]
pub struct World {
    planets: RwLock<HashMap<String, Planet>>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_planets(planets: impl IntoIterator<Item = Planet>) -> Self {
        Self {
            planets: RwLock::new(planets.into_iter().map(|p| (p.id.clone(), p)).collect()),
        }
    }

    /// Add or replace a planet
    pub async fn insert(&self, planet: Planet) {
        self.planets.write().await.insert(planet.id.clone(), planet);
    }

    pub async fn len(&self) -> usize {
        self.planets.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.planets.read().await.is_empty()
    }

    /// Snapshot of a planet
    pub async fn planet(&self, planet_id: &str) -> CommandResult<Planet> {
        self.planets
            .read()
            .await
            .get(planet_id)
            .cloned()
            .ok_or_else(|| CommandError::PlanetNotFound(planet_id.to_string()))
    }

    /// Returns the new stock
    pub async fn add_resources(&self, planet_id: &str, resource: &str, amount: u32) -> CommandResult<u32> {
        let mut planets = self.planets.write().await;
        let planet = planets
            .get_mut(planet_id)
            .ok_or_else(|| CommandError::PlanetNotFound(planet_id.to_string()))?;
        let stock = planet.resources.entry(resource.to_string()).or_insert(0);
        *stock = stock.saturating_add(amount);
        Ok(*stock)
    }

    /// Returns the removed amount
    pub async fn remove_resources(
        &self,
        planet_id: &str,
        resource: &str,
        amount: u32,
    ) -> CommandResult<u32> {
        let mut planets = self.planets.write().await;
        let planet = planets
            .get_mut(planet_id)
            .ok_or_else(|| CommandError::PlanetNotFound(planet_id.to_string()))?;
        let available = planet.resources.get(resource).copied().unwrap_or(0);
        if available < amount {
            return Err(CommandError::InsufficientResources {
                resource: resource.to_string(),
                requested: amount,
                available,
            });
        }
        planet.resources.insert(resource.to_string(), available - amount);
        Ok(amount)
    }

    /// Serve one command and send its reply
    pub async fn handle(&self, command: WorldCommand) {
        let name = command.name();
        debug!(command = name, "handling world command");

        let delivered = match command {
            WorldCommand::GetPlanet {
                planet_id,
                respond_to,
            } => respond_to.send(self.planet(&planet_id).await).is_ok(),
            WorldCommand::AddResourcesToPlanet {
                planet_id,
                resource,
                amount,
                respond_to,
            } => respond_to
                .send(self.add_resources(&planet_id, &resource, amount).await)
                .is_ok(),
            WorldCommand::RemoveResourcesFromPlanet {
                planet_id,
                resource,
                amount,
                respond_to,
            } => respond_to
                .send(self.remove_resources(&planet_id, &resource, amount).await)
                .is_ok(),
        };

        if !delivered {
            warn!(command = name, "caller went away before the reply");
        }
    }
}
