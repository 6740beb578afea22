//! Owned snapshots exchanged over the bus.
//!
//! Subsystems never hand out references to their internal state; every
//! response is a copy taken under the subsystem's own lock.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Position on the galaxy plane
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Horizontal position
    pub x: f64,
    /// Vertical position
    pub y: f64,
}

impl Coordinates {
    /// Create coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`
    pub fn distance(&self, other: &Coordinates) -> f64 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }
}

/// Planet snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Planet {
    /// Planet identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Location in the galaxy
    pub location: Coordinates,
    /// Resource stocks by name
    pub resources: HashMap<String, u32>,
    /// Inhabitants
    pub population: u64,
    /// Danger rating used by mission risk
    pub danger_level: u32,
    /// Whether people can live there
    pub is_habitable: bool,
    /// Whether squads may harvest it
    pub is_harvestable: bool,
}

/// Ship snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    /// Ship name
    pub name: String,
    /// Crew capacity
    pub capacity: u32,
    /// Hull points when repaired
    pub max_health: u32,
    /// Current hull points
    pub health: u32,
    /// Cargo hold size
    pub max_cargo: u32,
    /// Distance units per game hour
    pub speed: u32,
}

/// Crew member snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewMember {
    /// Crew identifier
    pub id: u64,
    /// Name
    pub name: String,
    /// Species
    pub species: String,
    /// Skill levels by name
    pub skills: HashMap<String, u32>,
}

/// Squad snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Squad {
    /// Squad identifier
    pub id: u64,
    /// Ship carrying the squad
    pub ship: Ship,
    /// Assigned crew
    pub crew: Vec<CrewMember>,
    /// Goods on board by resource name
    pub cargo: HashMap<String, u32>,
    /// Current position
    pub location: Coordinates,
}

impl Squad {
    /// Cargo held for `resource`, zero if none
    pub fn cargo_of(&self, resource: &str) -> u32 {
        self.cargo.get(resource).copied().unwrap_or(0)
    }
}

/// Corporation summary without nested collections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorporationSummary {
    /// Corporation identifier
    pub id: u64,
    /// Name
    pub name: String,
    /// Standing with the galaxy
    pub reputation: i32,
    /// Credit balance
    pub credits: f64,
    /// Resources stored in the first base
    pub stored_resources: HashMap<String, u32>,
    /// Whether the player controls it
    pub is_player: bool,
}
