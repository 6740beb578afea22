//! Starting state for a fresh game.

use exchange_corporation::{Base, Corporation};
use exchange_gamecomm::{Coordinates, CrewMember, Planet, Ship, Squad};
use std::collections::HashMap;

pub const PLAYER_CORPORATION_ID: u64 = 1;

pub fn player_corporation() -> Corporation {
    let home = Coordinates::new(0.0, 0.0);
    Corporation {
        id: PLAYER_CORPORATION_ID,
        name: "Player Corp".to_string(),
        reputation: 0,
        credits: 10_000.0,
        bases: vec![Base {
            id: 1,
            name: "Home Base".to_string(),
            location: home,
            storage_capacity: 100_000,
            stored_resources: HashMap::from([("iron".to_string(), 1_000)]),
        }],
        squads: vec![Squad {
            id: 1,
            ship: Ship {
                name: "Prospector".to_string(),
                capacity: 4,
                max_health: 500,
                health: 500,
                max_cargo: 5_000,
                speed: 12,
            },
            crew: vec![CrewMember {
                id: 1,
                name: "Vega".to_string(),
                species: "Human".to_string(),
                skills: HashMap::from([("piloting".to_string(), 3)]),
            }],
            cargo: HashMap::new(),
            location: home,
        }],
        is_player: true,
    }
}

pub fn planets() -> Vec<Planet> {
    [
        ("kepler-22", "Kepler 22", 120.0, 45.0, 5_000, 3),
        ("tau-ceti-e", "Tau Ceti e", -80.0, 200.0, 12_000, 5),
        ("gliese-667", "Gliese 667", 30.0, -150.0, 800, 1),
    ]
    .into_iter()
    .map(|(id, name, x, y, iron, danger_level)| Planet {
        id: id.to_string(),
        name: name.to_string(),
        location: Coordinates::new(x, y),
        resources: HashMap::from([("iron".to_string(), iron)]),
        population: 0,
        danger_level,
        is_habitable: false,
        is_harvestable: true,
    })
    .collect()
}
