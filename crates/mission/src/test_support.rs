//! Scripted stand-ins for the corporation and world subsystems.

use crate::mission::Mission;
use exchange_gamecomm::{
    CommandBus, CommandError, CorpCommand, CorporationSummary, Coordinates, GameChannels,
    MissionCommand, MissionType, Planet, Ship, Squad, StepError, WorldCommand,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

pub(crate) type Calls = Arc<Mutex<Vec<String>>>;

/// Stock the scripted base holds before anything is added to it
pub(crate) const BASE_STOCK: u32 = 1_000;

/// Serves every command with a canned answer and records it. Commands named
/// in `failing` answer with an error instead. `RemoveAllResourcesFromSquad`
/// reports `cargo` units removed and `AddResourcesToBase` reports
/// [`BASE_STOCK`] plus the amount added.
pub(crate) fn fake_bus(failing: &[&'static str], cargo: u32) -> (CommandBus, Calls) {
    let (channels, receivers) = GameChannels::new(32);
    let calls: Calls = Arc::default();
    let failing: Arc<Vec<&'static str>> = Arc::new(failing.to_vec());

    let mut world = receivers.world;
    let (world_calls, world_failing) = (Arc::clone(&calls), Arc::clone(&failing));
    tokio::spawn(async move {
        while let Some(command) = world.recv().await {
            serve_world(command, &world_calls, &world_failing);
        }
    });

    let mut corp = receivers.corp;
    let corp_calls = Arc::clone(&calls);
    tokio::spawn(async move {
        while let Some(command) = corp.recv().await {
            serve_corp(command, &corp_calls, &failing, cargo);
        }
    });

    (CommandBus::new(channels, Duration::from_secs(5)), calls)
}

pub(crate) fn recorded(calls: &Calls) -> Vec<String> {
    calls.lock().unwrap().clone()
}

fn answer<T>(
    name: &'static str,
    record: String,
    calls: &Calls,
    failing: &[&'static str],
    ok: T,
) -> Result<T, CommandError> {
    calls.lock().unwrap().push(record);
    if !failing.contains(&name) {
        return Ok(ok);
    }
    Err(match name {
        "GetPlanet" => CommandError::PlanetNotFound("p1".to_string()),
        "GetSquad" => CommandError::SquadNotFound {
            corporation_id: 1,
            squad_index: 0,
        },
        _ => CommandError::InvalidAmount(format!("scripted {} failure", name)),
    })
}

fn serve_world(command: WorldCommand, calls: &Calls, failing: &[&'static str]) {
    let name = command.name();
    match command {
        WorldCommand::GetPlanet {
            planet_id,
            respond_to,
        } => {
            let planet = test_planet(&planet_id);
            let _ = respond_to.send(answer(name, format!("GetPlanet({})", planet_id), calls, failing, planet));
        }
        WorldCommand::AddResourcesToPlanet {
            planet_id,
            resource,
            amount,
            respond_to,
        } => {
            let record = format!("AddResourcesToPlanet({}, {}, {})", planet_id, resource, amount);
            let _ = respond_to.send(answer(name, record, calls, failing, amount));
        }
        WorldCommand::RemoveResourcesFromPlanet {
            planet_id,
            resource,
            amount,
            respond_to,
        } => {
            let record = format!("RemoveResourcesFromPlanet({}, {}, {})", planet_id, resource, amount);
            let _ = respond_to.send(answer(name, record, calls, failing, amount));
        }
    }
}

fn serve_corp(command: CorpCommand, calls: &Calls, failing: &[&'static str], cargo: u32) {
    let name = command.name();
    match command {
        CorpCommand::GetCorporation {
            corporation_id,
            respond_to,
        } => {
            let summary = CorporationSummary {
                id: corporation_id,
                name: "Test Corp".to_string(),
                reputation: 0,
                credits: 0.0,
                stored_resources: HashMap::new(),
                is_player: true,
            };
            let record = format!("GetCorporation({})", corporation_id);
            let _ = respond_to.send(answer(name, record, calls, failing, summary));
        }
        CorpCommand::GetSquad {
            corporation_id,
            squad_index,
            respond_to,
        } => {
            let record = format!("GetSquad({}, {})", corporation_id, squad_index);
            let _ = respond_to.send(answer(name, record, calls, failing, test_squad()));
        }
        CorpCommand::AddResourcesToSquad {
            squad_index,
            resource,
            amount,
            respond_to,
            ..
        } => {
            let record = format!("AddResourcesToSquad({}, {}, {})", squad_index, resource, amount);
            let _ = respond_to.send(answer(name, record, calls, failing, amount));
        }
        CorpCommand::RemoveResourcesFromSquad {
            squad_index,
            resource,
            amount,
            respond_to,
            ..
        } => {
            let record = format!("RemoveResourcesFromSquad({}, {}, {})", squad_index, resource, amount);
            let _ = respond_to.send(answer(name, record, calls, failing, 0));
        }
        CorpCommand::RemoveAllResourcesFromSquad {
            squad_index,
            resource,
            respond_to,
            ..
        } => {
            let record = format!("RemoveAllResourcesFromSquad({}, {})", squad_index, resource);
            let _ = respond_to.send(answer(name, record, calls, failing, cargo));
        }
        CorpCommand::AddResourcesToBase {
            resource,
            amount,
            respond_to,
            ..
        } => {
            let record = format!("AddResourcesToBase({}, {})", resource, amount);
            let _ = respond_to.send(answer(name, record, calls, failing, BASE_STOCK + amount));
        }
        CorpCommand::RemoveResourcesFromBase {
            resource,
            amount,
            respond_to,
            ..
        } => {
            let record = format!("RemoveResourcesFromBase({}, {})", resource, amount);
            let _ = respond_to.send(answer(name, record, calls, failing, amount));
        }
        CorpCommand::AddCredits {
            amount, respond_to, ..
        } => {
            let record = format!("AddCredits({})", amount);
            let _ = respond_to.send(answer(name, record, calls, failing, amount));
        }
        CorpCommand::RemoveCredits {
            amount, respond_to, ..
        } => {
            let record = format!("RemoveCredits({})", amount);
            let _ = respond_to.send(answer(name, record, calls, failing, 0.0));
        }
    }
}

fn test_planet(planet_id: &str) -> Planet {
    Planet {
        id: planet_id.to_string(),
        name: "Test Planet".to_string(),
        location: Coordinates::new(3.0, 4.0),
        resources: HashMap::from([("iron".to_string(), 10_000)]),
        population: 0,
        danger_level: 1,
        is_habitable: false,
        is_harvestable: true,
    }
}

fn test_squad() -> Squad {
    Squad {
        id: 1,
        ship: Ship {
            name: "Hauler".to_string(),
            capacity: 10,
            max_health: 100,
            health: 100,
            max_cargo: 10_000,
            speed: 10,
        },
        crew: Vec::new(),
        cargo: HashMap::new(),
        location: Coordinates::default(),
    }
}

pub(crate) struct Outputs {
    pub notifications: mpsc::UnboundedReceiver<String>,
    pub errors: mpsc::UnboundedReceiver<StepError>,
}

/// Request from corporation 1, squad 0, for iron on planet `p1`
pub(crate) fn test_command(mission_type: MissionType, amount: u32) -> (MissionCommand, Outputs) {
    let (notifications, notification_rx) = mpsc::unbounded_channel();
    let (errors, error_rx) = mpsc::unbounded_channel();
    let command = MissionCommand {
        corporation_id: 1,
        squads: vec![0],
        planet_id: "p1".to_string(),
        mission_type,
        resources: vec!["iron".to_string()],
        amount,
        notifications,
        errors: Some(errors),
    };
    let outputs = Outputs {
        notifications: notification_rx,
        errors: error_rx,
    };
    (command, outputs)
}

pub(crate) fn test_mission(
    mission_type: MissionType,
    amount: u32,
) -> (
    Mission,
    mpsc::UnboundedReceiver<String>,
    mpsc::UnboundedReceiver<StepError>,
) {
    let (command, outputs) = test_command(mission_type, amount);
    (
        Mission::from_command(command),
        outputs.notifications,
        outputs.errors,
    )
}

/// Every message currently queued on a receiver
pub(crate) fn drain<T>(rx: &mut mpsc::UnboundedReceiver<T>) -> Vec<T> {
    std::iter::from_fn(|| rx.try_recv().ok()).collect()
}
