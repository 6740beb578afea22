//! Test fixtures: a seeded game with real subsystem workers

use exchange_core::{logging, Config, GameClock, GameTime};
use exchange_corporation::{Base, CorpGroup, Corporation};
use exchange_gamecomm::{
    CommandBus, Coordinates, GameChannels, MissionCommand, MissionType, Planet, Ship, Squad,
    StepError,
};
use exchange_mission::{MissionId, MissionScheduler, MissionStatus};
use exchange_world::World;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

pub const CORPORATION_ID: u64 = 1;
pub const PLANET_ID: &str = "p1";
pub const BASE_IRON: u32 = 1_000;
pub const PLANET_IRON: u32 = 5_000;

/// Corporation with one base holding iron and one empty squad
pub fn test_corporation() -> Corporation {
    Corporation {
        id: CORPORATION_ID,
        name: "Test Corp".to_string(),
        reputation: 0,
        credits: 0.0,
        bases: vec![Base {
            id: 1,
            name: "Home".to_string(),
            location: Coordinates::default(),
            storage_capacity: 100_000,
            stored_resources: HashMap::from([("iron".to_string(), BASE_IRON)]),
        }],
        squads: vec![Squad {
            id: 1,
            ship: Ship {
                name: "Hauler".to_string(),
                capacity: 4,
                max_health: 100,
                health: 100,
                max_cargo: 10_000,
                speed: 10,
            },
            crew: Vec::new(),
            cargo: HashMap::new(),
            location: Coordinates::default(),
        }],
        is_player: true,
    }
}

pub fn test_planet() -> Planet {
    Planet {
        id: PLANET_ID.to_string(),
        name: "Test Planet".to_string(),
        location: Coordinates::new(30.0, 40.0),
        resources: HashMap::from([("iron".to_string(), PLANET_IRON)]),
        population: 0,
        danger_level: 1,
        is_habitable: false,
        is_harvestable: true,
    }
}

/// Receiving ends of a mission's channels
pub struct MissionOutputs {
    pub notifications: mpsc::UnboundedReceiver<String>,
    pub errors: mpsc::UnboundedReceiver<StepError>,
}

impl MissionOutputs {
    /// Next notification, failing the test after five seconds
    pub async fn next(&mut self) -> String {
        tokio::time::timeout(Duration::from_secs(5), self.notifications.recv())
            .await
            .expect("timed out waiting for a notification")
            .expect("notification channel closed")
    }

    pub fn step_errors(&mut self) -> Vec<StepError> {
        std::iter::from_fn(|| self.errors.try_recv().ok()).collect()
    }
}

/// Request for squad 0 of the test corporation against the test planet
pub fn mission_command(
    mission_type: MissionType,
    resources: &[&str],
    amount: u32,
) -> (MissionCommand, MissionOutputs) {
    let (notifications, notification_rx) = mpsc::unbounded_channel();
    let (errors, error_rx) = mpsc::unbounded_channel();
    let command = MissionCommand {
        corporation_id: CORPORATION_ID,
        squads: vec![0],
        planet_id: PLANET_ID.to_string(),
        mission_type,
        resources: resources.iter().map(|r| r.to_string()).collect(),
        amount,
        notifications,
        errors: Some(errors),
    };
    (
        command,
        MissionOutputs {
            notifications: notification_rx,
            errors: error_rx,
        },
    )
}

/// A running game whose clock only moves when the test advances it
pub struct TestGame {
    pub clock: GameClock,
    pub corporations: Arc<CorpGroup>,
    pub world: Arc<World>,
    pub bus: CommandBus,
    pub missions: MissionScheduler,
}

impl TestGame {
    pub fn start() -> Self {
        Self::with_config(Config::default_config())
    }

    pub fn with_config(config: Config) -> Self {
        logging::init_with(&config.logging);

        let clock = GameClock::new(GameTime::EPOCH, 1.0).expect("valid clock");
        let (channels, receivers) = GameChannels::new(config.workers.channel_capacity);
        let bus = CommandBus::new(channels, config.command_timeout());

        let corporations = Arc::new(CorpGroup::with_corporations([test_corporation()]));
        let world = Arc::new(World::with_planets([test_planet()]));
        exchange_corporation::listen(
            Arc::clone(&corporations),
            receivers.corp,
            config.workers.corporation,
        );
        exchange_world::listen(Arc::clone(&world), receivers.world, config.workers.world);

        let (missions, _events) = MissionScheduler::spawn(bus.clone(), clock.watch(), &config);
        tokio::spawn(missions.clone().run(receivers.mission));

        Self {
            clock,
            corporations,
            world,
            bus,
            missions,
        }
    }

    /// Start a mission directly, bypassing the intake queue
    pub async fn start_mission(&self, command: MissionCommand) -> MissionId {
        let mission = self.missions.create_mission(command);
        self.missions
            .start_mission(mission)
            .await
            .expect("mission should start")
    }

    pub async fn base_stock(&self, resource: &str) -> u32 {
        let summary = self.corporations.summary(CORPORATION_ID).await.expect("corporation");
        summary.stored_resources.get(resource).copied().unwrap_or(0)
    }

    pub async fn squad_cargo(&self, resource: &str) -> u32 {
        self.corporations
            .squad(CORPORATION_ID, 0)
            .await
            .expect("squad")
            .cargo_of(resource)
    }

    pub async fn planet_stock(&self, resource: &str) -> u32 {
        let planet = self.world.planet(PLANET_ID).await.expect("planet");
        planet.resources.get(resource).copied().unwrap_or(0)
    }

    pub async fn credits(&self) -> f64 {
        self.corporations
            .summary(CORPORATION_ID)
            .await
            .expect("corporation")
            .credits
    }

    /// Poll until the mission reaches `status`
    pub async fn wait_for_status(&self, id: &MissionId, status: MissionStatus) {
        for _ in 0..200 {
            if self.missions.status(id).await.ok() == Some(status) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("mission {} never reached {:?}", id, status);
    }
}
