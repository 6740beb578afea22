use anyhow::{bail, Context};
use exchange_core::{logging, Config, GameClock};
use exchange_corporation::CorpGroup;
use exchange_gamecomm::{CommandBus, GameChannels, MissionCommand, MissionType};
use exchange_mission::MissionScheduler;
use exchange_world::World;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

mod seed;

const NODE_PROTOCOL_VERSION: u32 = 1;
const NODE_RUNTIME_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
struct NodeVersionHandshake {
    version: &'static str,
    runtime_version: u32,
    protocol_version: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|arg| arg == "--version-json") {
        let handshake = NodeVersionHandshake {
            version: env!("CARGO_PKG_VERSION"),
            runtime_version: NODE_RUNTIME_VERSION,
            protocol_version: NODE_PROTOCOL_VERSION,
        };
        println!("{}", serde_json::to_string(&handshake)?);
        return Ok(());
    }

    let config = match parse_config_path(&args)? {
        Some(path) => Config::from_file(&path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::default_config(),
    };
    logging::init_with(&config.logging);

    let clock = Arc::new(GameClock::from_config(&config.clock)?);
    info!(
        date = %clock.current_date(),
        speed = clock.speed_multiplier(),
        "exchange node starting"
    );
    tokio::spawn(Arc::clone(&clock).run());
    tokio::spawn(log_days(Arc::clone(&clock), clock.subscribe_days()));

    let (channels, receivers) = GameChannels::new(config.workers.channel_capacity);
    let bus = CommandBus::new(channels.clone(), config.command_timeout());

    let corporations = Arc::new(CorpGroup::with_corporations([seed::player_corporation()]));
    let world = Arc::new(World::with_planets(seed::planets()));
    exchange_corporation::listen(corporations, receivers.corp, config.workers.corporation);
    exchange_world::listen(world, receivers.world, config.workers.world);

    let (missions, _events) = MissionScheduler::spawn(bus, clock.watch(), &config);
    tokio::spawn(missions.run(receivers.mission));

    let (notifications, notification_rx) = mpsc::unbounded_channel();
    tokio::spawn(log_notifications(notification_rx));
    for (mission_type, planet_id, amount) in [
        (MissionType::Squad, "kepler-22", 0),
        (MissionType::Transfer, "tau-ceti-e", 100),
    ] {
        let command = MissionCommand {
            corporation_id: seed::PLAYER_CORPORATION_ID,
            squads: vec![0],
            planet_id: planet_id.to_string(),
            mission_type,
            resources: vec!["iron".to_string()],
            amount,
            notifications: notifications.clone(),
            errors: None,
        };
        channels
            .mission
            .send(command)
            .await
            .context("mission intake closed")?;
    }

    tokio::signal::ctrl_c().await?;
    info!(date = %clock.current_date(), "exchange node shutting down");
    Ok(())
}

async fn log_notifications(mut rx: mpsc::UnboundedReceiver<String>) {
    while let Some(message) = rx.recv().await {
        info!(target: "exchange_node::missions", "{}", message);
    }
}

async fn log_days(clock: Arc<GameClock>, mut days: broadcast::Receiver<exchange_core::GameTime>) {
    loop {
        match days.recv().await {
            Ok(_) => debug!(date = %clock.current_date(), "new day"),
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                warn!(missed, "day subscriber lagged")
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

fn parse_config_path(args: &[String]) -> anyhow::Result<Option<PathBuf>> {
    let mut args_iter = args.iter();
    while let Some(arg) = args_iter.next() {
        if arg == "--config" {
            if let Some(path) = args_iter.next() {
                return Ok(Some(PathBuf::from(path)));
            }
            bail!("--config was provided without a path");
        }
    }
    Ok(None)
}
