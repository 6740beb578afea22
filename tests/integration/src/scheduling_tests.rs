//! Event ordering and command deadlines across crates

use crate::test_utils::mission_command;
use exchange_core::{GameClock, GameTime};
use exchange_gamecomm::{CommandBus, CommandError, GameChannels, MissionType};
use exchange_mission::{Event, EventExecutor, EventScheduler, MissionError, MissionId, MissionScheduler, SagaStep};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

struct OrderRecorder(mpsc::UnboundedSender<u64>);

impl EventExecutor for OrderRecorder {
    fn execute(&self, event: Event) -> BoxFuture<'static, ()> {
        let _ = self.0.send(event.scheduled_time.as_hours());
        async {}.boxed()
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_callers_fire_in_time_order() {
    let clock = GameClock::new(GameTime::EPOCH, 1.0).unwrap();
    let (tx, mut fired) = mpsc::unbounded_channel();
    let (scheduler, handle) = EventScheduler::new(clock.watch(), Arc::new(OrderRecorder(tx)), 64);
    tokio::spawn(scheduler.run());

    let callers: Vec<_> = (1..=10u64)
        .map(|i| {
            let handle = handle.clone();
            tokio::spawn(async move {
                let mission = MissionId::new(format!("mission-{}", i));
                handle
                    .schedule(Event::new(mission, GameTime::new(i * 2), SagaStep::Leaving))
                    .await
            })
        })
        .collect();
    for caller in callers {
        caller.await.unwrap().unwrap();
    }
    assert_eq!(handle.len().await.unwrap(), 10);

    clock.advance(21);
    let mut order = Vec::new();
    for _ in 0..10 {
        let time = tokio::time::timeout(Duration::from_secs(5), fired.recv())
            .await
            .unwrap()
            .unwrap();
        order.push(time);
    }
    assert_eq!(order, vec![2, 4, 6, 8, 10, 12, 14, 16, 18, 20]);
}

#[tokio::test]
async fn test_stalled_subsystem_times_out_validation() {
    let mut config = exchange_core::Config::default_config();
    config.scheduler.command_timeout_ms = 50;

    let clock = GameClock::new(GameTime::EPOCH, 1.0).unwrap();
    let (channels, receivers) = GameChannels::new(4);
    let bus = CommandBus::new(channels, config.command_timeout());
    // Nobody serves the world queue.
    let _stalled = receivers.world;

    let (missions, _events) = MissionScheduler::spawn(bus, clock.watch(), &config);
    let (command, mut outputs) = mission_command(MissionType::Squad, &["iron"], 0);
    let mission = missions.create_mission(command);

    let err = missions.start_mission(mission).await.unwrap_err();
    assert!(matches!(
        err,
        MissionError::Command(CommandError::Timeout {
            command: "GetPlanet",
            after_ms: 50
        })
    ));
    assert!(outputs.next().await.starts_with("Mission Error:"));
    assert!(missions.registry().is_empty().await);
}
