//! Harvesting runs against the real subsystems

use crate::test_utils::{mission_command, TestGame, BASE_IRON, PLANET_IRON};
use exchange_gamecomm::MissionType;
use exchange_mission::{MissionStatus, SagaStep};

#[tokio::test]
async fn test_harvest_round_trip_moves_goods_home() {
    let game = TestGame::start();
    let (command, mut outputs) = mission_command(MissionType::Squad, &["iron"], 0);
    let id = game.start_mission(command).await;

    game.clock.advance(1);
    assert_eq!(
        outputs.next().await,
        "Mission Notification: Squad [0], reached destination."
    );

    game.clock.advance(48);
    assert_eq!(
        outputs.next().await,
        "Mission Notification: Squad [0], finished harvesting."
    );
    assert_eq!(game.squad_cargo("iron").await, 200);
    assert_eq!(game.planet_stock("iron").await, PLANET_IRON - 200);

    game.clock.advance(24);
    assert_eq!(
        outputs.next().await,
        "Mission Notification: Squad [0] returned to base."
    );
    assert_eq!(
        outputs.next().await,
        format!("Mission Notification: Added to base iron -> #{}", BASE_IRON + 200)
    );

    assert_eq!(game.squad_cargo("iron").await, 0);
    assert_eq!(game.base_stock("iron").await, BASE_IRON + 200);
    assert!(outputs.step_errors().is_empty());

    game.wait_for_status(&id, MissionStatus::Completed).await;
}

#[tokio::test]
async fn test_harvest_of_depleted_planet_is_reported() {
    let game = TestGame::start();
    let (command, mut outputs) = mission_command(MissionType::Squad, &["gold"], 0);
    game.start_mission(command).await;

    game.clock.advance(1);
    assert_eq!(
        outputs.next().await,
        "Mission Notification: Squad [0], reached destination."
    );

    game.clock.advance(48);
    assert_eq!(
        outputs.next().await,
        "Mission Notification: Squad [0], finished harvesting."
    );

    let errors = outputs.step_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].step, SagaStep::Harvesting.name());
    // The squad still carries the planned yield.
    assert_eq!(game.squad_cargo("gold").await, 200);
}

#[tokio::test]
async fn test_status_tracks_running_step() {
    let game = TestGame::start();
    let (command, mut outputs) = mission_command(MissionType::Squad, &["iron"], 0);
    let id = game.start_mission(command).await;
    assert_eq!(game.missions.status(&id).await.unwrap(), MissionStatus::Scheduled);

    game.clock.advance(1);
    outputs.next().await;
    game.wait_for_status(&id, MissionStatus::InProgress(SagaStep::Arriving))
        .await;
}
