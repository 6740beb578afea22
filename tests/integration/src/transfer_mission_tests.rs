//! Sell runs against the real subsystems

use crate::test_utils::{mission_command, TestGame, BASE_IRON, PLANET_IRON};
use exchange_core::{Config, TransferErrorPolicy};
use exchange_gamecomm::{CommandError, MissionType};
use exchange_mission::MissionStatus;
use std::time::Duration;

#[tokio::test]
async fn test_transfer_sells_goods_and_returns() {
    let game = TestGame::start();
    let (command, mut outputs) = mission_command(MissionType::Transfer, &["iron"], 100);
    let id = game.start_mission(command).await;

    game.clock.advance(1);
    assert_eq!(
        outputs.next().await,
        "Mission Notification: Squad [0], started travel."
    );
    assert_eq!(game.base_stock("iron").await, BASE_IRON - 100);
    assert_eq!(game.squad_cargo("iron").await, 100);

    game.clock.advance(72);
    assert_eq!(
        outputs.next().await,
        "Mission Notification: Squad 0, made the delivery. Added Credits: $200"
    );
    assert_eq!(game.squad_cargo("iron").await, 0);
    assert_eq!(game.planet_stock("iron").await, PLANET_IRON + 100);
    assert_eq!(game.credits().await, 200.0);

    game.clock.advance(72);
    assert_eq!(
        outputs.next().await,
        "Mission Notification: Squad 0 is back to base"
    );
    game.wait_for_status(&id, MissionStatus::Completed).await;
    assert!(outputs.step_errors().is_empty());
}

#[tokio::test]
async fn test_failed_withdrawal_still_loads_requested_amount() {
    let game = TestGame::start();
    let (command, mut outputs) = mission_command(MissionType::Transfer, &["gold"], 1);
    game.start_mission(command).await;

    game.clock.advance(1);
    assert_eq!(
        outputs.next().await,
        "Mission Notification: Squad [0], started travel."
    );
    assert_eq!(game.squad_cargo("gold").await, 1);

    let errors = outputs.step_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].step, "Leaving");
    assert!(matches!(
        errors[0].source,
        CommandError::InsufficientResources {
            requested: 1,
            available: 0,
            ..
        }
    ));
}

async fn assert_withdrawal_aborts(policy: TransferErrorPolicy) {
    let mut config = Config::default_config();
    config.scheduler.transfer_error_policy = policy;
    let game = TestGame::with_config(config);
    let (command, mut outputs) = mission_command(MissionType::Transfer, &["gold"], 1);
    game.start_mission(command).await;

    game.clock.advance(1);
    let reported = tokio::time::timeout(Duration::from_secs(5), outputs.errors.recv())
        .await
        .expect("no step error")
        .expect("error channel closed");
    assert_eq!(reported.step, "Leaving");

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(game.squad_cargo("gold").await, 0);
    assert!(outputs.notifications.try_recv().is_err());
}

#[tokio::test]
async fn test_abort_policy_skips_loading() {
    assert_withdrawal_aborts(TransferErrorPolicy::Abort).await;
}

#[tokio::test]
async fn test_exhausted_retries_abort() {
    assert_withdrawal_aborts(TransferErrorPolicy::Retry { attempts: 2 }).await;
}

#[tokio::test]
async fn test_intake_reports_unknown_planet() {
    let game = TestGame::start();
    let (mut command, mut outputs) = mission_command(MissionType::Transfer, &["iron"], 1);
    command.planet_id = "nowhere".to_string();

    game.bus.channels().mission.send(command).await.unwrap();

    assert_eq!(
        outputs.next().await,
        "Mission Error: Invalid mission: Planet not found: nowhere"
    );
    assert!(game.missions.registry().is_empty().await);
    assert_eq!(game.missions.events().len().await.unwrap(), 0);
}
