//! Worker pool serving the corporation intake queue.

use crate::group::CorpGroup;
use exchange_gamecomm::CorpCommand;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Spawn `workers` tasks that pull commands off `receiver` until every
/// sender is dropped.
pub fn listen(
    group: Arc<CorpGroup>,
    receiver: mpsc::Receiver<CorpCommand>,
    workers: usize,
) -> Vec<JoinHandle<()>> {
    let receiver = Arc::new(Mutex::new(receiver));
    let workers = workers.max(1);
    info!(workers, "starting corporation workers");

    (0..workers)
        .map(|worker| {
            let group = Arc::clone(&group);
            let receiver = Arc::clone(&receiver);
            tokio::spawn(async move {
                loop {
                    let command = receiver.lock().await.recv().await;
                    match command {
                        Some(command) => group.handle(command).await,
                        None => break,
                    }
                }
                debug!(worker, "corporation worker stopped");
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corporation::tests::test_corporation;
    use exchange_gamecomm::{CommandBus, CommandError, GameChannels};
    use std::time::Duration;

    #[tokio::test]
    async fn test_workers_serve_bus() {
        let group = Arc::new(CorpGroup::with_corporations([test_corporation(1)]));
        let (channels, receivers) = GameChannels::new(16);
        let handles = listen(Arc::clone(&group), receivers.corp, 4);
        let bus = CommandBus::new(channels, Duration::from_secs(1));

        assert_eq!(bus.add_resources_to_squad(1, 0, "iron", 40).await, Ok(40));
        assert_eq!(bus.remove_all_resources_from_squad(1, 0, "iron").await, Ok(40));
        assert_eq!(
            bus.get_squad(1, 5).await,
            Err(CommandError::SquadNotFound {
                corporation_id: 1,
                squad_index: 5
            })
        );

        drop(bus);
        for handle in handles {
            handle.await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_concurrent_credits_are_not_lost() {
        let group = Arc::new(CorpGroup::with_corporations([test_corporation(1)]));
        let (channels, receivers) = GameChannels::new(16);
        let _handles = listen(Arc::clone(&group), receivers.corp, 8);
        let bus = CommandBus::new(channels, Duration::from_secs(5));

        let calls = (0..100).map(|_| {
            let bus = bus.clone();
            tokio::spawn(async move { bus.add_credits(1, 1.0).await })
        });
        for call in calls.collect::<Vec<_>>() {
            call.await.unwrap().unwrap();
        }

        assert_eq!(group.summary(1).await.unwrap().credits, 1_100.0);
    }
}
