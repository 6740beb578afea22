use crate::world::World;
use exchange_gamecomm::WorldCommand;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Spawn `workers` tasks sharing the world intake queue. They exit once every
/// sender is gone.
pub fn listen(
    world: Arc<World>,
    receiver: mpsc::Receiver<WorldCommand>,
    workers: usize,
) -> Vec<JoinHandle<()>> {
    let receiver = Arc::new(Mutex::new(receiver));
    let workers = workers.max(1);
    info!(workers, "starting world workers");

    (0..workers)
        .map(|worker| {
            let world = Arc::clone(&world);
            let receiver = Arc::clone(&receiver);
            tokio::spawn(async move {
                loop {
                    // Release the queue lock before handling.
                    let Some(command) = receiver.lock().await.recv().await else {
                        break;
                    };
                    world.handle(command).await;
                }
                debug!(worker, "world worker stopped");
            })
        })
        .collect()
}
