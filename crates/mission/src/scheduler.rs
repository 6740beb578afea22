//! Event scheduler actor.
//!
//! A single task owns the [`EventQueue`] and every registered event. Other
//! tasks reach it through a cloneable [`SchedulerHandle`]; each request
//! carries a oneshot for its reply. The task sleeps until either a request
//! arrives or the game clock moves past the earliest event, then hands every
//! due event to the [`EventExecutor`] on a detached task.

use crate::error::SchedulerError;
use crate::event::{Event, EventId, MissionId};
use crate::queue::EventQueue;
use exchange_core::GameTime;
use futures_util::future::BoxFuture;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Attempts at finding an unused event id before giving up
const MAX_ID_ATTEMPTS: usize = 8;

/// Runs a due event. The returned future is spawned; the scheduler never
/// waits for it.
pub trait EventExecutor: Send + Sync + 'static {
    fn execute(&self, event: Event) -> BoxFuture<'static, ()>;
}

/// Source of event ids
pub trait IdGenerator: Send + 'static {
    fn generate(&mut self) -> Result<EventId, SchedulerError>;
}

/// Random v4 uuids
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&mut self) -> Result<EventId, SchedulerError> {
        Ok(EventId::new(Uuid::new_v4().to_string()))
    }
}

#[derive(Debug)]
enum SchedulerRequest {
    Schedule {
        event: Event,
        respond_to: oneshot::Sender<Result<EventId, SchedulerError>>,
    },
    Update {
        id: EventId,
        scheduled_time: GameTime,
        cancelled: bool,
        respond_to: oneshot::Sender<Result<(), SchedulerError>>,
    },
    Cancel {
        id: EventId,
        respond_to: oneshot::Sender<Result<(), SchedulerError>>,
    },
    CancelMission {
        mission_id: MissionId,
        respond_to: oneshot::Sender<usize>,
    },
    Snapshot {
        respond_to: oneshot::Sender<Vec<Event>>,
    },
}

/// Client side of the event scheduler
#[derive(Debug, Clone)]
pub struct SchedulerHandle {
    requests: mpsc::Sender<SchedulerRequest>,
}

impl SchedulerHandle {
    async fn call<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> SchedulerRequest,
    ) -> Result<T, SchedulerError> {
        let (respond_to, response) = oneshot::channel();
        self.requests
            .send(build(respond_to))
            .await
            .map_err(|_| SchedulerError::Unavailable)?;
        response.await.map_err(|_| SchedulerError::Unavailable)
    }

    /// Register an event and return its freshly assigned id
    pub async fn schedule(&self, event: Event) -> Result<EventId, SchedulerError> {
        self.call(|respond_to| SchedulerRequest::Schedule { event, respond_to })
            .await?
    }

    /// Change an event's time and cancellation flag
    pub async fn update_event(
        &self,
        id: &EventId,
        scheduled_time: GameTime,
        cancelled: bool,
    ) -> Result<(), SchedulerError> {
        self.call(|respond_to| SchedulerRequest::Update {
            id: id.clone(),
            scheduled_time,
            cancelled,
            respond_to,
        })
        .await?
    }

    /// Cancel an event, keeping its time
    pub async fn cancel(&self, id: &EventId) -> Result<(), SchedulerError> {
        self.call(|respond_to| SchedulerRequest::Cancel {
            id: id.clone(),
            respond_to,
        })
        .await?
    }

    /// Cancel every live event of a mission, returning how many were cancelled
    pub async fn cancel_mission(&self, mission_id: &MissionId) -> Result<usize, SchedulerError> {
        self.call(|respond_to| SchedulerRequest::CancelMission {
            mission_id: mission_id.clone(),
            respond_to,
        })
        .await
    }

    /// Registered events in heap order
    pub async fn snapshot(&self) -> Result<Vec<Event>, SchedulerError> {
        self.call(|respond_to| SchedulerRequest::Snapshot { respond_to })
            .await
    }

    pub async fn len(&self) -> Result<usize, SchedulerError> {
        Ok(self.snapshot().await?.len())
    }
}

/// The scheduler task's state
pub struct EventScheduler {
    queue: EventQueue,
    requests: mpsc::Receiver<SchedulerRequest>,
    clock: watch::Receiver<GameTime>,
    executor: Arc<dyn EventExecutor>,
    ids: Box<dyn IdGenerator>,
}

impl EventScheduler {
    /// Create the scheduler and its first handle. Nothing runs until
    /// [`EventScheduler::run`] is awaited.
    pub fn new(
        clock: watch::Receiver<GameTime>,
        executor: Arc<dyn EventExecutor>,
        buffer: usize,
    ) -> (Self, SchedulerHandle) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        let scheduler = Self {
            queue: EventQueue::new(),
            requests: rx,
            clock,
            executor,
            ids: Box::new(UuidGenerator),
        };
        (scheduler, SchedulerHandle { requests: tx })
    }

    /// Replace the id source
    pub fn with_id_generator(mut self, ids: impl IdGenerator) -> Self {
        self.ids = Box::new(ids);
        self
    }

    /// Serve requests and fire due events until every handle is dropped
    pub async fn run(mut self) {
        info!("event scheduler started");
        loop {
            self.dispatch_due();
            let next_due = self.queue.peek().map(|event| event.scheduled_time);

            tokio::select! {
                request = self.requests.recv() => match request {
                    Some(request) => self.handle(request),
                    None => break,
                },
                _ = wait_past(&mut self.clock, next_due) => {}
            }
        }
        info!(pending = self.queue.len(), "event scheduler stopped");
    }

    fn dispatch_due(&mut self) {
        let now = *self.clock.borrow();
        while self.queue.peek().is_some_and(|event| event.is_due(now)) {
            let Some(event) = self.queue.pop() else {
                break;
            };
            if event.cancelled {
                debug!(event_id = %event.id, mission_id = %event.mission_id, "discarding cancelled event");
                continue;
            }
            debug!(
                event_id = %event.id,
                mission_id = %event.mission_id,
                step = event.step.name(),
                time = %event.scheduled_time,
                "dispatching event"
            );
            tokio::spawn(self.executor.execute(event));
        }
    }

    fn handle(&mut self, request: SchedulerRequest) {
        match request {
            SchedulerRequest::Schedule { event, respond_to } => {
                let _ = respond_to.send(self.schedule(event));
            }
            SchedulerRequest::Update {
                id,
                scheduled_time,
                cancelled,
                respond_to,
            } => {
                let _ = respond_to.send(self.update(&id, scheduled_time, cancelled));
            }
            SchedulerRequest::Cancel { id, respond_to } => {
                let result = match self.queue.get(&id) {
                    Some(event) => {
                        let scheduled_time = event.scheduled_time;
                        self.update(&id, scheduled_time, true)
                    }
                    None => Err(SchedulerError::NotFound(id)),
                };
                let _ = respond_to.send(result);
            }
            SchedulerRequest::CancelMission {
                mission_id,
                respond_to,
            } => {
                let _ = respond_to.send(self.cancel_mission(&mission_id));
            }
            SchedulerRequest::Snapshot { respond_to } => {
                let _ = respond_to.send(self.queue.iter().cloned().collect());
            }
        }
    }

    fn schedule(&mut self, mut event: Event) -> Result<EventId, SchedulerError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.ids.generate()?;
            if self.queue.contains(&id) {
                warn!(event_id = %id, "generated event id is already registered");
                continue;
            }
            event.id = id.clone();
            debug!(
                event_id = %id,
                mission_id = %event.mission_id,
                step = event.step.name(),
                time = %event.scheduled_time,
                "event scheduled"
            );
            self.queue.push(event);
            return Ok(id);
        }
        Err(SchedulerError::IdGeneration(format!(
            "no unused id after {} attempts",
            MAX_ID_ATTEMPTS
        )))
    }

    fn update(
        &mut self,
        id: &EventId,
        scheduled_time: GameTime,
        cancelled: bool,
    ) -> Result<(), SchedulerError> {
        let index = self
            .queue
            .position(id)
            .ok_or_else(|| SchedulerError::NotFound(id.clone()))?;
        self.queue.update(index, scheduled_time, cancelled);
        Ok(())
    }

    fn cancel_mission(&mut self, mission_id: &MissionId) -> usize {
        let live: Vec<(EventId, GameTime)> = self
            .queue
            .iter()
            .filter(|event| &event.mission_id == mission_id && !event.cancelled)
            .map(|event| (event.id.clone(), event.scheduled_time))
            .collect();
        for (id, scheduled_time) in &live {
            let _ = self.update(id, *scheduled_time, true);
        }
        live.len()
    }
}

/// Resolves once the clock is strictly past `due`. Never resolves when there
/// is nothing to wait for or the clock is gone.
async fn wait_past(clock: &mut watch::Receiver<GameTime>, due: Option<GameTime>) {
    if let Some(due) = due {
        if clock.wait_for(|now| now.after(due)).await.is_ok() {
            return;
        }
        warn!("game clock dropped, pending events will not fire");
    }
    std::future::pending::<()>().await
}
