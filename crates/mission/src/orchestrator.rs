//! Mission intake and saga scheduling.
//!
//! [`MissionScheduler`] turns a mission request into the events of its saga.
//! Steps are scheduled in order; if any of them cannot be scheduled, the
//! ones already registered are cancelled and the mission is dropped, so a
//! mission is either fully scheduled or has no live events at all.
//!
//! [`MissionExecutor`] is the other half: the event scheduler hands it every
//! due event and it runs the matching step.

use crate::error::{MissionError, Result};
use crate::event::{Event, EventId, MissionId};
use crate::mission::{Mission, MissionRegistry, MissionStatus};
use crate::saga::{self, SagaStep};
use crate::scheduler::{EventExecutor, EventScheduler, IdGenerator, SchedulerHandle, UuidGenerator};
use crate::steps::StepContext;
use exchange_core::{Config, GameDuration, GameTime};
use exchange_gamecomm::{CommandBus, CommandError, MissionCommand, MissionType};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{error, info, info_span, warn, Instrument};

/// Runs due events as saga steps
pub struct MissionExecutor {
    registry: MissionRegistry,
    steps: Arc<StepContext>,
}

impl MissionExecutor {
    pub fn new(registry: MissionRegistry, steps: StepContext) -> Self {
        Self {
            registry,
            steps: Arc::new(steps),
        }
    }
}

impl EventExecutor for MissionExecutor {
    fn execute(&self, event: Event) -> BoxFuture<'static, ()> {
        let registry = self.registry.clone();
        let steps = Arc::clone(&self.steps);
        let span = info_span!("saga_step", mission_id = %event.mission_id, step = event.step.name());

        async move {
            let Some(mission) = registry.begin_step(&event.mission_id, event.step).await else {
                warn!(event_id = %event.id, "mission is gone or finished, skipping step");
                return;
            };
            steps.run(event.step, &mission).await;
            if event.step.is_terminal() {
                registry.complete(&mission.id).await;
                info!("mission completed");
            }
        }
        .instrument(span)
        .boxed()
    }
}

/// Entry point for starting, querying and cancelling missions
#[derive(Debug, Clone)]
pub struct MissionScheduler {
    bus: CommandBus,
    events: SchedulerHandle,
    registry: MissionRegistry,
    clock: watch::Receiver<GameTime>,
}

impl MissionScheduler {
    pub fn new(
        bus: CommandBus,
        events: SchedulerHandle,
        registry: MissionRegistry,
        clock: watch::Receiver<GameTime>,
    ) -> Self {
        Self {
            bus,
            events,
            registry,
            clock,
        }
    }

    /// Build the executor and event scheduler, spawn the event scheduler
    /// task and return a scheduler wired to it.
    pub fn spawn(
        bus: CommandBus,
        clock: watch::Receiver<GameTime>,
        config: &Config,
    ) -> (Self, JoinHandle<()>) {
        Self::spawn_with_ids(bus, clock, config, UuidGenerator)
    }

    /// [`MissionScheduler::spawn`] with a custom event id source
    pub fn spawn_with_ids(
        bus: CommandBus,
        clock: watch::Receiver<GameTime>,
        config: &Config,
        ids: impl IdGenerator,
    ) -> (Self, JoinHandle<()>) {
        let registry = MissionRegistry::new();
        let steps = StepContext::from_config(bus.clone(), config);
        let executor = Arc::new(MissionExecutor::new(registry.clone(), steps));
        let (event_scheduler, events) =
            EventScheduler::new(clock.clone(), executor, config.scheduler.request_buffer);
        let task = tokio::spawn(event_scheduler.with_id_generator(ids).run());
        (Self::new(bus, events, registry, clock), task)
    }

    pub fn events(&self) -> &SchedulerHandle {
        &self.events
    }

    pub fn registry(&self) -> &MissionRegistry {
        &self.registry
    }

    fn now(&self) -> GameTime {
        *self.clock.borrow()
    }

    /// New pending mission for a request
    pub fn create_mission(&self, command: MissionCommand) -> Mission {
        Mission::from_command(command)
    }

    /// Register a mission and schedule its saga.
    ///
    /// On failure the mission is removed again and the error is also sent as
    /// `Mission Error:` text on its notification channel.
    pub async fn start_mission(&self, mission: Mission) -> Result<MissionId> {
        let id = mission.id.clone();
        info!(mission_id = %id, mission_type = %mission.mission_type, "starting mission");
        self.registry.insert(mission.clone()).await;

        let result = match mission.mission_type {
            MissionType::Squad => self.create_squad_mission(&mission).await,
            MissionType::Transfer => self.create_transfer_mission(&mission).await,
            other => Err(MissionError::Unsupported(other)),
        };

        match result {
            Ok(_) => Ok(id),
            Err(err) => {
                self.registry.remove(&id).await;
                error!(mission_id = %id, error = %err, "mission could not be started");
                mission.notify(format!("Mission Error: {}", err));
                Err(err)
            }
        }
    }

    /// Validate and schedule a harvesting run
    pub async fn create_squad_mission(&self, mission: &Mission) -> Result<Vec<EventId>> {
        self.validate(mission).await?;
        self.schedule_saga(mission, saga::SQUAD_MISSION_PLAN).await
    }

    /// Validate and schedule a sell run
    pub async fn create_transfer_mission(&self, mission: &Mission) -> Result<Vec<EventId>> {
        self.validate(mission).await?;
        self.schedule_saga(mission, saga::TRANSFER_MISSION_PLAN).await
    }

    async fn validate(&self, mission: &Mission) -> Result<()> {
        let Some(squad_index) = mission.lead_squad() else {
            return Err(MissionError::Validation("mission has no squads".to_string()));
        };
        let planet = self
            .bus
            .get_planet(&mission.planet_id)
            .await
            .map_err(lookup_error)?;
        let squad = self
            .bus
            .get_squad(mission.corporation_id, squad_index)
            .await
            .map_err(lookup_error)?;

        let distance = squad.location.distance(&planet.location);
        info!(mission_id = %mission.id, planet = %planet.name, distance, "mission target validated");
        Ok(())
    }

    /// Schedule every step of `plan` relative to the current game time,
    /// rolling back on the first failure.
    pub async fn schedule_saga(
        &self,
        mission: &Mission,
        plan: &[(SagaStep, GameDuration)],
    ) -> Result<Vec<EventId>> {
        let start = self.now();
        let mut scheduled = Vec::with_capacity(plan.len());

        for &(step, offset) in plan {
            let event = Event::new(mission.id.clone(), start + offset, step);
            match self.events.schedule(event).await {
                Ok(id) => scheduled.push(id),
                Err(err) => {
                    warn!(mission_id = %mission.id, step = step.name(), error = %err, "scheduling failed, rolling back");
                    self.rollback(&scheduled).await;
                    return Err(err.into());
                }
            }
        }

        self.registry.mark_scheduled(&mission.id).await;
        info!(mission_id = %mission.id, steps = scheduled.len(), %start, "saga scheduled");
        Ok(scheduled)
    }

    async fn rollback(&self, scheduled: &[EventId]) {
        for id in scheduled {
            if let Err(err) = self.events.cancel(id).await {
                error!(event_id = %id, error = %err, "failed to cancel event during rollback");
            }
        }
    }

    /// Cancel every pending step of a mission. Returns the number of events
    /// cancelled.
    pub async fn cancel_mission(&self, id: &MissionId) -> Result<usize> {
        if self.registry.get(id).await.is_none() {
            return Err(MissionError::NotFound(id.clone()));
        }
        let cancelled = self.events.cancel_mission(id).await?;
        self.registry.set_status(id, MissionStatus::Cancelled).await;
        info!(mission_id = %id, cancelled, "mission cancelled");
        Ok(cancelled)
    }

    pub async fn mission(&self, id: &MissionId) -> Result<Mission> {
        self.registry
            .get(id)
            .await
            .ok_or_else(|| MissionError::NotFound(id.clone()))
    }

    pub async fn status(&self, id: &MissionId) -> Result<MissionStatus> {
        self.registry
            .status(id)
            .await
            .ok_or_else(|| MissionError::NotFound(id.clone()))
    }

    /// Forget completed and cancelled missions
    pub async fn evict_finished(&self) -> usize {
        self.registry.evict_finished().await
    }

    /// Start a mission for every request until the intake closes
    pub async fn run(self, mut intake: mpsc::Receiver<MissionCommand>) {
        info!("mission scheduler started");
        while let Some(command) = intake.recv().await {
            let mission = self.create_mission(command);
            let scheduler = self.clone();
            tokio::spawn(async move {
                // Failures are already reported on the mission's channel.
                let _ = scheduler.start_mission(mission).await;
            });
        }
        info!("mission intake closed");
    }
}

fn lookup_error(err: CommandError) -> MissionError {
    match err {
        CommandError::PlanetNotFound(_)
        | CommandError::SquadNotFound { .. }
        | CommandError::CorporationNotFound(_) => MissionError::Validation(err.to_string()),
        other => MissionError::Command(other),
    }
}
