//! Mission records and the registry that holds them.

use crate::event::MissionId;
use crate::saga::SagaStep;
use exchange_gamecomm::{CommandError, MissionCommand, MissionType, StepError};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, warn};

/// Lifecycle of a mission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissionStatus {
    /// Registered, saga not fully scheduled yet
    Pending,
    /// Every saga step is registered
    Scheduled,
    /// A step is executing
    InProgress(SagaStep),
    /// The terminal step finished
    Completed,
    /// Cancelled on request
    Cancelled,
}

impl MissionStatus {
    /// Completed or cancelled
    pub fn is_finished(self) -> bool {
        matches!(self, MissionStatus::Completed | MissionStatus::Cancelled)
    }
}

/// A running mission and the channels its steps report on
#[derive(Debug, Clone)]
pub struct Mission {
    pub id: MissionId,
    pub corporation_id: u64,
    /// Squad indices; the first one carries the cargo
    pub squads: Vec<usize>,
    pub planet_id: String,
    pub status: MissionStatus,
    pub mission_type: MissionType,
    pub resources: Vec<String>,
    pub amount: u32,
    pub notifications: mpsc::UnboundedSender<String>,
    pub errors: Option<mpsc::UnboundedSender<StepError>>,
}

impl Mission {
    /// New pending mission with a fresh id
    pub fn from_command(command: MissionCommand) -> Self {
        Self {
            id: MissionId::generate(),
            corporation_id: command.corporation_id,
            squads: command.squads,
            planet_id: command.planet_id,
            status: MissionStatus::Pending,
            mission_type: command.mission_type,
            resources: command.resources,
            amount: command.amount,
            notifications: command.notifications,
            errors: command.errors,
        }
    }

    /// Squad that carries the cargo
    pub fn lead_squad(&self) -> Option<usize> {
        self.squads.first().copied()
    }

    /// Send a progress message
    pub fn notify(&self, message: impl Into<String>) {
        if self.notifications.send(message.into()).is_err() {
            debug!(mission_id = %self.id, "notification receiver dropped");
        }
    }

    /// Report a failed subsystem call made by `step`.
    ///
    /// Goes to the error channel when there is one, otherwise onto the
    /// notification channel as `Mission Error:` text.
    pub fn report(&self, step: SagaStep, source: CommandError) {
        let error = StepError {
            mission_id: self.id.to_string(),
            step: step.name(),
            source,
        };
        warn!(mission_id = %self.id, step = step.name(), error = %error.source, "saga step call failed");
        match &self.errors {
            Some(errors) => {
                if let Err(mpsc::error::SendError(error)) = errors.send(error) {
                    self.notify(format!("Mission Error: {}", error));
                }
            }
            None => self.notify(format!("Mission Error: {}", error)),
        }
    }
}

/// Shared map of missions by id
#[derive(Debug, Clone, Default)]
pub struct MissionRegistry {
    missions: Arc<RwLock<HashMap<MissionId, Mission>>>,
}

impl MissionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, mission: Mission) {
        self.missions
            .write()
            .await
            .insert(mission.id.clone(), mission);
    }

    pub async fn get(&self, id: &MissionId) -> Option<Mission> {
        self.missions.read().await.get(id).cloned()
    }

    pub async fn remove(&self, id: &MissionId) -> Option<Mission> {
        self.missions.write().await.remove(id)
    }

    pub async fn status(&self, id: &MissionId) -> Option<MissionStatus> {
        self.missions.read().await.get(id).map(|m| m.status)
    }

    pub async fn len(&self) -> usize {
        self.missions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.missions.read().await.is_empty()
    }

    /// Overwrite the status; `false` if the mission is unknown
    pub async fn set_status(&self, id: &MissionId, status: MissionStatus) -> bool {
        match self.missions.write().await.get_mut(id) {
            Some(mission) => {
                mission.status = status;
                true
            }
            None => false,
        }
    }

    /// Pending → Scheduled. A mission whose first step already started keeps
    /// its newer status.
    pub async fn mark_scheduled(&self, id: &MissionId) {
        if let Some(mission) = self.missions.write().await.get_mut(id) {
            if mission.status == MissionStatus::Pending {
                mission.status = MissionStatus::Scheduled;
            }
        }
    }

    /// Mark `step` as running and return a copy of the mission, unless the
    /// mission is gone or already finished.
    pub async fn begin_step(&self, id: &MissionId, step: SagaStep) -> Option<Mission> {
        let mut missions = self.missions.write().await;
        let mission = missions.get_mut(id)?;
        if mission.status.is_finished() {
            return None;
        }
        mission.status = MissionStatus::InProgress(step);
        Some(mission.clone())
    }

    /// InProgress → Completed
    pub async fn complete(&self, id: &MissionId) {
        if let Some(mission) = self.missions.write().await.get_mut(id) {
            if matches!(mission.status, MissionStatus::InProgress(_)) {
                mission.status = MissionStatus::Completed;
            }
        }
    }

    /// Drop completed and cancelled missions, returning how many were removed
    pub async fn evict_finished(&self) -> usize {
        let mut missions = self.missions.write().await;
        let before = missions.len();
        missions.retain(|_, mission| !mission.status.is_finished());
        before - missions.len()
    }
}
