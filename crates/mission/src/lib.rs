//! Mission scheduling for the exchange simulation
//!
//! Missions are sagas: a mission request becomes a fixed sequence of steps,
//! each registered as an [`Event`] on the [`EventScheduler`]. The scheduler
//! fires events in game-time order as the clock advances and hands them to a
//! [`MissionExecutor`], which runs the step against the corporation and world
//! subsystems through the command bus.

pub mod error;
pub mod event;
pub mod mission;
pub mod orchestrator;
pub mod queue;
pub mod saga;
pub mod scheduler;
pub mod steps;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{MissionError, Result, SchedulerError};
pub use event::{Event, EventId, MissionId};
pub use mission::{Mission, MissionRegistry, MissionStatus};
pub use orchestrator::{MissionExecutor, MissionScheduler};
pub use queue::EventQueue;
pub use saga::SagaStep;
pub use scheduler::{EventExecutor, EventScheduler, IdGenerator, SchedulerHandle, UuidGenerator};
pub use steps::StepContext;
