//! Core functionality for the Galactic Exchange simulation.
//!
//! This crate provides the virtual game clock, the calendar types derived from
//! it, configuration loading, and logging initialisation shared by every other
//! crate in the workspace.

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod time;

pub use clock::{tick_interval, GameClock};
pub use config::{
    ClockConfig, Config, HarvestConfig, LoggingConfig, SchedulerConfig, TransferErrorPolicy,
    WorkerConfig,
};
pub use error::{CoreError, Result};
pub use time::{GameDate, GameDuration, GameTime, DAYS_PER_MONTH, HOURS_PER_DAY, MONTHS_PER_YEAR};
