//! Configuration management for the exchange simulation.

use crate::clock::validate_multiplier;
use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub clock: ClockConfig,
    pub scheduler: SchedulerConfig,
    pub harvest: HarvestConfig,
    pub workers: WorkerConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Game time (hours since epoch) the clock starts from
    pub initial_time: u64,
    pub speed_multiplier: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Deadline for every command bus round-trip made by a saga step
    pub command_timeout_ms: u64,
    /// Buffer of the event scheduler's request queue
    pub request_buffer: usize,
    pub transfer_error_policy: TransferErrorPolicy,
}

/// What a transfer step does when taking goods out of storage fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransferErrorPolicy {
    /// Report the error and carry on with the originally requested amount.
    #[default]
    UseRequestedAmount,
    /// Report the error and stop the step.
    Abort,
    /// Re-issue the failed call up to `attempts` more times, then abort.
    Retry { attempts: u32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    /// Units harvested per resource before bonuses
    pub base_yield: u32,
    pub bonus: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    pub corporation: usize,
    pub world: usize,
    pub channel_capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    pub level: String,
    pub json: bool,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            initial_time: 0,
            speed_multiplier: 1.0,
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            command_timeout_ms: 5_000,
            request_buffer: 256,
            transfer_error_policy: TransferErrorPolicy::default(),
        }
    }
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            base_yield: 100,
            bonus: 2,
        }
    }
}

impl HarvestConfig {
    pub fn harvested_amount(&self) -> u32 {
        self.base_yield.saturating_mul(self.bonus)
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            corporation: 8,
            world: 8,
            channel_capacity: 100,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl Config {
    #[cfg(feature = "toml")]
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| CoreError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self::default()
    }

    /// Reject values the runtime cannot work with.
    pub fn validate(&self) -> Result<()> {
        validate_multiplier(self.clock.speed_multiplier)?;
        if self.workers.corporation == 0 || self.workers.world == 0 {
            return Err(CoreError::Config(
                "worker pools need at least one worker".to_string(),
            ));
        }
        if self.workers.channel_capacity == 0 || self.scheduler.request_buffer == 0 {
            return Err(CoreError::Config(
                "channel capacities must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn command_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.scheduler.command_timeout_ms)
    }
}
