//! Variable-speed virtual game clock.
//!
//! The clock owns the current [`GameTime`] and advances it by one hour per
//! wall-clock tick. The tick period is derived from a speed multiplier: at a
//! multiplier of 1.0 one game year (365 × 24 ticks) passes per wall-clock hour.
//!
//! Three kinds of observers are supported:
//! - plain reads through [`GameClock::current_time`],
//! - a watch channel that sees every change (used by the event scheduler to
//!   sleep until its next event is due),
//! - a broadcast of day boundaries for slower consumers such as pricing
//!   analytics.

use crate::config::ClockConfig;
use crate::error::{CoreError, Result};
use crate::time::{GameDate, GameTime, GameDuration, HOURS_PER_DAY};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

/// Capacity of the day-boundary broadcast. Subscribers lagging further behind
/// lose the oldest boundaries.
const DAY_BROADCAST_CAPACITY: usize = 64;

/// Wall-clock hours used to derive the tick period at multiplier 1.0.
const HOURS_IN_YEAR: f64 = 365.0 * HOURS_PER_DAY as f64;

/// Shortest tick period the clock will run at.
const MIN_TICK: Duration = Duration::from_nanos(1);

fn raw_tick_interval(multiplier: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(3600.0 / multiplier / HOURS_IN_YEAR).ok()
}

/// Wall-clock period of one game hour at the given speed multiplier, never
/// shorter than one nanosecond.
pub fn tick_interval(multiplier: f64) -> Duration {
    raw_tick_interval(multiplier)
        .unwrap_or(Duration::MAX)
        .max(MIN_TICK)
}

/// Accept multipliers that give a representable, non-zero tick period.
pub(crate) fn validate_multiplier(multiplier: f64) -> Result<f64> {
    let usable = multiplier.is_finite()
        && multiplier > 0.0
        && raw_tick_interval(multiplier).is_some_and(|period| period >= MIN_TICK);
    if usable {
        Ok(multiplier)
    } else {
        Err(CoreError::InvalidMultiplier(multiplier))
    }
}

/// Virtual time source shared by every subsystem.
///
/// The watch channel's internal lock is the clock's read/write lock: readers
/// borrow it, `update` and `advance` modify it in place.
#[derive(Debug)]
pub struct GameClock {
    time: watch::Sender<GameTime>,
    speed: watch::Sender<f64>,
    days: broadcast::Sender<GameTime>,
}

impl GameClock {
    /// Create a clock starting at `initial_time` running at `multiplier`.
    pub fn new(initial_time: GameTime, multiplier: f64) -> Result<Self> {
        let multiplier = validate_multiplier(multiplier)?;
        let (time, _) = watch::channel(initial_time);
        let (speed, _) = watch::channel(multiplier);
        let (days, _) = broadcast::channel(DAY_BROADCAST_CAPACITY);

        Ok(Self { time, speed, days })
    }

    pub fn from_config(config: &ClockConfig) -> Result<Self> {
        Self::new(GameTime::new(config.initial_time), config.speed_multiplier)
    }

    pub fn current_time(&self) -> GameTime {
        *self.time.borrow()
    }

    pub fn current_date(&self) -> GameDate {
        self.current_time().date()
    }

    /// Advance time by one hour. Called once per tick by [`GameClock::run`].
    pub fn update(&self) -> GameTime {
        self.advance(1)
    }

    /// Advance time by `hours` in one step, broadcasting the day boundaries
    /// crossed on the way. Only the last [`DAY_BROADCAST_CAPACITY`] boundaries
    /// are sent; older ones would be dropped by the channel anyway.
    pub fn advance(&self, hours: u64) -> GameTime {
        let mut previous = GameTime::EPOCH;
        let mut now = GameTime::EPOCH;
        self.time.send_modify(|t| {
            previous = *t;
            *t = t.add(GameDuration::hours(hours));
            now = *t;
        });

        let first_day = previous.as_hours() / HOURS_PER_DAY + 1;
        let last_day = now.as_hours() / HOURS_PER_DAY;
        if first_day > last_day {
            return now;
        }
        let sent_from = last_day
            .saturating_sub(DAY_BROADCAST_CAPACITY as u64 - 1)
            .max(first_day);
        if sent_from > first_day {
            debug!(skipped = sent_from - first_day, "day boundaries skipped");
        }
        for day in sent_from..=last_day {
            let boundary = GameTime::new(day * HOURS_PER_DAY);
            debug!(time = %boundary, "day boundary reached");
            // No subscribers is not an error: analytics may not be running.
            let _ = self.days.send(boundary);
        }

        now
    }

    /// Change the speed multiplier. A running tick loop restarts its timer
    /// with the new period; the current time is kept.
    pub fn update_ticker(&self, multiplier: f64) -> Result<()> {
        let multiplier = validate_multiplier(multiplier)?;
        self.speed.send_replace(multiplier);
        Ok(())
    }

    pub fn speed_multiplier(&self) -> f64 {
        *self.speed.borrow()
    }

    pub fn tick_interval(&self) -> Duration {
        tick_interval(self.speed_multiplier())
    }

    /// Receive the new time at every day boundary.
    pub fn subscribe_days(&self) -> broadcast::Receiver<GameTime> {
        self.days.subscribe()
    }

    /// Observe every change of the current time.
    pub fn watch(&self) -> watch::Receiver<GameTime> {
        self.time.subscribe()
    }

    /// Tick loop. Runs until the task is aborted.
    pub async fn run(self: Arc<Self>) {
        let mut speed_rx = self.speed.subscribe();
        let mut period = tick_interval(*speed_rx.borrow_and_update());
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            start = %self.current_time(),
            period_ms = period.as_millis() as u64,
            "game clock started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.update();
                }
                changed = speed_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    period = tick_interval(*speed_rx.borrow_and_update());
                    ticker = interval_at(Instant::now() + period, period);
                    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                    info!(period_ms = period.as_millis() as u64, "game clock speed changed");
                }
            }
        }
    }
}
