//! Virtual game time.
//!
//! One unit of [`GameTime`] is one in-game hour. Calendar fields are derived
//! from the hour count using a fixed calendar of 24-hour days, 30-day months
//! and 12-month years.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// Hours in one game day.
pub const HOURS_PER_DAY: u64 = 24;
/// Days in one game month.
pub const DAYS_PER_MONTH: u64 = 30;
/// Months in one game year.
pub const MONTHS_PER_YEAR: u64 = 12;

/// A point on the virtual timeline, counted in hours since the epoch.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct GameTime(u64);

/// A span of virtual time, counted in hours.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct GameDuration(u64);

impl GameDuration {
    /// One hour.
    pub const HOUR: GameDuration = GameDuration(1);
    /// One day.
    pub const DAY: GameDuration = GameDuration(HOURS_PER_DAY);
    /// One month.
    pub const MONTH: GameDuration = GameDuration(HOURS_PER_DAY * DAYS_PER_MONTH);
    /// One year.
    pub const YEAR: GameDuration = GameDuration(HOURS_PER_DAY * DAYS_PER_MONTH * MONTHS_PER_YEAR);
    /// No time at all.
    pub const ZERO: GameDuration = GameDuration(0);

    pub const fn hours(hours: u64) -> Self {
        Self(hours)
    }

    pub const fn days(days: u64) -> Self {
        Self(days * HOURS_PER_DAY)
    }

    pub const fn as_hours(self) -> u64 {
        self.0
    }
}

/// Calendar view of a [`GameTime`]. Year, month and day are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameDate {
    pub year: u64,
    pub month: u64,
    pub day: u64,
    pub hour: u64,
}

impl GameTime {
    /// The start of the first year.
    pub const EPOCH: GameTime = GameTime(0);

    pub const fn new(hours: u64) -> Self {
        Self(hours)
    }

    /// Convert a 1-based calendar date into game time.
    ///
    /// Components below 1 are clamped to 1.
    pub fn from_date(year: u64, month: u64, day: u64, hour: u64) -> Self {
        let year_hours = year.saturating_sub(1) * GameDuration::YEAR.as_hours();
        let month_hours = month.saturating_sub(1) * GameDuration::MONTH.as_hours();
        let day_hours = day.saturating_sub(1) * HOURS_PER_DAY;
        Self(year_hours + month_hours + day_hours + hour)
    }

    pub const fn as_hours(self) -> u64 {
        self.0
    }

    /// Returns true if `self` is strictly later than `other`.
    pub fn after(self, other: GameTime) -> bool {
        self > other
    }

    /// Returns true if `self` is strictly earlier than `other`.
    pub fn before(self, other: GameTime) -> bool {
        self < other
    }

    pub fn add(self, duration: GameDuration) -> GameTime {
        GameTime(self.0.saturating_add(duration.0))
    }

    /// True when this instant is the first hour of a day.
    pub fn is_day_boundary(self) -> bool {
        self.0 % HOURS_PER_DAY == 0
    }

    pub fn hour(self) -> u64 {
        self.0 % HOURS_PER_DAY
    }

    pub fn day(self) -> u64 {
        (self.0 / HOURS_PER_DAY) % DAYS_PER_MONTH + 1
    }

    pub fn month(self) -> u64 {
        (self.0 / GameDuration::MONTH.as_hours()) % MONTHS_PER_YEAR + 1
    }

    pub fn year(self) -> u64 {
        self.0 / GameDuration::YEAR.as_hours() + 1
    }

    pub fn date(self) -> GameDate {
        GameDate {
            year: self.year(),
            month: self.month(),
            day: self.day(),
            hour: self.hour(),
        }
    }
}

impl Add<GameDuration> for GameTime {
    type Output = GameTime;

    fn add(self, rhs: GameDuration) -> Self::Output {
        GameTime::add(self, rhs)
    }
}

impl From<u64> for GameTime {
    fn from(hours: u64) -> Self {
        GameTime(hours)
    }
}

impl fmt::Display for GameTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for GameDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Year: {}, Month: {}, Day: {}, Hour: {}",
            self.year, self.month, self.day, self.hour
        )
    }
}
