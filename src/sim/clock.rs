//! Tick time source for the simulator.
//!
//! Production runs read the wall clock (optionally shifted by a fractional
//! hour offset, handy for demoing night/day transitions without waiting).
//! Tests pin the hour with [`SimClock::fixed_hour`] so every draw downstream
//! of the time factor is reproducible.

use chrono::{DateTime, Local, Timelike};

/// Epoch of 2024-06-15 00:00:00 UTC; fixed-hour timestamps are derived from
/// this date so repeated runs compare equal.
const FIXED_BASE_EPOCH_SECS: i64 = 1_718_409_600;

/// The time coordinates of one tick.
#[derive(Debug, Clone)]
pub struct TickTime {
    /// Full timestamp placed into the snapshot.
    pub timestamp: DateTime<Local>,
    /// Fractional hour of day in `[0, 24)` driving the diurnal curves.
    pub hour: f32,
}

impl TickTime {
    /// "HH:MM" label used by alerts and historical points.
    pub fn label(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }
}

/// Where the simulator gets its notion of "now" from.
#[derive(Debug, Clone)]
pub enum SimClock {
    /// Wall clock, with `hour_offset` added to the fractional hour
    /// (wrapping modulo 24).
    Wall { hour_offset: f32 },
    /// A pinned fractional hour; timestamp is derived from a fixed date so
    /// output is fully deterministic.
    Fixed { hour: f32 },
}

impl SimClock {
    /// Wall clock with no offset.
    pub fn wall() -> Self {
        Self::Wall { hour_offset: 0.0 }
    }

    /// Wall clock shifted by a fractional hour offset.
    pub fn wall_with_offset(hour_offset: f32) -> Self {
        Self::Wall { hour_offset }
    }

    /// Pinned fractional hour, wrapped into `[0, 24)`.
    pub fn fixed_hour(hour: f32) -> Self {
        Self::Fixed {
            hour: hour.rem_euclid(24.0),
        }
    }

    /// The current tick time.
    pub fn now(&self) -> TickTime {
        match *self {
            Self::Wall { hour_offset } => {
                let timestamp = Local::now();
                let hour = (timestamp.hour() as f32
                    + timestamp.minute() as f32 / 60.0
                    + hour_offset)
                    .rem_euclid(24.0);
                TickTime { timestamp, hour }
            }
            Self::Fixed { hour } => {
                let secs = FIXED_BASE_EPOCH_SECS + (hour * 3600.0) as i64;
                let timestamp = DateTime::from_timestamp(secs, 0)
                    .unwrap_or_default()
                    .with_timezone(&Local);
                TickTime { timestamp, hour }
            }
        }
    }
}
