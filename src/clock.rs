use bevy::prelude::*;
use chrono::{Local, NaiveTime, TimeDelta, Timelike};

/// Source of the wall-clock time of day that drives the atmosphere.
///
/// By default this is the local time. `offset_minutes` shifts it, which the
/// demo exposes as a slider. `pinned` replaces it with a fixed time.
#[derive(Resource, Clone, Copy, Debug, Default)]
pub struct WallClock {
    /// Minutes added to the time of day (may be negative).
    pub offset_minutes: f32,
    /// Fixed time of day used instead of the local clock.
    pub pinned: Option<NaiveTime>,
}

impl WallClock {
    /// A clock frozen at `time`.
    pub fn pinned(time: NaiveTime) -> Self {
        Self {
            pinned: Some(time),
            ..default()
        }
    }

    /// The current time of day, wrapping around midnight.
    pub fn now(&self) -> NaiveTime {
        let base = self.pinned.unwrap_or_else(|| Local::now().time());
        let offset = TimeDelta::milliseconds((self.offset_minutes * 60_000.0) as i64);
        base.overflowing_add_signed(offset).0
    }

    /// Fractional hour of the day in `0.0..24.0`.
    pub fn hour(&self) -> f32 {
        hour_of(self.now())
    }
}

pub fn hour_of(time: NaiveTime) -> f32 {
    time.num_seconds_from_midnight() as f32 / 3600.0
}
