//! Lighting regimes, their wall-clock windows and their static profiles.
//!
//! The day is tiled by one half-open window per [`Regime`]. [`classify`] maps a
//! time of day onto that tiling, and [`Regime::profile`] looks up the regime's
//! atmospheric and color coefficients.

use bevy::prelude::*;
use chrono::{NaiveTime, Timelike};

use crate::colors::{background, sun};

const SECONDS_PER_DAY: u32 = 24 * 60 * 60;

/// A named lighting condition active over a contiguous wall-clock window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Regime {
    Morning,
    Evening1,
    Evening2,
    Night,
}

impl Regime {
    /// Every regime, in day order starting from the morning.
    pub const ALL: [Regime; 4] = [
        Regime::Morning,
        Regime::Evening1,
        Regime::Evening2,
        Regime::Night,
    ];

    pub const fn index(self) -> usize {
        match self {
            Regime::Morning => 0,
            Regime::Evening1 => 1,
            Regime::Evening2 => 2,
            Regime::Night => 3,
        }
    }

    pub fn window(self) -> &'static RegimeWindow {
        &WINDOWS[self.index()]
    }

    pub fn profile(self) -> &'static RegimeProfile {
        &PROFILES[self.index()]
    }

    pub fn is_night(self) -> bool {
        self.profile().is_night
    }

    pub const fn label(self) -> &'static str {
        match self {
            Regime::Morning => "Morning",
            Regime::Evening1 => "Afternoon",
            Regime::Evening2 => "Sunset",
            Regime::Night => "Night",
        }
    }
}

/// Wall-clock window of a regime, `[start, end)` in minutes after midnight.
///
/// A window whose end is not after its start wraps past midnight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegimeWindow {
    pub start_minute: u32,
    pub end_minute: u32,
    /// Whether the regime reports progress through its window. Regimes that
    /// don't always report `0.0`.
    pub progressive: bool,
}

impl RegimeWindow {
    const fn new(start_hour: u32, end_hour: u32, progressive: bool) -> Self {
        Self {
            start_minute: start_hour * 60,
            end_minute: end_hour * 60,
            progressive,
        }
    }

    fn start_second(&self) -> u32 {
        self.start_minute * 60
    }

    /// Length of the window in seconds, accounting for wrap-around.
    pub fn len_seconds(&self) -> u32 {
        let start = self.start_second();
        let end = self.end_minute * 60;
        (end + SECONDS_PER_DAY - start - 1) % SECONDS_PER_DAY + 1
    }

    /// Seconds elapsed since the window opened, if `second` lies inside it.
    fn offset_of(&self, second: u32) -> Option<u32> {
        let offset = (second + SECONDS_PER_DAY - self.start_second()) % SECONDS_PER_DAY;
        (offset < self.len_seconds()).then_some(offset)
    }
}

static WINDOWS: [RegimeWindow; 4] = [
    // Morning
    RegimeWindow::new(8, 14, true),
    // Evening1
    RegimeWindow::new(14, 16, true),
    // Evening2
    RegimeWindow::new(16, 18, true),
    // Night
    RegimeWindow::new(18, 8, false),
];

/// Static lighting coefficients for one regime.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegimeProfile {
    /// Haze in the Preetham sky model
    pub turbidity: f32,
    /// Rayleigh scattering strength
    pub rayleigh: f32,
    /// Mie scattering coefficient
    pub mie_coefficient: f32,
    /// Mie directional anisotropy (g)
    pub mie_directional_g: f32,
    /// Sun elevation above the horizon when the window opens, in degrees
    pub elevation_start: f32,
    /// Sun elevation when the window closes, in degrees
    pub elevation_end: f32,
    /// Sun azimuth in degrees
    pub azimuth: f32,
    pub sun_color_start: Vec3,
    pub sun_color_end: Vec3,
    pub background_start: Vec3,
    pub background_end: Vec3,
    /// Directional light strength as a fraction of the configured maximum
    pub illuminance: f32,
    pub is_night: bool,
}

static PROFILES: [RegimeProfile; 4] = [
    // Morning
    RegimeProfile {
        turbidity: 8.0,
        rayleigh: 3.0,
        mie_coefficient: 0.005,
        mie_directional_g: 0.8,
        elevation_start: 15.0,
        elevation_end: 40.0,
        azimuth: 180.0,
        sun_color_start: sun::MORNING_START,
        sun_color_end: sun::MORNING_END,
        background_start: background::MORNING,
        background_end: background::AFTERNOON,
        illuminance: 1.0,
        is_night: false,
    },
    // Evening1
    RegimeProfile {
        turbidity: 20.0,
        rayleigh: 1.0,
        mie_coefficient: 0.008,
        mie_directional_g: 0.9,
        elevation_start: 35.0,
        elevation_end: 15.0,
        azimuth: 180.0,
        sun_color_start: sun::AFTERNOON,
        sun_color_end: sun::GOLDEN,
        background_start: background::AFTERNOON,
        background_end: background::EVENING,
        illuminance: 0.8,
        is_night: false,
    },
    // Evening2
    RegimeProfile {
        turbidity: 30.0,
        rayleigh: 0.1,
        mie_coefficient: 0.01,
        mie_directional_g: 0.95,
        elevation_start: 15.0,
        elevation_end: -3.0,
        azimuth: 180.0,
        sun_color_start: sun::GOLDEN,
        sun_color_end: sun::SUNSET,
        background_start: background::EVENING,
        background_end: background::DUSK,
        illuminance: 0.5,
        is_night: false,
    },
    // Night
    RegimeProfile {
        turbidity: 2.0,
        rayleigh: 0.01,
        mie_coefficient: 0.001,
        mie_directional_g: 0.7,
        elevation_start: -5.0,
        elevation_end: -5.0,
        azimuth: 180.0,
        sun_color_start: sun::NIGHT,
        sun_color_end: sun::NIGHT,
        background_start: background::NIGHT,
        background_end: background::NIGHT,
        illuminance: 0.0,
        is_night: true,
    },
];

/// Map a time of day to its regime and the progress through that regime's
/// window.
///
/// Windows are half-open, so a time exactly on a boundary belongs to the
/// regime that starts there.
pub fn classify(now: NaiveTime) -> (Regime, f32) {
    let second = now.num_seconds_from_midnight();

    for regime in Regime::ALL {
        let window = regime.window();
        if let Some(offset) = window.offset_of(second) {
            let progress = if window.progressive {
                (offset as f32 / window.len_seconds() as f32).clamp(0.0, 1.0)
            } else {
                0.0
            };
            return (regime, progress);
        }
    }

    // The windows tile the whole day; reaching this means the table has a gap.
    warn!("no regime window covers {now}, falling back to night");
    (Regime::Night, 0.0)
}
