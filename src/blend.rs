use bevy::prelude::*;

use crate::atmosphere::AtmosphereState;
use crate::regime::RegimeProfile;

/// Instantaneous sky, sun and night parameters, ready to be applied to the
/// scene.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct SkyParameters {
    pub turbidity: f32,
    pub rayleigh: f32,
    pub mie_coefficient: f32,
    pub mie_directional_g: f32,
    /// Sun elevation above the horizon in degrees
    pub elevation: f32,
    /// Sun azimuth in degrees
    pub azimuth: f32,
    pub sun_color: Vec3,
    /// Normalized direction from the scene towards the sun
    pub sun_direction: Vec3,
    pub background: Vec3,
    /// Directional light strength as a fraction of the configured maximum
    pub illuminance: f32,
    /// 0.0 in daylight, 1.0 at full night
    pub night_factor: f32,
}

#[inline]
fn mix(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

#[inline]
fn mix3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a * (1.0 - t) + b * t
}

impl SkyParameters {
    /// Cross-fade towards `other`. `t == 1.0` returns `other` exactly.
    pub fn lerp(&self, other: &SkyParameters, t: f32) -> SkyParameters {
        let elevation = mix(self.elevation, other.elevation, t);
        let azimuth = mix(self.azimuth, other.azimuth, t);
        SkyParameters {
            turbidity: mix(self.turbidity, other.turbidity, t),
            rayleigh: mix(self.rayleigh, other.rayleigh, t),
            mie_coefficient: mix(self.mie_coefficient, other.mie_coefficient, t),
            mie_directional_g: mix(self.mie_directional_g, other.mie_directional_g, t),
            elevation,
            azimuth,
            sun_color: mix3(self.sun_color, other.sun_color, t),
            sun_direction: sun_direction(elevation, azimuth),
            background: mix3(self.background, other.background, t),
            illuminance: mix(self.illuminance, other.illuminance, t),
            night_factor: mix(self.night_factor, other.night_factor, t),
        }
    }
}

impl Default for SkyParameters {
    fn default() -> Self {
        crate::regime::Regime::Morning.profile().sample(0.0)
    }
}

impl RegimeProfile {
    /// Parameters of this regime at `progress` through its window.
    pub fn sample(&self, progress: f32) -> SkyParameters {
        let p = progress.clamp(0.0, 1.0);
        let elevation = mix(self.elevation_start, self.elevation_end, p);
        SkyParameters {
            turbidity: self.turbidity,
            rayleigh: self.rayleigh,
            mie_coefficient: self.mie_coefficient,
            mie_directional_g: self.mie_directional_g,
            elevation,
            azimuth: self.azimuth,
            sun_color: mix3(self.sun_color_start, self.sun_color_end, p),
            sun_direction: sun_direction(elevation, self.azimuth),
            background: mix3(self.background_start, self.background_end, p),
            illuminance: self.illuminance,
            night_factor: if self.is_night { 1.0 } else { 0.0 },
        }
    }
}

/// Y-up unit vector for a sun at `elevation` degrees above the horizon and
/// `azimuth` degrees around the vertical axis.
pub fn sun_direction(elevation: f32, azimuth: f32) -> Vec3 {
    let phi = (90.0 - elevation).to_radians();
    let theta = azimuth.to_radians();
    Vec3::new(
        phi.sin() * theta.sin(),
        phi.cos(),
        phi.sin() * theta.cos(),
    )
    .normalize_or(Vec3::Y)
}

/// Blend the current atmosphere: the cross-fade start point towards the
/// target regime sampled at the live intra-regime progress.
pub fn blend(state: &AtmosphereState) -> SkyParameters {
    let target = state.target.profile().sample(state.intra_progress);
    state.from.lerp(&target, state.cross_fade)
}
