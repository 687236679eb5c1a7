//! Centralized day/night color definitions for the ocean scene.
//!
//! Every regime color, the water palette and the night sky tints live here so
//! the regime table, the water material and the star field stay consistent.

use bevy::prelude::Vec3;

/// Convert a `0xRRGGBB` literal into a linear-ish RGB triple in `0.0..=1.0`.
pub const fn hex(rgb: u32) -> Vec3 {
    Vec3::new(
        ((rgb >> 16) & 0xff) as f32 / 255.0,
        ((rgb >> 8) & 0xff) as f32 / 255.0,
        (rgb & 0xff) as f32 / 255.0,
    )
}

/// Sun colors per regime
pub mod sun {
    use super::*;

    /// Early morning sun (pale cream)
    pub const MORNING_START: Vec3 = hex(0xfff5d6);
    /// Late morning / noon sun (white)
    pub const MORNING_END: Vec3 = hex(0xffffff);
    /// Early afternoon (warm gold)
    pub const AFTERNOON: Vec3 = hex(0xffd080);
    /// Golden hour (orange)
    pub const GOLDEN: Vec3 = hex(0xff9a40);
    /// Sunset (deep red-orange)
    pub const SUNSET: Vec3 = hex(0xff3300);
    /// No sun light at night
    pub const NIGHT: Vec3 = Vec3::ZERO;
    /// Base color of the visible sun disc
    pub const DISC: Vec3 = hex(0xffde66);
    /// Emissive tint of the visible sun disc
    pub const DISC_EMISSIVE: Vec3 = hex(0xffaa33);
}

/// Clear color (background) per regime
pub mod background {
    use super::*;

    /// Morning sky blue
    pub const MORNING: Vec3 = hex(0x87ceeb);
    /// Afternoon haze
    pub const AFTERNOON: Vec3 = hex(0xa8c8e0);
    /// Vivid orange-red evening sky
    pub const EVENING: Vec3 = hex(0xff4500);
    /// Intense red-orange dusk
    pub const DUSK: Vec3 = hex(0xff3300);
    /// Night
    pub const NIGHT: Vec3 = Vec3::ZERO;
}

/// Water colors for the ocean plane
pub mod water {
    use super::*;

    /// Body color of the water
    pub const BODY: Vec3 = hex(0x005a9c);
    /// Color reflected at grazing angles
    pub const REFLECTION: Vec3 = Vec3::new(0.6, 0.75, 0.9);
    /// Color reflected at grazing angles at night
    pub const REFLECTION_NIGHT: Vec3 = Vec3::new(0.05, 0.08, 0.15);
}

/// Night sky colors
pub mod night {
    use super::*;

    /// Most stars
    pub const STAR_WHITE: Vec3 = hex(0xffffff);
    /// Occasional blue-ish star
    pub const STAR_BLUE: Vec3 = hex(0xccccff);
    /// Rare red-ish star
    pub const STAR_RED: Vec3 = hex(0xffcccc);
    /// Moon surface
    pub const MOON: Vec3 = Vec3::new(0.9, 0.9, 1.0);
}

/// Helper to interpolate between night and day colors
#[inline]
pub fn lerp_day_night(night: Vec3, day: Vec3, night_factor: f32) -> Vec3 {
    Vec3::lerp(day, night, night_factor)
}
