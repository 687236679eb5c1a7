//! Systems that write the blended [`SkyParameters`] into the scene.
//!
//! Every target is optional. A missing resource or entity skips that write
//! for the frame, and the write happens on a later frame once it exists.

use bevy::prelude::*;

use crate::blend::SkyParameters;
use crate::clock::WallClock;
use crate::colors::{lerp_day_night, night, water};
use crate::day_night_plugin::{DayNightConfig, SunDisc, SunLight};
use crate::night_sky_plugin::{Moon, StarField, moon_position};
use crate::sky_plugin::SkyParams;
use crate::water_plugin::WaterParams;

fn to_color(rgb: Vec3) -> Color {
    Color::linear_rgb(rgb.x, rgb.y, rgb.z)
}

fn visibility_for(visible: bool) -> Visibility {
    if visible {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    }
}

/// Star opacity for a night factor, with a slow twinkle.
pub fn star_opacity(night_factor: f32, elapsed_secs: f32) -> f32 {
    (night_factor * (0.8 + (elapsed_secs * 2.0).sin() * 0.1)).clamp(0.0, 1.0)
}

/// Ambient brightness, dimmed to a moonlit floor at night.
pub fn ambient_brightness(config: &DayNightConfig, night_factor: f32) -> f32 {
    let night = config.ambient_brightness * 0.1;
    night + (config.ambient_brightness - night) * (1.0 - night_factor)
}

/// Sky dome uniforms, water lighting and the clear color.
pub(crate) fn apply_sky_params(
    params: Res<SkyParameters>,
    sky: Option<ResMut<SkyParams>>,
    water_params: Option<ResMut<WaterParams>>,
    clear_color: Option<ResMut<ClearColor>>,
) {
    // The sky and the water must see the same sun
    let sun_direction = params.sun_direction;

    if let Some(mut sky) = sky {
        let next = SkyParams {
            turbidity: params.turbidity,
            rayleigh: params.rayleigh,
            mie_coefficient: params.mie_coefficient,
            mie_directional_g: params.mie_directional_g,
            sun_position: sun_direction,
            ..*sky
        };
        sky.set_if_neq(next);
    }

    if let Some(mut water_params) = water_params {
        let next = WaterParams {
            sun_direction,
            sun_color: params.sun_color,
            reflection_color: lerp_day_night(
                water::REFLECTION_NIGHT,
                water::REFLECTION,
                params.night_factor,
            ),
            ..*water_params
        };
        water_params.set_if_neq(next);
    }

    if let Some(mut clear_color) = clear_color {
        let background = to_color(params.background);
        if clear_color.0 != background {
            clear_color.0 = background;
        }
    }
}

pub(crate) fn apply_sun_light(
    config: Res<DayNightConfig>,
    params: Res<SkyParameters>,
    ambient: Option<ResMut<AmbientLight>>,
    mut sun_light_query: Query<(&mut DirectionalLight, &mut Transform), With<SunLight>>,
) {
    if let Some(mut ambient) = ambient {
        let day = params.background.max(Vec3::splat(0.5));
        let tint = lerp_day_night(night::MOON, day, params.night_factor);
        ambient.color = to_color(tint);
        ambient.brightness = ambient_brightness(&config, params.night_factor);
    }

    for (mut light, mut transform) in sun_light_query.iter_mut() {
        // Light direction is opposite to sun direction (light points toward the scene)
        *transform = Transform::default().looking_to(-params.sun_direction, Vec3::Y);
        light.color = to_color(params.sun_color);
        light.illuminance = config.max_illuminance * params.illuminance;
    }
}

pub(crate) fn apply_sun_disc(
    config: Res<DayNightConfig>,
    params: Res<SkyParameters>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut sun_disc_query: Query<
        (&mut Transform, &mut Visibility, &MeshMaterial3d<StandardMaterial>),
        With<SunDisc>,
    >,
) {
    let Ok((mut transform, mut visibility, material_handle)) = sun_disc_query.single_mut() else {
        return;
    };

    let day_factor = 1.0 - params.night_factor;
    transform.translation = params.sun_direction * config.sun_distance;
    *visibility = visibility_for(day_factor > 0.0);

    if let Some(material) = materials.get_mut(material_handle) {
        let color = params.sun_color;
        material.base_color = Color::linear_rgba(color.x, color.y, color.z, day_factor);
        let glow = color * 2.0 * day_factor;
        material.emissive = LinearRgba::rgb(glow.x, glow.y, glow.z);
    }
}

pub(crate) fn apply_night_sky(
    config: Res<DayNightConfig>,
    params: Res<SkyParameters>,
    clock: Res<WallClock>,
    time: Res<Time>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut star_query: Query<
        (&mut Visibility, &MeshMaterial3d<StandardMaterial>),
        (With<StarField>, Without<Moon>),
    >,
    mut moon_query: Query<
        (&mut Visibility, &mut Transform, &MeshMaterial3d<StandardMaterial>),
        (With<Moon>, Without<StarField>),
    >,
) {
    let night_factor = params.night_factor;
    let visible = night_factor > 0.0;

    for (mut visibility, material_handle) in star_query.iter_mut() {
        *visibility = visibility_for(visible);
        if let Some(material) = materials.get_mut(material_handle) {
            material
                .base_color
                .set_alpha(star_opacity(night_factor, time.elapsed_secs()));
        }
    }

    for (mut visibility, mut transform, material_handle) in moon_query.iter_mut() {
        *visibility = visibility_for(visible);
        transform.translation = moon_position(clock.hour(), config.moon_distance);
        if let Some(material) = materials.get_mut(material_handle) {
            material.base_color.set_alpha(night_factor);
        }
    }
}
