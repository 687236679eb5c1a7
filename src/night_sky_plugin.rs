//! Star field and moon, shown while the atmosphere is in (or fading into)
//! night.
//!
//! Both are spawned hidden. The day/night cycle drives their visibility,
//! opacity and (for the moon) position.

use bevy::{
    asset::RenderAssetUsages, camera::visibility::NoFrustumCulling, prelude::*,
    render::render_resource::PrimitiveTopology,
};
use bevy_rand::{global::GlobalRng, prelude::WyRand};
use rand::prelude::*;

use crate::colors::night;

/// Number of stars in the star field.
pub const STAR_COUNT: usize = 300;
/// Stars are scattered in a spherical shell between these radii, inside the
/// sky dome.
pub const STAR_SHELL: (f32, f32) = (8000.0, 9500.0);
/// Radius of the moon sphere.
pub const MOON_RADIUS: f32 = 150.0;

pub struct NightSkyPlugin;

/// Marker component for the star point cloud
#[derive(Component)]
pub struct StarField;

/// Marker component for the moon
#[derive(Component)]
pub struct Moon;

impl Plugin for NightSkyPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (spawn_star_field, spawn_moon));
    }
}

/// One generated star: position and premultiplied-intensity color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Star {
    pub position: Vec3,
    pub color: Vec3,
}

/// Scatter `count` stars uniformly over directions, with radii between
/// `inner` and `outer`. Most stars are white; roughly one in ten is blue-ish
/// and a few are red-ish.
pub fn generate_stars<R: Rng + ?Sized>(rng: &mut R, count: usize, inner: f32, outer: f32) -> Vec<Star> {
    let mut stars = Vec::with_capacity(count);
    for _ in 0..count {
        let radius = inner + rng.random::<f32>() * (outer - inner);
        let phi = (rng.random::<f32>() * 2.0 - 1.0).clamp(-1.0, 1.0).acos();
        let theta = std::f32::consts::TAU * rng.random::<f32>();
        let position = Vec3::new(
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
            radius * phi.sin() * theta.cos(),
        );

        let intensity = rng.random::<f32>() * 0.7 + 0.3;
        let tint = if rng.random::<f32>() < 0.1 {
            night::STAR_BLUE
        } else if rng.random::<f32>() < 0.05 {
            night::STAR_RED
        } else {
            night::STAR_WHITE
        };

        stars.push(Star {
            position,
            color: tint * intensity,
        });
    }
    stars
}

fn star_mesh(stars: &[Star]) -> Mesh {
    let positions: Vec<[f32; 3]> = stars.iter().map(|star| star.position.to_array()).collect();
    let colors: Vec<[f32; 4]> = stars.iter().map(|star| star.color.extend(1.0).to_array()).collect();
    // Point normals face the viewer at the center of the dome
    let normals: Vec<[f32; 3]> = stars
        .iter()
        .map(|star| (-star.position.normalize_or_zero()).to_array())
        .collect();

    Mesh::new(PrimitiveTopology::PointList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
        .with_inserted_attribute(Mesh::ATTRIBUTE_COLOR, colors)
}

fn spawn_star_field(
    mut commands: Commands,
    mut rng: Single<&mut WyRand, With<GlobalRng>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let stars = generate_stars(&mut **rng, STAR_COUNT, STAR_SHELL.0, STAR_SHELL.1);
    debug!("spawning star field with {} stars", stars.len());

    commands.spawn((
        Name::new("Star Field"),
        Mesh3d(meshes.add(star_mesh(&stars))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::WHITE.with_alpha(0.0),
            unlit: true,
            alpha_mode: AlphaMode::Blend,
            ..default()
        })),
        Transform::default(),
        Visibility::Hidden,
        NoFrustumCulling,
        StarField,
    ));
}

fn spawn_moon(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let moon_color = night::MOON;
    commands.spawn((
        Name::new("Moon"),
        Mesh3d(meshes.add(Sphere::new(MOON_RADIUS).mesh().uv(32, 16))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::linear_rgba(moon_color.x, moon_color.y, moon_color.z, 0.0),
            emissive: LinearRgba::rgb(moon_color.x, moon_color.y, moon_color.z),
            unlit: true,
            alpha_mode: AlphaMode::Blend,
            ..default()
        })),
        Transform::default(),
        Visibility::Hidden,
        NoFrustumCulling,
        Moon,
    ));
}

/// Position of the moon for a fractional `hour` of the day, on an elevated
/// arc `distance` units from the scene origin.
pub fn moon_position(hour: f32, distance: f32) -> Vec3 {
    let angle = (hour.rem_euclid(24.0) / 24.0) * std::f32::consts::TAU - std::f32::consts::FRAC_PI_2;
    Vec3::new(
        angle.cos() * distance,
        distance * 0.44 + angle.sin() * distance * 0.16,
        -distance * 0.8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;

    #[test]
    fn stars_stay_inside_the_shell() {
        let mut rng = StdRng::seed_from_u64(7);
        let stars = generate_stars(&mut rng, STAR_COUNT, STAR_SHELL.0, STAR_SHELL.1);
        assert_eq!(stars.len(), STAR_COUNT);

        for star in &stars {
            let radius = star.position.length();
            assert!(radius >= STAR_SHELL.0 - 1.0 && radius <= STAR_SHELL.1 + 1.0, "{radius}");
            assert!(star.color.max_element() <= 1.0);
            assert!(star.color.max_element() >= 0.3 * 0.8 - 1e-6);
        }
    }

    #[test]
    fn stars_cover_both_hemispheres() {
        let mut rng = StdRng::seed_from_u64(42);
        let stars = generate_stars(&mut rng, STAR_COUNT, STAR_SHELL.0, STAR_SHELL.1);
        let above = stars.iter().filter(|star| star.position.y > 0.0).count();
        assert!(above > STAR_COUNT / 4 && above < STAR_COUNT * 3 / 4, "{above} above horizon");
    }

    #[test]
    fn star_mesh_has_one_vertex_per_star() {
        let mut rng = StdRng::seed_from_u64(1);
        let stars = generate_stars(&mut rng, 10, 1.0, 2.0);
        let mesh = star_mesh(&stars);
        assert_eq!(mesh.count_vertices(), 10);
        assert_eq!(mesh.primitive_topology(), PrimitiveTopology::PointList);
    }

    #[test]
    fn moon_rises_to_its_highest_point_at_noon() {
        let noon = moon_position(12.0, 5000.0);
        let midnight = moon_position(0.0, 5000.0);
        assert!(noon.y > midnight.y);
        assert!((noon.y - 5000.0 * 0.6).abs() < 1e-2);
        assert!((midnight.y - 5000.0 * 0.28).abs() < 1e-2);
        assert!(moon_position(24.0, 5000.0).abs_diff_eq(midnight, 1e-2));
    }
}
