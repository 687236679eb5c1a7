use bevy::{asset::embedded_asset, prelude::*, render::render_resource::*, shader::ShaderRef};

use crate::colors::{sun, water};

const WATER_SHADER_PATH: &str = "embedded://bevy_ocean_sky/shaders/water_shader.wgsl";

pub struct WaterPlugin;

/// Water rendering parameters that can be modified at runtime.
#[derive(Resource, Clone, Copy, Debug, PartialEq, ShaderType)]
pub struct WaterParams {
    // Sun state (updated by the day/night cycle)
    /// Normalized direction towards the sun, shared with the sky dome
    pub sun_direction: Vec3,
    /// Color of the sun highlight on the water
    pub sun_color: Vec3,

    /// Body color of the water
    pub water_color: Vec3,
    /// Sky color reflected at grazing angles
    pub reflection_color: Vec3,
    /// How strongly the waves bend the surface normal
    pub distortion_scale: f32,
    /// Scale of the wave pattern in world units
    pub wave_scale: f32,
    /// Animation time (advanced each frame)
    pub time: f32,
}

impl Default for WaterParams {
    fn default() -> Self {
        Self {
            sun_direction: Vec3::new(0.0, 0.3, -1.0).normalize(),
            sun_color: sun::MORNING_END,
            water_color: water::BODY,
            reflection_color: water::REFLECTION,
            distortion_scale: 3.7,
            wave_scale: 0.05,
            time: 0.0,
        }
    }
}

/// Material for the ocean plane
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct WaterMaterial {
    #[uniform(0)]
    pub params: WaterParams,
}

impl Material for WaterMaterial {
    fn fragment_shader() -> ShaderRef {
        WATER_SHADER_PATH.into()
    }

    fn vertex_shader() -> ShaderRef {
        WATER_SHADER_PATH.into()
    }
}

/// Marker component for the water body entity
#[derive(Component)]
pub struct WaterBody;

impl Plugin for WaterPlugin {
    fn build(&self, app: &mut App) {
        let strip_prefix = "src/";
        embedded_asset!(app, strip_prefix, "./shaders/water_shader.wgsl");

        app.init_resource::<WaterParams>();
        app.add_plugins(MaterialPlugin::<WaterMaterial>::default());
        app.add_systems(Startup, spawn_water);
        app.add_systems(Update, update_water_time);
        app.add_systems(PostUpdate, sync_water_params);
    }
}

fn spawn_water(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<WaterMaterial>>,
    water_params: Res<WaterParams>,
) {
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(10000.0, 10000.0))),
        MeshMaterial3d(materials.add(WaterMaterial {
            params: *water_params,
        })),
        Transform::from_translation(Vec3::ZERO),
        WaterBody,
    ));
}

fn update_water_time(mut water_params: ResMut<WaterParams>, time: Res<Time>) {
    water_params.time = time.elapsed_secs();
}

/// System to sync WaterParams resource to water materials
pub(crate) fn sync_water_params(
    water_params: Res<WaterParams>,
    mut materials: ResMut<Assets<WaterMaterial>>,
    query: Query<&MeshMaterial3d<WaterMaterial>, With<WaterBody>>,
) {
    if !water_params.is_changed() {
        return;
    }

    for material_handle in query.iter() {
        if let Some(material) = materials.get_mut(material_handle) {
            material.params = *water_params;
        }
    }
}
