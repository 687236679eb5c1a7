use bevy::{asset::embedded_asset, prelude::*, render::render_resource::*, shader::ShaderRef};

const SKY_SHADER_PATH: &str = "embedded://bevy_ocean_sky/shaders/sky_shader.wgsl";

/// Radius of the sky dome sphere.
pub const SKY_DOME_RADIUS: f32 = 10000.0;

pub struct SkyPlugin;

/// Preetham sky parameters that can be modified at runtime.
#[derive(Resource, Clone, Copy, Debug, PartialEq, ShaderType)]
pub struct SkyParams {
    /// Amount of haze in the atmosphere (2 = very clear, 30+ = heavy haze)
    pub turbidity: f32,
    /// Rayleigh scattering strength, mostly responsible for the blue of the sky
    pub rayleigh: f32,
    /// Mie scattering coefficient, responsible for the glow around the sun
    pub mie_coefficient: f32,
    /// Mie directional anisotropy, how tightly the glow hugs the sun
    pub mie_directional_g: f32,

    // Sun state (updated by the day/night cycle)
    /// Normalized sun direction vector
    pub sun_position: Vec3,
    /// World up axis the zenith is measured from
    pub up: Vec3,
}

impl Default for SkyParams {
    fn default() -> Self {
        Self {
            turbidity: 10.0,
            rayleigh: 2.0,
            mie_coefficient: 0.005,
            mie_directional_g: 0.8,
            sun_position: Vec3::new(0.0, 0.3, -1.0).normalize(),
            up: Vec3::Y,
        }
    }
}

/// Material for the procedural sky dome
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct SkyMaterial {
    #[uniform(0)]
    pub params: SkyParams,
}

impl Material for SkyMaterial {
    fn fragment_shader() -> ShaderRef {
        SKY_SHADER_PATH.into()
    }

    fn vertex_shader() -> ShaderRef {
        SKY_SHADER_PATH.into()
    }
}

/// Marker component for the sky dome entity
#[derive(Component)]
pub struct SkyDome;

impl Plugin for SkyPlugin {
    fn build(&self, app: &mut App) {
        let strip_prefix = "src/";
        embedded_asset!(app, strip_prefix, "./shaders/sky_shader.wgsl");

        app.init_resource::<SkyParams>();
        app.add_plugins(MaterialPlugin::<SkyMaterial>::default());
        app.add_systems(Startup, spawn_sky_dome);
        // After the day/night cycle has written this frame's sun
        app.add_systems(PostUpdate, sync_sky_params);
    }
}

/// Spawn the sky dome as a large inverted sphere
fn spawn_sky_dome(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<SkyMaterial>>,
    sky_params: Res<SkyParams>,
) {
    let mut sky_mesh = Sphere::new(SKY_DOME_RADIUS).mesh().uv(64, 32);

    // Invert winding so we can see the mesh from inside
    if let Err(err) = sky_mesh.invert_winding() {
        warn!("sky dome winding left as-is: {err}");
    }

    commands.spawn((
        Mesh3d(meshes.add(sky_mesh)),
        MeshMaterial3d(materials.add(SkyMaterial {
            params: *sky_params,
        })),
        Transform::from_translation(Vec3::ZERO),
        SkyDome,
    ));
}

/// System to sync SkyParams resource to sky materials
pub(crate) fn sync_sky_params(
    sky_params: Res<SkyParams>,
    mut materials: ResMut<Assets<SkyMaterial>>,
    query: Query<&MeshMaterial3d<SkyMaterial>, With<SkyDome>>,
) {
    if !sky_params.is_changed() {
        return;
    }

    for material_handle in query.iter() {
        if let Some(material) = materials.get_mut(material_handle) {
            material.params = *sky_params;
        }
    }
}
