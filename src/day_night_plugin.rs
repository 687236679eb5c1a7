use std::time::Duration;

use bevy::{camera::visibility::NoFrustumCulling, prelude::*, time::common_conditions::on_timer};

use crate::atmosphere::AtmosphereState;
use crate::blend::{SkyParameters, blend};
use crate::clock::WallClock;
use crate::colors::sun;
use crate::regime::classify;
use crate::scene_sink;

/// Marker component for the sun directional light.
#[derive(Component)]
pub struct SunLight;

/// Marker component for the visible sun disc.
#[derive(Component)]
pub struct SunDisc;

/// Entities owned by the day/night cycle, despawned by [`teardown_atmosphere`].
#[derive(Component)]
pub struct AtmosphereEntity;

/// Radius of the visible sun disc.
const SUN_DISC_RADIUS: f32 = 200.0;

/// Configuration for the day/night cycle.
#[derive(Resource, Clone, Copy, Debug)]
pub struct DayNightConfig {
    /// How long a cross-fade between two regimes takes, in seconds.
    pub transition_duration: f32,
    /// How often the wall clock is re-classified.
    pub poll_interval: Duration,
    /// Maximum illuminance of the sun light.
    pub max_illuminance: f32,
    /// Ambient light brightness in daylight.
    pub ambient_brightness: f32,
    /// Distance of the visible sun disc from the scene origin.
    pub sun_distance: f32,
    /// Distance of the moon from the scene origin.
    pub moon_distance: f32,
}

impl Default for DayNightConfig {
    fn default() -> Self {
        Self {
            transition_duration: 8.0,
            poll_interval: Duration::from_secs(30),
            max_illuminance: 10000.0,
            ambient_brightness: 400.0,
            sun_distance: 7000.0,
            moon_distance: 5000.0,
        }
    }
}

/// Ordering of the day/night systems within a frame.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum DayNightSystems {
    /// Re-classify the wall clock (slow cadence)
    Poll,
    /// Move an in-flight cross-fade forward (every frame)
    CrossFade,
    /// Recompute the blended sky parameters
    Blend,
    /// Write the blended parameters into the scene
    Apply,
}

/// Plugin that keeps the sky, sun, water and night sky in step with the
/// real-world time of day.
pub struct DayNightCyclePlugin {
    pub config: DayNightConfig,
}

impl Default for DayNightCyclePlugin {
    fn default() -> Self {
        Self {
            config: DayNightConfig::default(),
        }
    }
}

impl DayNightCyclePlugin {
    pub fn new(transition_duration: f32) -> Self {
        Self {
            config: DayNightConfig {
                transition_duration,
                ..default()
            },
        }
    }

    pub fn with_config(config: DayNightConfig) -> Self {
        Self { config }
    }
}

impl Plugin for DayNightCyclePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config);
        app.init_resource::<WallClock>();
        app.init_resource::<SkyParameters>();

        app.add_systems(Startup, setup_atmosphere);

        app.configure_sets(
            Update,
            (
                DayNightSystems::Poll,
                DayNightSystems::CrossFade,
                DayNightSystems::Blend,
                DayNightSystems::Apply,
            )
                .chain()
                .run_if(resource_exists::<AtmosphereState>),
        );

        app.add_systems(
            Update,
            (
                poll_regime.in_set(DayNightSystems::Poll).run_if(
                    on_timer(self.config.poll_interval).or(resource_changed::<WallClock>),
                ),
                advance_cross_fade.in_set(DayNightSystems::CrossFade),
                blend_sky.in_set(DayNightSystems::Blend),
                (
                    scene_sink::apply_sky_params,
                    scene_sink::apply_sun_light,
                    scene_sink::apply_sun_disc,
                    scene_sink::apply_night_sky,
                )
                    .in_set(DayNightSystems::Apply),
            ),
        );
    }
}

/// Start the day/night cycle: creates the atmosphere state from the current
/// wall-clock time and spawns the sun light and disc.
///
/// Runs at `Startup`. Hosts that mount and unmount the ocean scene pair it
/// with [`teardown_atmosphere`], e.g. `OnEnter(AppState::Ocean)` and
/// `OnExit(AppState::Ocean)`. Does nothing while a cycle is already running.
pub fn setup_atmosphere(
    mut commands: Commands,
    existing: Option<Res<AtmosphereState>>,
    clock: Res<WallClock>,
    config: Res<DayNightConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if existing.is_some() {
        debug!("day/night cycle already running");
        return;
    }

    let now = clock.now();
    let (regime, progress) = classify(now);
    info!("starting day/night cycle at {now} in {regime:?} ({:.0}%)", progress * 100.0);

    let state = AtmosphereState::new(regime, progress);
    commands.insert_resource(blend(&state));
    commands.insert_resource(state);

    spawn_sun(&mut commands, &config, &mut meshes, &mut materials);
}

fn spawn_sun(
    commands: &mut Commands,
    config: &DayNightConfig,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    commands.spawn((
        DirectionalLight {
            illuminance: config.max_illuminance,
            shadows_enabled: true,
            ..default()
        },
        Transform::default().looking_to(Vec3::new(0.2, -0.8, -0.5), Vec3::Y),
        SunLight,
        AtmosphereEntity,
    ));

    let emissive = sun::DISC_EMISSIVE * 1.5;
    commands.spawn((
        Name::new("Sun Disc"),
        Mesh3d(meshes.add(Sphere::new(SUN_DISC_RADIUS).mesh().uv(32, 16))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(sun::DISC.x, sun::DISC.y, sun::DISC.z),
            emissive: LinearRgba::rgb(emissive.x, emissive.y, emissive.z),
            alpha_mode: AlphaMode::Blend,
            ..default()
        })),
        Transform::default(),
        Visibility::Hidden,
        NoFrustumCulling,
        SunDisc,
        AtmosphereEntity,
    ));
}

/// Re-classify the wall clock and start a cross-fade on a regime change.
fn poll_regime(clock: Res<WallClock>, mut state: ResMut<AtmosphereState>) {
    let now = clock.now();
    let (regime, progress) = classify(now);
    let previous = state.target;

    if state.poll(regime, progress) {
        info!("regime change at {now}: {previous:?} -> {regime:?}");
    } else {
        debug!("still {regime:?} at {now} ({:.1}%)", progress * 100.0);
    }
}

fn advance_cross_fade(
    config: Res<DayNightConfig>,
    time: Res<Time>,
    mut state: ResMut<AtmosphereState>,
) {
    if !state.is_transitioning() {
        return;
    }

    if state.advance(time.delta_secs(), config.transition_duration) {
        info!("settled into {:?}", state.target);
    }
}

fn blend_sky(state: Res<AtmosphereState>, mut params: ResMut<SkyParameters>) {
    *params = blend(&state);
}

/// Stop the day/night cycle: drops the atmosphere state, which halts both the
/// polling and per-frame updates, and despawns the entities the cycle owns.
///
/// Add it to whatever schedule tears the ocean scene down, e.g.
/// `OnExit(AppState::Ocean)`, and [`setup_atmosphere`] to the matching
/// `OnEnter`.
pub fn teardown_atmosphere(mut commands: Commands, owned: Query<Entity, With<AtmosphereEntity>>) {
    commands.remove_resource::<AtmosphereState>();
    for entity in &owned {
        commands.entity(entity).despawn();
    }
    info!("day/night cycle torn down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regime::Regime;
    use bevy::{ecs::system::RunSystemOnce, time::TimeUpdateStrategy};
    use chrono::NaiveTime;

    fn at(hour: u32, minute: u32, second: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, second).unwrap()
    }

    fn test_app(start: NaiveTime, config: DayNightConfig) -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<Mesh>()
            .init_asset::<StandardMaterial>()
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)))
            .insert_resource(WallClock::pinned(start))
            .add_plugins(DayNightCyclePlugin::with_config(config));
        app
    }

    fn fast_config() -> DayNightConfig {
        DayNightConfig {
            transition_duration: 1.0,
            poll_interval: Duration::from_secs(1),
            ..default()
        }
    }

    #[test]
    fn starts_steady_in_the_clock_regime() {
        let mut app = test_app(at(11, 0, 0), fast_config());
        app.update();

        let state = app.world().resource::<AtmosphereState>();
        assert_eq!(state.target, Regime::Morning);
        assert!(!state.is_transitioning());
        assert!((state.intra_progress - 0.5).abs() < 1e-6);

        let params = app.world().resource::<SkyParameters>();
        assert!((params.elevation - 27.5).abs() < 1e-4);
        assert_eq!(params.night_factor, 0.0);

        let mut lights = app.world_mut().query_filtered::<Entity, With<SunLight>>();
        assert_eq!(lights.iter(app.world()).count(), 1);
    }

    #[test]
    fn clock_change_starts_and_finishes_a_cross_fade() {
        let mut app = test_app(at(13, 59, 50), fast_config());
        app.update();
        app.update();
        assert_eq!(app.world().resource::<AtmosphereState>().target, Regime::Morning);

        app.world_mut().resource_mut::<WallClock>().pinned = Some(at(14, 0, 10));
        app.update();

        let state = *app.world().resource::<AtmosphereState>();
        assert_eq!(state.source, Regime::Morning);
        assert_eq!(state.target, Regime::Evening1);
        assert!(state.cross_fade < 1.0);

        let mut previous = state.cross_fade;
        for _ in 0..30 {
            app.update();
            let state = app.world().resource::<AtmosphereState>();
            assert!(state.cross_fade >= previous);
            previous = state.cross_fade;
        }

        let state = app.world().resource::<AtmosphereState>();
        assert!(!state.is_transitioning());
        assert_eq!(state.source, Regime::Evening1);
    }

    #[test]
    fn slow_poll_picks_up_the_boundary() {
        let mut app = test_app(at(17, 59, 59), fast_config());
        app.update();

        // Move the clock without flagging it as changed, so only the timer
        // can notice.
        app.world_mut()
            .resource_mut::<WallClock>()
            .bypass_change_detection()
            .pinned = Some(at(18, 0, 30));

        app.update();
        assert_eq!(app.world().resource::<AtmosphereState>().target, Regime::Evening2);

        for _ in 0..12 {
            app.update();
        }
        assert_eq!(app.world().resource::<AtmosphereState>().target, Regime::Night);
    }

    #[test]
    fn teardown_removes_state_and_owned_entities() {
        let mut app = test_app(at(20, 0, 0), fast_config());
        app.update();
        assert!(app.world().contains_resource::<AtmosphereState>());

        app.world_mut()
            .run_system_once(teardown_atmosphere)
            .expect("teardown runs");
        assert!(!app.world().contains_resource::<AtmosphereState>());

        let mut owned = app.world_mut().query_filtered::<Entity, With<AtmosphereEntity>>();
        assert_eq!(owned.iter(app.world()).count(), 0);

        // The cycle stays idle afterwards
        app.update();
        app.update();
        assert!(!app.world().contains_resource::<AtmosphereState>());
    }

    #[test]
    fn setup_after_teardown_restarts_the_cycle() {
        let mut app = test_app(at(10, 0, 0), fast_config());
        app.update();

        app.world_mut()
            .run_system_once(teardown_atmosphere)
            .expect("teardown runs");
        app.update();

        app.world_mut()
            .run_system_once(setup_atmosphere)
            .expect("setup runs");
        for _ in 0..3 {
            app.update();
        }

        let state = *app.world().resource::<AtmosphereState>();
        assert_eq!(state.target, Regime::Morning);
        assert!(!state.is_transitioning());

        let mut lights = app.world_mut().query_filtered::<Entity, With<SunLight>>();
        assert_eq!(lights.iter(app.world()).count(), 1);
        let mut discs = app.world_mut().query_filtered::<Entity, With<SunDisc>>();
        assert_eq!(discs.iter(app.world()).count(), 1);

        app.world_mut().resource_mut::<WallClock>().pinned = Some(at(15, 0, 0));
        app.update();
        let state = app.world().resource::<AtmosphereState>();
        assert_eq!(state.source, Regime::Morning);
        assert_eq!(state.target, Regime::Evening1);
        assert!(state.is_transitioning());
    }

    #[test]
    fn setup_twice_keeps_a_single_sun() {
        let mut app = test_app(at(10, 0, 0), fast_config());
        app.update();

        app.world_mut()
            .run_system_once(setup_atmosphere)
            .expect("setup runs");
        app.update();

        let mut lights = app.world_mut().query_filtered::<Entity, With<SunLight>>();
        assert_eq!(lights.iter(app.world()).count(), 1);
    }

    #[test]
    fn sun_disc_uses_the_palette_color() {
        let mut app = test_app(at(10, 0, 0), fast_config());
        app.update();

        let world = app.world_mut();
        let mut discs = world.query_filtered::<&MeshMaterial3d<StandardMaterial>, With<SunDisc>>();
        let handle = discs.single(world).unwrap().clone();
        let material = world
            .resource::<Assets<StandardMaterial>>()
            .get(&handle)
            .unwrap();
        let expected = Color::srgb(sun::DISC.x, sun::DISC.y, sun::DISC.z).to_linear();
        let actual = material.base_color.to_linear();
        assert!((actual.red - expected.red).abs() < 1e-4);
        assert!((actual.green - expected.green).abs() < 1e-4);
        assert!((actual.blue - expected.blue).abs() < 1e-4);
    }
}
