use bevy::dev_tools::fps_overlay::FpsOverlayPlugin;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::feathers::{
    FeathersPlugins,
    controls::{SliderProps, slider},
    dark_theme::create_dark_theme,
    theme::{ThemeBackgroundColor, ThemedText, UiTheme},
    tokens,
};
use bevy::prelude::*;
use bevy::ui_widgets::{SliderPrecision, SliderStep, ValueChange, observe, slider_self_update};
use bevy_flycam::PlayerPlugin;
use bevy_rand::{plugin::EntropyPlugin, prelude::WyRand};

use bevy_ocean_sky::clock::WallClock;
use bevy_ocean_sky::day_night_plugin::DayNightCyclePlugin;
use bevy_ocean_sky::night_sky_plugin::NightSkyPlugin;
use bevy_ocean_sky::sky_plugin::SkyPlugin;
use bevy_ocean_sky::water_plugin::WaterPlugin;
use bevy_ocean_sky::AtmosphereState;

/// Text showing the active regime and cross-fade progress.
#[derive(Component)]
struct RegimeLabel;

fn main() -> AppExit {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(PlayerPlugin)
        .add_plugins(EntropyPlugin::<WyRand>::default())
        .add_plugins(WaterPlugin)
        .add_plugins(SkyPlugin)
        .add_plugins(NightSkyPlugin)
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        .add_plugins(FpsOverlayPlugin::default())
        .add_plugins(DayNightCyclePlugin::new(8.0))
        .insert_resource(UiTheme(create_dark_theme()))
        .add_plugins(FeathersPlugins)
        .add_systems(Startup, startup_ui)
        .add_systems(Update, update_regime_label)
        .run()
}

fn startup_ui(mut commands: Commands, clock: Res<WallClock>) {
    commands.spawn((
        Node {
            padding: UiRect::px(6., 6., 6., 6.),
            width: percent(20),
            height: Val::Auto,
            align_items: AlignItems::Start,
            justify_content: JustifyContent::Start,
            display: Display::Flex,
            flex_direction: FlexDirection::Column,
            row_gap: px(10),
            ..default()
        },
        ThemeBackgroundColor(tokens::WINDOW_BG),
        children![
            (Text::new(""), ThemedText, RegimeLabel),
            app_slider(
                "hours",
                clock.offset_minutes / 60.0,
                -12.,
                12.,
                1,
                |mut clock: ResMut<WallClock>, value| { clock.offset_minutes = value * 60.0 }
            ),
        ],
    ));
}

fn update_regime_label(
    state: Option<Res<AtmosphereState>>,
    clock: Res<WallClock>,
    mut labels: Query<&mut Text, With<RegimeLabel>>,
) {
    let Some(state) = state else {
        return;
    };

    let now = clock.now().format("%H:%M");
    let text = if state.is_transitioning() {
        format!(
            "{now} {} -> {} ({:.0}%)",
            state.source.label(),
            state.target.label(),
            state.cross_fade * 100.0
        )
    } else {
        format!("{now} {}", state.target.label())
    };

    for mut label in labels.iter_mut() {
        if label.0 != text {
            label.0 = text.clone();
        }
    }
}

fn make_slider(
    op: fn(ResMut<WallClock>, f32) -> (),
) -> impl FnMut(On<ValueChange<f32>>, ResMut<WallClock>) -> () {
    move |value_change, clock| {
        op(clock, value_change.value);
    }
}

fn app_slider(
    label: &str,
    value: f32,
    min: f32,
    max: f32,
    precision: i32,
    op: fn(ResMut<WallClock>, f32) -> (),
) -> impl Bundle {
    (
        Node {
            width: Val::Percent(100.),
            height: Val::Auto,
            align_items: AlignItems::Start,
            justify_content: JustifyContent::Start,
            display: Display::Flex,
            flex_direction: FlexDirection::Row,
            row_gap: px(10),
            ..default()
        },
        children![
            (Text::new(label), ThemedText),
            (
                slider(
                    SliderProps { min, max, value },
                    (SliderStep(1.), SliderPrecision(precision)),
                ),
                observe(slider_self_update),
                observe(make_slider(op))
            )
        ],
    )
}
