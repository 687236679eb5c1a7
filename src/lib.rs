pub mod atmosphere;
pub mod blend;
pub mod clock;
pub mod colors;
pub mod day_night_plugin;
pub mod night_sky_plugin;
pub mod regime;
pub mod scene_sink;
pub mod sky_plugin;
pub mod water_plugin;

pub use atmosphere::AtmosphereState;
pub use blend::{SkyParameters, blend};
pub use clock::WallClock;
pub use day_night_plugin::{
    DayNightConfig, DayNightCyclePlugin, setup_atmosphere, teardown_atmosphere,
};
pub use night_sky_plugin::NightSkyPlugin;
pub use regime::{Regime, classify};
pub use sky_plugin::SkyPlugin;
pub use water_plugin::WaterPlugin;
