use bevy::prelude::*;

use crate::blend::{SkyParameters, blend};
use crate::regime::Regime;

/// The mutable state of the day/night engine.
///
/// Steady when `source == target` (and `cross_fade == 1.0`), transitioning
/// otherwise. Regime changes are picked up by [`AtmosphereState::poll`], and
/// [`AtmosphereState::advance`] moves an in-flight cross-fade forward.
#[derive(Resource, Clone, Copy, Debug)]
pub struct AtmosphereState {
    /// Regime the current cross-fade started from
    pub source: Regime,
    /// Regime the scene is fading towards (or showing, when steady)
    pub target: Regime,
    /// Progress of the cross-fade in `0.0..=1.0`
    pub cross_fade: f32,
    /// Progress of the wall clock through the target regime's window
    pub intra_progress: f32,
    /// Blended parameters at the moment the cross-fade began
    pub from: SkyParameters,
}

impl AtmosphereState {
    /// A steady state showing `regime` at `progress`.
    pub fn new(regime: Regime, progress: f32) -> Self {
        Self {
            source: regime,
            target: regime,
            cross_fade: 1.0,
            intra_progress: progress,
            from: regime.profile().sample(progress),
        }
    }

    pub fn is_transitioning(&self) -> bool {
        self.source != self.target
    }

    /// Feed a fresh classification of the wall clock.
    ///
    /// Starts a cross-fade when `regime` differs from the current target and
    /// returns `true` in that case. A cross-fade already in flight restarts
    /// from whatever is currently on screen.
    pub fn poll(&mut self, regime: Regime, progress: f32) -> bool {
        let started = regime != self.target;
        if started {
            self.from = blend(self);
            self.source = self.target;
            self.target = regime;
            self.cross_fade = 0.0;
        }
        self.intra_progress = progress.clamp(0.0, 1.0);
        started
    }

    /// Advance an in-flight cross-fade by `elapsed` seconds of a
    /// `duration`-second transition. Returns `true` when this call completed
    /// it.
    pub fn advance(&mut self, elapsed: f32, duration: f32) -> bool {
        if !self.is_transitioning() || elapsed <= 0.0 {
            return false;
        }

        self.cross_fade = if duration > 0.0 {
            (self.cross_fade + elapsed / duration).min(1.0)
        } else {
            1.0
        };

        if self.cross_fade >= 1.0 {
            self.cross_fade = 1.0;
            self.source = self.target;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f32 = 1.0 / 60.0;
    const DURATION: f32 = 8.0;

    fn max_step(a: &SkyParameters, b: &SkyParameters) -> f32 {
        [
            (a.turbidity - b.turbidity).abs(),
            (a.rayleigh - b.rayleigh).abs(),
            (a.mie_coefficient - b.mie_coefficient).abs(),
            (a.mie_directional_g - b.mie_directional_g).abs(),
            (a.elevation - b.elevation).abs(),
            (a.illuminance - b.illuminance).abs(),
            (a.night_factor - b.night_factor).abs(),
            (a.sun_color - b.sun_color).abs().max_element(),
            (a.background - b.background).abs().max_element(),
        ]
        .into_iter()
        .fold(0.0, f32::max)
    }

    #[test]
    fn new_state_is_steady() {
        let state = AtmosphereState::new(Regime::Evening1, 0.25);
        assert!(!state.is_transitioning());
        assert_eq!(state.cross_fade, 1.0);
        assert_eq!(state.intra_progress, 0.25);
    }

    #[test]
    fn poll_with_same_regime_only_refreshes_progress() {
        let mut state = AtmosphereState::new(Regime::Morning, 0.1);
        assert!(!state.poll(Regime::Morning, 0.4));
        assert!(!state.is_transitioning());
        assert_eq!(state.cross_fade, 1.0);
        assert_eq!(state.intra_progress, 0.4);
    }

    #[test]
    fn poll_with_new_regime_starts_transition() {
        let mut state = AtmosphereState::new(Regime::Morning, 0.99);
        assert!(state.poll(Regime::Evening1, 0.0));
        assert_eq!(state.source, Regime::Morning);
        assert_eq!(state.target, Regime::Evening1);
        assert_eq!(state.cross_fade, 0.0);
        assert_eq!(state.from, Regime::Morning.profile().sample(0.99));
    }

    #[test]
    fn cross_fade_increases_monotonically_and_collapses() {
        let mut state = AtmosphereState::new(Regime::Evening2, 1.0);
        state.poll(Regime::Night, 0.0);

        let mut previous = state.cross_fade;
        let mut frames = 0;
        while state.is_transitioning() {
            state.advance(FRAME, DURATION);
            assert!(state.cross_fade <= 1.0);
            if state.is_transitioning() {
                assert!(state.cross_fade > previous);
            }
            previous = state.cross_fade;
            frames += 1;
            assert!(frames < 1000, "transition never completed");
        }

        assert_eq!(state.cross_fade, 1.0);
        assert_eq!(state.source, state.target);
        assert!((479..=481).contains(&frames), "took {frames} frames");
    }

    #[test]
    fn half_duration_gives_half_cross_fade() {
        let mut state = AtmosphereState::new(Regime::Morning, 1.0);
        state.poll(Regime::Evening1, 0.0);
        for _ in 0..240 {
            state.advance(FRAME, DURATION);
        }
        assert!((state.cross_fade - 0.5).abs() < 1e-3, "{}", state.cross_fade);
        assert!(state.is_transitioning());
    }

    #[test]
    fn advance_ignores_steady_state_and_non_positive_time() {
        let mut state = AtmosphereState::new(Regime::Night, 0.0);
        assert!(!state.advance(FRAME, DURATION));
        assert_eq!(state.cross_fade, 1.0);

        state.poll(Regime::Morning, 0.0);
        assert!(!state.advance(0.0, DURATION));
        assert!(!state.advance(-1.0, DURATION));
        assert_eq!(state.cross_fade, 0.0);
    }

    #[test]
    fn zero_duration_completes_immediately() {
        let mut state = AtmosphereState::new(Regime::Night, 0.0);
        state.poll(Regime::Morning, 0.0);
        assert!(state.advance(FRAME, 0.0));
        assert!(!state.is_transitioning());
    }

    #[test]
    fn retarget_mid_transition_does_not_snap() {
        let mut state = AtmosphereState::new(Regime::Morning, 1.0);
        state.poll(Regime::Evening1, 0.0);
        for _ in 0..120 {
            state.advance(FRAME, DURATION);
        }

        let before = blend(&state);

        state.poll(Regime::Night, 0.0);
        assert_eq!(state.source, Regime::Evening1);
        assert_eq!(blend(&state), state.from);
        assert!(max_step(&before, &blend(&state)) < 1e-5);

        state.advance(FRAME, DURATION);
        let after = blend(&state);
        let one_frame = max_step(&before, &Regime::Night.profile().sample(0.0)) * FRAME / DURATION;
        assert!(max_step(&before, &after) <= one_frame + 1e-4);

        // Restarting from the Morning endpoint would have jumped the haze by
        // a quarter of the Morning -> Evening1 difference.
        let stale = Regime::Morning.profile().sample(1.0);
        assert!(max_step(&before, &stale) > 1.0);
    }

    #[test]
    fn night_factor_is_fractional_only_while_crossing_night() {
        let mut state = AtmosphereState::new(Regime::Evening2, 1.0);
        assert_eq!(blend(&state).night_factor, 0.0);

        state.poll(Regime::Night, 0.0);
        for _ in 0..60 {
            state.advance(FRAME, DURATION);
            let night = blend(&state).night_factor;
            assert!(night > 0.0 && night < 1.0, "{night}");
        }

        while state.is_transitioning() {
            state.advance(FRAME, DURATION);
        }
        assert_eq!(blend(&state).night_factor, 1.0);

        let mut day = AtmosphereState::new(Regime::Morning, 1.0);
        day.poll(Regime::Evening1, 0.0);
        for _ in 0..240 {
            day.advance(FRAME, DURATION);
            assert_eq!(blend(&day).night_factor, 0.0);
        }
    }
}
