//! Frame loop controller
//!
//! Owns the run state and the engines, advances one frame at a time, and
//! draws onto whatever surface the presentation layer hands in. Pacing is
//! the caller's job: `dt` is measured wall time, so gameplay speed does not
//! depend on the achieved frame rate.

use crate::RunConfig;
use crate::consts::MAX_FRAME_DT;
use crate::renderer::{Projector, RenderSurface, Viewport};
use crate::signal::{LatestSignal, SignalSender};
use crate::sim::{FrameInput, GamePhase, GameState, RaycastEngine, tick};

/// Controller commands for one frame. The lane signal is not here; it
/// arrives through the channel behind `LatestSignal`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Controls {
    pub start: bool,
    pub quit: bool,
    pub autopilot: bool,
}

/// Rolling frames-per-second estimate over the most recent frames.
#[derive(Debug)]
struct FpsCounter {
    samples: [f32; 60],
    index: usize,
    filled: usize,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            samples: [0.0; 60],
            index: 0,
            filled: 0,
        }
    }

    fn record(&mut self, dt: f32) {
        self.samples[self.index] = dt;
        self.index = (self.index + 1) % self.samples.len();
        self.filled = (self.filled + 1).min(self.samples.len());
    }

    fn fps(&self) -> f32 {
        let total: f32 = self.samples[..self.filled].iter().sum();
        if total > 0.0 {
            self.filled as f32 / total
        } else {
            0.0
        }
    }
}

/// The per-run orchestrator: difficulty, steering, collision, terrain
/// extension, then raycast and projection, one frame at a time.
pub struct Game {
    config: RunConfig,
    state: GameState,
    caster: RaycastEngine,
    projector: Projector,
    viewport: Viewport,
    signal: LatestSignal,
    fps: FpsCounter,
}

impl Game {
    /// Build a run for the given surface size. Also returns the sender half
    /// of the lane-signal channel for the gesture collaborator.
    pub fn new(config: RunConfig, viewport: Viewport, seed: u64) -> (Self, SignalSender) {
        // Rays never march past the cap, so keeping more rows generated than
        // the cap guarantees casting stays inside the grid.
        assert!(
            config.render_distance_cap <= config.generate_ahead as f32,
            "generate_ahead must cover the render distance cap"
        );

        let caster = RaycastEngine::from_config(&config, viewport.width);
        let projector = Projector::from_config(&config);
        let state = GameState::new(&config, seed);
        let (sender, signal) = LatestSignal::channel();

        log::info!("New run with seed {seed}");

        let game = Self {
            config,
            state,
            caster,
            projector,
            viewport,
            signal,
            fps: FpsCounter::new(),
        };
        (game, sender)
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Distance traveled this run.
    pub fn distance(&self) -> f32 {
        self.state.distance()
    }

    pub fn fps(&self) -> f32 {
        self.fps.fps()
    }

    /// Advance one frame and draw it.
    pub fn frame(&mut self, controls: Controls, dt: f32, surface: &mut dyn RenderSurface) {
        let dt = dt.min(MAX_FRAME_DT);

        let input = FrameInput {
            start: controls.start,
            quit: controls.quit,
            lane: self.signal.poll(),
            autopilot: controls.autopilot,
        };

        let before = self.state.phase;
        tick(&mut self.state, &input, &self.config, dt);
        if self.state.phase != before {
            match self.state.phase {
                GamePhase::GameOver => log::info!(
                    "Game over after {:.1} units in {:.1}s",
                    self.state.distance(),
                    self.state.elapsed
                ),
                phase => log::info!("{before:?} -> {phase:?}"),
            }
        }

        if self.state.phase == GamePhase::Playing {
            let rays = self.caster.cast(
                &self.state.terrain,
                self.state.player.pos,
                self.state.player.angle,
            );
            self.projector.project(&rays, self.viewport, surface);
        }

        self.fps.record(dt);
    }

    /// Throw the run away and start over from the menu ("play again").
    pub fn restart(&mut self, seed: u64) {
        log::info!("Restarting with seed {seed}");
        self.state = GameState::new(&self.config, seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{FrameBuffer, Rgb};
    use crate::signal::LaneSignal;

    const DT: f32 = 1.0 / 60.0;

    fn start_game(seed: u64) -> (Game, SignalSender, FrameBuffer) {
        let fb = FrameBuffer::new(64, 48);
        let (mut game, sender) = Game::new(RunConfig::default(), fb.viewport(), seed);
        let mut warmup = fb.clone();
        game.frame(
            Controls {
                start: true,
                ..Default::default()
            },
            DT,
            &mut warmup,
        );
        assert_eq!(game.phase(), GamePhase::Playing);
        (game, sender, fb)
    }

    #[test]
    fn test_playing_frame_paints_the_surface() {
        let (mut game, _sender, mut fb) = start_game(11);
        game.frame(Controls::default(), DT, &mut fb);

        // The central column looks down an open corridor, so it shows sky
        // above the horizon and ground below it.
        assert_ne!(fb.pixel(32, 0), Rgb::default());
        assert_ne!(fb.pixel(32, 47), fb.pixel(32, 0));
    }

    #[test]
    fn test_channel_signal_steers_the_player() {
        let (mut game, sender, mut fb) = start_game(11);
        let y0 = game.state().player.pos.y;

        sender.send(LaneSignal::Right);
        game.frame(Controls::default(), DT, &mut fb);
        assert!(game.state().player.pos.y > y0);

        // No fresh signal: the cached value keeps steering.
        let y1 = game.state().player.pos.y;
        game.frame(Controls::default(), DT, &mut fb);
        assert!(game.state().player.pos.y > y1);
    }

    #[test]
    fn test_autopilot_runs_and_gains_distance() {
        let (mut game, _sender, mut fb) = start_game(42);
        let controls = Controls {
            autopilot: true,
            ..Default::default()
        };

        for _ in 0..300 {
            game.frame(controls, DT, &mut fb);
        }
        assert_eq!(game.phase(), GamePhase::Playing);
        assert!(game.distance() > 40.0);
        assert!(game.fps() > 0.0);
    }

    #[test]
    fn test_quit_and_restart() {
        let (mut game, _sender, mut fb) = start_game(11);

        game.frame(
            Controls {
                quit: true,
                ..Default::default()
            },
            DT,
            &mut fb,
        );
        assert_eq!(game.phase(), GamePhase::Quit);

        game.restart(12);
        assert_eq!(game.phase(), GamePhase::Menu);
        assert_eq!(game.distance(), 0.0);
        assert_eq!(game.state().seed(), 12);
    }

    #[test]
    fn test_oversized_dt_is_capped() {
        let (mut game, _sender, mut fb) = start_game(11);
        let x0 = game.state().player.pos.x;

        // A five second stall must not tunnel the player through terrain.
        game.frame(Controls::default(), 5.0, &mut fb);
        let moved = game.state().player.pos.x - x0;
        assert!(moved <= game.config().base_speed * MAX_FRAME_DT + 1e-3);
    }
}
