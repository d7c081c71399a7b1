//! Run state and phase machine

use glam::Vec2;

use super::terrain::TerrainGrid;
use crate::RunConfig;

/// Start position: just past the solid boundary row, in the second lane.
const START_X: f32 = 1.0;
const START_Y: f32 = 2.5;

/// Current phase of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Waiting for a start command; the simulation does not advance.
    Menu,
    /// Active run.
    Playing,
    /// Run ended by collision. Terminal until a restart.
    GameOver,
    /// Player asked to leave. Terminal.
    Quit,
}

/// The player: a point gliding forward along the track.
#[derive(Debug, Clone, Copy)]
pub struct PlayerState {
    /// `x` is longitudinal (row direction) and only ever increases; `y` is
    /// lateral and stays between the outer walls.
    pub pos: Vec2,
    /// Heading. The runner always faces straight down the track.
    pub angle: f32,
}

impl PlayerState {
    pub fn new() -> Self {
        Self {
            pos: Vec2::new(START_X, START_Y),
            angle: 0.0,
        }
    }

    /// Grid row under the player.
    pub fn row(&self) -> usize {
        self.pos.x as usize
    }

    /// Grid column under the player.
    pub fn col(&self) -> usize {
        self.pos.y as usize
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Complete per-run simulation state.
#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: GamePhase,
    pub player: PlayerState,
    pub terrain: TerrainGrid,
    /// Seconds spent in `Playing`.
    pub elapsed: f32,
    /// Frames simulated this run.
    pub frames: u64,
    seed: u64,
}

impl GameState {
    /// Create a run in the `Menu` phase with terrain already generated past
    /// the start position, so the first frame can query and cast freely.
    pub fn new(config: &RunConfig, seed: u64) -> Self {
        let player = PlayerState::new();
        let mut terrain = TerrainGrid::new(config.track_breadth, config.initial_open_rows, seed);
        terrain.extend(
            player.row(),
            config.generate_ahead,
            config.obstacle_spacing,
            config.obstacle_probability,
        );

        Self {
            phase: GamePhase::Menu,
            player,
            terrain,
            elapsed: 0.0,
            frames: 0,
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Distance traveled this run.
    pub fn distance(&self) -> f32 {
        self.player.pos.x - START_X
    }
}
