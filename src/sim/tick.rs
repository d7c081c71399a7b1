//! Per-frame simulation step
//!
//! Advances one variable-timestep frame: forward motion along the difficulty
//! curve, lateral steering from the lane signal, single-cell occupancy
//! collision, then terrain extension. Rendering happens afterwards from the
//! resulting state and never feeds back into it.

use super::difficulty::DifficultyCurve;
use super::state::{GamePhase, GameState};
use crate::RunConfig;
use crate::signal::LaneSignal;

/// Input commands for a single frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    /// Begin the run (`Menu` to `Playing`).
    pub start: bool,
    /// Leave the game, from any phase.
    pub quit: bool,
    /// Most recent lane signal from the gesture collaborator.
    pub lane: LaneSignal,
    /// Let the built-in autopilot steer instead of `lane`. Used by headless
    /// runs and soak tests.
    pub autopilot: bool,
}

/// Advance the run by one frame of `dt` seconds.
pub fn tick(state: &mut GameState, input: &FrameInput, config: &RunConfig, dt: f32) {
    if input.quit {
        state.phase = GamePhase::Quit;
        return;
    }

    match state.phase {
        GamePhase::Menu => {
            if input.start {
                state.phase = GamePhase::Playing;
            }
            return;
        }
        GamePhase::GameOver | GamePhase::Quit => return,
        GamePhase::Playing => {}
    }

    // Forward motion speeds up with the distance already covered.
    let curve = DifficultyCurve::from_config(config);
    state.player.pos.x += curve.speed(state.player.pos.x) * dt;

    // Lateral steering.
    let lane = if input.autopilot {
        autopilot_signal(state, config)
    } else {
        input.lane
    };
    state.player.pos.y += lane.lateral_dir() * config.lateral_speed * dt;

    // Constrain to the track.
    let (low, high) = config.lane_range();
    state.player.pos.y = state.player.pos.y.clamp(low, high);

    // Single-cell occupancy is the only collision in the game. Hitting a
    // wall ends the run; it is a normal terminal state, not a fault.
    if state
        .terrain
        .occupied(state.player.row(), state.player.col())
    {
        state.phase = GamePhase::GameOver;
        return;
    }

    state.terrain.extend(
        state.player.row(),
        config.generate_ahead,
        config.obstacle_spacing,
        config.obstacle_probability,
    );

    state.elapsed += dt;
    state.frames += 1;
}

/// Steer toward the closest opening in the next obstacle row ahead.
fn autopilot_signal(state: &GameState, config: &RunConfig) -> LaneSignal {
    let player = &state.player;
    let row = player.row();
    // While inside an obstacle row, hold its gap; otherwise aim for the next
    // obstacle row down the track.
    let next_obstacle = if row % config.obstacle_spacing == 0 {
        row
    } else {
        (row / config.obstacle_spacing + 1) * config.obstacle_spacing
    };
    if next_obstacle >= state.terrain.len() {
        return LaneSignal::None;
    }

    let y = player.pos.y;
    let target = (1..=config.track_breadth)
        .filter(|&col| !state.terrain.occupied(next_obstacle, col))
        .map(|col| col as f32 + 0.5)
        .min_by(|a, b| {
            (a - y)
                .abs()
                .partial_cmp(&(b - y).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    // Dead zone of a quarter lane keeps the autopilot from oscillating
    // around the gap center.
    match target {
        Some(t) if t - y > 0.25 => LaneSignal::Right,
        Some(t) if t - y < -0.25 => LaneSignal::Left,
        _ => LaneSignal::None,
    }
}
