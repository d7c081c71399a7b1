//! Infinity Run entry point
//!
//! The window and the gesture-camera pipeline are separate deliverables
//! wired in through `RenderSurface` and the lane-signal channel. This binary
//! exercises the full pipeline headlessly instead: autopilot steering drawn
//! into a software framebuffer, with the run summarized to the log.

use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use infinity_run::RunConfig;
use infinity_run::game::{Controls, Game};
use infinity_run::renderer::FrameBuffer;
use infinity_run::sim::GamePhase;

/// Headless runs stop after this much play time if the autopilot is still
/// alive.
const DEMO_RUN_SECS: f32 = 60.0;

fn main() {
    env_logger::init();
    log::info!("Infinity Run starting");

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = RunConfig::load_or_default(config_path.as_deref());

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|t| t.as_millis() as u64)
        .unwrap_or(0);

    let mut framebuffer = FrameBuffer::new(640, 400);
    let frame_budget = Duration::from_secs_f32(1.0 / config.ideal_frame_rate as f32);
    let (mut game, _lane_feed) = Game::new(config, framebuffer.viewport(), seed);

    let mut controls = Controls {
        start: true,
        autopilot: true,
        ..Default::default()
    };
    let mut last = Instant::now();

    loop {
        let now = Instant::now();
        let dt = (now - last).as_secs_f32();
        last = now;

        game.frame(controls, dt, &mut framebuffer);
        controls.start = false;

        match game.phase() {
            GamePhase::GameOver => {
                log::info!(
                    "Run over: {:.1} units in {:.1}s at {:.0} fps",
                    game.distance(),
                    game.state().elapsed,
                    game.fps()
                );
                break;
            }
            GamePhase::Quit => break,
            _ => {}
        }

        if game.state().elapsed > DEMO_RUN_SECS {
            log::info!(
                "Demo window elapsed: {:.1} units at {:.0} fps",
                game.distance(),
                game.fps()
            );
            controls.quit = true;
        }

        if let Some(rest) = frame_budget.checked_sub(last.elapsed()) {
            std::thread::sleep(rest);
        }
    }
}
