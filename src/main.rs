//! Traffic Control entry point
//!
//! Runs the first level headlessly at the driver cadence a frontend would
//! use (100 Hz, wall-clock deltas clamped), scripting the one click the
//! level needs, and dumps a final state snapshot for the render boundary.

use glam::{DVec2, IVec2};

use traffic_control::consts::MAX_FRAME_DT;
use traffic_control::{Game, GameFlowState};

fn main() {
    env_logger::init();
    log::info!("Traffic Control (headless demo) starting...");

    let mut game = Game::new();

    // First update loads level 0; a click starts it
    game.update(0.0);
    log::info!("{}", game.level_label());
    game.on_click(DVec2::ZERO);

    // Route the ball: flip the two-way switch at (4, 3) from down to up
    let switch_pos = game.runtime().grid().cell_center(IVec2::new(4, 3));
    game.on_click(switch_pos);

    // Fixed 100 Hz driver with the stall clamp a real frontend applies
    let dt = (1.0f64 / 100.0).min(MAX_FRAME_DT);
    let mut elapsed = 0.0;
    while game.flow() == GameFlowState::InGame && elapsed < 30.0 {
        game.update(dt);
        elapsed += dt;
    }

    match game.flow() {
        GameFlowState::LevelWon => log::info!("level won after {elapsed:.2}s"),
        GameFlowState::LevelFailed => log::warn!("level failed after {elapsed:.2}s"),
        state => log::warn!("demo timed out in state {state:?}"),
    }

    // What a renderer would consume each frame
    match serde_json::to_string_pretty(game.runtime()) {
        Ok(snapshot) => println!("{snapshot}"),
        Err(err) => log::error!("snapshot serialization failed: {err}"),
    }
}
