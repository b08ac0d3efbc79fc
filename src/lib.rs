//! Traffic Control - a tile-grid traffic puzzle game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ball motion, tile behaviors, game flow)
//! - `level`: Level descriptions and the built-in catalog
//!
//! Rendering, asset loading, and input devices are external collaborators:
//! the simulation exposes world positions, state flags, and logical asset
//! names, and consumes a single `update(dt)` tick plus "click at world
//! position" events.

pub mod level;
pub mod sim;

pub use level::Level;
pub use sim::{Game, GameFlowState};

/// Game configuration constants
pub mod consts {
    /// Edge length of one square grid cell, in world units
    pub const CELL_SIZE: f64 = 48.0;
    pub const HALF_CELL_SIZE: f64 = CELL_SIZE / 2.0;

    /// Viewport the level is centered in
    pub const VIEWPORT_WIDTH: f64 = 768.0;
    pub const VIEWPORT_HEIGHT: f64 = 768.0;
    /// Height of the reserved UI band at the top of the viewport
    pub const TOP_UI_BAND: f64 = 64.0;

    /// Ball bounding-box edge (balls are 3/4 of a cell)
    pub const BALL_SIZE: f64 = CELL_SIZE * 0.75;
    pub const BALL_RADIUS: f64 = BALL_SIZE / 2.0;

    /// Tolerance for "same position" float comparisons
    pub const EPSILON: f64 = 1e-6;
    /// Overshoot applied after resolving a center/edge event so the same
    /// event cannot re-trigger on the next sub-step. Must stay far above
    /// float noise and far below any gameplay distance.
    pub const EVENT_OVERSHOOT: f64 = 0.001;

    /// Upper bound on wall-clock delta fed into one update (stall guard)
    pub const MAX_FRAME_DT: f64 = 0.1;
    /// Sub-step cap for the ball motion resolver. Geometrically unreachable;
    /// exceeding it means the leftover-time bookkeeping is broken.
    pub const MAX_MOTION_SUBSTEPS: u32 = 64;

    /// How long a cracked road stays in its breaking state
    pub const BREAKING_DURATION: f64 = 0.5;
}

/// Tolerant equality: true when the two values are within [`consts::EPSILON`]
#[inline]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= consts::EPSILON
}

/// Tolerant `a <= b` (also true when the values are within epsilon)
#[inline]
pub fn approx_le(a: f64, b: f64) -> bool {
    a <= b || (a - b).abs() <= consts::EPSILON
}

/// Floor that forgives float noise: a value only epsilon below an integer is
/// treated as that integer instead of flooring to the one beneath it.
#[inline]
pub fn approx_floor(value: f64) -> f64 {
    let to_nearest = value - value.round();
    if (-consts::EPSILON..0.0).contains(&to_nearest) {
        value.ceil()
    } else {
        value.floor()
    }
}
