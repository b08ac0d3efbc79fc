//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Tick-driven only (a single `update(dt)` entry point)
//! - Stable iteration order (tiles in grid order, balls in launch order)
//! - No rendering or platform dependencies

pub mod ball;
pub mod game;
pub mod grid;
pub mod tile;

pub use ball::{Ball, StepOutcome, resolve_motion};
pub use game::{Game, GameFlowState};
pub use grid::{Grid, LevelRuntime};
pub use tile::{
    BallLaunch, BreakState, CollisionResponse, CrackedRoad, Fire, Launcher, Switch, SwitchConfig,
    Tile, TileKind,
};

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Travel/facing direction on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// The reversed direction (used when a ball bounces off a blocked cell)
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Next direction clockwise (four-way switch cycling order)
    pub fn clockwise(self) -> Self {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }

    /// Grid-cell offset of the neighboring cell in this direction.
    /// Grid y grows downward, matching world space.
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }
}

/// Color-compatibility tag gating which balls a tile acts upon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Flavor {
    Red,
    Blue,
    Purple,
}

impl Flavor {
    /// Red and Blue never match; Purple matches everything. Symmetric.
    pub fn compatible_with(self, other: Flavor) -> bool {
        !matches!(
            (self, other),
            (Flavor::Red, Flavor::Blue) | (Flavor::Blue, Flavor::Red)
        )
    }
}

/// Why a level was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailReason {
    /// A ball's center left the grid entirely
    FellOffGrid,
    /// A ball reached the center of an empty cell
    RoadEnded,
    /// A ball re-entered a breaking or broken cracked road
    BrokenRoad,
    /// A ball rolled into a lit fire
    Burned,
}

/// Gameplay-state signal emitted by the level runtime and consumed only by
/// the game flow controller. Applied in emission order; the last signal of a
/// tick determines the final state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimEvent {
    LevelWon,
    LevelFailed(FailReason),
}
