//! The live tile grid and level runtime
//!
//! [`Grid`] owns the positioned tiles of the loaded level and answers the
//! spatial queries the motion resolver needs. [`LevelRuntime`] owns the grid
//! plus the active balls, dispatches per-tick updates (tiles first, then
//! balls), and tracks the win condition.

use glam::{DVec2, IVec2};
use serde::{Deserialize, Serialize};

use super::ball::{Ball, StepOutcome, resolve_motion};
use super::tile::{Tile, TileKind};
use super::SimEvent;
use crate::approx_floor;
use crate::consts::*;
use crate::level::Level;

/// Dense cell-to-tile mapping with a fixed world origin
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Grid {
    size: IVec2,
    /// Upper-left corner of the level in world space, fixed at load time
    origin: DVec2,
    /// Row-major, `y * width + x`
    tiles: Vec<Option<Tile>>,
}

impl Grid {
    /// Instantiate and position tiles from a level description. The level is
    /// centered in the viewport, below the top UI band.
    pub fn from_level(level: &Level) -> Self {
        let size = level.size();
        let display = size.as_dvec2() * CELL_SIZE;
        let origin = DVec2::new(
            (VIEWPORT_WIDTH - display.x) / 2.0,
            TOP_UI_BAND + (VIEWPORT_HEIGHT - TOP_UI_BAND - display.y) / 2.0,
        );

        let mut tiles = Vec::with_capacity((size.x * size.y) as usize);
        for y in 0..size.y {
            for x in 0..size.x {
                let pos = origin + IVec2::new(x, y).as_dvec2() * CELL_SIZE;
                tiles.push(
                    level
                        .kind_at(x, y)
                        .map(|kind| Tile::new(pos, kind.clone())),
                );
            }
        }

        Self {
            size,
            origin,
            tiles,
        }
    }

    pub fn size(&self) -> IVec2 {
        self.size
    }

    pub fn origin(&self) -> DVec2 {
        self.origin
    }

    fn in_bounds(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.size.x && cell.y < self.size.y
    }

    fn index(&self, cell: IVec2) -> Option<usize> {
        self.in_bounds(cell)
            .then(|| (cell.y * self.size.x + cell.x) as usize)
    }

    /// Tile at the given cell; `None` for empty or out-of-bounds cells
    pub fn tile_at(&self, cell: IVec2) -> Option<&Tile> {
        self.index(cell).and_then(|i| self.tiles[i].as_ref())
    }

    pub fn tile_at_mut(&mut self, cell: IVec2) -> Option<&mut Tile> {
        self.index(cell).and_then(|i| self.tiles[i].as_mut())
    }

    /// Map a world-space point to its grid cell. The tolerant floor keeps a
    /// point hovering epsilon below a cell boundary from jittering between
    /// cells. Points off the level map to `None`.
    pub fn cell_at(&self, world: DVec2) -> Option<IVec2> {
        let offset = world - self.origin;
        let cell = IVec2::new(
            approx_floor(offset.x / CELL_SIZE) as i32,
            approx_floor(offset.y / CELL_SIZE) as i32,
        );
        self.in_bounds(cell).then_some(cell)
    }

    /// World-space center of a grid cell
    pub fn cell_center(&self, cell: IVec2) -> DVec2 {
        self.origin + cell.as_dvec2() * CELL_SIZE + DVec2::splat(HALF_CELL_SIZE)
    }

    /// All present tiles in grid order (render boundary)
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().flatten()
    }

    fn tiles_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.tiles.iter_mut().flatten()
    }
}

/// Owns the simulation state of the currently loaded level
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelRuntime {
    grid: Grid,
    /// Active balls in launch order
    balls: Vec<Ball>,
    total_balls: u32,
    balls_remaining: u32,
}

impl LevelRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any previous level with `level`: instantiate its tiles and
    /// tally the balls its launchers will contribute.
    pub fn load(&mut self, level: &Level) {
        self.grid = Grid::from_level(level);
        self.balls.clear();

        self.total_balls = self
            .grid
            .tiles()
            .map(|tile| match &tile.kind {
                TileKind::Launcher(launcher) => launcher.total_balls,
                _ => 0,
            })
            .sum();
        self.balls_remaining = self.total_balls;

        log::info!(
            "loaded level \"{}\": {}x{} cells, {} balls",
            level.name(),
            self.grid.size().x,
            self.grid.size().y,
            self.total_balls
        );
    }

    /// Drop all tiles and balls of the current level
    pub fn clear(&mut self) {
        self.grid = Grid::default();
        self.balls.clear();
        self.total_balls = 0;
        self.balls_remaining = 0;
    }

    /// Advance the level by one tick: all tiles first (so switch flips,
    /// fresh breaks, and this tick's launches are visible to the ball
    /// phase), then all balls in order. Returns the gameplay signals of the
    /// tick in emission order.
    pub fn update(&mut self, dt: f64) -> Vec<SimEvent> {
        let mut events = Vec::new();

        // Tile phase
        let mut launches = Vec::new();
        for tile in self.grid.tiles_mut() {
            if let Some(launch) = tile.update(dt) {
                launches.push(launch);
            }
        }
        for launch in launches {
            self.balls.push(Ball::new(
                launch.pos,
                launch.flavor,
                launch.speed,
                launch.direction,
            ));
        }

        // Ball phase
        let mut i = 0;
        while i < self.balls.len() {
            match resolve_motion(&mut self.balls[i], &mut self.grid, dt) {
                StepOutcome::Alive => i += 1,
                StepOutcome::Captured => {
                    self.balls.remove(i);
                    self.balls_remaining = self.balls_remaining.saturating_sub(1);
                    if self.balls_remaining == 0 {
                        events.push(SimEvent::LevelWon);
                    }
                }
                StepOutcome::Failed(reason) => {
                    events.push(SimEvent::LevelFailed(reason));
                    i += 1;
                }
            }
        }

        events
    }

    /// Forward a world-space click to the tile under it, if any
    pub fn on_click(&mut self, world: DVec2) {
        if let Some(cell) = self.grid.cell_at(world)
            && let Some(tile) = self.grid.tile_at_mut(cell)
        {
            tile.on_click();
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Active balls (render boundary)
    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn total_balls(&self) -> u32 {
        self.total_balls
    }

    /// Balls that still need to reach a goal; zero means the level is won
    pub fn balls_remaining(&self) -> u32 {
        self.balls_remaining
    }
}
