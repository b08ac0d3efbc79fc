//! Grid tiles and their collision/click/update behaviors
//!
//! Tiles are a closed sum type: shared fields live on [`Tile`], per-variant
//! state in [`TileKind`] payloads, behavior dispatched by pattern match.
//! Tiles never touch game-flow state directly; collisions answer with a
//! [`CollisionResponse`] the motion resolver and runtime act upon.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::{Direction, FailReason, Flavor};
use crate::consts::*;

use super::ball::Ball;

/// What a tile did with a ball that reached its center
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionResponse {
    /// Ball continues unchanged
    PassThrough,
    /// Ball continues in a new direction
    Redirect(Direction),
    /// Ball was consumed by a goal; remove it from the simulation
    Capture,
    /// The level is lost
    Fail(FailReason),
}

/// A clickable switch: redirects compatible balls to its current facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwitchConfig {
    /// Toggles between its facing and the opposite direction
    TwoWay,
    /// Rotates clockwise through all four directions
    FourWay,
    CornerUpRight,
    CornerRightDown,
    CornerDownLeft,
    CornerLeftUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Switch {
    pub config: SwitchConfig,
    pub facing: Direction,
    pub flavor: Flavor,
}

impl Switch {
    pub fn new(config: SwitchConfig, facing: Direction, flavor: Flavor) -> Self {
        Self {
            config,
            facing,
            flavor,
        }
    }

    /// Advance the facing to the next direction permitted by the
    /// configuration. A facing outside the permitted set is an invariant
    /// violation; release builds leave the switch unchanged.
    pub fn cycle(&mut self) {
        use Direction::*;
        self.facing = match (self.config, self.facing) {
            (SwitchConfig::TwoWay, facing) => facing.opposite(),
            (SwitchConfig::FourWay, facing) => facing.clockwise(),
            (SwitchConfig::CornerUpRight, Up) => Right,
            (SwitchConfig::CornerUpRight, Right) => Up,
            (SwitchConfig::CornerRightDown, Right) => Down,
            (SwitchConfig::CornerRightDown, Down) => Right,
            (SwitchConfig::CornerDownLeft, Down) => Left,
            (SwitchConfig::CornerDownLeft, Left) => Down,
            (SwitchConfig::CornerLeftUp, Left) => Up,
            (SwitchConfig::CornerLeftUp, Up) => Left,
            (config, facing) => {
                debug_assert!(false, "switch facing {facing:?} invalid for {config:?}");
                log::warn!("ignoring click on {config:?} switch facing {facing:?}");
                facing
            }
        };
    }
}

/// Launches a configured number of balls on a timer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Launcher {
    pub direction: Direction,
    pub flavor: Flavor,
    pub ball_speed: f64,
    /// Delay before the first ball
    pub first_delay: f64,
    /// Delay between subsequent balls
    pub interval: f64,
    pub total_balls: u32,
    pub balls_left: u32,
    timer: f64,
}

impl Launcher {
    pub fn new(
        direction: Direction,
        flavor: Flavor,
        total_balls: u32,
        ball_speed: f64,
        first_delay: f64,
        interval: f64,
    ) -> Self {
        Self {
            direction,
            flavor,
            ball_speed,
            first_delay,
            interval,
            total_balls,
            balls_left: total_balls,
            timer: 0.0,
        }
    }

    /// Advance the launch timer; true when a ball should spawn this tick.
    /// The timer restarts from zero on each launch (leftover time is not
    /// carried), and at most one ball spawns per tick.
    fn tick(&mut self, dt: f64) -> bool {
        self.timer += dt;

        if self.balls_left == 0 {
            return false;
        }

        let threshold = if self.balls_left == self.total_balls {
            self.first_delay
        } else {
            self.interval
        };
        if self.timer >= threshold {
            self.balls_left -= 1;
            self.timer = 0.0;
            return true;
        }
        false
    }
}

/// Breakage lifecycle of a cracked road
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BreakState {
    /// Not run over yet
    Unbroken,
    /// Run over; crumbles after [`BREAKING_DURATION`]
    Breaking,
    /// Crumbled away (visual only; the cell stays walkable)
    Broken,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrackedRoad {
    pub state: BreakState,
    timer: f64,
}

impl CrackedRoad {
    pub fn new() -> Self {
        Self {
            state: BreakState::Unbroken,
            timer: 0.0,
        }
    }

    fn tick(&mut self, dt: f64) {
        if self.state == BreakState::Breaking {
            self.timer += dt;
            if self.timer >= BREAKING_DURATION {
                self.state = BreakState::Broken;
            }
        }
    }

    fn on_ball_collision(&mut self) -> CollisionResponse {
        if self.state == BreakState::Unbroken {
            self.state = BreakState::Breaking;
            self.timer = 0.0;
            CollisionResponse::PassThrough
        } else {
            CollisionResponse::Fail(FailReason::BrokenRoad)
        }
    }
}

impl Default for CrackedRoad {
    fn default() -> Self {
        Self::new()
    }
}

/// A flickering fire that fails the level when a ball rolls over it while lit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fire {
    pub on: bool,
    pub on_duration: f64,
    pub off_duration: f64,
    timer: f64,
}

impl Fire {
    pub fn new(on_duration: f64, off_duration: f64) -> Self {
        Self {
            on: true,
            on_duration,
            off_duration,
            timer: 0.0,
        }
    }

    /// A phase offset shifts the flicker relative to other fires. Negative
    /// offsets keep the fire lit longer initially; an offset beyond the on
    /// duration is ignored.
    pub fn with_phase(on_duration: f64, off_duration: f64, offset: f64) -> Self {
        let mut fire = Self::new(on_duration, off_duration);
        if offset <= on_duration {
            fire.timer = offset;
        }
        fire
    }

    fn tick(&mut self, dt: f64) {
        // An all-fast configuration would toggle without ever settling
        if self.on_duration < 0.1 && self.off_duration < 0.1 {
            return;
        }

        self.timer += dt;
        loop {
            let duration = if self.on {
                self.on_duration
            } else {
                self.off_duration
            };
            if self.timer < duration {
                break;
            }
            // Carry the leftover into the toggled phase
            self.timer -= duration;
            self.on = !self.on;
        }
    }
}

/// A ball spawn request produced by a launcher during the tile phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallLaunch {
    pub pos: DVec2,
    pub direction: Direction,
    pub flavor: Flavor,
    pub speed: f64,
}

/// Per-variant tile state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TileKind {
    Road,
    Arrow { direction: Direction, flavor: Flavor },
    Switch(Switch),
    Launcher(Launcher),
    Goal { flavor: Flavor },
    CrackedRoad(CrackedRoad),
    Fire(Fire),
}

impl TileKind {
    pub fn arrow(direction: Direction, flavor: Flavor) -> Self {
        TileKind::Arrow { direction, flavor }
    }

    pub fn goal(flavor: Flavor) -> Self {
        TileKind::Goal { flavor }
    }

    pub fn cracked_road() -> Self {
        TileKind::CrackedRoad(CrackedRoad::new())
    }
}

/// A stationary grid occupant: a world position plus variant state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    /// Top-left corner in world space, kept in sync with the owning cell
    pub pos: DVec2,
    pub kind: TileKind,
}

impl Tile {
    pub fn new(pos: DVec2, kind: TileKind) -> Self {
        Self { pos, kind }
    }

    /// Handle a ball reaching this tile's center. Flavor-gated variants
    /// no-op for incompatible balls (the ball passes through untouched).
    pub fn on_ball_collision(&mut self, ball: &Ball) -> CollisionResponse {
        match &mut self.kind {
            TileKind::Road | TileKind::Launcher(_) => CollisionResponse::PassThrough,
            TileKind::Arrow { direction, flavor } => {
                if flavor.compatible_with(ball.flavor) {
                    CollisionResponse::Redirect(*direction)
                } else {
                    CollisionResponse::PassThrough
                }
            }
            TileKind::Switch(switch) => {
                if switch.flavor.compatible_with(ball.flavor) {
                    CollisionResponse::Redirect(switch.facing)
                } else {
                    CollisionResponse::PassThrough
                }
            }
            TileKind::Goal { flavor } => {
                if flavor.compatible_with(ball.flavor) {
                    CollisionResponse::Capture
                } else {
                    CollisionResponse::PassThrough
                }
            }
            TileKind::CrackedRoad(road) => road.on_ball_collision(),
            TileKind::Fire(fire) => {
                if fire.on {
                    CollisionResponse::Fail(FailReason::Burned)
                } else {
                    CollisionResponse::PassThrough
                }
            }
        }
    }

    /// Handle a click on this tile. Only switches react.
    pub fn on_click(&mut self) {
        if let TileKind::Switch(switch) = &mut self.kind {
            switch.cycle();
        }
    }

    /// Whether a ball may cross into this tile's cell. Launchers refuse
    /// entry (balls may still *start* there).
    pub fn can_ball_enter(&self, _ball: &Ball) -> bool {
        !matches!(self.kind, TileKind::Launcher(_))
    }

    /// Advance time-varying tile state. Launchers may answer with a ball to
    /// spawn at their cell center.
    pub fn update(&mut self, dt: f64) -> Option<BallLaunch> {
        match &mut self.kind {
            TileKind::Launcher(launcher) => launcher.tick(dt).then(|| BallLaunch {
                pos: self.pos + DVec2::splat(HALF_CELL_SIZE - BALL_RADIUS),
                direction: launcher.direction,
                flavor: launcher.flavor,
                speed: launcher.ball_speed,
            }),
            TileKind::CrackedRoad(road) => {
                road.tick(dt);
                None
            }
            TileKind::Fire(fire) => {
                fire.tick(dt);
                None
            }
            _ => None,
        }
    }

    /// Logical sprite asset a renderer would load for this tile, if any.
    /// Plain and broken roads render as flat shapes, not sprites.
    pub fn sprite_name(&self) -> Option<&'static str> {
        match &self.kind {
            TileKind::Road => None,
            TileKind::Arrow { flavor, .. } => Some(match flavor {
                Flavor::Red => "Textures/Arrow_Red.png",
                Flavor::Blue => "Textures/Arrow_Blue.png",
                Flavor::Purple => "Textures/Arrow_Purple.png",
            }),
            TileKind::Switch(switch) => Some(match (switch.config, switch.flavor) {
                (SwitchConfig::TwoWay, Flavor::Red) => "Textures/Switch_2Way_Red.png",
                (SwitchConfig::TwoWay, Flavor::Blue) => "Textures/Switch_2Way_Blue.png",
                (SwitchConfig::TwoWay, Flavor::Purple) => "Textures/Switch_2Way_Purple.png",
                (SwitchConfig::FourWay, Flavor::Red) => "Textures/Switch_4Way_Red.png",
                (SwitchConfig::FourWay, Flavor::Blue) => "Textures/Switch_4Way_Blue.png",
                (SwitchConfig::FourWay, Flavor::Purple) => "Textures/Switch_4Way_Purple.png",
                (_, Flavor::Red) => "Textures/Switch_Corner_Red.png",
                (_, Flavor::Blue) => "Textures/Switch_Corner_Blue.png",
                (_, Flavor::Purple) => "Textures/Switch_Corner_Purple.png",
            }),
            TileKind::Launcher(launcher) => Some(match launcher.flavor {
                Flavor::Red => "Textures/Launcher_Red.png",
                Flavor::Blue => "Textures/Launcher_Blue.png",
                Flavor::Purple => "Textures/Launcher_Purple.png",
            }),
            TileKind::Goal { flavor } => Some(match flavor {
                Flavor::Red => "Textures/Goal_Red.png",
                Flavor::Blue => "Textures/Goal_Blue.png",
                Flavor::Purple => "Textures/Goal_Purple.png",
            }),
            TileKind::CrackedRoad(road) => match road.state {
                BreakState::Broken => None,
                _ => Some("Textures/CrackedRoad.png"),
            },
            TileKind::Fire(_) => Some("Textures/Fire.png"),
        }
    }
}
