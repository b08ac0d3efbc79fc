//! Built-in level catalog
//!
//! Hard-coded levels adapted for the engine: each starts from a legend
//! string (one literal per grid row) and overwrites cells with configured
//! launchers, goals, switches, fires, and flavored arrows.

use super::Level;
use crate::sim::tile::{Fire, Launcher, Switch, SwitchConfig, TileKind};
use crate::sim::{Direction, Flavor};

pub const LEVEL_COUNT: usize = 5;

/// Create the level at `index`. Out-of-range indices are a programmer
/// error; release builds fall back to the first level.
pub fn create(index: usize) -> Level {
    match index {
        0 => click_the_switch(),
        1 => dont_fall(),
        2 => sorting_algorithm(),
        3 => burning_bridges(),
        4 => wildfire(),
        _ => {
            debug_assert!(false, "level index {index} out of range");
            log::warn!("level index {index} out of range; loading level 0");
            click_the_switch()
        }
    }
}

fn launcher(
    direction: Direction,
    flavor: Flavor,
    balls: u32,
    speed: f64,
    delay: f64,
    interval: f64,
) -> TileKind {
    TileKind::Launcher(Launcher::new(direction, flavor, balls, speed, delay, interval))
}

fn switch(config: SwitchConfig, facing: Direction, flavor: Flavor) -> TileKind {
    TileKind::Switch(Switch::new(config, facing, flavor))
}

fn click_the_switch() -> Level {
    let mut level = Level::from_legend(
        "Click the Switch",
        6,
        10,
        concat!(
            "      ",
            "      ",
            "    # ",
            " #### ",
            " #  # ",
            " #  # ",
            " #### ",
            " #    ",
            "      ",
            "      ",
        ),
    );

    level.set_tile(1, 8, launcher(Direction::Up, Flavor::Red, 1, 128.0, 1.0, 1.0));
    level.set_tile(1, 6, TileKind::arrow(Direction::Up, Flavor::Purple));
    level.set_tile(1, 3, TileKind::arrow(Direction::Right, Flavor::Purple));
    level.set_tile(4, 3, switch(SwitchConfig::TwoWay, Direction::Down, Flavor::Purple));
    level.set_tile(4, 6, TileKind::arrow(Direction::Left, Flavor::Purple));
    level.set_tile(4, 1, TileKind::goal(Flavor::Red));

    level
}

fn dont_fall() -> Level {
    let mut level = Level::from_legend(
        "Don't Fall!",
        5,
        11,
        concat!(
            "     ",
            "     ",
            "   # ",
            "   # ",
            "   # ",
            " ### ",
            " #   ",
            " #   ",
            " #   ",
            "     ",
            "     ",
        ),
    );

    level.set_tile(1, 9, launcher(Direction::Up, Flavor::Red, 1, 128.0, 1.0, 1.0));
    level.set_tile(1, 5, switch(SwitchConfig::TwoWay, Direction::Left, Flavor::Purple));
    level.set_tile(3, 5, switch(SwitchConfig::TwoWay, Direction::Down, Flavor::Purple));
    level.set_tile(3, 1, TileKind::goal(Flavor::Red));

    level
}

fn sorting_algorithm() -> Level {
    let mut level = Level::from_legend(
        "Sorting Algorithm",
        9,
        5,
        concat!(
            "         ",
            " ####### ",
            "    #    ",
            " ####### ",
            "         ",
        ),
    );

    level.set_tile(1, 1, launcher(Direction::Right, Flavor::Red, 3, 128.0, 1.0, 1.4));
    level.set_tile(7, 1, launcher(Direction::Left, Flavor::Blue, 3, 128.0, 1.7, 1.4));
    level.set_tile(4, 1, TileKind::arrow(Direction::Down, Flavor::Purple));
    level.set_tile(4, 3, switch(SwitchConfig::TwoWay, Direction::Left, Flavor::Purple));
    level.set_tile(7, 3, TileKind::goal(Flavor::Red));
    level.set_tile(1, 3, TileKind::goal(Flavor::Blue));

    level
}

fn burning_bridges() -> Level {
    let mut level = Level::from_legend(
        "Burning Bridges",
        11,
        11,
        concat!(
            "           ",
            "         # ",
            "         # ",
            "   >#####^ ",
            "   #     # ",
            "   # >###^ ",
            "   # #   # ",
            "   # # >#^ ",
            "   x x x x ",
            " ########^ ",
            "           ",
        ),
    );

    level.set_tile(1, 9, launcher(Direction::Right, Flavor::Red, 4, 128.0, 1.0, 1.25));
    for x in [3, 5, 7, 9] {
        level.set_tile(x, 9, switch(SwitchConfig::CornerUpRight, Direction::Up, Flavor::Purple));
    }
    level.set_tile(9, 1, TileKind::goal(Flavor::Red));

    level
}

fn wildfire() -> Level {
    let mut level = Level::from_legend(
        "Wildfire",
        11,
        11,
        concat!(
            "           ",
            " ######### ",
            " ######### ",
            " ######### ",
            " ######### ",
            " ######### ",
            " ######### ",
            " ######### ",
            " ######### ",
            " ######### ",
            "           ",
        ),
    );

    level.set_tile(1, 1, launcher(Direction::Right, Flavor::Red, 1, 128.0, 1.0, 0.0));
    level.set_tile(9, 9, launcher(Direction::Left, Flavor::Blue, 1, 128.0, 1.0, 0.0));

    level.set_tile(4, 1, switch(SwitchConfig::TwoWay, Direction::Right, Flavor::Purple));
    level.set_tile(5, 1, switch(SwitchConfig::TwoWay, Direction::Left, Flavor::Purple));

    level.set_tile(6, 9, switch(SwitchConfig::TwoWay, Direction::Left, Flavor::Purple));
    level.set_tile(5, 9, switch(SwitchConfig::TwoWay, Direction::Right, Flavor::Purple));

    level.set_tile(8, 1, TileKind::Fire(Fire::new(1.0, 0.0)));
    level.set_tile(2, 9, TileKind::Fire(Fire::new(1.0, 0.0)));

    level.set_tile(2, 1, switch(SwitchConfig::CornerRightDown, Direction::Right, Flavor::Purple));
    level.set_tile(8, 9, switch(SwitchConfig::CornerLeftUp, Direction::Left, Flavor::Purple));

    level.set_tile(3, 1, TileKind::Fire(Fire::with_phase(1.0, 1.0, -0.25)));
    level.set_tile(7, 9, TileKind::Fire(Fire::with_phase(1.0, 1.0, -0.25)));

    level.set_tile(2, 5, switch(SwitchConfig::TwoWay, Direction::Right, Flavor::Purple));
    level.set_tile(1, 5, TileKind::arrow(Direction::Down, Flavor::Red));
    level.set_tile(3, 5, TileKind::arrow(Direction::Down, Flavor::Red));
    level.set_tile(1, 6, TileKind::Fire(Fire::with_phase(1.55, 1.55, 1.55)));
    level.set_tile(3, 6, TileKind::Fire(Fire::new(1.55, 1.55)));
    level.set_tile(1, 7, TileKind::arrow(Direction::Right, Flavor::Red));
    level.set_tile(3, 7, TileKind::arrow(Direction::Right, Flavor::Red));

    level.set_tile(8, 5, switch(SwitchConfig::TwoWay, Direction::Left, Flavor::Purple));
    level.set_tile(7, 5, TileKind::arrow(Direction::Up, Flavor::Blue));
    level.set_tile(9, 5, TileKind::arrow(Direction::Up, Flavor::Blue));
    level.set_tile(7, 4, TileKind::Fire(Fire::with_phase(1.55, 1.55, 1.55)));
    level.set_tile(9, 4, TileKind::Fire(Fire::new(1.55, 1.55)));
    level.set_tile(7, 3, TileKind::arrow(Direction::Left, Flavor::Blue));
    level.set_tile(9, 3, TileKind::arrow(Direction::Left, Flavor::Blue));

    level.set_tile(5, 3, TileKind::arrow(Direction::Down, Flavor::Blue));
    level.set_tile(5, 4, switch(SwitchConfig::TwoWay, Direction::Up, Flavor::Blue));
    level.set_tile(5, 5, TileKind::Fire(Fire::new(1.0, 1.0)));
    level.set_tile(5, 6, switch(SwitchConfig::TwoWay, Direction::Down, Flavor::Red));
    level.set_tile(5, 7, TileKind::arrow(Direction::Up, Flavor::Red));

    level.set_tile(5, 8, TileKind::arrow(Direction::Left, Flavor::Blue));
    level.set_tile(1, 8, TileKind::arrow(Direction::Down, Flavor::Blue));

    level.set_tile(5, 2, TileKind::arrow(Direction::Right, Flavor::Red));
    level.set_tile(9, 2, TileKind::arrow(Direction::Up, Flavor::Red));

    level.set_tile(9, 1, TileKind::goal(Flavor::Red));
    level.set_tile(1, 9, TileKind::goal(Flavor::Blue));

    level
}
