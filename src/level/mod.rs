//! Level descriptions
//!
//! A [`Level`] only describes a grid of tile kinds; it has no positions or
//! live state until the runtime loads it. Most of a level is authored as a
//! legend string, with fully-configured tiles (launchers, goals, switches,
//! fires, flavored arrows) overwritten per cell afterward.

pub mod catalog;

use glam::IVec2;

use crate::sim::tile::TileKind;
use crate::sim::{Direction, Flavor};

/// Legend characters:
/// - space: empty cell
/// - `#`: road
/// - `>` `<` `^` `v`: purple arrow facing right/left/up/down
/// - `x`: cracked road
///
/// Comma, newline, and tab are ignored and do not consume a cell, so legends
/// can be authored row by row.
#[derive(Debug, Clone)]
pub struct Level {
    name: String,
    size: IVec2,
    /// Row-major, `y * width + x`
    cells: Vec<Option<TileKind>>,
}

impl Level {
    /// An empty level of the given cell dimensions
    pub fn new(name: &str, width: i32, height: i32) -> Self {
        assert!(width > 0 && height > 0, "level must have positive dimensions");
        Self {
            name: name.to_owned(),
            size: IVec2::new(width, height),
            cells: vec![None; (width * height) as usize],
        }
    }

    /// Build a level directly from a legend string
    pub fn from_legend(name: &str, width: i32, height: i32, legend: &str) -> Self {
        let mut level = Self::new(name, width, height);
        level.apply_legend(legend);
        level
    }

    /// Fill cells row by row from `legend`. Unknown characters are an
    /// authoring error; release builds log and leave the cell empty.
    pub fn apply_legend(&mut self, legend: &str) {
        let mut cell = 0usize;
        for ch in legend.chars() {
            if matches!(ch, ',' | '\n' | '\t') {
                continue;
            }
            if cell >= self.cells.len() {
                debug_assert!(false, "legend longer than {} cells", self.cells.len());
                log::warn!("legend for \"{}\" overflows the grid; truncated", self.name);
                break;
            }

            self.cells[cell] = match ch {
                ' ' => None,
                '#' => Some(TileKind::Road),
                '>' => Some(TileKind::arrow(Direction::Right, Flavor::Purple)),
                '<' => Some(TileKind::arrow(Direction::Left, Flavor::Purple)),
                '^' => Some(TileKind::arrow(Direction::Up, Flavor::Purple)),
                'v' => Some(TileKind::arrow(Direction::Down, Flavor::Purple)),
                'x' => Some(TileKind::cracked_road()),
                unknown => {
                    debug_assert!(false, "unknown legend character {unknown:?}");
                    log::warn!(
                        "unknown legend character {unknown:?} in \"{}\"; treating as empty",
                        self.name
                    );
                    None
                }
            };
            cell += 1;
        }
    }

    /// Overwrite one cell with a fully-configured tile kind
    pub fn set_tile(&mut self, x: i32, y: i32, kind: TileKind) {
        match self.index(x, y) {
            Some(i) => self.cells[i] = Some(kind),
            None => {
                debug_assert!(false, "set_tile out of bounds: ({x}, {y})");
                log::warn!("ignoring out-of-bounds tile at ({x}, {y}) in \"{}\"", self.name);
            }
        }
    }

    /// Tile kind at a cell, if the cell is in bounds and non-empty
    pub fn kind_at(&self, x: i32, y: i32) -> Option<&TileKind> {
        self.index(x, y).and_then(|i| self.cells[i].as_ref())
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        (x >= 0 && y >= 0 && x < self.size.x && y < self.size.y)
            .then(|| (y * self.size.x + x) as usize)
    }

    pub fn size(&self) -> IVec2 {
        self.size
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
