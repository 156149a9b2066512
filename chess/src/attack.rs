//! Attack detection by ray casting from a square

use crate::board::Board;
use crate::geometry::{self, Dir};
use crate::types::{Cell, Color, Coord, Piece};

use arrayvec::ArrayVec;

/// Piece of the king's side that cannot leave the line between its king and an enemy slider
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Pin {
    /// Location of the pinned piece
    pub coord: Coord,
    /// Direction from the king towards the pinned piece
    pub dir: Dir,
}

/// Enemy piece that gives check
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Check {
    /// Location of the checking piece
    pub coord: Coord,
    /// Direction from the king towards the checking piece
    ///
    /// For knight checks, this is the knight offset itself.
    pub dir: Dir,
}

/// Pins and checks against a single king
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PinsAndChecks {
    pub pins: ArrayVec<Pin, 8>,
    pub checks: ArrayVec<Check, 16>,
}

impl PinsAndChecks {
    #[inline]
    pub fn in_check(&self) -> bool {
        !self.checks.is_empty()
    }

    /// Returns the pin axis of the piece on `coord`, or `None` if it's not pinned
    #[inline]
    pub fn pin_dir(&self, coord: Coord) -> Option<Dir> {
        self.pins.iter().find(|p| p.coord == coord).map(|p| p.dir)
    }
}

/// Returns `true` if `cell` attacks along `dir` from distance `dist`
///
/// Here `dir` points from the attacked square towards the attacker.
#[inline]
fn threatens(cell: Cell, dir: Dir, dist: usize) -> bool {
    let (color, piece) = match (cell.color(), cell.piece()) {
        (Some(c), Some(p)) => (c, p),
        _ => return false,
    };
    match piece {
        Piece::Rook => dir.is_orthogonal(),
        Piece::Bishop => dir.is_diagonal(),
        Piece::Queen => true,
        Piece::King => dist == 1,
        Piece::Pawn => {
            dist == 1 && dir.col != 0 && dir.opposite().row == geometry::pawn_forward(color).row
        }
        Piece::Knight => false,
    }
}

/// Returns `true` if the square `coord` is attacked by any piece of color `by`
///
/// Pieces standing on the board block the rays, including the king of the opposite color. If you
/// need to test a square the king moves to, remove the king from the board first.
pub fn is_cell_attacked(b: &Board, coord: Coord, by: Color) -> bool {
    for dir in geometry::RAYS {
        for (i, c) in coord.ray(dir).enumerate() {
            let cell = b.get(c);
            if cell.is_empty() {
                continue;
            }
            if cell.has_color(by) && threatens(cell, dir, i + 1) {
                return true;
            }
            break;
        }
    }

    let knight = Cell::from_parts(by, Piece::Knight);
    geometry::KNIGHT
        .iter()
        .filter_map(|&d| coord.shift(d))
        .any(|c| b.get(c) == knight)
}

/// Finds pins and checks against the king of color `color` standing on `king`
pub fn pins_and_checks(b: &Board, king: Coord, color: Color) -> PinsAndChecks {
    let mut res = PinsAndChecks::default();

    for dir in geometry::RAYS {
        let mut pinned = None;
        for (i, c) in king.ray(dir).enumerate() {
            let cell = b.get(c);
            if cell.is_empty() {
                continue;
            }
            if cell.has_color(color) {
                if pinned.is_some() {
                    break;
                }
                pinned = Some(c);
                continue;
            }
            if threatens(cell, dir, i + 1) {
                match pinned {
                    Some(coord) => res.pins.push(Pin { coord, dir }),
                    None => res.checks.push(Check { coord: c, dir }),
                }
            }
            break;
        }
    }

    let knight = Cell::from_parts(color.inv(), Piece::Knight);
    for dir in geometry::KNIGHT {
        if let Some(c) = king.shift(dir) {
            if b.get(c) == knight {
                res.checks.push(Check { coord: c, dir });
            }
        }
    }

    res
}
