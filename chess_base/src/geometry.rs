use crate::types::{Color, Rank};

/// Step on the board, expressed as a change of row and column
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Dir {
    pub row: i8,
    pub col: i8,
}

impl Dir {
    pub const fn new(row: i8, col: i8) -> Dir {
        Dir { row, col }
    }

    pub const fn opposite(self) -> Dir {
        Dir::new(-self.row, -self.col)
    }

    /// Returns `true` if the direction is a rook direction
    pub const fn is_orthogonal(self) -> bool {
        (self.row == 0) != (self.col == 0)
    }

    /// Returns `true` if the direction is a bishop direction
    pub const fn is_diagonal(self) -> bool {
        self.row != 0 && self.row.abs() == self.col.abs()
    }

    /// Returns `true` if moving along `self` stays on the line given by `axis`
    pub fn is_along(self, axis: Dir) -> bool {
        self == axis || self == axis.opposite()
    }
}

pub const ORTHOGONAL: [Dir; 4] = [
    Dir::new(-1, 0),
    Dir::new(0, -1),
    Dir::new(1, 0),
    Dir::new(0, 1),
];

pub const DIAGONAL: [Dir; 4] = [
    Dir::new(-1, -1),
    Dir::new(-1, 1),
    Dir::new(1, -1),
    Dir::new(1, 1),
];

/// All eight ray directions, orthogonal ones first
pub const RAYS: [Dir; 8] = [
    ORTHOGONAL[0],
    ORTHOGONAL[1],
    ORTHOGONAL[2],
    ORTHOGONAL[3],
    DIAGONAL[0],
    DIAGONAL[1],
    DIAGONAL[2],
    DIAGONAL[3],
];

pub const KNIGHT: [Dir; 8] = [
    Dir::new(-2, -1),
    Dir::new(-2, 1),
    Dir::new(-1, -2),
    Dir::new(-1, 2),
    Dir::new(1, -2),
    Dir::new(1, 2),
    Dir::new(2, -1),
    Dir::new(2, 1),
];

pub const KING: [Dir; 8] = RAYS;

pub const fn castling_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R1,
        Color::Black => Rank::R8,
    }
}

pub const fn double_move_src_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R2,
        Color::Black => Rank::R7,
    }
}

pub const fn promote_dst_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R8,
        Color::Black => Rank::R1,
    }
}

pub const fn enpassant_dst_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R6,
        Color::Black => Rank::R3,
    }
}

/// Direction in which pawns of color `c` advance
pub const fn pawn_forward(c: Color) -> Dir {
    match c {
        Color::White => Dir::new(-1, 0),
        Color::Black => Dir::new(1, 0),
    }
}

/// Directions in which pawns of color `c` capture
pub const fn pawn_captures(c: Color) -> [Dir; 2] {
    let row = pawn_forward(c).row;
    [Dir::new(row, -1), Dir::new(row, 1)]
}
