//! Castling geometry and castling rights bookkeeping

use crate::bitboard::Bitboard;
use crate::geometry;
use crate::moves::Move;
use crate::types::{CastlingRights, CastlingSide, Color, Coord, File};

const fn on_rank(c: Color, x: u64) -> Bitboard {
    Bitboard::from_raw(match c {
        Color::White => x << 56,
        Color::Black => x,
    })
}

/// Squares that must be empty to castle
#[inline]
pub const fn pass(c: Color, s: CastlingSide) -> Bitboard {
    on_rank(
        c,
        match s {
            CastlingSide::King => 0x60,
            CastlingSide::Queen => 0x0e,
        },
    )
}

/// Squares the king crosses or lands on, which must not be attacked
#[inline]
pub const fn safe(c: Color, s: CastlingSide) -> Bitboard {
    on_rank(
        c,
        match s {
            CastlingSide::King => 0x60,
            CastlingSide::Queen => 0x0c,
        },
    )
}

/// Initial squares of the king and the rook involved in castling
#[inline]
pub const fn srcs(c: Color, s: CastlingSide) -> Bitboard {
    on_rank(
        c,
        match s {
            CastlingSide::King => 0x90,
            CastlingSide::Queen => 0x11,
        },
    )
}

pub const ALL_SRCS: Bitboard = Bitboard::from_raw(0x91 | (0x91 << 56));

#[inline]
pub const fn king_src(c: Color) -> Coord {
    Coord::from_parts(File::E, geometry::castling_rank(c))
}

#[inline]
pub const fn king_dst(c: Color, s: CastlingSide) -> Coord {
    let file = match s {
        CastlingSide::King => File::G,
        CastlingSide::Queen => File::C,
    };
    Coord::from_parts(file, geometry::castling_rank(c))
}

#[inline]
pub const fn rook_src(c: Color, s: CastlingSide) -> Coord {
    let file = match s {
        CastlingSide::King => File::H,
        CastlingSide::Queen => File::A,
    };
    Coord::from_parts(file, geometry::castling_rank(c))
}

#[inline]
pub const fn rook_dst(c: Color, s: CastlingSide) -> Coord {
    let file = match s {
        CastlingSide::King => File::F,
        CastlingSide::Queen => File::D,
    };
    Coord::from_parts(file, geometry::castling_rank(c))
}

/// Returns castling rights after `mv` is made
///
/// A right is lost forever once the king or the corresponding rook leaves its initial square, or
/// once something is captured on the rook's initial square.
pub fn update_rights(rights: CastlingRights, mv: &Move) -> CastlingRights {
    let touched = Bitboard::from_coord(mv.src()) | Bitboard::from_coord(mv.dst());
    if (ALL_SRCS & touched).is_empty() {
        return rights;
    }
    let mut res = rights;
    for c in [Color::White, Color::Black] {
        for s in [CastlingSide::Queen, CastlingSide::King] {
            if (srcs(c, s) & touched).is_nonempty() {
                res.unset(c, s);
            }
        }
    }
    res
}
