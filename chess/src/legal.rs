//! Legal move generation
//!
//! Legal moves are obtained from the pin-aware generator in [`movegen`](crate::movegen), narrowed
//! down by [`filter_for_check()`] when the king is in check. Castling moves are appended last.

use crate::attack::{self, Check};
use crate::between;
use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::movegen::{self, MoveList, Rules};
use crate::moves::Move;
use crate::types::{Coord, Piece};

use log::trace;

/// Removes the moves which don't resolve `checks` against the king standing on `king`
///
/// Expects `moves` to contain only the moves which obey pins and don't put the king under attack.
/// Without checks, the list is left as is. Under double check, only the king moves remain. Under
/// single check, a move must capture the checking piece or block the line between it and the
/// king. Enpassant that removes the checking pawn also resolves the check.
pub fn filter_for_check(moves: &mut MoveList, checks: &[Check], b: &Board, king: Coord) {
    match checks {
        [] => {}
        [check] => {
            let target = if b.get(check.coord).piece() == Some(Piece::Knight) {
                Bitboard::from_coord(check.coord)
            } else {
                between::strict(king, check.coord) | Bitboard::from_coord(check.coord)
            };
            moves.retain(|mv| {
                mv.src() == king
                    || target.has(mv.dst())
                    || (mv.is_enpassant()
                        && Coord::from_row_col(mv.src().row(), mv.dst().col()) == check.coord)
            });
        }
        _ => moves.retain(|mv| mv.src() == king),
    }
}

/// Generates all the legal moves for the side to move
pub fn gen_all(b: &Board) -> MoveList {
    let king = b.king_pos(b.side());
    let pc = attack::pins_and_checks(b, king, b.side());
    let rules = Rules {
        pc: Some(&pc),
        king_safety: true,
    };

    let mut res = MoveList::new();
    movegen::gen_pieces_into(b, rules, &mut res);
    filter_for_check(&mut res, &pc.checks, b, king);
    movegen::gen_castling_into(b, &mut res);

    trace!(
        "{} legal moves, {} checks, {} pins",
        res.len(),
        pc.checks.len(),
        pc.pins.len()
    );
    res
}

/// Returns `true` if the move `mv` is legal in position `b`
#[inline]
pub fn is_legal(b: &Board, mv: Move) -> bool {
    gen_all(b).contains(&mv)
}
