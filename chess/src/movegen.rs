use crate::attack::{self, PinsAndChecks};
use crate::between;
use crate::board::Board;
use crate::castling;
use crate::generic;
use crate::geometry::{self, Dir};
use crate::moves::{self, Move, MoveKind, PromotePiece};
use crate::types::{CastlingSide, Cell, Color, Coord, Piece};

use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::slice;

use arrayvec::ArrayVec;

/// List of moves
///
/// No chess position has more than 256 moves, so the list never allocates.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct MoveList(ArrayVec<Move, 256>);

impl Deref for MoveList {
    type Target = ArrayVec<Move, 256>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for MoveList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a mut MoveList {
    type Item = &'a mut Move;
    type IntoIter = slice::IterMut<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter_mut()
    }
}

impl IntoIterator for MoveList {
    type Item = Move;
    type IntoIter = arrayvec::IntoIter<Move, 256>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl MoveList {
    pub fn new() -> MoveList {
        MoveList(ArrayVec::new())
    }
}

pub trait MovePush {
    fn push(&mut self, m: Move);
}

impl<const N: usize> MovePush for ArrayVec<Move, N> {
    fn push(&mut self, m: Move) {
        self.push(m);
    }
}

impl MovePush for MoveList {
    fn push(&mut self, m: Move) {
        self.0.push(m);
    }
}

impl MovePush for Vec<Move> {
    fn push(&mut self, m: Move) {
        self.push(m);
    }
}

/// Restrictions applied while generating moves
#[derive(Debug, Copy, Clone)]
pub(crate) struct Rules<'a> {
    /// Pins against the king of the side to move, `None` to ignore pins
    pub pc: Option<&'a PinsAndChecks>,
    /// If set, king moves and enpassant captures which leave the king under attack are skipped
    pub king_safety: bool,
}

impl Rules<'static> {
    pub const SEMILEGAL: Rules<'static> = Rules {
        pc: None,
        king_safety: false,
    };
}

struct MoveGenImpl<'a, P, C> {
    board: &'a Board,
    dst: &'a mut P,
    rules: Rules<'a>,
    _c: PhantomData<C>,
}

impl<'a, P: MovePush, C: generic::Color> MoveGenImpl<'a, P, C> {
    fn new(board: &'a Board, dst: &'a mut P, rules: Rules<'a>, _c: C) -> Self {
        MoveGenImpl {
            board,
            dst,
            rules,
            _c: PhantomData,
        }
    }

    fn pin_allows(&self, src: Coord, dst: Coord) -> bool {
        let pin_dir = match self.rules.pc.and_then(|pc| pc.pin_dir(src)) {
            Some(dir) => dir,
            None => return true,
        };
        between::line_dir(src, dst)
            .map(|d| d.is_along(pin_dir))
            .unwrap_or(false)
    }

    /// Makes the move on a scratch copy of the board and checks that our king is safe
    fn keeps_king_safe(&self, mv: Move) -> bool {
        let mut b = self.board.clone();
        let _ = moves::make_move_raw(&mut b, mv);
        !b.is_opponent_king_attacked()
    }

    fn add_move(&mut self, kind: MoveKind, src: Coord, dst: Coord, captured: Cell) {
        let moved = self.board.get(src);
        let mv = Move::new(kind, src, dst, moved, captured);
        if !self.pin_allows(src, dst) {
            return;
        }
        if self.rules.king_safety
            && (moved.piece() == Some(Piece::King) || kind == MoveKind::Enpassant)
            && !self.keeps_king_safe(mv)
        {
            return;
        }
        self.dst.push(mv);
    }

    fn add_pawn(&mut self, src: Coord, dst: Coord, captured: Cell) {
        if dst.rank() == C::PROMOTE_RANK {
            for p in PromotePiece::ALL {
                self.add_move(p.into(), src, dst, captured);
            }
        } else {
            self.add_move(MoveKind::Simple, src, dst, captured);
        }
    }

    fn gen_pawn(&mut self, src: Coord) {
        if let Some(dst) = src.shift(C::FORWARD) {
            if self.board.get(dst).is_empty() {
                self.add_pawn(src, dst, Cell::EMPTY);
                if src.rank() == C::DOUBLE_MOVE_RANK {
                    if let Some(dst2) = dst.shift(C::FORWARD) {
                        if self.board.get(dst2).is_empty() {
                            self.add_move(MoveKind::PawnDouble, src, dst2, Cell::EMPTY);
                        }
                    }
                }
            }
        }

        for dir in geometry::pawn_captures(C::COLOR) {
            let dst = match src.shift(dir) {
                Some(dst) => dst,
                None => continue,
            };
            let cell = self.board.get(dst);
            if cell.has_color(<C::Inv as generic::Color>::COLOR) {
                self.add_pawn(src, dst, cell);
            } else if self.board.ep_target() == Some(dst) {
                let victim = Cell::from_parts(<C::Inv as generic::Color>::COLOR, Piece::Pawn);
                self.add_move(MoveKind::Enpassant, src, dst, victim);
            }
        }
    }

    fn gen_leaper(&mut self, src: Coord, offsets: &[Dir]) {
        for &dir in offsets {
            if let Some(dst) = src.shift(dir) {
                let cell = self.board.get(dst);
                if !cell.has_color(C::COLOR) {
                    self.add_move(MoveKind::Simple, src, dst, cell);
                }
            }
        }
    }

    fn gen_slider(&mut self, src: Coord, dirs: &[Dir]) {
        for &dir in dirs {
            for dst in src.ray(dir) {
                let cell = self.board.get(dst);
                if !cell.has_color(C::COLOR) {
                    self.add_move(MoveKind::Simple, src, dst, cell);
                }
                if cell.is_occupied() {
                    break;
                }
            }
        }
    }

    fn gen_pieces(&mut self) {
        let board = self.board;
        for (src, piece) in board.occupied_by(C::COLOR) {
            match piece {
                Piece::Pawn => self.gen_pawn(src),
                Piece::King => self.gen_leaper(src, &geometry::KING),
                Piece::Knight => self.gen_leaper(src, &geometry::KNIGHT),
                Piece::Bishop => self.gen_slider(src, &geometry::DIAGONAL),
                Piece::Rook => self.gen_slider(src, &geometry::ORTHOGONAL),
                Piece::Queen => self.gen_slider(src, &geometry::RAYS),
            }
        }
    }

    fn gen_castling(&mut self) {
        let color = C::COLOR;
        let inv = <C::Inv as generic::Color>::COLOR;
        let rights = self.board.castling();
        if !rights.has(color, CastlingSide::King) && !rights.has(color, CastlingSide::Queen) {
            return;
        }
        let king = self.board.king_pos(color);
        if king != castling::king_src(color) || attack::is_cell_attacked(self.board, king, inv) {
            return;
        }
        for side in [CastlingSide::King, CastlingSide::Queen] {
            if !rights.has(color, side) {
                continue;
            }
            if castling::pass(color, side)
                .into_iter()
                .any(|c| self.board.get(c).is_occupied())
            {
                continue;
            }
            if castling::safe(color, side)
                .into_iter()
                .any(|c| attack::is_cell_attacked(self.board, c, inv))
            {
                continue;
            }
            self.dst.push(Move::from_castling(color, side));
        }
    }
}

/// Generates all the moves except castling for the side to move, following `rules`
pub(crate) fn gen_pieces_into<P: MovePush>(b: &Board, rules: Rules<'_>, dst: &mut P) {
    match b.side() {
        Color::White => MoveGenImpl::new(b, dst, rules, generic::White).gen_pieces(),
        Color::Black => MoveGenImpl::new(b, dst, rules, generic::Black).gen_pieces(),
    }
}

/// Generates castling moves for the side to move
///
/// The king must not be in check, the squares between the king and the rook must be empty, and
/// the squares the king crosses must not be attacked.
pub fn gen_castling_into<P: MovePush>(b: &Board, dst: &mut P) {
    match b.side() {
        Color::White => {
            MoveGenImpl::new(b, dst, Rules::SEMILEGAL, generic::White).gen_castling()
        }
        Color::Black => {
            MoveGenImpl::new(b, dst, Rules::SEMILEGAL, generic::Black).gen_castling()
        }
    }
}

/// Move generation that ignores pins and checks
///
/// The generated moves follow the movement rules of the pieces, but may leave the king under
/// attack. Castling is fully checked, as its rules don't depend on the king's safety after the
/// move.
pub mod semilegal {
    use super::{MoveList, MovePush, Rules};
    use crate::board::Board;

    pub fn gen_all_into<P: MovePush>(b: &Board, dst: &mut P) {
        super::gen_pieces_into(b, Rules::SEMILEGAL, dst);
        super::gen_castling_into(b, dst);
    }

    pub fn gen_all(b: &Board) -> MoveList {
        let mut res = MoveList::new();
        gen_all_into(b, &mut res);
        res
    }
}
