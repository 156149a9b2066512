use super::notation::{self, CoordMove};
use crate::board::Board;
use crate::castling;
use crate::geometry;
use crate::types::{CastlingRights, CastlingSide, Cell, Color, Coord, Piece};

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use thiserror::Error;

/// Move kind
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveKind {
    /// Any move or capture which doesn't fall into the categories below
    Simple = 0,
    /// Double pawn move
    PawnDouble = 1,
    /// Enpassant
    Enpassant = 2,
    /// Kingside castling
    CastlingKingside = 3,
    /// Queenside castling
    CastlingQueenside = 4,
    /// Pawn promote to knight (either non-capture or capture)
    PromoteKnight = 5,
    /// Pawn promote to bishop (either non-capture or capture)
    PromoteBishop = 6,
    /// Pawn promote to rook (either non-capture or capture)
    PromoteRook = 7,
    /// Pawn promote to queen (either non-capture or capture)
    PromoteQueen = 8,
}

/// Target piece for promotion
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PromotePiece {
    Knight = 2,
    Bishop = 3,
    Rook = 4,
    Queen = 5,
}

impl PromotePiece {
    pub const ALL: [PromotePiece; 4] = [
        PromotePiece::Knight,
        PromotePiece::Bishop,
        PromotePiece::Rook,
        PromotePiece::Queen,
    ];
}

impl From<PromotePiece> for Piece {
    #[inline]
    fn from(p: PromotePiece) -> Self {
        match p {
            PromotePiece::Knight => Piece::Knight,
            PromotePiece::Bishop => Piece::Bishop,
            PromotePiece::Rook => Piece::Rook,
            PromotePiece::Queen => Piece::Queen,
        }
    }
}

impl TryFrom<Piece> for PromotePiece {
    type Error = ();

    #[inline]
    fn try_from(p: Piece) -> Result<Self, Self::Error> {
        match p {
            Piece::Knight => Ok(PromotePiece::Knight),
            Piece::Bishop => Ok(PromotePiece::Bishop),
            Piece::Rook => Ok(PromotePiece::Rook),
            Piece::Queen => Ok(PromotePiece::Queen),
            _ => Err(()),
        }
    }
}

impl From<CastlingSide> for MoveKind {
    #[inline]
    fn from(side: CastlingSide) -> Self {
        match side {
            CastlingSide::King => Self::CastlingKingside,
            CastlingSide::Queen => Self::CastlingQueenside,
        }
    }
}

impl TryFrom<MoveKind> for CastlingSide {
    type Error = ();

    #[inline]
    fn try_from(kind: MoveKind) -> Result<Self, Self::Error> {
        match kind {
            MoveKind::CastlingKingside => Ok(Self::King),
            MoveKind::CastlingQueenside => Ok(Self::Queen),
            _ => Err(()),
        }
    }
}

impl From<PromotePiece> for MoveKind {
    #[inline]
    fn from(kind: PromotePiece) -> Self {
        match kind {
            PromotePiece::Knight => Self::PromoteKnight,
            PromotePiece::Bishop => Self::PromoteBishop,
            PromotePiece::Rook => Self::PromoteRook,
            PromotePiece::Queen => Self::PromoteQueen,
        }
    }
}

impl TryFrom<MoveKind> for PromotePiece {
    type Error = ();

    #[inline]
    fn try_from(kind: MoveKind) -> Result<Self, Self::Error> {
        match kind {
            MoveKind::PromoteKnight => Ok(Self::Knight),
            MoveKind::PromoteBishop => Ok(Self::Bishop),
            MoveKind::PromoteRook => Ok(Self::Rook),
            MoveKind::PromoteQueen => Ok(Self::Queen),
            _ => Err(()),
        }
    }
}

impl MoveKind {
    /// Returns the piece after promote if this move kind represents a promote
    ///
    /// Otherwise, returns `None`.
    #[inline]
    pub fn promote(self) -> Option<Piece> {
        let piece: PromotePiece = self.try_into().ok()?;
        Some(piece.into())
    }
}

/// Chess move
///
/// Besides the source and destination squares, a move remembers the piece that moved and the
/// piece that was captured, so it can be undone and inspected without the board it was made on.
/// For enpassant, the captured piece is the opponent's pawn, even though the destination square
/// is empty.
///
/// Two moves are equal if they have the same [identity](Move::id()), i.e. the same source,
/// destination and promote piece.
#[derive(Debug, Copy, Clone)]
pub struct Move {
    kind: MoveKind,
    src: Coord,
    dst: Coord,
    moved: Cell,
    captured: Cell,
}

/// Error creating move from its squares
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum CreateError {
    /// Source and destination are the same square
    #[error("source and destination are the same")]
    SameSquare,
    /// There is no piece of the moving side on the source square
    #[error("no piece to move on {0}")]
    NoPiece(Coord),
    /// Destination contains a piece of the moving side
    #[error("cannot capture own piece on {0}")]
    CaptureOwn(Coord),
    /// Promote piece is specified for a move which is not a promote
    #[error("move is not a promote")]
    NotPromote,
}

impl Move {
    /// Creates a move from its raw parts
    ///
    /// The move is not checked in any way. Use [`Move::from_squares()`] or the move generator to
    /// obtain valid moves.
    #[inline]
    pub const fn new(kind: MoveKind, src: Coord, dst: Coord, moved: Cell, captured: Cell) -> Move {
        Move {
            kind,
            src,
            dst,
            moved,
            captured,
        }
    }

    /// Creates a castling move made by `color` with side `side`
    #[inline]
    pub fn from_castling(color: Color, side: CastlingSide) -> Move {
        Move {
            kind: MoveKind::from(side),
            src: castling::king_src(color),
            dst: castling::king_dst(color, side),
            moved: Cell::from_parts(color, Piece::King),
            captured: Cell::EMPTY,
        }
    }

    /// Creates a move from `src` to `dst` in position `b`
    ///
    /// The move kind is deduced from the position. Pawn moves to the last rank become queen
    /// promotes. The returned move is **not** guaranteed to be legal.
    #[inline]
    pub fn from_squares(b: &Board, src: Coord, dst: Coord) -> Result<Move, CreateError> {
        Move::from_squares_promote(b, src, dst, None)
    }

    /// Same as [`Move::from_squares()`], but allows to choose the promote piece
    ///
    /// If `promote` is `None` and the move is a promote, the pawn is promoted to queen.
    pub fn from_squares_promote(
        b: &Board,
        src: Coord,
        dst: Coord,
        promote: Option<PromotePiece>,
    ) -> Result<Move, CreateError> {
        let side = b.side();
        if src == dst {
            return Err(CreateError::SameSquare);
        }
        let moved = b.get(src);
        if !moved.has_color(side) {
            return Err(CreateError::NoPiece(src));
        }
        let captured = b.get(dst);
        if captured.has_color(side) {
            return Err(CreateError::CaptureOwn(dst));
        }

        let mut res = Move::new(MoveKind::Simple, src, dst, moved, captured);
        match moved.piece() {
            Some(Piece::Pawn) => {
                if dst.rank() == geometry::promote_dst_rank(side) {
                    res.kind = promote.unwrap_or(PromotePiece::Queen).into();
                    return Ok(res);
                }
                if src.col() == dst.col() && src.row().abs_diff(dst.row()) == 2 {
                    res.kind = MoveKind::PawnDouble;
                } else if src.col() != dst.col()
                    && captured.is_empty()
                    && b.ep_target() == Some(dst)
                {
                    res.kind = MoveKind::Enpassant;
                    res.captured = Cell::from_parts(side.inv(), Piece::Pawn);
                }
            }
            Some(Piece::King) if src == castling::king_src(side) => {
                if dst == castling::king_dst(side, CastlingSide::King) {
                    res.kind = MoveKind::CastlingKingside;
                } else if dst == castling::king_dst(side, CastlingSide::Queen) {
                    res.kind = MoveKind::CastlingQueenside;
                }
            }
            _ => {}
        }
        if promote.is_some() {
            return Err(CreateError::NotPromote);
        }
        Ok(res)
    }

    /// Parses a move in coordinate notation (like `e2e4` or `e7e8n`) in position `b`
    ///
    /// The returned move is **not** guaranteed to be legal.
    #[inline]
    pub fn from_coord_notation(s: &str, b: &Board) -> Result<Move, notation::ParseError> {
        Ok(CoordMove::from_str(s)?.into_move(b)?)
    }

    /// Unique identity of the move, built from its source, destination and promote piece
    #[inline]
    pub fn id(&self) -> u16 {
        let promote = PromotePiece::try_from(self.kind)
            .map(|p| p as u16)
            .unwrap_or(0);
        (promote << 12) | ((self.dst.index() as u16) << 6) | self.src.index() as u16
    }

    /// Returns the move kind
    #[inline]
    pub const fn kind(&self) -> MoveKind {
        self.kind
    }

    /// Returns the source square
    #[inline]
    pub const fn src(&self) -> Coord {
        self.src
    }

    /// Returns the destination square
    #[inline]
    pub const fn dst(&self) -> Coord {
        self.dst
    }

    /// Returns the piece that moved
    ///
    /// For promotes, this is the pawn.
    #[inline]
    pub const fn moved(&self) -> Cell {
        self.moved
    }

    /// Returns the captured piece, or [`Cell::EMPTY`] if the move is not a capture
    #[inline]
    pub const fn captured(&self) -> Cell {
        self.captured
    }

    /// Returns the side that makes this move
    #[inline]
    pub fn side(&self) -> Option<Color> {
        self.moved.color()
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        self.captured.is_occupied()
    }

    #[inline]
    pub fn is_promote(&self) -> bool {
        self.kind.promote().is_some()
    }

    #[inline]
    pub fn is_enpassant(&self) -> bool {
        self.kind == MoveKind::Enpassant
    }

    #[inline]
    pub fn is_castling(&self) -> bool {
        matches!(
            self.kind,
            MoveKind::CastlingKingside | MoveKind::CastlingQueenside
        )
    }

    /// Returns the move in coordinate notation (`e2e4`)
    ///
    /// The promote piece is not included, so the result always has four characters.
    #[inline]
    pub fn coord_notation(&self) -> String {
        self.to_string()
    }

    /// Returns the move in coordinate notation with the promote piece appended (`e7e8n`)
    #[inline]
    pub fn coord_notation_full(&self) -> String {
        CoordMove::from(*self).to_string()
    }
}

impl PartialEq for Move {
    #[inline]
    fn eq(&self, other: &Move) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Move {}

impl Hash for Move {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}{}", self.src, self.dst)
    }
}

/// Information required to unmake a move
///
/// It is returned by [`make_move_raw()`] and consumed by [`unmake_move_raw()`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct RawUndo {
    /// Piece captured by the move
    pub captured: Cell,
    /// Castling rights before the move
    pub castling: CastlingRights,
    /// Enpassant target before the move
    pub ep_target: Option<Coord>,
}

#[inline]
fn enpassant_victim(mv: &Move) -> Coord {
    Coord::from_row_col(mv.src.row(), mv.dst.col())
}

#[inline]
fn castling_rook(color: Color, kind: MoveKind) -> Option<(Coord, Coord)> {
    let side = CastlingSide::try_from(kind).ok()?;
    Some((
        castling::rook_src(color, side),
        castling::rook_dst(color, side),
    ))
}

/// Applies the move `mv` to the board `b`
///
/// The move must be legal in `b`, otherwise the board may end up in an invalid state. To allow
/// unmaking the move, a `RawUndo` instance is returned.
pub fn make_move_raw(b: &mut Board, mv: Move) -> RawUndo {
    let side = b.r.side;
    let undo = RawUndo {
        captured: mv.captured,
        castling: b.r.castling,
        ep_target: b.r.ep_target,
    };

    let placed = match mv.kind.promote() {
        Some(piece) => Cell::from_parts(side, piece),
        None => mv.moved,
    };
    b.r.put(mv.src, Cell::EMPTY);
    b.r.put(mv.dst, placed);
    if mv.kind == MoveKind::Enpassant {
        b.r.put(enpassant_victim(&mv), Cell::EMPTY);
    }
    if let Some((rook_src, rook_dst)) = castling_rook(side, mv.kind) {
        b.r.put(rook_src, Cell::EMPTY);
        b.r.put(rook_dst, Cell::from_parts(side, Piece::Rook));
    }
    if mv.moved.piece() == Some(Piece::King) {
        b.kings[side.index()] = mv.dst;
    }

    b.r.ep_target = match mv.kind {
        MoveKind::PawnDouble => Some(Coord::from_row_col(
            (mv.src.row() + mv.dst.row()) / 2,
            mv.src.col(),
        )),
        _ => None,
    };
    b.r.castling = castling::update_rights(b.r.castling, &mv);
    b.r.side = side.inv();

    undo
}

/// Reverts the move `mv` made on the board `b`
///
/// `mv` must be the last move made on `b`, and `u` must be the value returned by
/// [`make_move_raw()`] when making it.
pub fn unmake_move_raw(b: &mut Board, mv: Move, u: RawUndo) {
    let side = b.r.side.inv();

    b.r.put(mv.src, mv.moved);
    if mv.kind == MoveKind::Enpassant {
        b.r.put(mv.dst, Cell::EMPTY);
        b.r.put(enpassant_victim(&mv), u.captured);
    } else {
        b.r.put(mv.dst, u.captured);
    }
    if let Some((rook_src, rook_dst)) = castling_rook(side, mv.kind) {
        b.r.put(rook_dst, Cell::EMPTY);
        b.r.put(rook_src, Cell::from_parts(side, Piece::Rook));
    }
    if mv.moved.piece() == Some(Piece::King) {
        b.kings[side.index()] = mv.src;
    }

    b.r.ep_target = u.ep_target;
    b.r.castling = u.castling;
    b.r.side = side;
}

impl Board {
    /// Returns the board after making the move `mv`
    ///
    /// The move must be legal, like in [`make_move_raw()`].
    pub fn make_move_cloned(&self, mv: Move) -> Board {
        let mut res = self.clone();
        let _ = make_move_raw(&mut res, mv);
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{File, Rank};

    #[test]
    fn test_simple() {
        let mut b = Board::initial();
        let b_copy = b.clone();

        let g1 = Coord::from_parts(File::G, Rank::R1);
        let f3 = Coord::from_parts(File::F, Rank::R3);
        let mv = Move::from_squares(&b, g1, f3).unwrap();
        assert_eq!(mv.kind(), MoveKind::Simple);
        assert_eq!(mv.moved(), Cell::from_parts(Color::White, Piece::Knight));
        assert_eq!(mv.captured(), Cell::EMPTY);
        assert_eq!(mv.side(), Some(Color::White));
        assert_eq!(mv.to_string(), "g1f3");

        let u = make_move_raw(&mut b, mv);
        assert_eq!(
            b.as_fen(),
            "rnbqkbnr/pppppppp/8/8/8/5N2/PPPPPPPP/RNBQKB1R b KQkq -"
        );
        unmake_move_raw(&mut b, mv, u);
        assert_eq!(b, b_copy);

        let e2 = Coord::from_parts(File::E, Rank::R2);
        let e4 = Coord::from_parts(File::E, Rank::R4);
        let mv = Move::from_squares(&b, e2, e4).unwrap();
        assert_eq!(mv.kind(), MoveKind::PawnDouble);
        let u = make_move_raw(&mut b, mv);
        assert_eq!(
            b.as_fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3"
        );
        unmake_move_raw(&mut b, mv, u);
        assert_eq!(b, b_copy);
    }

    #[test]
    fn test_create_errors() {
        let b = Board::initial();
        let e2 = Coord::from_parts(File::E, Rank::R2);
        let e7 = Coord::from_parts(File::E, Rank::R7);
        let e1 = Coord::from_parts(File::E, Rank::R1);
        let e5 = Coord::from_parts(File::E, Rank::R5);
        assert_eq!(Move::from_squares(&b, e2, e2), Err(CreateError::SameSquare));
        assert_eq!(Move::from_squares(&b, e7, e5), Err(CreateError::NoPiece(e7)));
        assert_eq!(Move::from_squares(&b, e1, e2), Err(CreateError::CaptureOwn(e2)));
        assert_eq!(
            Move::from_squares_promote(&b, e2, e5, Some(PromotePiece::Queen)),
            Err(CreateError::NotPromote)
        );
    }

    #[test]
    fn test_promote() {
        let mut b = Board::from_fen("1b1b1K2/2P5/8/8/7k/8/8/8 w - -").unwrap();
        let b_copy = b.clone();

        let c7 = Coord::from_parts(File::C, Rank::R7);
        let b8 = Coord::from_parts(File::B, Rank::R8);
        let c8 = Coord::from_parts(File::C, Rank::R8);

        let mv = Move::from_squares_promote(&b, c7, b8, Some(PromotePiece::Knight)).unwrap();
        assert_eq!(mv.kind(), MoveKind::PromoteKnight);
        assert!(mv.is_promote());
        assert!(mv.is_capture());
        assert_eq!(mv.coord_notation(), "c7b8");
        assert_eq!(mv.coord_notation_full(), "c7b8n");
        let u = make_move_raw(&mut b, mv);
        assert_eq!(b.as_fen(), "1N1b1K2/8/8/8/7k/8/8/8 b - -");
        unmake_move_raw(&mut b, mv, u);
        assert_eq!(b, b_copy);

        let mv = Move::from_squares(&b, c7, c8).unwrap();
        assert_eq!(mv.kind(), MoveKind::PromoteQueen);
        let u = make_move_raw(&mut b, mv);
        assert_eq!(b.as_fen(), "1bQb1K2/8/8/8/7k/8/8/8 b - -");
        unmake_move_raw(&mut b, mv, u);
        assert_eq!(b, b_copy);
    }

    #[test]
    fn test_identity() {
        let b = Board::from_fen("1b1b1K2/2P5/8/8/7k/8/8/8 w - -").unwrap();
        let c7 = Coord::from_parts(File::C, Rank::R7);
        let c8 = Coord::from_parts(File::C, Rank::R8);
        let queen = Move::from_squares(&b, c7, c8).unwrap();
        let rook = Move::from_squares_promote(&b, c7, c8, Some(PromotePiece::Rook)).unwrap();
        assert_ne!(queen, rook);
        assert_ne!(queen.id(), rook.id());
        assert_eq!(queen.to_string(), rook.to_string());

        let other = Move::new(
            MoveKind::PromoteQueen,
            c7,
            c8,
            Cell::from_parts(Color::White, Piece::Pawn),
            Cell::EMPTY,
        );
        assert_eq!(queen, other);
    }

    #[test]
    fn test_castling() {
        const FEN: &str = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq -";
        let mut b = Board::from_fen(FEN).unwrap();
        let b_copy = b.clone();

        let mv = Move::from_castling(Color::White, CastlingSide::King);
        assert!(mv.is_castling());
        assert_eq!(mv.to_string(), "e1g1");
        assert_eq!(
            Move::from_coord_notation("e1g1", &b).unwrap().kind(),
            MoveKind::CastlingKingside
        );
        let u = make_move_raw(&mut b, mv);
        assert_eq!(b.as_fen(), "r3k2r/8/8/8/8/8/8/R4RK1 b kq -");
        assert_eq!(b.king_pos(Color::White), Coord::from_parts(File::G, Rank::R1));

        let mv2 = Move::from_castling(Color::Black, CastlingSide::Queen);
        let u2 = make_move_raw(&mut b, mv2);
        assert_eq!(b.as_fen(), "2kr3r/8/8/8/8/8/8/R4RK1 w - -");
        assert_eq!(b.king_pos(Color::Black), Coord::from_parts(File::C, Rank::R8));

        unmake_move_raw(&mut b, mv2, u2);
        unmake_move_raw(&mut b, mv, u);
        assert_eq!(b, b_copy);
        assert_eq!(b.as_fen(), FEN);
    }

    #[test]
    fn test_enpassant() {
        let mut b = Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6").unwrap();
        let b_copy = b.clone();

        let mv = Move::from_coord_notation("e5d6", &b).unwrap();
        assert_eq!(mv.kind(), MoveKind::Enpassant);
        assert!(mv.is_enpassant());
        assert_eq!(mv.captured(), Cell::from_parts(Color::Black, Piece::Pawn));
        let u = make_move_raw(&mut b, mv);
        assert_eq!(b.as_fen(), "4k3/8/3P4/8/8/8/8/4K3 b - -");
        unmake_move_raw(&mut b, mv, u);
        assert_eq!(b, b_copy);
    }
}
