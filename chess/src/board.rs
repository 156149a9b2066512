//! Board and related things

use crate::attack::{self, PinsAndChecks};
use crate::geometry;
use crate::legal;
use crate::types::{
    self, CastlingRights, CastlingSide, Cell, Color, Coord, File, Outcome, Piece, Rank,
};

use std::fmt::{self, Display};
use std::num::ParseIntError;
use std::str::FromStr;

use thiserror::Error;

/// Board validation error
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ValidateError {
    /// Invalid enpassant target specified (i.e. it is located on an invalid rank)
    #[error("invalid enpassant target {0}")]
    InvalidEnpassant(Coord),
    /// Too many pieces of given color
    ///
    /// No more than 16 pieces of each color is allowed.
    #[error("too many pieces of color {0:?}")]
    TooManyPieces(Color),
    /// One of the sides doesn't have a king
    #[error("no king of color {0:?}")]
    NoKing(Color),
    /// One of the sides has more than one king
    #[error("more than one king of color {0:?}")]
    TooManyKings(Color),
    /// There is a pawn on the 1th or on the 8th rank
    #[error("invalid pawn position {0}")]
    InvalidPawn(Coord),
    /// Opponent's king is under attack
    #[error("opponent's king is attacked")]
    OpponentKingAttacked,
}

/// Error parsing the first part of FEN (i.e. the positions of pieces on the board)
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum CellsParseError {
    /// Rank is too large
    #[error("too many items in rank {0}")]
    RankOverflow(Rank),
    /// Rank is too small
    #[error("not enough items in rank {0}")]
    RankUnderflow(Rank),
    /// Too many ranks
    #[error("too many ranks")]
    Overflow,
    /// Not enough ranks
    #[error("not enough ranks")]
    Underflow,
    /// Unexpected character
    #[error("unexpected char {0:?}")]
    UnexpectedChar(char),
}

/// Error parsing [`RawBoard`] from FEN
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum RawFenParseError {
    /// FEN contains non-ASCII characters
    #[error("non-ASCII data in FEN")]
    NonAscii,
    /// FEN doesn't have board part
    #[error("board not specified")]
    NoBoard,
    /// Error parsing board from FEN
    #[error("bad board: {0}")]
    Board(#[from] CellsParseError),
    /// FEN doesn't have move side part
    #[error("no move side")]
    NoMoveSide,
    /// Error parsing move side from FEN
    #[error("bad move side: {0}")]
    MoveSide(#[from] types::ColorParseError),
    /// FEN doesn't have castling rights part
    #[error("no castling rights")]
    NoCastling,
    /// Error parsing castling rights from FEN
    #[error("bad castling rights: {0}")]
    Castling(#[from] types::CastlingRightsParseError),
    /// FEN doesn't have enpassant part
    #[error("no enpassant")]
    NoEnpassant,
    /// Error parsing enpassant from FEN
    #[error("bad enpassant: {0}")]
    Enpassant(#[from] types::CoordParseError),
    /// Error parsing one of the move counters
    #[error("bad move counter: {0}")]
    Counter(ParseIntError),
    /// FEN contains extra data
    #[error("extra data in FEN")]
    ExtraData,
}

/// Error parsing [`Board`] from FEN
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum FenParseError {
    /// Board cannot be parsed
    #[error("cannot parse fen: {0}")]
    Fen(#[from] RawFenParseError),
    /// Board was parsed, but it's invalid
    #[error("invalid position: {0}")]
    Valid(#[from] ValidateError),
}

/// Raw chess board
///
/// Raw board is the 8×8 grid plus the state that cannot be recovered from the grid alone. Unlike
/// [`Board`], it is not validated and may contain an invalid position. Use it to build positions
/// programmatically, then convert it via [`Board::try_from()`].
///
/// # Example
///
/// ```
/// # use raychess::{RawBoard, Board, File, Rank, Color, Piece, Cell};
/// #
/// let mut raw = RawBoard::empty();
/// raw.put2(File::B, Rank::R2, Cell::from_parts(Color::White, Piece::King));
/// raw.put2(File::D, Rank::R5, Cell::from_parts(Color::Black, Piece::King));
///
/// let board: Board = raw.try_into().unwrap();
/// assert_eq!(board.as_fen(), "8/8/8/3k4/8/8/1K6/8 w - -");
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct RawBoard {
    /// Contents of the board, indexed by [`Coord::index()`]
    pub cells: [Cell; 64],
    /// Side to move
    pub side: Color,
    /// Castling rights
    pub castling: CastlingRights,
    /// En passant target
    ///
    /// The square a pawn of the side to move lands on when capturing en passant. It is set only
    /// right after a double pawn push.
    pub ep_target: Option<Coord>,
}

impl RawBoard {
    /// Returns an empty `RawBoard`
    #[inline]
    pub const fn empty() -> RawBoard {
        RawBoard {
            cells: [Cell::EMPTY; 64],
            side: Color::White,
            castling: CastlingRights::EMPTY,
            ep_target: None,
        }
    }

    /// Returns a board with the initial position
    pub fn initial() -> RawBoard {
        let mut res = RawBoard {
            castling: CastlingRights::FULL,
            ..RawBoard::empty()
        };
        for file in File::iter() {
            res.put2(file, Rank::R2, Cell::from_parts(Color::White, Piece::Pawn));
            res.put2(file, Rank::R7, Cell::from_parts(Color::Black, Piece::Pawn));
        }
        for (color, rank) in [(Color::White, Rank::R1), (Color::Black, Rank::R8)] {
            for (file, piece) in File::iter().zip([
                Piece::Rook,
                Piece::Knight,
                Piece::Bishop,
                Piece::Queen,
                Piece::King,
                Piece::Bishop,
                Piece::Knight,
                Piece::Rook,
            ]) {
                res.put2(file, rank, Cell::from_parts(color, piece));
            }
        }
        res
    }

    /// Parses a board from FEN
    #[inline]
    pub fn from_fen(fen: &str) -> Result<RawBoard, RawFenParseError> {
        RawBoard::from_str(fen)
    }

    /// Returns the contents of the square with coordinate `c`
    #[inline]
    pub fn get(&self, c: Coord) -> Cell {
        self.cells[c.index()]
    }

    /// Returns the contents of the square with file `file` and rank `rank`
    #[inline]
    pub fn get2(&self, file: File, rank: Rank) -> Cell {
        self.get(Coord::from_parts(file, rank))
    }

    /// Puts `cell` to the square with coordinate `c`
    #[inline]
    pub fn put(&mut self, c: Coord, cell: Cell) {
        self.cells[c.index()] = cell;
    }

    /// Puts `cell` to the square with file `file` and rank `rank`
    #[inline]
    pub fn put2(&mut self, file: File, rank: Rank, cell: Cell) {
        self.put(Coord::from_parts(file, rank), cell);
    }

    /// Converts the board into a FEN string
    #[inline]
    pub fn as_fen(&self) -> String {
        self.to_string()
    }
}

impl Default for RawBoard {
    #[inline]
    fn default() -> RawBoard {
        RawBoard::empty()
    }
}

/// Board that contains a valid position
///
/// Wraps a [`RawBoard`] and caches the positions of both kings. The board is only mutated via
/// [`moves::make_move_raw()`](crate::moves::make_move_raw) and
/// [`moves::unmake_move_raw()`](crate::moves::unmake_move_raw), which keep the cache in sync.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    pub(crate) r: RawBoard,
    pub(crate) kings: [Coord; 2],
}

impl Board {
    /// Returns a board with the initial position
    pub fn initial() -> Board {
        let r = RawBoard::initial();
        Board {
            r,
            kings: [
                Coord::from_parts(File::E, Rank::R1),
                Coord::from_parts(File::E, Rank::R8),
            ],
        }
    }

    /// Parses a board from FEN
    pub fn from_fen(fen: &str) -> Result<Board, FenParseError> {
        Board::from_str(fen)
    }

    /// Returns a view over the raw board
    #[inline]
    pub fn raw(&self) -> &RawBoard {
        &self.r
    }

    /// Returns the contents of the square with coordinate `c`
    #[inline]
    pub fn get(&self, c: Coord) -> Cell {
        self.r.get(c)
    }

    /// Returns the contents of the square with file `file` and rank `rank`
    #[inline]
    pub fn get2(&self, file: File, rank: Rank) -> Cell {
        self.r.get2(file, rank)
    }

    /// Returns side to move
    #[inline]
    pub fn side(&self) -> Color {
        self.r.side
    }

    /// Returns current castling rights
    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.r.castling
    }

    /// Returns current en passant target
    #[inline]
    pub fn ep_target(&self) -> Option<Coord> {
        self.r.ep_target
    }

    /// Returns the position of the king of color `c`
    #[inline]
    pub fn king_pos(&self, c: Color) -> Coord {
        self.kings[c.index()]
    }

    /// Returns the squares occupied by pieces of color `c`
    pub fn occupied_by(&self, c: Color) -> impl Iterator<Item = (Coord, Piece)> + '_ {
        Coord::iter().filter_map(move |coord| {
            let cell = self.get(coord);
            match cell.color() {
                Some(color) if color == c => cell.piece().map(|p| (coord, p)),
                _ => None,
            }
        })
    }

    /// Returns `true` if the opponent's king is under attack
    ///
    /// This cannot happen on a board obtained from a validated position by making legal moves.
    #[inline]
    pub fn is_opponent_king_attacked(&self) -> bool {
        let c = self.r.side;
        attack::is_cell_attacked(self, self.king_pos(c.inv()), c)
    }

    /// Returns `true` if the current side is in check
    #[inline]
    pub fn is_check(&self) -> bool {
        let c = self.r.side;
        attack::is_cell_attacked(self, self.king_pos(c), c.inv())
    }

    /// Returns pins and checks against the king of the side to move
    #[inline]
    pub fn pins_and_checks(&self) -> PinsAndChecks {
        let c = self.r.side;
        attack::pins_and_checks(self, self.king_pos(c), c)
    }

    /// Returns `true` if the current side has at least one legal move
    #[inline]
    pub fn has_legal_moves(&self) -> bool {
        !legal::gen_all(self).is_empty()
    }

    /// Calculates the outcome of the position, or `None` if the game goes on
    ///
    /// This function can be computationally expensive, as it generates all the legal moves.
    pub fn calc_outcome(&self) -> Option<Outcome> {
        if self.has_legal_moves() {
            return None;
        }
        Some(if self.is_check() {
            Outcome::Checkmate {
                winner: self.r.side.inv(),
            }
        } else {
            Outcome::Stalemate
        })
    }

    /// Converts the board into a FEN string
    #[inline]
    pub fn as_fen(&self) -> String {
        self.to_string()
    }
}

fn find_king(raw: &RawBoard, color: Color) -> Result<Coord, ValidateError> {
    let king = Cell::from_parts(color, Piece::King);
    let mut found = Coord::iter().filter(|&c| raw.get(c) == king);
    let pos = found.next().ok_or(ValidateError::NoKing(color))?;
    if found.next().is_some() {
        return Err(ValidateError::TooManyKings(color));
    }
    Ok(pos)
}

impl TryFrom<RawBoard> for Board {
    type Error = ValidateError;

    fn try_from(mut raw: RawBoard) -> Result<Board, ValidateError> {
        // Check enpassant
        if let Some(p) = raw.ep_target {
            if p.rank() != geometry::enpassant_dst_rank(raw.side) {
                return Err(ValidateError::InvalidEnpassant(p));
            }

            // Reset enpassant if the position cannot follow a double pawn push
            let victim = p.shift(geometry::pawn_forward(raw.side.inv()));
            let origin = p.shift(geometry::pawn_forward(raw.side));
            let victim_ok = victim
                .map(|c| raw.get(c) == Cell::from_parts(raw.side.inv(), Piece::Pawn))
                .unwrap_or(false);
            let origin_ok = origin.map(|c| raw.get(c).is_empty()).unwrap_or(false);
            if !victim_ok || !origin_ok || raw.get(p).is_occupied() {
                raw.ep_target = None;
            }
        }

        // Reset bad castling flags
        for color in [Color::White, Color::Black] {
            let rank = geometry::castling_rank(color);
            if raw.get2(File::E, rank) != Cell::from_parts(color, Piece::King) {
                raw.castling.unset_color(color);
            }
            if raw.get2(File::A, rank) != Cell::from_parts(color, Piece::Rook) {
                raw.castling.unset(color, CastlingSide::Queen);
            }
            if raw.get2(File::H, rank) != Cell::from_parts(color, Piece::Rook) {
                raw.castling.unset(color, CastlingSide::King);
            }
        }

        // Check TooManyPieces, NoKing, TooManyKings
        for color in [Color::White, Color::Black] {
            if raw.cells.iter().filter(|c| c.has_color(color)).count() > 16 {
                return Err(ValidateError::TooManyPieces(color));
            }
        }
        let kings = [
            find_king(&raw, Color::White)?,
            find_king(&raw, Color::Black)?,
        ];

        // Check InvalidPawn
        for rank in [Rank::R1, Rank::R8] {
            for file in File::iter() {
                if raw.get2(file, rank).piece() == Some(Piece::Pawn) {
                    return Err(ValidateError::InvalidPawn(Coord::from_parts(file, rank)));
                }
            }
        }

        // Check OpponentKingAttacked
        let res = Board { r: raw, kings };
        if res.is_opponent_king_attacked() {
            return Err(ValidateError::OpponentKingAttacked);
        }

        Ok(res)
    }
}

impl TryFrom<&RawBoard> for Board {
    type Error = ValidateError;

    fn try_from(raw: &RawBoard) -> Result<Board, ValidateError> {
        (*raw).try_into()
    }
}

fn parse_cells(s: &str) -> Result<[Cell; 64], CellsParseError> {
    type Error = CellsParseError;

    let mut file = 0_usize;
    let mut rank = 0_usize;
    let mut cells = [Cell::EMPTY; 64];
    for b in s.bytes() {
        match b {
            b'1'..=b'8' => {
                let add = (b - b'0') as usize;
                if file + add > 8 {
                    return Err(Error::RankOverflow(Rank::from_index(rank)));
                }
                file += add;
            }
            b'/' => {
                if file < 8 {
                    return Err(Error::RankUnderflow(Rank::from_index(rank)));
                }
                rank += 1;
                file = 0;
                if rank >= 8 {
                    return Err(Error::Overflow);
                }
            }
            _ => {
                if file >= 8 {
                    return Err(Error::RankOverflow(Rank::from_index(rank)));
                }
                cells[Coord::from_row_col(rank, file).index()] =
                    Cell::from_char(b as char).ok_or(Error::UnexpectedChar(b as char))?;
                file += 1;
            }
        };
    }

    if file < 8 {
        return Err(Error::RankUnderflow(Rank::from_index(rank)));
    }
    if rank < 7 {
        return Err(Error::Underflow);
    }

    Ok(cells)
}

fn parse_ep_target(s: &str) -> Result<Option<Coord>, RawFenParseError> {
    if s == "-" {
        return Ok(None);
    }
    Ok(Some(Coord::from_str(s)?))
}

impl FromStr for RawBoard {
    type Err = RawFenParseError;

    fn from_str(s: &str) -> Result<RawBoard, Self::Err> {
        type Error = RawFenParseError;

        if !s.is_ascii() {
            return Err(Error::NonAscii);
        }
        let mut iter = s.split_ascii_whitespace().fuse();

        let cells = parse_cells(iter.next().ok_or(Error::NoBoard)?)?;
        let side = Color::from_str(iter.next().ok_or(Error::NoMoveSide)?)?;
        let castling = CastlingRights::from_str(iter.next().ok_or(Error::NoCastling)?)?;
        let ep_target = parse_ep_target(iter.next().ok_or(Error::NoEnpassant)?)?;

        // Move counters are not tracked, but they must be well-formed if present
        for counter in iter.by_ref().take(2) {
            u16::from_str(counter).map_err(Error::Counter)?;
        }
        if iter.next().is_some() {
            return Err(Error::ExtraData);
        }

        Ok(RawBoard {
            cells,
            side,
            castling,
            ep_target,
        })
    }
}

impl FromStr for Board {
    type Err = FenParseError;

    fn from_str(s: &str) -> Result<Board, Self::Err> {
        Ok(RawBoard::from_str(s)?.try_into()?)
    }
}

fn format_cells(cells: &[Cell; 64], f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
    for rank in Rank::iter() {
        if rank.index() != 0 {
            write!(f, "/")?;
        }
        let mut empty = 0;
        for file in File::iter() {
            let cell = cells[Coord::from_parts(file, rank).index()];
            if cell.is_empty() {
                empty += 1;
                continue;
            }
            if empty != 0 {
                write!(f, "{}", empty)?;
                empty = 0;
            }
            write!(f, "{}", cell)?;
        }
        if empty != 0 {
            write!(f, "{}", empty)?;
        }
    }
    Ok(())
}

impl Display for RawBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        format_cells(&self.cells, f)?;
        write!(f, " {} {}", self.side, self.castling)?;
        match self.ep_target {
            Some(p) => write!(f, " {}", p),
            None => write!(f, " -"),
        }
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        self.r.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial() {
        const INI_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -";

        assert_eq!(RawBoard::initial().to_string(), INI_FEN);
        assert_eq!(Board::initial().to_string(), INI_FEN);
        assert_eq!(RawBoard::from_str(INI_FEN), Ok(RawBoard::initial()));
        assert_eq!(Board::from_str(INI_FEN), Ok(Board::initial()));
        assert_eq!(
            Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Ok(Board::initial())
        );
    }

    #[test]
    fn test_midgame() {
        const FEN: &str = "1rq1r1k1/1p3ppp/pB3n2/3ppP2/Pbb1P3/1PN2B2/2P2QPP/R1R4K w - -";

        let board = Board::from_fen(FEN).unwrap();
        assert_eq!(board.as_fen(), FEN);
        assert_eq!(
            board.get2(File::B, Rank::R4),
            Cell::from_parts(Color::Black, Piece::Bishop)
        );
        assert_eq!(
            board.get(Coord::from_row_col(6, 5)),
            Cell::from_parts(Color::White, Piece::Queen)
        );
        assert_eq!(
            board.king_pos(Color::White),
            Coord::from_parts(File::H, Rank::R1)
        );
        assert_eq!(
            board.king_pos(Color::Black),
            Coord::from_parts(File::G, Rank::R8)
        );
        assert_eq!(board.side(), Color::White);
        assert_eq!(board.castling(), CastlingRights::EMPTY);
        assert_eq!(board.ep_target(), None);
    }

    #[test]
    fn test_fixes() {
        const FEN: &str = "r1bq1b1r/ppppkppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK1R1 w KQkq c6";

        let raw = RawBoard::from_fen(FEN).unwrap();
        assert_eq!(raw.castling, CastlingRights::FULL);
        assert_eq!(raw.ep_target, Some(Coord::from_parts(File::C, Rank::R6)));
        assert_eq!(raw.as_fen(), FEN);

        let board: Board = raw.try_into().unwrap();
        assert_eq!(
            board.castling(),
            CastlingRights::EMPTY.with(Color::White, CastlingSide::Queen)
        );
        assert_eq!(board.ep_target(), None);
        assert_eq!(
            board.as_fen(),
            "r1bq1b1r/ppppkppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK1R1 w Q -"
        );

        let board = Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6").unwrap();
        assert_eq!(board.ep_target(), Some(Coord::from_parts(File::D, Rank::R6)));
    }

    #[test]
    fn test_invalid() {
        assert_eq!(
            Board::from_fen("8/8/8/8/8/8/8/4K3 w - -"),
            Err(FenParseError::Valid(ValidateError::NoKing(Color::Black)))
        );
        assert_eq!(
            Board::from_fen("k1k5/8/8/8/8/8/8/4K3 w - -"),
            Err(FenParseError::Valid(ValidateError::TooManyKings(Color::Black)))
        );
        assert_eq!(
            Board::from_fen("k7/8/8/8/8/8/8/P3K3 w - -"),
            Err(FenParseError::Valid(ValidateError::InvalidPawn(
                Coord::from_parts(File::A, Rank::R1)
            )))
        );
        assert_eq!(
            Board::from_fen("k7/8/8/8/8/8/8/R3K3 w - -"),
            Err(FenParseError::Valid(ValidateError::OpponentKingAttacked))
        );
        assert_eq!(
            Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d3"),
            Err(FenParseError::Valid(ValidateError::InvalidEnpassant(
                Coord::from_parts(File::D, Rank::R3)
            )))
        );
    }

    #[test]
    fn test_incomplete() {
        assert_eq!(
            RawBoard::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"),
            Err(RawFenParseError::NoMoveSide)
        );
        assert_eq!(
            RawBoard::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w"),
            Err(RawFenParseError::NoCastling)
        );
        assert_eq!(
            RawBoard::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq"),
            Err(RawFenParseError::NoEnpassant)
        );
        assert_eq!(
            RawBoard::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1 2"),
            Err(RawFenParseError::ExtraData)
        );
        assert!(matches!(
            RawBoard::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - x"),
            Err(RawFenParseError::Counter(_))
        ));
        assert_eq!(
            RawBoard::from_fen("rnbqkbnr/pppppppp/8p/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -"),
            Err(RawFenParseError::Board(CellsParseError::RankOverflow(
                Rank::R6
            )))
        );
    }

    #[test]
    fn test_outcome() {
        let b = Board::initial();
        assert_eq!(b.calc_outcome(), None);

        let b = Board::from_fen("rn1q1bnr/ppp1kB1p/3p2p1/3NN3/4P3/8/PPPP1PPP/R1BbK2R b KQ -")
            .unwrap();
        assert!(!b.has_legal_moves());
        assert_eq!(
            b.calc_outcome(),
            Some(Outcome::Checkmate {
                winner: Color::White
            })
        );

        let b = Board::from_fen("7K/8/5n2/5n2/8/8/7k/8 w - -").unwrap();
        assert!(!b.has_legal_moves());
        assert_eq!(b.calc_outcome(), Some(Outcome::Stalemate));
    }
}
