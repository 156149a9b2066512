//! Game state: the current position plus the history of moves made

use crate::board::{self, Board};
use crate::legal;
use crate::movegen::MoveList;
use crate::moves::{self, notation, CreateError, Move, PromotePiece, RawUndo};
use crate::types::{Color, Coord, Outcome, Status};

use std::fmt;

use log::debug;
use thiserror::Error;

/// Error making a move
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MakeError {
    /// The move is not in the list of legal moves
    #[error("illegal move {0}")]
    IllegalMove(Move),
}

/// Error undoing a move
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UndoError {
    /// No moves were made yet
    #[error("nothing to undo")]
    NothingToUndo,
}

/// Error making a move given in coordinate notation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoordMoveError {
    #[error("cannot parse move: {0}")]
    Parse(#[from] notation::ParseError),
    #[error("cannot make move: {0}")]
    Make(#[from] MakeError),
}

/// Error replaying a list of moves in coordinate notation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("cannot apply move #{}: {}", .pos + 1, .source)]
pub struct CoordListError {
    pub pos: usize,
    pub source: CoordMoveError,
}

/// Chess game
///
/// Holds the current board and the stack of moves made from the starting position. Each entry of
/// the stack keeps everything needed to revert its move, so making and undoing always keeps the
/// move log, the castling rights and the enpassant targets in sync.
///
/// # Example
///
/// ```
/// # use raychess::{Game, Outcome, Color};
/// #
/// let mut game = Game::new();
/// assert_eq!(game.valid_moves().len(), 20);
///
/// game.push_coord_list("f2f3 e7e5 g2g4 d8h4").unwrap();
/// assert!(game.is_checkmate());
/// assert_eq!(game.outcome(), Some(Outcome::Checkmate { winner: Color::Black }));
///
/// game.undo_move().unwrap();
/// assert!(!game.is_checkmate());
/// ```
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    stack: Vec<(Move, RawUndo)>,
    outcome: Option<Outcome>,
}

impl Game {
    /// Creates a game from the initial position
    pub fn new() -> Game {
        Game::from_board(Board::initial())
    }

    /// Creates a game starting from position `b`
    pub fn from_board(b: Board) -> Game {
        Game {
            board: b,
            stack: Vec::new(),
            outcome: None,
        }
    }

    /// Creates a game starting from the position given in FEN
    pub fn from_fen(s: &str) -> Result<Game, board::FenParseError> {
        Ok(Game::from_board(Board::from_fen(s)?))
    }

    /// Creates a game starting from position `b` and replays the moves in `list`
    pub fn from_coord_list(b: Board, list: &str) -> Result<Game, CoordListError> {
        let mut res = Game::from_board(b);
        res.push_coord_list(list)?;
        Ok(res)
    }

    /// Returns the current position
    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the side to move
    #[inline]
    pub fn side(&self) -> Color {
        self.board.side()
    }

    /// Returns the number of moves made
    #[inline]
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Iterates over the moves made, from the first one
    pub fn iter(&self) -> impl Iterator<Item = Move> + '_ {
        self.stack.iter().map(|(m, _)| *m)
    }

    /// Returns the move with index `idx`, counting from zero
    #[inline]
    pub fn get(&self, idx: usize) -> Option<Move> {
        self.stack.get(idx).map(|(m, _)| *m)
    }

    /// Returns the last move made
    #[inline]
    pub fn last_move(&self) -> Option<Move> {
        self.stack.last().map(|(m, _)| *m)
    }

    /// Generates the legal moves in the current position
    ///
    /// If there are no legal moves, the game is finished, and its outcome is stored.
    pub fn valid_moves(&mut self) -> MoveList {
        let res = legal::gen_all(&self.board);
        self.outcome = None;
        if res.is_empty() {
            let outcome = if self.board.is_check() {
                Outcome::Checkmate {
                    winner: self.board.side().inv(),
                }
            } else {
                Outcome::Stalemate
            };
            debug!("game finished after {} moves: {}", self.stack.len(), outcome);
            self.outcome = Some(outcome);
        }
        res
    }

    /// Returns the outcome of the game, or `None` if it goes on
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome.or_else(|| self.board.calc_outcome())
    }

    /// Returns the current state of the game
    pub fn status(&self) -> Status {
        match self.outcome() {
            Some(outcome) => Status::Finished(outcome),
            None if self.board.is_check() => Status::Check,
            None => Status::Ongoing,
        }
    }

    /// Returns `true` if the side to move is in check
    #[inline]
    pub fn is_check(&self) -> bool {
        self.board.is_check()
    }

    /// Returns `true` if the side to move is checkmated
    #[inline]
    pub fn is_checkmate(&self) -> bool {
        matches!(self.outcome(), Some(Outcome::Checkmate { .. }))
    }

    /// Returns `true` if the side to move is stalemated
    #[inline]
    pub fn is_stalemate(&self) -> bool {
        self.outcome() == Some(Outcome::Stalemate)
    }

    /// Creates a move from `src` to `dst` in the current position
    ///
    /// Pawn moves to the last rank become queen promotes. The move is not checked for legality,
    /// [`Game::make_move()`] does it.
    #[inline]
    pub fn move_from_squares(&self, src: Coord, dst: Coord) -> Result<Move, CreateError> {
        Move::from_squares(&self.board, src, dst)
    }

    /// Same as [`Game::move_from_squares()`], but with the chosen promote piece
    #[inline]
    pub fn move_from_squares_promote(
        &self,
        src: Coord,
        dst: Coord,
        promote: PromotePiece,
    ) -> Result<Move, CreateError> {
        Move::from_squares_promote(&self.board, src, dst, Some(promote))
    }

    /// Makes the move `mv`
    ///
    /// The move is looked up among the legal moves in the current position. If it's not there,
    /// [`MakeError::IllegalMove`] is returned and the game remains unchanged.
    pub fn make_move(&mut self, mv: Move) -> Result<(), MakeError> {
        let mv = legal::gen_all(&self.board)
            .into_iter()
            .find(|m| *m == mv)
            .ok_or(MakeError::IllegalMove(mv))?;
        let u = moves::make_move_raw(&mut self.board, mv);
        self.stack.push((mv, u));
        self.outcome = None;
        debug!("made move {} (#{}), now {}", mv, self.stack.len(), self.board);
        Ok(())
    }

    /// Undoes the last move and returns it
    ///
    /// If no moves were made, [`UndoError::NothingToUndo`] is returned and the game remains
    /// unchanged.
    pub fn undo_move(&mut self) -> Result<Move, UndoError> {
        let (mv, u) = self.stack.pop().ok_or(UndoError::NothingToUndo)?;
        moves::unmake_move_raw(&mut self.board, mv, u);
        self.outcome = None;
        debug!("undone move {}, now {}", mv, self.board);
        Ok(mv)
    }

    /// Makes the move given in coordinate notation
    pub fn push_coord(&mut self, s: &str) -> Result<Move, CoordMoveError> {
        let mv = Move::from_coord_notation(s, &self.board)?;
        self.make_move(mv)?;
        Ok(mv)
    }

    /// Makes the moves from the space-separated list in coordinate notation
    ///
    /// On error, the moves before the failed one remain made.
    pub fn push_coord_list(&mut self, list: &str) -> Result<(), CoordListError> {
        for (pos, token) in list.split_ascii_whitespace().enumerate() {
            self.push_coord(token)
                .map_err(|source| CoordListError { pos, source })?;
        }
        Ok(())
    }

    /// Returns the moves made as a space-separated list in coordinate notation
    ///
    /// Promotes are written with the promote piece, so the list can be replayed with
    /// [`Game::push_coord_list()`].
    pub fn coord_list(&self) -> CoordList<'_> {
        CoordList(self)
    }
}

impl Default for Game {
    fn default() -> Game {
        Game::new()
    }
}

impl PartialEq for Game {
    fn eq(&self, other: &Game) -> bool {
        self.board == other.board
            && self.stack.len() == other.stack.len()
            && self.iter().zip(other.iter()).all(|(m1, m2)| m1 == m2)
    }
}

impl Eq for Game {}

pub struct CoordList<'a>(&'a Game);

impl<'a> fmt::Display for CoordList<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for (i, m) in self.0.iter().enumerate() {
            if i != 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", m.coord_notation_full())?;
        }
        Ok(())
    }
}
