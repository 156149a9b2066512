//! # raychess
//!
//! Chess rules engine: legal move generation, making and undoing moves, check, checkmate and
//! stalemate detection.
//!
//! Attacks are found by casting rays from a square in the eight directions, plus probing the
//! eight knight offsets. The same scan yields the pins and checks against the king, which the
//! move generator uses to produce only legal moves.
//!
//! # Example
//!
//! ```
//! use raychess::{Board, Game, Move, Status};
//!
//! let mut game = Game::new();
//! let moves = game.valid_moves();
//! assert_eq!(moves.len(), 20);
//!
//! let mv = Move::from_coord_notation("e2e4", game.board()).unwrap();
//! game.make_move(mv).unwrap();
//! assert_eq!(game.board().as_fen(), "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3");
//! assert_eq!(game.status(), Status::Ongoing);
//!
//! game.undo_move().unwrap();
//! assert_eq!(game.board(), &Board::initial());
//! ```

pub mod attack;
pub mod between;
pub mod board;
pub mod castling;
pub mod game;
pub mod legal;
pub mod movegen;
pub mod moves;
pub mod types;

mod generic;

pub use raychess_base::{bitboard, geometry};

pub use bitboard::Bitboard;
pub use board::{Board, RawBoard};
pub use game::Game;
pub use movegen::MoveList;
pub use moves::{Move, MoveKind, PromotePiece};
pub use types::{
    CastlingRights, CastlingSide, Cell, Color, Coord, File, Outcome, Piece, Rank, Status,
};
