//! Core chess types

pub use raychess_base::types::*;

use std::fmt;

/// Final result of a game
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The side to move is checkmated
    Checkmate {
        /// Side that delivered the mate
        winner: Color,
    },
    /// The side to move has no legal moves, but is not in check
    Stalemate,
}

impl Outcome {
    /// Returns the winner, or `None` for a draw
    #[inline]
    pub fn winner(&self) -> Option<Color> {
        match *self {
            Self::Checkmate { winner } => Some(winner),
            Self::Stalemate => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match *self {
            Self::Checkmate {
                winner: Color::White,
            } => write!(f, "white wins by checkmate"),
            Self::Checkmate {
                winner: Color::Black,
            } => write!(f, "black wins by checkmate"),
            Self::Stalemate => write!(f, "draw by stalemate"),
        }
    }
}

/// State of the game as seen by the side to move
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Status {
    /// The game goes on, the side to move is not in check
    Ongoing,
    /// The game goes on, the side to move is in check
    Check,
    /// The game is finished
    Finished(Outcome),
}
