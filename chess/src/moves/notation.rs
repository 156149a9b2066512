//! Coordinate notation for moves (`e2e4`, `e7e8q`)

use super::base::{self, CreateError, PromotePiece};
use crate::board::Board;
use crate::types::{Coord, CoordParseError};

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error parsing a move in coordinate notation from string
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum RawParseError {
    /// Bad string length
    #[error("bad string length")]
    BadLength,
    /// Bad source square
    #[error("bad source: {0}")]
    BadSrc(CoordParseError),
    /// Bad destination square
    #[error("bad destination: {0}")]
    BadDst(CoordParseError),
    /// Bad promote character
    #[error("bad promote char {0:?}")]
    BadPromote(char),
}

/// Error parsing a move in coordinate notation into [`moves::Move`](super::Move)
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ParseError {
    /// Error parsing move
    #[error("cannot parse move: {0}")]
    Parse(#[from] RawParseError),
    /// Error converting the parsed move into a move on the board
    #[error("cannot create move: {0}")]
    Create(#[from] CreateError),
}

/// Parsed move in coordinate notation
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct CoordMove {
    /// Source square
    pub src: Coord,
    /// Destination square
    pub dst: Coord,
    /// Piece to promote, if any
    pub promote: Option<PromotePiece>,
}

impl CoordMove {
    /// Converts the parsed move into [`moves::Move`](super::Move) in position `b`
    #[inline]
    pub fn into_move(self, b: &Board) -> Result<base::Move, CreateError> {
        base::Move::from_squares_promote(b, self.src, self.dst, self.promote)
    }
}

impl From<base::Move> for CoordMove {
    #[inline]
    fn from(mv: base::Move) -> CoordMove {
        CoordMove {
            src: mv.src(),
            dst: mv.dst(),
            promote: mv.kind().try_into().ok(),
        }
    }
}

impl fmt::Display for CoordMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}{}", self.src, self.dst)?;
        match self.promote {
            Some(PromotePiece::Knight) => write!(f, "n")?,
            Some(PromotePiece::Bishop) => write!(f, "b")?,
            Some(PromotePiece::Rook) => write!(f, "r")?,
            Some(PromotePiece::Queen) => write!(f, "q")?,
            None => {}
        };
        Ok(())
    }
}

impl FromStr for CoordMove {
    type Err = RawParseError;

    fn from_str(s: &str) -> Result<CoordMove, Self::Err> {
        if !matches!(s.len(), 4 | 5) || !s.is_ascii() {
            return Err(RawParseError::BadLength);
        }
        let src = Coord::from_str(&s[0..2]).map_err(RawParseError::BadSrc)?;
        let dst = Coord::from_str(&s[2..4]).map_err(RawParseError::BadDst)?;
        let promote = if s.len() == 5 {
            Some(match s.as_bytes()[4] {
                b'n' => PromotePiece::Knight,
                b'b' => PromotePiece::Bishop,
                b'r' => PromotePiece::Rook,
                b'q' => PromotePiece::Queen,
                b => return Err(RawParseError::BadPromote(b as char)),
            })
        } else {
            None
        };
        Ok(CoordMove { src, dst, promote })
    }
}
