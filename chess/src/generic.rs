//! Type-level colors, so the generator is monomorphized once per side

use crate::geometry::{self, Dir};
use crate::types::{self, Rank};

pub trait Color {
    const COLOR: types::Color;
    const FORWARD: Dir;
    const DOUBLE_MOVE_RANK: Rank;
    const PROMOTE_RANK: Rank;
    type Inv: Color;
}

pub struct White;
pub struct Black;

impl Color for White {
    const COLOR: types::Color = types::Color::White;
    const FORWARD: Dir = geometry::pawn_forward(types::Color::White);
    const DOUBLE_MOVE_RANK: Rank = geometry::double_move_src_rank(types::Color::White);
    const PROMOTE_RANK: Rank = geometry::promote_dst_rank(types::Color::White);
    type Inv = Black;
}

impl Color for Black {
    const COLOR: types::Color = types::Color::Black;
    const FORWARD: Dir = geometry::pawn_forward(types::Color::Black);
    const DOUBLE_MOVE_RANK: Rank = geometry::double_move_src_rank(types::Color::Black);
    const PROMOTE_RANK: Rank = geometry::promote_dst_rank(types::Color::Black);
    type Inv = White;
}
