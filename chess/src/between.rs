use crate::bitboard::Bitboard;
use crate::geometry::Dir;
use crate::types::Coord;

/// Returns the direction from `src` to `dst` if both squares share a rank, file or diagonal
pub fn line_dir(src: Coord, dst: Coord) -> Option<Dir> {
    if src == dst {
        return None;
    }
    let drow = dst.row() as i8 - src.row() as i8;
    let dcol = dst.col() as i8 - src.col() as i8;
    if drow != 0 && dcol != 0 && drow.abs() != dcol.abs() {
        return None;
    }
    Some(Dir::new(drow.signum(), dcol.signum()))
}

/// Returns the squares strictly between `src` and `dst`
///
/// If the squares are not on the same line, the result is empty.
pub fn strict(src: Coord, dst: Coord) -> Bitboard {
    match line_dir(src, dst) {
        Some(dir) => src.ray(dir).take_while(|&c| c != dst).collect(),
        None => Bitboard::EMPTY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{File, Rank};

    #[test]
    fn test_bishop() {
        let b4 = Coord::from_parts(File::B, Rank::R4);
        let e7 = Coord::from_parts(File::E, Rank::R7);
        let res = Bitboard::EMPTY
            .with(Coord::from_parts(File::C, Rank::R5))
            .with(Coord::from_parts(File::D, Rank::R6));
        assert_eq!(strict(b4, e7), res);
        assert_eq!(strict(e7, b4), res);

        let f3 = Coord::from_parts(File::F, Rank::R3);
        let c6 = Coord::from_parts(File::C, Rank::R6);
        let res = Bitboard::EMPTY
            .with(Coord::from_parts(File::E, Rank::R4))
            .with(Coord::from_parts(File::D, Rank::R5));
        assert_eq!(strict(f3, c6), res);
        assert_eq!(strict(c6, f3), res);
    }

    #[test]
    fn test_rook() {
        let b4 = Coord::from_parts(File::B, Rank::R4);
        let e4 = Coord::from_parts(File::E, Rank::R4);
        let res = Bitboard::EMPTY
            .with(Coord::from_parts(File::C, Rank::R4))
            .with(Coord::from_parts(File::D, Rank::R4));
        assert_eq!(strict(b4, e4), res);
        assert_eq!(strict(e4, b4), res);

        let d3 = Coord::from_parts(File::D, Rank::R3);
        let d6 = Coord::from_parts(File::D, Rank::R6);
        let res = Bitboard::EMPTY
            .with(Coord::from_parts(File::D, Rank::R4))
            .with(Coord::from_parts(File::D, Rank::R5));
        assert_eq!(strict(d3, d6), res);
        assert_eq!(strict(d6, d3), res);
    }

    #[test]
    fn test_not_aligned() {
        let b1 = Coord::from_parts(File::B, Rank::R1);
        let c3 = Coord::from_parts(File::C, Rank::R3);
        assert_eq!(line_dir(b1, c3), None);
        assert_eq!(strict(b1, c3), Bitboard::EMPTY);
        assert_eq!(strict(b1, b1), Bitboard::EMPTY);
        let b2 = Coord::from_parts(File::B, Rank::R2);
        assert_eq!(line_dir(b1, b2), Some(Dir::new(-1, 0)));
        assert_eq!(strict(b1, b2), Bitboard::EMPTY);
    }
}
