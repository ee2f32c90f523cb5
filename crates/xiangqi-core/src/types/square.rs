//! 升目（Square）
//!
//! 盤は 9 筋 × 10 段の交点。筋（file）は紅から見て左から 0..=8、段（rank）は紅の
//! 最下段を 0 として 0..=9。河は 4 段目と 5 段目の間にある。

use super::Color;

/// 升目（0-89）
///
/// 配置: index = rank * 9 + file
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Square(u8);

impl Square {
    /// 筋の数
    pub const FILES: u8 = 9;
    /// 段の数
    pub const RANKS: u8 = 10;
    /// 升目の数
    pub const NUM: usize = 90;

    /// 筋と段から生成（範囲外なら None）
    #[inline]
    pub const fn new(file: u8, rank: u8) -> Option<Square> {
        if file < Self::FILES && rank < Self::RANKS {
            Some(Square(rank * Self::FILES + file))
        } else {
            None
        }
    }

    /// インデックスから生成（範囲外なら None）
    #[inline]
    pub const fn from_index(index: usize) -> Option<Square> {
        if index < Self::NUM {
            Some(Square(index as u8))
        } else {
            None
        }
    }

    /// 筋（0-8）
    #[inline]
    pub const fn file(self) -> u8 {
        self.0 % Self::FILES
    }

    /// 段（0-9）
    #[inline]
    pub const fn rank(self) -> u8 {
        self.0 / Self::FILES
    }

    /// インデックスとして使用
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// 筋・段を相対移動した升目（盤外なら None）
    #[inline]
    pub const fn offset(self, df: i8, dr: i8) -> Option<Square> {
        let file = self.file() as i8 + df;
        let rank = self.rank() as i8 + dr;
        if file < 0 || rank < 0 {
            return None;
        }
        Square::new(file as u8, rank as u8)
    }

    /// 自陣側（河を渡っていない側）の升目かどうか
    #[inline]
    pub const fn is_own_side(self, color: Color) -> bool {
        match color {
            Color::Red => self.rank() <= 4,
            Color::Black => self.rank() >= 5,
        }
    }

    /// 九宮内かどうか（筋 3-5、紅は段 0-2、黒は段 7-9）
    #[inline]
    pub const fn is_in_palace(self, color: Color) -> bool {
        let file = self.file();
        if file < 3 || file > 5 {
            return false;
        }
        match color {
            Color::Red => self.rank() <= 2,
            Color::Black => self.rank() >= 7,
        }
    }

    /// ICCS形式の文字列（"e0"等）に変換
    pub fn to_iccs(self) -> String {
        let file = (b'a' + self.file()) as char;
        let rank = (b'0' + self.rank()) as char;
        format!("{file}{rank}")
    }

    /// ICCS形式の文字列からSquareに変換
    pub fn from_iccs(s: &str) -> Option<Square> {
        let mut chars = s.chars();
        let file = chars.next()?.to_ascii_lowercase();
        let rank = chars.next()?;
        if chars.next().is_some() || !file.is_ascii_lowercase() || !rank.is_ascii_digit() {
            return None;
        }
        Square::new(file as u8 - b'a', rank as u8 - b'0')
    }

    /// 全ての升を返すイテレータ（a0, b0, ..., i9 の順）
    pub fn all() -> impl Iterator<Item = Square> {
        (0..Self::NUM as u8).map(Square)
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", (b'a' + self.file()) as char, self.rank())
    }
}

impl std::str::FromStr for Square {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Square::from_iccs(s).ok_or(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_new() {
        let sq = Square::new(4, 0).unwrap();
        assert_eq!(sq.file(), 4);
        assert_eq!(sq.rank(), 0);
        assert_eq!(sq.index(), 4);
        assert_eq!(Square::new(8, 9).unwrap().index(), 89);
        assert_eq!(Square::new(9, 0), None);
        assert_eq!(Square::new(0, 10), None);
    }

    #[test]
    fn test_square_offset() {
        let sq = Square::new(0, 0).unwrap();
        assert_eq!(sq.offset(-1, 0), None);
        assert_eq!(sq.offset(0, -1), None);
        assert_eq!(sq.offset(2, 1), Square::new(2, 1));
        assert_eq!(Square::new(8, 9).unwrap().offset(1, 0), None);
    }

    #[test]
    fn test_square_iccs() {
        let sq = Square::new(1, 2).unwrap();
        assert_eq!(sq.to_iccs(), "b2");
        assert_eq!(sq.to_string(), "b2");
        assert_eq!(Square::from_iccs("b2"), Some(sq));
        assert_eq!(Square::from_iccs("I9"), Square::new(8, 9));
        assert_eq!(Square::from_iccs("j0"), None);
        assert_eq!(Square::from_iccs("a"), None);
        assert_eq!(Square::from_iccs("a10"), None);
        assert_eq!(Square::from_iccs(""), None);
    }

    #[test]
    fn test_square_palace() {
        assert!(Square::from_iccs("e0").unwrap().is_in_palace(Color::Red));
        assert!(Square::from_iccs("d2").unwrap().is_in_palace(Color::Red));
        assert!(!Square::from_iccs("d3").unwrap().is_in_palace(Color::Red));
        assert!(!Square::from_iccs("c0").unwrap().is_in_palace(Color::Red));
        assert!(Square::from_iccs("f7").unwrap().is_in_palace(Color::Black));
        assert!(!Square::from_iccs("e0").unwrap().is_in_palace(Color::Black));
    }

    #[test]
    fn test_square_river() {
        assert!(Square::from_iccs("a4").unwrap().is_own_side(Color::Red));
        assert!(!Square::from_iccs("a5").unwrap().is_own_side(Color::Red));
        assert!(Square::from_iccs("a5").unwrap().is_own_side(Color::Black));
        assert!(!Square::from_iccs("a4").unwrap().is_own_side(Color::Black));
    }

    #[test]
    fn test_square_all() {
        let all: Vec<_> = Square::all().collect();
        assert_eq!(all.len(), 90);
        assert_eq!(all[0].to_iccs(), "a0");
        assert_eq!(all[89].to_iccs(), "i9");
    }
}
