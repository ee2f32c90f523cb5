//! 駒種（PieceType）

use serde::{Deserialize, Serialize};

/// 駒種（先後の区別なし）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum PieceType {
    /// 帥・将
    General = 0,
    /// 仕・士
    Advisor = 1,
    /// 相・象
    Elephant = 2,
    /// 傌・馬
    Horse = 3,
    /// 俥・車
    Rook = 4,
    /// 炮・砲
    Cannon = 5,
    /// 兵・卒
    Soldier = 6,
}

impl PieceType {
    /// 駒種の数
    pub const NUM: usize = 7;

    /// 全ての駒種
    pub const ALL: [PieceType; 7] = [
        PieceType::General,
        PieceType::Advisor,
        PieceType::Elephant,
        PieceType::Horse,
        PieceType::Rook,
        PieceType::Cannon,
        PieceType::Soldier,
    ];

    /// FEN文字（小文字）。WXF 表記に従う。
    #[inline]
    pub const fn fen_char(self) -> char {
        match self {
            PieceType::General => 'k',
            PieceType::Advisor => 'a',
            PieceType::Elephant => 'b',
            PieceType::Horse => 'n',
            PieceType::Rook => 'r',
            PieceType::Cannon => 'c',
            PieceType::Soldier => 'p',
        }
    }

    /// FEN文字から変換（大文字・小文字は区別しない）
    #[inline]
    pub const fn from_fen_char(c: char) -> Option<PieceType> {
        match c.to_ascii_lowercase() {
            'k' => Some(PieceType::General),
            'a' => Some(PieceType::Advisor),
            'b' => Some(PieceType::Elephant),
            'n' => Some(PieceType::Horse),
            'r' => Some(PieceType::Rook),
            'c' => Some(PieceType::Cannon),
            'p' => Some(PieceType::Soldier),
            _ => None,
        }
    }

    /// 相手の将に迫れる攻め駒かどうか（車・馬・炮・兵）
    #[inline]
    pub const fn is_attacker(self) -> bool {
        matches!(
            self,
            PieceType::Rook | PieceType::Horse | PieceType::Cannon | PieceType::Soldier
        )
    }

    /// インデックス（0-6）
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_type_fen_char_is_one_to_one() {
        for pt in PieceType::ALL {
            assert_eq!(PieceType::from_fen_char(pt.fen_char()), Some(pt));
            assert_eq!(PieceType::from_fen_char(pt.fen_char().to_ascii_uppercase()), Some(pt));
        }
        assert_eq!(PieceType::from_fen_char('x'), None);
        assert_eq!(PieceType::from_fen_char('g'), None);
    }

    #[test]
    fn test_piece_type_is_attacker() {
        assert!(PieceType::Rook.is_attacker());
        assert!(PieceType::Soldier.is_attacker());
        assert!(!PieceType::Advisor.is_attacker());
        assert!(!PieceType::Elephant.is_attacker());
        assert!(!PieceType::General.is_attacker());
    }
}
