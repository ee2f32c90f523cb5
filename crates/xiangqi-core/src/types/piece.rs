//! 駒（Piece）

use super::{Color, PieceType};

/// 駒（先後の区別あり）
///
/// 取られた駒・動いた駒は置き換えられるだけで、値自体は変更されない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    piece_type: PieceType,
    color: Color,
}

impl Piece {
    pub const RED_GENERAL: Piece = Piece::new(Color::Red, PieceType::General);
    pub const BLACK_GENERAL: Piece = Piece::new(Color::Black, PieceType::General);

    /// ColorとPieceTypeから生成
    #[inline]
    pub const fn new(color: Color, piece_type: PieceType) -> Piece {
        Piece { piece_type, color }
    }

    /// 駒種を取得
    #[inline]
    pub const fn piece_type(self) -> PieceType {
        self.piece_type
    }

    /// 手番を取得
    #[inline]
    pub const fn color(self) -> Color {
        self.color
    }

    /// FEN文字（紅は大文字、黒は小文字）
    pub const fn fen_char(self) -> char {
        let c = self.piece_type.fen_char();
        match self.color {
            Color::Red => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// FEN文字から変換
    pub const fn from_fen_char(c: char) -> Option<Piece> {
        let Some(piece_type) = PieceType::from_fen_char(c) else {
            return None;
        };
        let color = if c.is_ascii_uppercase() {
            Color::Red
        } else {
            Color::Black
        };
        Some(Piece::new(color, piece_type))
    }

    /// 漢字表記（紅黒で字が異なる）
    pub const fn chinese_char(self) -> char {
        match (self.color, self.piece_type) {
            (Color::Red, PieceType::General) => '帥',
            (Color::Red, PieceType::Advisor) => '仕',
            (Color::Red, PieceType::Elephant) => '相',
            (Color::Red, PieceType::Horse) => '傌',
            (Color::Red, PieceType::Rook) => '俥',
            (Color::Red, PieceType::Cannon) => '炮',
            (Color::Red, PieceType::Soldier) => '兵',
            (Color::Black, PieceType::General) => '將',
            (Color::Black, PieceType::Advisor) => '士',
            (Color::Black, PieceType::Elephant) => '象',
            (Color::Black, PieceType::Horse) => '馬',
            (Color::Black, PieceType::Rook) => '車',
            (Color::Black, PieceType::Cannon) => '砲',
            (Color::Black, PieceType::Soldier) => '卒',
        }
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.fen_char())
    }
}
