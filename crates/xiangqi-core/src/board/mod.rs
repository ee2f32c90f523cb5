//! 盤面モジュール
//!
//! - `Board`: 90 升の駒配置（値型、`Copy`）
//! - FEN形式の解析・出力（`fen`）
//! - 指し手の適用（`apply`）
//!
//! 盤面の升を書き換えるのは FEN パーサと指し手の適用だけで、どちらも新しい
//! `Board` を組み立てて返す。呼び出し側が古い盤面を保持していても安全。

mod apply;
mod fen;

pub use apply::{apply, Applied, MoveError};
pub use fen::{FenError, START_FEN};

use std::ops::Index;

use crate::types::{Color, Move, Piece, PieceType, Square};

/// 盤面（10段 × 9筋）
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [Option<Piece>; Square::NUM],
}

impl Board {
    /// 空の盤面
    pub const fn empty() -> Board {
        Board {
            squares: [None; Square::NUM],
        }
    }

    /// 初期局面の盤面（`START_FEN` の盤面フィールドと同じ配置）
    pub const fn start() -> Board {
        const BACK_RANK: [PieceType; 9] = [
            PieceType::Rook,
            PieceType::Horse,
            PieceType::Elephant,
            PieceType::Advisor,
            PieceType::General,
            PieceType::Advisor,
            PieceType::Elephant,
            PieceType::Horse,
            PieceType::Rook,
        ];
        const FILES: usize = Square::FILES as usize;

        // 升目の添字は rank * 9 + file。紅は 0-4 段、黒は 5-9 段。
        let mut squares = [None; Square::NUM];
        let mut file = 0;
        while file < FILES {
            squares[file] = Some(Piece::new(Color::Red, BACK_RANK[file]));
            squares[9 * FILES + file] = Some(Piece::new(Color::Black, BACK_RANK[file]));
            if file % 2 == 0 {
                squares[3 * FILES + file] = Some(Piece::new(Color::Red, PieceType::Soldier));
                squares[6 * FILES + file] = Some(Piece::new(Color::Black, PieceType::Soldier));
            }
            if file == 1 || file == 7 {
                squares[2 * FILES + file] = Some(Piece::new(Color::Red, PieceType::Cannon));
                squares[7 * FILES + file] = Some(Piece::new(Color::Black, PieceType::Cannon));
            }
            file += 1;
        }
        Board { squares }
    }

    /// 升目上の駒
    #[inline]
    pub fn piece_on(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.index()]
    }

    /// 升目が空かどうか
    #[inline]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.squares[sq.index()].is_none()
    }

    /// 駒を置いた新しい盤面を返す（盤面の組み立て用）
    #[must_use]
    pub fn with_piece(mut self, sq: Square, piece: Option<Piece>) -> Board {
        self.squares[sq.index()] = piece;
        self
    }

    /// 指し手を適用した新しい盤面と取った駒を返す。
    ///
    /// 合法性は検査しない。移動元が空の場合は盤面をそのまま返す。
    /// 検査付きの適用は [`apply`] を使う。
    #[must_use]
    pub fn with_move(&self, mv: Move) -> (Board, Option<Piece>) {
        let mut next = *self;
        let Some(moved) = next.squares[mv.from.index()].take() else {
            return (next, None);
        };
        let captured = next.squares[mv.to.index()].replace(moved);
        (next, captured)
    }

    /// 駒のある升目と駒の組を列挙（a0 → i9 の順）
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.piece_on(sq).map(|pc| (sq, pc)))
    }

    /// 指定した手番の駒を列挙
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, pc)| pc.color() == color)
    }

    /// 盤上の駒数
    pub fn piece_count(&self) -> usize {
        self.squares.iter().filter(|pc| pc.is_some()).count()
    }

    /// 将（帥）の升目。盤上にいなければ None。
    pub fn find_general(&self, color: Color) -> Option<Square> {
        let general = Piece::new(color, PieceType::General);
        self.pieces().find(|&(_, pc)| pc == general).map(|(sq, _)| sq)
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::empty()
    }
}

impl Index<Square> for Board {
    type Output = Option<Piece>;

    fn index(&self, index: Square) -> &Self::Output {
        &self.squares[index.index()]
    }
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // 手番を持たないので盤面フィールドだけを出す
        let fen = self.to_fen(Color::Red);
        let placement = fen.split(' ').next().unwrap_or_default();
        f.debug_tuple("Board").field(&placement).finish()
    }
}

/// 9段目を上にした文字盤。空き升は `.`、駒は FEN 文字。
impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for rank in (0..Square::RANKS).rev() {
            write!(f, "{rank} ")?;
            for file in 0..Square::FILES {
                let sq = Square::new(file, rank).ok_or(std::fmt::Error)?;
                match self.piece_on(sq) {
                    Some(pc) => write!(f, " {pc}")?,
                    None => write!(f, " .")?,
                }
            }
            writeln!(f)?;
        }
        write!(f, "  ")?;
        for c in 'a'..='i' {
            write!(f, " {c}")?;
        }
        writeln!(f)
    }
}
