//! FEN形式の解析・出力
//!
//! 盤面フィールドは 9 段目（黒の最下段）から 0 段目へ、各段は a 筋から i 筋へ並べる。
//! 連続する空き升は数字 1-9、駒は WXF 表記の文字（紅は大文字、黒は小文字）:
//!
//! | 駒種 | 文字 |
//! |------|------|
//! | 将   | K/k  |
//! | 士   | A/a  |
//! | 象   | B/b  |
//! | 馬   | N/n  |
//! | 車   | R/r  |
//! | 砲   | C/c  |
//! | 卒   | P/p  |
//!
//! 2 番目のフィールドが手番（`w` = 紅、`b` = 黒）。その後ろの `- - 0 1` は互換性の
//! ために出力するだけで、解析時は読み飛ばす。

use thiserror::Error;

use crate::types::{Color, Piece, Square};

use super::Board;

/// 初期局面のFEN
pub const START_FEN: &str = "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR w - - 0 1";

/// 手番以降に出力する互換フィールド
const TRAILING_FIELDS: &str = "- - 0 1";

/// 手番の後ろに許す互換フィールドの最大数
const MAX_TRAILING_FIELDS: usize = 4;

/// FENパースエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FenError {
    /// 盤面フィールドがない
    #[error("empty FEN")]
    Empty,

    /// 段の数が 10 でない
    #[error("expected 10 ranks, got {found}")]
    RankCount { found: usize },

    /// 段の升目数が 9 でない
    #[error("rank {rank} does not span 9 files: '{token}'")]
    RankWidth { rank: u8, token: String },

    /// 未知の駒文字
    #[error("unknown piece letter '{0}'")]
    UnknownPiece(char),

    /// 空き升の表記が不正（'0' や数字の連続）
    #[error("invalid empty-square run in '{0}'")]
    EmptyRun(String),

    /// 手番フィールドがない
    #[error("missing side-to-move field")]
    MissingSideToMove,

    /// 手番フィールドが不正
    #[error("invalid side to move: expected 'w' or 'b', got '{0}'")]
    SideToMove(String),

    /// フィールドが多すぎる
    #[error("too many FEN fields: {0}")]
    TooManyFields(usize),
}

impl Board {
    /// FEN文字列から盤面と手番を生成
    ///
    /// 手番の後ろの互換フィールドは 0-4 個を受け付けて読み捨てる。読み捨てた
    /// フィールドは保持しないので、`to_fen` で元の文字列に戻るのは `to_fen` が
    /// 出力する正準形（空き升をまとめ、`- - 0 1` まで揃えたもの）だけ。
    /// `"<盤面> w"` のような短い形は `"<盤面> w - - 0 1"` に正規化される。
    ///
    /// 失敗した場合、途中まで組み立てた盤面は返さない。
    pub fn from_fen(fen: &str) -> Result<(Board, Color), FenError> {
        let mut fields = fen.split_whitespace();

        // 1. 盤面
        let placement = fields.next().ok_or(FenError::Empty)?;
        let board = parse_placement(placement)?;

        // 2. 手番
        let token = fields.next().ok_or(FenError::MissingSideToMove)?;
        let side = Color::from_fen_token(token).ok_or_else(|| FenError::SideToMove(token.to_string()))?;

        // 3. 互換フィールド（読み飛ばす）
        let trailing = fields.count();
        if trailing > MAX_TRAILING_FIELDS {
            return Err(FenError::TooManyFields(2 + trailing));
        }

        Ok((board, side))
    }

    /// 盤面と手番を正準形のFEN文字列に変換
    pub fn to_fen(&self, side: Color) -> String {
        let mut result = String::with_capacity(64);

        for rank in (0..Square::RANKS).rev() {
            let mut empty_count = 0u8;

            for file in 0..Square::FILES {
                let piece = Square::new(file, rank).and_then(|sq| self.piece_on(sq));
                match piece {
                    None => empty_count += 1,
                    Some(pc) => {
                        if empty_count > 0 {
                            result.push((b'0' + empty_count) as char);
                            empty_count = 0;
                        }
                        result.push(pc.fen_char());
                    }
                }
            }

            if empty_count > 0 {
                result.push((b'0' + empty_count) as char);
            }

            if rank > 0 {
                result.push('/');
            }
        }

        result.push(' ');
        result.push(side.fen_char());
        result.push(' ');
        result.push_str(TRAILING_FIELDS);

        result
    }
}

/// 盤面部分をパース
fn parse_placement(placement: &str) -> Result<Board, FenError> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != Square::RANKS as usize {
        return Err(FenError::RankCount { found: ranks.len() });
    }

    let mut board = Board::empty();

    for (idx, token) in ranks.iter().enumerate() {
        let rank = Square::RANKS - 1 - idx as u8;
        let width_error = || FenError::RankWidth {
            rank,
            token: token.to_string(),
        };

        let mut file = 0u8;
        let mut prev_digit = false;

        for c in token.chars() {
            if let Some(digit) = c.to_digit(10) {
                // 正準形では空き升は 1-9 の 1 文字にまとめる
                if digit == 0 || prev_digit {
                    return Err(FenError::EmptyRun(token.to_string()));
                }
                file += digit as u8;
                if file > Square::FILES {
                    return Err(width_error());
                }
                prev_digit = true;
            } else {
                let pc = Piece::from_fen_char(c).ok_or(FenError::UnknownPiece(c))?;
                let sq = Square::new(file, rank).ok_or_else(width_error)?;
                board = board.with_piece(sq, Some(pc));
                file += 1;
                prev_digit = false;
            }
        }

        if file != Square::FILES {
            return Err(width_error());
        }
    }

    Ok(board)
}
