//! 終局判定
//!
//! 局面の状態は (盤面, 手番) から毎回導出し、エンジン内部には保持しない。

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::movegen::{is_in_check, legal_moves};
use crate::types::Color;

/// 局面の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// 対局中
    Playing,
    /// 手番側が王手されていて合法手がない
    Checkmate,
    /// 手番側が王手されていないが合法手がない（困毙）
    Stalemate,
    /// 引き分け
    Draw,
}

impl GameStatus {
    /// (盤面, 手番) から状態を導出する
    ///
    /// 合法手がなければ王手の有無で詰み/手詰まりを区別する。合法手があっても、
    /// 双方に攻め駒（車・馬・炮・兵）が1枚もなければ引き分け。
    pub fn of(board: &Board, side: Color) -> GameStatus {
        if legal_moves(board, side).is_empty() {
            return if is_in_check(board, side) {
                GameStatus::Checkmate
            } else {
                GameStatus::Stalemate
            };
        }
        if !has_attacking_material(board) {
            return GameStatus::Draw;
        }
        GameStatus::Playing
    }

    /// 終局しているか
    #[inline]
    pub const fn is_over(self) -> bool {
        !matches!(self, GameStatus::Playing)
    }

    /// 手番 `side` の局面がこの状態のときの勝者
    ///
    /// 象棋では詰みも困毙も手番側の負け。
    pub const fn winner(self, side: Color) -> Option<Color> {
        match self {
            GameStatus::Checkmate | GameStatus::Stalemate => Some(side.opponent()),
            GameStatus::Playing | GameStatus::Draw => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            GameStatus::Playing => "playing",
            GameStatus::Checkmate => "checkmate",
            GameStatus::Stalemate => "stalemate",
            GameStatus::Draw => "draw",
        }
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// `GameStatus::of` の関数形
#[inline]
pub fn status(board: &Board, side: Color) -> GameStatus {
    GameStatus::of(board, side)
}

/// 手番側に合法手がないか
#[inline]
pub fn is_terminal(board: &Board, side: Color) -> bool {
    legal_moves(board, side).is_empty()
}

/// どちらかの手番に攻め駒が残っているか
fn has_attacking_material(board: &Board) -> bool {
    board.pieces().any(|(_, pc)| pc.piece_type().is_attacker())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(fen: &str) -> (Board, Color) {
        Board::from_fen(fen).unwrap()
    }

    #[test]
    fn test_start_is_playing() {
        let board = Board::start();
        assert_eq!(status(&board, Color::Red), GameStatus::Playing);
        assert!(!is_terminal(&board, Color::Red));
    }

    #[test]
    fn test_checkmate_double_rook() {
        // 黒将 e9。紅車 a9 が 9 段目、紅車 b8 が 8 段目を押さえる。
        let (board, side) = parse("R3k4/1R7/9/9/9/9/9/9/9/3K5 b - - 0 1");
        assert!(is_in_check(&board, side));
        assert!(is_terminal(&board, side));
        assert_eq!(status(&board, side), GameStatus::Checkmate);
        assert_eq!(GameStatus::Checkmate.winner(side), Some(Color::Red));
    }

    #[test]
    fn test_stalemate() {
        // 黒将 d9 は王手されていない。d8 は紅車 a8 の利き、e9 は紅将との対面で動けない。
        let (board, side) = parse("3k5/R8/9/9/9/9/9/9/9/4K4 b - - 0 1");
        assert!(!is_in_check(&board, side));
        assert!(is_terminal(&board, side));
        assert_eq!(status(&board, side), GameStatus::Stalemate);
        assert_eq!(GameStatus::Stalemate.winner(side), Some(Color::Red));
    }

    #[test]
    fn test_draw_without_attackers() {
        let (board, side) = parse("3ak4/9/9/9/9/9/9/9/4A4/3K5 w - - 0 1");
        assert_eq!(status(&board, side), GameStatus::Draw);
        assert!(status(&board, side).is_over());
        assert_eq!(GameStatus::Draw.winner(side), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(GameStatus::Checkmate.to_string(), "checkmate");
        assert!(!GameStatus::Playing.is_over());
    }
}
