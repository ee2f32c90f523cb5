//! 指し手の適用

use log::{debug, trace};
use thiserror::Error;

use crate::movegen::legal_moves;
use crate::types::{Move, Piece, PieceType, Square};

use super::Board;

/// 指し手適用エラー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    /// 移動元に駒がない
    #[error("no piece on {0}")]
    EmptyOrigin(Square),

    /// 移動元の駒の手番にとって合法手でない
    #[error("illegal move: {0}")]
    Illegal(Move),
}

/// 指し手を適用した結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Applied {
    /// 適用後の盤面
    pub board: Board,
    /// 動かした駒
    pub moved: Piece,
    /// 取った駒
    pub captured: Option<Piece>,
}

impl Applied {
    /// 将（帥）を取ったかどうか
    ///
    /// 合法手だけを適用している限り起こらない。合法手フィルタの抜けを検出する
    /// フェイルセーフとして、呼び出し側はこれが真なら即座に終局とする。
    #[inline]
    pub fn general_captured(&self) -> bool {
        self.captured
            .is_some_and(|pc| pc.piece_type() == PieceType::General)
    }
}

/// 指し手を適用して新しい盤面を返す。
///
/// 移動元の駒の手番の合法手に含まれない指し手はエラーにする。入力の盤面は変更しない。
pub fn apply(board: &Board, mv: Move) -> Result<Applied, MoveError> {
    let moved = board.piece_on(mv.from).ok_or(MoveError::EmptyOrigin(mv.from))?;

    if !legal_moves(board, moved.color()).contains(&mv) {
        debug!("rejected {mv}: not legal for {}", moved.color());
        return Err(MoveError::Illegal(mv));
    }

    let (next, captured) = board.with_move(mv);
    trace!("applied {mv} ({moved}), captured {captured:?}");

    Ok(Applied {
        board: next,
        moved,
        captured,
    })
}
