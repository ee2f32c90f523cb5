//! 指し手生成
//!
//! - `pseudo_legal_moves`: 駒の動き方だけに従う擬似合法手
//! - `legal_moves`: 自玉（自分の将）を取られる状態にしない合法手
//! - `is_in_check`: 相手の擬似合法手の移動先に将の升が含まれるか
//!
//! 合法手フィルタは候補手ごとに適用後の盤面を作り、相手の擬似合法手で将が
//! 取られないこと、両将が間に駒なく同じ筋で向かい合わない（将帥対面）ことを確認する。

mod generator;

use crate::board::Board;
use crate::types::{Color, Move, Square};

use generator::generate_piece_moves;

/// 擬似合法手を生成
pub fn pseudo_legal_moves(board: &Board, side: Color) -> Vec<Move> {
    let mut buffer = Vec::with_capacity(64);
    for (from, piece) in board.pieces_of(side) {
        generate_piece_moves(board, from, piece, &mut buffer);
    }
    buffer
}

/// 合法手を生成
pub fn legal_moves(board: &Board, side: Color) -> Vec<Move> {
    let mut moves = pseudo_legal_moves(board, side);
    moves.retain(|&mv| leaves_general_safe(board, side, mv));
    moves
}

/// `from` にいる `side` の駒の合法手を生成
///
/// `from` が空、または相手の駒の場合は空を返す。
pub fn legal_moves_from(board: &Board, side: Color, from: Square) -> Vec<Move> {
    let Some(piece) = board.piece_on(from).filter(|pc| pc.color() == side) else {
        return Vec::new();
    };
    let mut moves = Vec::with_capacity(17);
    generate_piece_moves(board, from, piece, &mut moves);
    moves.retain(|&mv| leaves_general_safe(board, side, mv));
    moves
}

/// 指し手が `side` にとって合法かどうか
pub fn is_legal(board: &Board, side: Color, mv: Move) -> bool {
    legal_moves_from(board, side, mv.from).contains(&mv)
}

/// `side` が王手されているか
///
/// 盤上に `side` の将がいなければ false。
pub fn is_in_check(board: &Board, side: Color) -> bool {
    board
        .find_general(side)
        .is_some_and(|general| is_attacked(board, general, side.opponent()))
}

/// `target` が `by` の擬似合法手の移動先に含まれるか
pub fn is_attacked(board: &Board, target: Square, by: Color) -> bool {
    let mut buffer = Vec::with_capacity(17);
    board.pieces_of(by).any(|(from, piece)| {
        buffer.clear();
        generate_piece_moves(board, from, piece, &mut buffer);
        buffer.iter().any(|mv| mv.to == target)
    })
}

/// 両将が同じ筋で、間に駒がなく向かい合っているか（将帥対面）
pub fn generals_facing(board: &Board) -> bool {
    let (Some(red), Some(black)) = (
        board.find_general(Color::Red),
        board.find_general(Color::Black),
    ) else {
        return false;
    };
    if red.file() != black.file() {
        return false;
    }
    let (low, high) = if red.rank() < black.rank() {
        (red.rank(), black.rank())
    } else {
        (black.rank(), red.rank())
    };
    ((low + 1)..high)
        .filter_map(|rank| Square::new(red.file(), rank))
        .all(|sq| board.is_empty(sq))
}

/// 擬似合法手を適用しても自分の将が安全か
fn leaves_general_safe(board: &Board, side: Color, mv: Move) -> bool {
    let (next, _) = board.with_move(mv);
    !is_in_check(&next, side) && !generals_facing(&next)
}
