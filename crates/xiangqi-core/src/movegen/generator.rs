//! 駒種別の擬似合法手生成
//!
//! 擬似合法手は駒の動き方だけに従い、自分の将が取られる状態になるかは考慮しない。
//! 味方の駒がいる升へは動かない。

use crate::board::Board;
use crate::types::{Color, Move, Piece, PieceType, Square};

/// 1駒分の擬似合法手を追加する関数
type RuleFn = fn(&Board, Square, Color, &mut Vec<Move>);

const ORTHOGONAL: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// 馬の跳び先と、その手前で塞がれていると跳べなくなる「馬脚」の相対位置
const HORSE_JUMPS: [((i8, i8), (i8, i8)); 8] = [
    ((1, 2), (0, 1)),
    ((-1, 2), (0, 1)),
    ((1, -2), (0, -1)),
    ((-1, -2), (0, -1)),
    ((2, 1), (1, 0)),
    ((2, -1), (1, 0)),
    ((-2, 1), (-1, 0)),
    ((-2, -1), (-1, 0)),
];

/// 駒種に対応する生成関数
const fn rule_for(piece_type: PieceType) -> RuleFn {
    match piece_type {
        PieceType::General => generate_general_moves,
        PieceType::Advisor => generate_advisor_moves,
        PieceType::Elephant => generate_elephant_moves,
        PieceType::Horse => generate_horse_moves,
        PieceType::Rook => generate_rook_moves,
        PieceType::Cannon => generate_cannon_moves,
        PieceType::Soldier => generate_soldier_moves,
    }
}

/// `from` にいる駒 `piece` の擬似合法手を追加
#[inline]
pub(crate) fn generate_piece_moves(board: &Board, from: Square, piece: Piece, buffer: &mut Vec<Move>) {
    rule_for(piece.piece_type())(board, from, piece.color(), buffer);
}

/// 空き升か敵駒のいる升なら指し手を追加
#[inline]
fn add_if_target(board: &Board, from: Square, to: Square, us: Color, buffer: &mut Vec<Move>) {
    match board.piece_on(to) {
        Some(pc) if pc.color() == us => {}
        _ => buffer.push(Move::new(from, to)),
    }
}

// ============================================================================
// 駒種別の移動生成
// ============================================================================

/// 将: 九宮内を縦横に1歩
fn generate_general_moves(board: &Board, from: Square, us: Color, buffer: &mut Vec<Move>) {
    for (df, dr) in ORTHOGONAL {
        if let Some(to) = from.offset(df, dr)
            && to.is_in_palace(us)
        {
            add_if_target(board, from, to, us, buffer);
        }
    }
}

/// 士: 九宮内を斜めに1歩
fn generate_advisor_moves(board: &Board, from: Square, us: Color, buffer: &mut Vec<Move>) {
    for (df, dr) in DIAGONAL {
        if let Some(to) = from.offset(df, dr)
            && to.is_in_palace(us)
        {
            add_if_target(board, from, to, us, buffer);
        }
    }
}

/// 象: 斜めにちょうど2歩。中間点（象眼）が塞がれていると動けず、河は渡れない。
fn generate_elephant_moves(board: &Board, from: Square, us: Color, buffer: &mut Vec<Move>) {
    for (df, dr) in DIAGONAL {
        let Some(eye) = from.offset(df, dr) else {
            continue;
        };
        let Some(to) = from.offset(df * 2, dr * 2) else {
            continue;
        };
        if board.is_empty(eye) && to.is_own_side(us) {
            add_if_target(board, from, to, us, buffer);
        }
    }
}

/// 馬: 桂馬跳び（2+1）。長い脚の方向に隣接する点が塞がれていると跳べない。
fn generate_horse_moves(board: &Board, from: Square, us: Color, buffer: &mut Vec<Move>) {
    for ((df, dr), (lf, lr)) in HORSE_JUMPS {
        let Some(leg) = from.offset(lf, lr) else {
            continue;
        };
        if !board.is_empty(leg) {
            continue;
        }
        if let Some(to) = from.offset(df, dr) {
            add_if_target(board, from, to, us, buffer);
        }
    }
}

/// 車: 縦横に任意の距離。最初に当たった駒が敵なら取れる。
fn generate_rook_moves(board: &Board, from: Square, us: Color, buffer: &mut Vec<Move>) {
    for (df, dr) in ORTHOGONAL {
        let mut cur = from;
        while let Some(to) = cur.offset(df, dr) {
            cur = to;
            match board.piece_on(to) {
                None => buffer.push(Move::new(from, to)),
                Some(pc) => {
                    if pc.color() != us {
                        buffer.push(Move::new(from, to));
                    }
                    break;
                }
            }
        }
    }
}

/// 砲: 取らない手は車と同じ。取る手はちょうど1枚の駒（台、色は問わない）を
/// 飛び越え、その先で最初に当たった敵駒を取る。
fn generate_cannon_moves(board: &Board, from: Square, us: Color, buffer: &mut Vec<Move>) {
    for (df, dr) in ORTHOGONAL {
        let mut cur = from;
        let mut screened = false;
        while let Some(to) = cur.offset(df, dr) {
            cur = to;
            match (board.piece_on(to), screened) {
                (None, false) => buffer.push(Move::new(from, to)),
                (None, true) => {}
                (Some(_), false) => screened = true,
                (Some(pc), true) => {
                    if pc.color() != us {
                        buffer.push(Move::new(from, to));
                    }
                    break;
                }
            }
        }
    }
}

/// 兵: 前に1歩。河を渡った後は横にも1歩進める。後退はできない。
fn generate_soldier_moves(board: &Board, from: Square, us: Color, buffer: &mut Vec<Move>) {
    if let Some(to) = from.offset(0, us.forward()) {
        add_if_target(board, from, to, us, buffer);
    }
    if !from.is_own_side(us) {
        for df in [-1, 1] {
            if let Some(to) = from.offset(df, 0) {
                add_if_target(board, from, to, us, buffer);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_iccs(s).unwrap()
    }

    /// 指定升の駒の擬似合法手の移動先を ICCS 表記で返す（ソート済み）
    fn targets(board: &Board, from: &str) -> Vec<String> {
        let from = sq(from);
        let piece = board.piece_on(from).unwrap();
        let mut buffer = Vec::new();
        generate_piece_moves(board, from, piece, &mut buffer);
        let mut result: Vec<String> = buffer.iter().map(|m| m.to.to_iccs()).collect();
        result.sort();
        result
    }

    fn board(placement: &str) -> Board {
        Board::from_fen(&format!("{placement} w")).unwrap().0
    }

    #[test]
    fn test_general_stays_in_palace() {
        let b = board("9/9/9/9/9/9/9/9/9/3K5");
        assert_eq!(targets(&b, "d0"), vec!["d1", "e0"]);
        let b = board("9/9/9/9/9/9/9/4K4/9/9");
        assert_eq!(targets(&b, "e2"), vec!["d2", "e1", "f2"]);
    }

    #[test]
    fn test_advisor_stays_in_palace() {
        let b = board("9/9/9/9/9/9/9/9/9/3A5");
        assert_eq!(targets(&b, "d0"), vec!["e1"]);
        let b = board("9/9/9/9/9/9/9/9/4A4/9");
        assert_eq!(targets(&b, "e1"), vec!["d0", "d2", "f0", "f2"]);
    }

    #[test]
    fn test_elephant_cannot_cross_river() {
        // c4 の象は c4→a6/e6 に進めない（河越え）
        let b = board("9/9/9/9/9/2B6/9/9/9/9");
        assert_eq!(targets(&b, "c4"), vec!["a2", "e2"]);
        // 黒象も同様
        let b = board("9/9/9/9/2b6/9/9/9/9/9");
        assert_eq!(targets(&b, "c5"), vec!["a7", "e7"]);
    }

    #[test]
    fn test_elephant_eye_blocked() {
        let b = board("9/9/9/9/9/9/9/9/3P5/2B6");
        assert_eq!(targets(&b, "c0"), vec!["a2"]);
    }

    #[test]
    fn test_horse_hobbled() {
        // 中央の馬は 8 方向に跳べる
        let b = board("9/9/9/9/4N4/9/9/9/9/9");
        assert_eq!(targets(&b, "e5").len(), 8);

        // e6 に駒があると上方向の2手（d7, f7）が消える
        let b = board("9/9/9/4p4/4N4/9/9/9/9/9");
        assert_eq!(
            targets(&b, "e5"),
            vec!["c4", "c6", "d3", "f3", "g4", "g6"]
        );
    }

    #[test]
    fn test_horse_corner() {
        let b = board("9/9/9/9/9/9/9/9/9/N8");
        assert_eq!(targets(&b, "a0"), vec!["b2", "c1"]);
    }

    #[test]
    fn test_rook_slides_and_captures() {
        let b = board("9/9/9/9/9/9/4p4/9/9/1P2R4");
        assert_eq!(
            targets(&b, "e0"),
            vec!["c0", "d0", "e1", "e2", "e3", "f0", "g0", "h0", "i0"]
        );
    }

    #[test]
    fn test_cannon_capture_needs_exactly_one_screen() {
        // 台なし: e1 の炮は e9 の将を取れない
        let b = board("4k4/9/9/9/9/9/9/9/4C4/9");
        assert!(!targets(&b, "e1").contains(&"e9".to_string()));

        // 台 1 枚（e5 の自駒）: 取れる
        let b = board("4k4/9/9/9/4P4/9/9/9/4C4/9");
        let t = targets(&b, "e1");
        assert!(t.contains(&"e9".to_string()));
        assert!(!t.contains(&"e5".to_string()));
        assert!(!t.contains(&"e6".to_string()));

        // 台 2 枚（e5, e8）: e9 は取れない。台の先で最初に当たる e8 は取れる。
        let b = board("4k4/4p4/9/9/4P4/9/9/9/4C4/9");
        let t = targets(&b, "e1");
        assert!(!t.contains(&"e9".to_string()));
        assert!(t.contains(&"e8".to_string()));
    }

    #[test]
    fn test_cannon_cannot_capture_own_piece() {
        let b = board("4K4/9/9/9/4P4/9/9/9/4C4/9");
        assert!(!targets(&b, "e1").contains(&"e9".to_string()));
    }

    #[test]
    fn test_soldier_before_and_after_river() {
        let b = board("9/9/9/9/9/9/4P4/9/9/9");
        assert_eq!(targets(&b, "e3"), vec!["e4"]);

        let b = board("9/9/9/9/4P4/9/9/9/9/9");
        assert_eq!(targets(&b, "e5"), vec!["d5", "e6", "f5"]);

        // 最奥の段では横にしか動けない
        let b = board("P8/9/9/9/9/9/9/9/9/9");
        assert_eq!(targets(&b, "a9"), vec!["b9"]);
    }

    #[test]
    fn test_black_soldier_moves_down() {
        let b = board("9/9/9/9/4p4/9/9/9/9/9");
        assert_eq!(targets(&b, "e5"), vec!["e4"]);
        let b = board("9/9/9/9/9/4p4/9/9/9/9");
        assert_eq!(targets(&b, "e4"), vec!["d4", "e3", "f4"]);
    }
}
