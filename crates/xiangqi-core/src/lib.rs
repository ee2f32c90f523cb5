//! 象棋（Xiangqi）ルールエンジン
//!
//! - `types`: 手番・駒種・駒・升目・指し手などの値型
//! - `board`: 盤面、FEN形式の解析・出力、指し手の適用
//! - `movegen`: 駒種別の擬似合法手生成と合法手フィルタ
//! - `status`: 王手・詰み・手詰まり・引き分けの判定
//!
//! すべての操作は純粋関数で、盤面は値として受け渡す。指し手の適用は常に新しい
//! `Board` を返し、入力の盤面は変更しない。

pub mod board;
pub mod movegen;
pub mod status;
pub mod types;

pub use board::{apply, Applied, Board, FenError, MoveError, START_FEN};
pub use movegen::{
    generals_facing, is_attacked, is_in_check, is_legal, legal_moves, legal_moves_from,
    pseudo_legal_moves,
};
pub use status::{is_terminal, status, GameStatus};
pub use types::{Color, Move, Piece, PieceType, Square};
