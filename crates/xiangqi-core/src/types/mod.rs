//! 基本型モジュール
//!
//! ルールエンジンで使用する基本的な値型を定義する。
//!
//! # 型の依存関係
//!
//! ```text
//! Color
//!   ↓
//! Square
//!   ↓
//! PieceType
//!   ↓
//! Piece ← Move
//! ```

mod color;
mod moves;
mod piece;
mod piece_type;
mod square;

pub use color::Color;
pub use moves::Move;
pub use piece::Piece;
pub use piece_type::PieceType;
pub use square::Square;
