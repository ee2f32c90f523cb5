//! 対局ドライバのエラー型

use std::time::Duration;

use thiserror::Error;
use xiangqi_core::{Color, FenError, MoveError, Square};

/// 盤面操作（選択・着手・提案ロック）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayError {
    #[error("it is {0}'s turn")]
    NotYourTurn(Color),

    /// 着手提案の応答待ち中は人間の入力を受け付けない
    #[error("waiting for a move suggestion")]
    AwaitingSuggestion,

    #[error("the game is over")]
    GameOver,

    #[error("no piece of the side to move on {0}")]
    NoPieceSelected(Square),

    #[error(transparent)]
    Move(#[from] MoveError),

    #[error(transparent)]
    Fen(#[from] FenError),
}

/// 着手提案の失敗
///
/// 呼び出し側では常にランダムな合法手へのフォールバックで回復する。
#[derive(Debug, Error)]
pub enum SuggestError {
    #[error("suggester I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed suggester response: {0}")]
    Protocol(String),

    /// 提案側がエラーを返した
    #[error("suggester reported an error: {0}")]
    Service(String),

    #[error("suggester closed its output")]
    Closed,

    #[error("no suggestion within {0:?}")]
    Timeout(Duration),
}

/// 設定ファイル読み込みのエラー
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}
