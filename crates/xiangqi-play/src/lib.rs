//! 象棋の対局ドライバ
//!
//! - `state`: 対局状態（手番ロック、引き分けカウンタ、終局結果）
//! - `suggest`: 着手提案の問い合わせとフォールバック
//! - `game`: 提案者同士の自動対局ループ
//! - `config`: TOML 設定
//!
//! ルールそのものは `xiangqi_core` に任せ、このクレートは手番の管理と
//! 外部との入出力だけを受け持つ。

pub mod config;
pub mod error;
pub mod game;
pub mod state;
pub mod suggest;

pub use config::{PlayConfig, PlayerKind};
pub use error::{ConfigError, PlayError, SuggestError};
pub use game::{run_game, MoveEvent};
pub use state::{DrawLimits, EndReason, GameOutcome, GameResult, GameState};
pub use suggest::{
    request_move, Difficulty, FallbackReason, MoveChoice, MoveSource, MoveSuggester,
    ProcessConfig, ProcessSuggester, RandomSuggester, SuggestionPolicy, SuggestionRequest,
};
