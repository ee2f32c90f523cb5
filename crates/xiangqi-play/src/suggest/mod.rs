//! 着手提案
//!
//! 自動で指す側の手は `MoveSuggester` に問い合わせる。問い合わせは非同期で、
//! 一定の思考遅延の後にタイムアウト付きで待つ。提案がエラー・タイムアウト・
//! 合法手以外・手なしのいずれかなら、合法手からランダムに選んで続行する。

mod process;
mod random;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use rand::prelude::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use xiangqi_core::{Color, Move};

use crate::error::SuggestError;

pub use process::{ProcessConfig, ProcessSuggester};
pub use random::RandomSuggester;

/// 提案側に渡す強さの目安
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty '{other}' (expected easy, medium or hard)")),
        }
    }
}

/// 1手分の提案要求
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionRequest {
    /// 現局面のFEN
    pub fen: String,
    pub difficulty: Difficulty,
    /// 手番側の合法手（空でない）
    pub legal_moves: Vec<Move>,
    pub side: Color,
}

/// 着手提案の提供者
///
/// `Ok(None)` は「手を返さない」ことを表し、呼び出し側でフォールバックされる。
#[async_trait]
pub trait MoveSuggester: Send + Sync {
    /// ログ用の名前
    fn label(&self) -> &str;

    async fn suggest(&self, request: &SuggestionRequest) -> Result<Option<Move>, SuggestError>;
}

/// 問い合わせの時間設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestionPolicy {
    /// 問い合わせ前に入れる固定の遅延
    pub think_delay: Duration,
    /// 応答を待つ上限
    pub timeout: Duration,
}

impl Default for SuggestionPolicy {
    fn default() -> Self {
        Self {
            think_delay: Duration::from_millis(500),
            timeout: Duration::from_millis(5000),
        }
    }
}

/// フォールバックした理由
#[derive(Debug)]
pub enum FallbackReason {
    Failed(SuggestError),
    /// 合法手に含まれない手が返った
    Illegal(Move),
    NoMove,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::Failed(e) => write!(f, "{e}"),
            FallbackReason::Illegal(mv) => write!(f, "suggested move {mv} is not legal"),
            FallbackReason::NoMove => f.write_str("no move suggested"),
        }
    }
}

/// 指し手の出所
#[derive(Debug)]
pub enum MoveSource {
    Suggested,
    Fallback(FallbackReason),
}

impl MoveSource {
    #[inline]
    pub fn is_fallback(&self) -> bool {
        matches!(self, MoveSource::Fallback(_))
    }
}

/// `request_move` の結果
#[derive(Debug)]
pub struct MoveChoice {
    pub mv: Move,
    pub source: MoveSource,
}

/// 提案を問い合わせて1手を決める。
///
/// 返る手は常に `request.legal_moves` のいずれか。合法手が空なら `None`。
pub async fn request_move<R: Rng + ?Sized>(
    suggester: &dyn MoveSuggester,
    request: &SuggestionRequest,
    policy: &SuggestionPolicy,
    rng: &mut R,
) -> Option<MoveChoice> {
    if request.legal_moves.is_empty() {
        return None;
    }

    if !policy.think_delay.is_zero() {
        tokio::time::sleep(policy.think_delay).await;
    }

    let reason = match tokio::time::timeout(policy.timeout, suggester.suggest(request)).await {
        Ok(Ok(Some(mv))) if request.legal_moves.contains(&mv) => {
            debug!("{}: suggested {mv}", suggester.label());
            return Some(MoveChoice {
                mv,
                source: MoveSource::Suggested,
            });
        }
        Ok(Ok(Some(mv))) => FallbackReason::Illegal(mv),
        Ok(Ok(None)) => FallbackReason::NoMove,
        Ok(Err(e)) => FallbackReason::Failed(e),
        Err(_) => FallbackReason::Failed(SuggestError::Timeout(policy.timeout)),
    };

    let mv = *request.legal_moves.choose(rng)?;
    warn!(
        "{}: {reason}; playing random move {mv} for {}",
        suggester.label(),
        request.side
    );
    Some(MoveChoice {
        mv,
        source: MoveSource::Fallback(reason),
    })
}
