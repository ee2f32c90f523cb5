//! 自動対局ループ
//!
//! 両者とも `MoveSuggester` に手を問い合わせ、終局まで指し進める。

use rand::Rng;
use xiangqi_core::{Color, Move, Piece};

use crate::error::PlayError;
use crate::state::{GameResult, GameState};
use crate::suggest::{request_move, Difficulty, MoveSource, MoveSuggester, SuggestionPolicy};

/// 1手ごとに呼ばれるイベント
pub struct MoveEvent<'a> {
    pub ply: u32,
    pub side: Color,
    pub fen_before: &'a str,
    pub mv: Move,
    pub captured: Option<Piece>,
    pub source: &'a MoveSource,
    pub suggester: &'a str,
}

/// 1局を実行する。
///
/// - `state`: 開始局面（終局済みならそのまま結果を返す）
/// - `red`, `black`: 各手番の提案者
/// - `on_move`: 1手ごとに呼ばれるコールバック
pub async fn run_game<R: Rng + ?Sized>(
    state: &mut GameState,
    red: &dyn MoveSuggester,
    black: &dyn MoveSuggester,
    difficulty: Difficulty,
    policy: &SuggestionPolicy,
    rng: &mut R,
    on_move: &mut dyn FnMut(&MoveEvent<'_>),
) -> Result<GameResult, PlayError> {
    loop {
        if let Some(result) = state.result() {
            return Ok(result);
        }

        let side = state.side_to_move();
        let suggester = match side {
            Color::Red => red,
            Color::Black => black,
        };

        let request = state.begin_suggestion(difficulty)?;
        let choice = request_move(suggester, &request, policy, rng).await;
        let Some(choice) = choice else {
            state.end_suggestion(None)?;
            return Err(PlayError::GameOver);
        };

        let applied = state.end_suggestion(Some(choice.mv))?;
        on_move(&MoveEvent {
            ply: state.ply(),
            side,
            fen_before: &request.fen,
            mv: choice.mv,
            captured: applied.and_then(|a| a.captured),
            source: &choice.source,
            suggester: suggester.label(),
        });
    }
}
