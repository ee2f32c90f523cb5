//! 対局状態
//!
//! 盤面・手番・選択中の升・手数カウンタ・取った駒を1つの値にまとめ、
//! 着手と着手提案の待ち受けを手番ロックで直列化する。

use std::fmt;

use log::{debug, info};
use serde::Serialize;
use xiangqi_core::{
    apply, legal_moves, legal_moves_from, Applied, Board, Color, GameStatus, Move, Piece, Square,
};

use crate::error::PlayError;
use crate::suggest::{Difficulty, SuggestionRequest};

/// ドライバ側の引き分け条件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawLimits {
    /// この手数に達したら引き分け
    pub max_plies: u32,
    /// 駒を取らない手がこの数だけ続いたら引き分け（0 で無効）
    pub quiet_ply_limit: u32,
}

impl Default for DrawLimits {
    fn default() -> Self {
        Self {
            max_plies: 300,
            quiet_ply_limit: 100,
        }
    }
}

/// 対局結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOutcome {
    RedWin,
    BlackWin,
    Draw,
}

impl GameOutcome {
    pub const fn win_for(color: Color) -> GameOutcome {
        match color {
            Color::Red => GameOutcome::RedWin,
            Color::Black => GameOutcome::BlackWin,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            GameOutcome::RedWin => "red_win",
            GameOutcome::BlackWin => "black_win",
            GameOutcome::Draw => "draw",
        }
    }
}

/// 終局理由
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    Checkmate,
    Stalemate,
    /// 双方に攻め駒がない
    InsufficientMaterial,
    /// 将が取られた（合法手だけを指している限り起こらない）
    GeneralCaptured,
    MaxPlies,
    QuietPlies,
}

impl EndReason {
    pub const fn label(self) -> &'static str {
        match self {
            EndReason::Checkmate => "checkmate",
            EndReason::Stalemate => "stalemate",
            EndReason::InsufficientMaterial => "insufficient_material",
            EndReason::GeneralCaptured => "general_captured",
            EndReason::MaxPlies => "max_plies",
            EndReason::QuietPlies => "quiet_plies",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameResult {
    pub outcome: GameOutcome,
    pub reason: EndReason,
    pub plies: u32,
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) after {} plies",
            self.outcome.label(),
            self.reason.label(),
            self.plies
        )
    }
}

#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    side: Color,
    status: GameStatus,
    limits: DrawLimits,
    selected: Option<Square>,
    ply: u32,
    /// 最後に駒を取ってからの手数
    quiet_plies: u32,
    last_move: Option<Move>,
    captured: Vec<Piece>,
    awaiting_suggestion: bool,
    result: Option<GameResult>,
}

impl GameState {
    pub fn new(limits: DrawLimits) -> Self {
        Self::with_position(Board::start(), Color::Red, limits)
    }

    pub fn from_fen(fen: &str, limits: DrawLimits) -> Result<Self, PlayError> {
        let (board, side) = Board::from_fen(fen)?;
        Ok(Self::with_position(board, side, limits))
    }

    fn with_position(board: Board, side: Color, limits: DrawLimits) -> Self {
        let status = GameStatus::of(&board, side);
        let mut state = Self {
            board,
            side,
            status,
            limits,
            selected: None,
            ply: 0,
            quiet_plies: 0,
            last_move: None,
            captured: Vec::new(),
            awaiting_suggestion: false,
            result: None,
        };
        state.result = state.terminal_result(None);
        state
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side
    }

    #[inline]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[inline]
    pub fn ply(&self) -> u32 {
        self.ply
    }

    #[inline]
    pub fn selected(&self) -> Option<Square> {
        self.selected
    }

    #[inline]
    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    /// これまでに取られた駒（取られた順）
    pub fn captured(&self) -> &[Piece] {
        &self.captured
    }

    #[inline]
    pub fn is_awaiting_suggestion(&self) -> bool {
        self.awaiting_suggestion
    }

    #[inline]
    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    pub fn fen(&self) -> String {
        self.board.to_fen(self.side)
    }

    /// 手番側の合法手。終局後は空。
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.result.is_some() {
            return Vec::new();
        }
        legal_moves(&self.board, self.side)
    }

    /// 手番側の駒を選び、その駒の合法手を返す
    pub fn select(&mut self, square: Square) -> Result<Vec<Move>, PlayError> {
        self.ensure_accepting_moves()?;
        match self.board.piece_on(square) {
            Some(pc) if pc.color() == self.side => {
                self.selected = Some(square);
                Ok(legal_moves_from(&self.board, self.side, square))
            }
            Some(_) => {
                self.selected = None;
                Err(PlayError::NotYourTurn(self.side))
            }
            None => {
                self.selected = None;
                Err(PlayError::NoPieceSelected(square))
            }
        }
    }

    /// 選択中の駒を `to` へ動かす
    pub fn play_selected(&mut self, to: Square) -> Result<Applied, PlayError> {
        self.ensure_accepting_moves()?;
        let from = self.selected.ok_or(PlayError::NoPieceSelected(to))?;
        self.play(Move::new(from, to))
    }

    /// 手番側の手を指す
    pub fn play(&mut self, mv: Move) -> Result<Applied, PlayError> {
        self.ensure_accepting_moves()?;
        self.commit(mv)
    }

    /// 着手提案の問い合わせを始める。応答を待つ間は人間の入力を拒否する。
    pub fn begin_suggestion(&mut self, difficulty: Difficulty) -> Result<SuggestionRequest, PlayError> {
        self.ensure_accepting_moves()?;
        self.awaiting_suggestion = true;
        self.selected = None;
        Ok(SuggestionRequest {
            fen: self.fen(),
            difficulty,
            legal_moves: legal_moves(&self.board, self.side),
            side: self.side,
        })
    }

    /// 提案された手を指して問い合わせを終える。`None` なら何も指さずにロックだけ解く。
    pub fn end_suggestion(&mut self, mv: Option<Move>) -> Result<Option<Applied>, PlayError> {
        if !self.awaiting_suggestion {
            return Err(PlayError::NotYourTurn(self.side));
        }
        self.awaiting_suggestion = false;
        mv.map(|mv| self.commit(mv)).transpose()
    }

    fn ensure_accepting_moves(&self) -> Result<(), PlayError> {
        if self.result.is_some() {
            return Err(PlayError::GameOver);
        }
        if self.awaiting_suggestion {
            return Err(PlayError::AwaitingSuggestion);
        }
        Ok(())
    }

    fn commit(&mut self, mv: Move) -> Result<Applied, PlayError> {
        if self.result.is_some() {
            return Err(PlayError::GameOver);
        }
        if let Some(pc) = self.board.piece_on(mv.from)
            && pc.color() != self.side
        {
            return Err(PlayError::NotYourTurn(self.side));
        }

        let applied = apply(&self.board, mv)?;
        let mover = self.side;

        self.board = applied.board;
        self.side = mover.opponent();
        self.ply += 1;
        self.quiet_plies = if applied.captured.is_some() {
            0
        } else {
            self.quiet_plies + 1
        };
        if let Some(pc) = applied.captured {
            self.captured.push(pc);
        }
        self.last_move = Some(mv);
        self.selected = None;
        self.status = GameStatus::of(&self.board, self.side);

        info!("ply {}: {mover} {mv} ({})", self.ply, applied.moved.chinese_char());
        self.result = self.terminal_result(Some((mover, &applied)));
        if let Some(result) = self.result {
            info!("game over: {result}");
        } else {
            debug!("{}", self.fen());
        }
        Ok(applied)
    }

    /// 終局していれば結果を返す
    fn terminal_result(&self, last: Option<(Color, &Applied)>) -> Option<GameResult> {
        let finish = |outcome, reason| {
            Some(GameResult {
                outcome,
                reason,
                plies: self.ply,
            })
        };

        if let Some((mover, applied)) = last
            && applied.general_captured()
        {
            return finish(GameOutcome::win_for(mover), EndReason::GeneralCaptured);
        }
        match self.status {
            GameStatus::Checkmate | GameStatus::Stalemate => {
                let reason = if self.status == GameStatus::Checkmate {
                    EndReason::Checkmate
                } else {
                    EndReason::Stalemate
                };
                let winner = self.status.winner(self.side)?;
                return finish(GameOutcome::win_for(winner), reason);
            }
            GameStatus::Draw => return finish(GameOutcome::Draw, EndReason::InsufficientMaterial),
            GameStatus::Playing => {}
        }
        if self.limits.quiet_ply_limit > 0 && self.quiet_plies >= self.limits.quiet_ply_limit {
            return finish(GameOutcome::Draw, EndReason::QuietPlies);
        }
        if self.ply >= self.limits.max_plies && self.limits.max_plies > 0 {
            return finish(GameOutcome::Draw, EndReason::MaxPlies);
        }
        None
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(DrawLimits::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xiangqi_core::{PieceType, START_FEN};

    fn mv(s: &str) -> Move {
        Move::from_iccs(s).unwrap()
    }

    fn sq(s: &str) -> Square {
        Square::from_iccs(s).unwrap()
    }

    #[test]
    fn test_new_game() {
        let state = GameState::default();
        assert_eq!(state.fen(), START_FEN);
        assert_eq!(state.side_to_move(), Color::Red);
        assert_eq!(state.legal_moves().len(), 44);
        assert_eq!(state.result(), None);
    }

    #[test]
    fn test_select_and_play() {
        let mut state = GameState::default();
        let moves = state.select(sq("b2")).unwrap();
        assert!(moves.contains(&mv("b2e2")));
        assert_eq!(state.selected(), Some(sq("b2")));

        let applied = state.play_selected(sq("e2")).unwrap();
        assert_eq!(applied.moved.piece_type(), PieceType::Cannon);
        assert_eq!(state.side_to_move(), Color::Black);
        assert_eq!(state.selected(), None);
        assert_eq!(state.ply(), 1);
        assert_eq!(state.last_move(), Some(mv("b2e2")));
        assert!(state.fen().contains(" b "));
    }

    #[test]
    fn test_select_errors() {
        let mut state = GameState::default();
        assert_eq!(state.select(sq("e4")), Err(PlayError::NoPieceSelected(sq("e4"))));
        assert_eq!(state.select(sq("b7")), Err(PlayError::NotYourTurn(Color::Red)));
        assert_eq!(
            state.play_selected(sq("e2")),
            Err(PlayError::NoPieceSelected(sq("e2")))
        );
    }

    #[test]
    fn test_play_rejects_wrong_side_and_illegal() {
        let mut state = GameState::default();
        assert_eq!(state.play(mv("h7e7")), Err(PlayError::NotYourTurn(Color::Red)));
        assert!(matches!(state.play(mv("a0a5")), Err(PlayError::Move(_))));
        assert!(matches!(state.play(mv("e4e5")), Err(PlayError::Move(_))));
        assert_eq!(state.ply(), 0);
    }

    #[test]
    fn test_turn_lock_while_awaiting_suggestion() {
        let mut state = GameState::default();
        let request = state.begin_suggestion(Difficulty::Easy).unwrap();
        assert_eq!(request.side, Color::Red);
        assert_eq!(request.fen, START_FEN);
        assert_eq!(request.legal_moves.len(), 44);

        assert!(state.is_awaiting_suggestion());
        assert_eq!(state.play(mv("b2e2")), Err(PlayError::AwaitingSuggestion));
        assert_eq!(state.select(sq("b2")), Err(PlayError::AwaitingSuggestion));
        assert_eq!(
            state.begin_suggestion(Difficulty::Easy),
            Err(PlayError::AwaitingSuggestion)
        );

        let applied = state.end_suggestion(Some(mv("h2e2"))).unwrap().unwrap();
        assert_eq!(applied.captured, None);
        assert!(!state.is_awaiting_suggestion());
        assert_eq!(state.side_to_move(), Color::Black);
    }

    #[test]
    fn test_end_suggestion_without_move_releases_lock() {
        let mut state = GameState::default();
        state.begin_suggestion(Difficulty::Medium).unwrap();
        assert_eq!(state.end_suggestion(None), Ok(None));
        assert!(state.play(mv("b2e2")).is_ok());
    }

    #[test]
    fn test_checkmate_result() {
        // 紅車 a9 の王手。e8 は車 b8、f9 は車 a9、d9 は車 a9 と紅将 d0 の対面で塞がれる。
        let mut state =
            GameState::from_fen("4k4/1R7/R8/9/9/9/9/9/9/3K5 w - - 0 1", DrawLimits::default())
                .unwrap();
        state.play(mv("a7a9")).unwrap();
        assert_eq!(state.status(), GameStatus::Checkmate);
        assert_eq!(
            state.result(),
            Some(GameResult {
                outcome: GameOutcome::RedWin,
                reason: EndReason::Checkmate,
                plies: 1,
            })
        );
        assert_eq!(state.select(sq("e9")), Err(PlayError::GameOver));
    }

    #[test]
    fn test_terminal_position_from_fen() {
        let state = GameState::from_fen("R3k4/1R7/9/9/9/9/9/9/9/3K5 b - - 0 1", DrawLimits::default())
            .unwrap();
        let result = state.result().unwrap();
        assert_eq!(result.outcome, GameOutcome::RedWin);
        assert_eq!(result.reason, EndReason::Checkmate);
        assert_eq!(result.plies, 0);
        assert!(state.legal_moves().is_empty());

        let mut state = state;
        assert_eq!(state.play(mv("e9e8")), Err(PlayError::GameOver));
    }

    #[test]
    fn test_invalid_fen() {
        assert!(matches!(
            GameState::from_fen("9/9 w", DrawLimits::default()),
            Err(PlayError::Fen(_))
        ));
    }

    #[test]
    fn test_quiet_ply_limit_draw() {
        let limits = DrawLimits {
            max_plies: 300,
            quiet_ply_limit: 4,
        };
        let mut state =
            GameState::from_fen("3k5/9/9/9/9/9/9/9/R8/4K4 w - - 0 1", limits).unwrap();
        for text in ["a1a2", "d9d8", "a2a1"] {
            state.play(mv(text)).unwrap();
            assert_eq!(state.result(), None);
        }
        state.play(mv("d8d9")).unwrap();
        let result = state.result().unwrap();
        assert_eq!(result.outcome, GameOutcome::Draw);
        assert_eq!(result.reason, EndReason::QuietPlies);
        assert_eq!(result.plies, 4);
    }

    #[test]
    fn test_capture_resets_quiet_counter() {
        let limits = DrawLimits {
            max_plies: 300,
            quiet_ply_limit: 2,
        };
        let mut state =
            GameState::from_fen("3k5/9/9/9/9/9/9/p8/R8/4K4 w - - 0 1", limits).unwrap();
        let applied = state.play(mv("a1a2")).unwrap();
        assert!(applied.captured.is_some());
        assert_eq!(state.captured().len(), 1);
        state.play(mv("d9d8")).unwrap();
        assert_eq!(state.result(), None);
        state.play(mv("a2a3")).unwrap();
        assert_eq!(state.result().map(|r| r.reason), Some(EndReason::QuietPlies));
    }

    #[test]
    fn test_max_plies_draw() {
        let limits = DrawLimits {
            max_plies: 2,
            quiet_ply_limit: 0,
        };
        let mut state = GameState::new(limits);
        state.play(mv("b2e2")).unwrap();
        state.play(mv("h9g7")).unwrap();
        assert_eq!(
            state.result(),
            Some(GameResult {
                outcome: GameOutcome::Draw,
                reason: EndReason::MaxPlies,
                plies: 2,
            })
        );
    }

    #[test]
    fn test_insufficient_material_draw_after_capture() {
        // 紅車が最後の黒卒を取ると、黒には攻め駒がなく紅には車が残るので対局は続く
        let mut state =
            GameState::from_fen("3k5/9/9/9/9/9/9/p8/R8/4K4 w - - 0 1", DrawLimits::default())
                .unwrap();
        state.play(mv("a1a2")).unwrap();
        assert_eq!(state.result(), None);

        // 攻め駒が互いにない局面は開始時点で引き分け
        let state =
            GameState::from_fen("3ak4/9/9/9/9/9/9/9/4A4/3K5 w - - 0 1", DrawLimits::default())
                .unwrap();
        assert_eq!(
            state.result().map(|r| (r.outcome, r.reason)),
            Some((GameOutcome::Draw, EndReason::InsufficientMaterial))
        );
    }
}
