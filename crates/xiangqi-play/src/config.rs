//! 対局設定（TOML）
//!
//! ```toml
//! red = "human"
//! black = "process"
//! difficulty = "hard"
//! think_delay_ms = 500
//! suggestion_timeout_ms = 5000
//! max_plies = 300
//! quiet_ply_limit = 100
//! seed = 42
//! start_fen = "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR w - - 0 1"
//!
//! [engine]
//! path = "./xiangqi-ai"
//! args = ["--json"]
//! ```
//!
//! すべての項目は省略できる。

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use xiangqi_core::Color;

use crate::error::ConfigError;
use crate::state::DrawLimits;
use crate::suggest::{Difficulty, ProcessConfig, SuggestionPolicy};

/// 席に着くプレイヤーの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerKind {
    /// 標準入力から指す
    Human,
    /// 合法手から乱択する
    Random,
    /// 外部の提案プロセスに問い合わせる
    Process,
}

impl fmt::Display for PlayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PlayerKind::Human => "human",
            PlayerKind::Random => "random",
            PlayerKind::Process => "process",
        })
    }
}

impl std::str::FromStr for PlayerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "human" => Ok(PlayerKind::Human),
            "random" => Ok(PlayerKind::Random),
            "process" => Ok(PlayerKind::Process),
            other => Err(format!("unknown player '{other}' (expected human, random or process)")),
        }
    }
}

/// 提案プロセスの起動設定
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineSection {
    pub path: Option<PathBuf>,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlayConfig {
    pub red: PlayerKind,
    pub black: PlayerKind,
    pub difficulty: Difficulty,
    pub think_delay_ms: u64,
    pub suggestion_timeout_ms: u64,
    pub max_plies: u32,
    /// 駒を取らない手がこの数だけ続いたら引き分け
    pub quiet_ply_limit: u32,
    pub seed: Option<u64>,
    pub start_fen: Option<String>,
    pub engine: EngineSection,
}

impl Default for PlayConfig {
    fn default() -> Self {
        Self {
            red: PlayerKind::Human,
            black: PlayerKind::Random,
            difficulty: Difficulty::Medium,
            think_delay_ms: 500,
            suggestion_timeout_ms: 5000,
            max_plies: 300,
            quiet_ply_limit: 100,
            seed: None,
            start_fen: None,
            engine: EngineSection::default(),
        }
    }
}

impl PlayConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn player(&self, side: Color) -> PlayerKind {
        match side {
            Color::Red => self.red,
            Color::Black => self.black,
        }
    }

    pub fn policy(&self) -> SuggestionPolicy {
        SuggestionPolicy {
            think_delay: Duration::from_millis(self.think_delay_ms),
            timeout: Duration::from_millis(self.suggestion_timeout_ms),
        }
    }

    pub fn limits(&self) -> DrawLimits {
        DrawLimits {
            max_plies: self.max_plies,
            quiet_ply_limit: self.quiet_ply_limit,
        }
    }

    /// `[engine] path` が設定されていれば提案プロセスの起動設定を返す
    pub fn process_config(&self) -> Option<ProcessConfig> {
        let path = self.engine.path.clone()?;
        Some(ProcessConfig {
            path,
            args: self.engine.args.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = PlayConfig::from_toml_str("").unwrap();
        assert_eq!(config, PlayConfig::default());
        assert_eq!(config.policy(), SuggestionPolicy::default());
        assert_eq!(config.limits().quiet_ply_limit, 100);
        assert!(config.process_config().is_none());
    }

    #[test]
    fn test_full_config() {
        let text = r#"
            red = "process"
            black = "human"
            difficulty = "hard"
            think_delay_ms = 0
            suggestion_timeout_ms = 1500
            max_plies = 80
            quiet_ply_limit = 40
            seed = 7
            start_fen = "4k4/9/9/9/9/9/9/9/9/3K5 w - - 0 1"

            [engine]
            path = "/usr/local/bin/xiangqi-ai"
            args = ["--json", "--threads", "2"]
        "#;
        let config = PlayConfig::from_toml_str(text).unwrap();
        assert_eq!(config.player(Color::Red), PlayerKind::Process);
        assert_eq!(config.player(Color::Black), PlayerKind::Human);
        assert_eq!(config.difficulty, Difficulty::Hard);
        assert_eq!(config.policy().timeout, Duration::from_millis(1500));
        assert!(config.policy().think_delay.is_zero());
        assert_eq!(config.limits().max_plies, 80);
        assert_eq!(config.seed, Some(7));

        let process = config.process_config().unwrap();
        assert_eq!(process.path, PathBuf::from("/usr/local/bin/xiangqi-ai"));
        assert_eq!(process.args.len(), 3);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        assert!(matches!(
            PlayConfig::from_toml_str(r#"red = "robot""#),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            PlayConfig::from_toml_str("max_moves = 10"),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_player_kind_parse() {
        assert_eq!("Random".parse::<PlayerKind>(), Ok(PlayerKind::Random));
        assert!("robot".parse::<PlayerKind>().is_err());
    }
}
