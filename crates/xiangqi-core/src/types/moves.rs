//! 指し手（Move）

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::Square;

/// 指し手
///
/// 象棋には成りも駒打ちもないため、移動元と移動先だけで表現できる。
/// 取った駒の情報は持たない（適用時に `Applied` が返す）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    #[inline]
    pub const fn new(from: Square, to: Square) -> Move {
        Move { from, to }
    }

    /// ICCS形式（"b2e2"）に変換
    pub fn to_iccs(self) -> String {
        format!("{}{}", self.from, self.to)
    }

    /// ICCS形式からMoveに変換（"b2e2" / "b2-e2"）
    pub fn from_iccs(s: &str) -> Option<Move> {
        let s = s.trim();
        let (from, to) = match s.len() {
            4 => (s.get(0..2)?, s.get(2..4)?),
            5 if s.get(2..3)? == "-" => (s.get(0..2)?, s.get(3..5)?),
            _ => return None,
        };
        Some(Move::new(Square::from_iccs(from)?, Square::from_iccs(to)?))
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

impl std::str::FromStr for Move {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Move::from_iccs(s).ok_or(())
    }
}

impl Serialize for Move {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iccs())
    }
}

impl<'de> Deserialize<'de> for Move {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Move::from_iccs(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid move notation: {s}")))
    }
}
