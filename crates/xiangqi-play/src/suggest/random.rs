//! 合法手から一様に選ぶ提案者

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use rand::prelude::IndexedRandom;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use xiangqi_core::Move;

use super::{MoveSuggester, SuggestionRequest};
use crate::error::SuggestError;

pub struct RandomSuggester {
    rng: Mutex<Xoshiro256PlusPlus>,
}

impl RandomSuggester {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(Xoshiro256PlusPlus::seed_from_u64(seed)),
        }
    }

    /// ロックが poison されていても PRNG の状態はそのまま使える
    fn lock_rng(&self) -> MutexGuard<'_, Xoshiro256PlusPlus> {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl MoveSuggester for RandomSuggester {
    fn label(&self) -> &str {
        "random"
    }

    async fn suggest(&self, request: &SuggestionRequest) -> Result<Option<Move>, SuggestError> {
        let mut rng = self.lock_rng();
        Ok(request.legal_moves.choose(&mut *rng).copied())
    }
}
