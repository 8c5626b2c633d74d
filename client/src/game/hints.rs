use shared::constants::HINT_TIERS;
use shared::shared_word_game::Hints;

/// Tiered hint reveal for one round. The first hint is free; each further
/// tier counts as a hint used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HintReveal {
    revealed: u32,
    used: u32,
}

impl Default for HintReveal {
    fn default() -> Self {
        Self { revealed: 1, used: 0 }
    }
}

impl HintReveal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reveals the next tier and returns its level, or `None` once all are shown.
    pub fn reveal_next(&mut self) -> Option<u32> {
        if self.revealed >= HINT_TIERS {
            return None;
        }
        self.revealed += 1;
        self.used += 1;
        Some(self.revealed)
    }

    pub fn used(&self) -> u32 {
        self.used
    }

    pub fn visible<'a>(&self, hints: &'a Hints) -> Vec<&'a str> {
        (1..=self.revealed).filter_map(|level| hints.tier(level)).collect()
    }
}
