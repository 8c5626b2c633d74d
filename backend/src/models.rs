use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::shared_word_game::Hints;
use shared::word_bank::{BankWord, WordBank};

/// A user's weighted copy of one bank entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordEntry {
    pub word: String,
    pub hints: Hints,
    pub weight: f64,
    pub last_played: Option<DateTime<Utc>>,
    // Position of the entry in the shared bank
    pub index: usize,
}

impl WordEntry {
    pub fn from_bank(index: usize, entry: &BankWord) -> Self {
        Self {
            word: entry.word.clone(),
            hints: entry.hints(),
            weight: 1.0,
            last_played: None,
            index,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PlayStats {
    pub streak: u32,
    pub total_played: u32,
    pub hints_used: u32,
}

impl PlayStats {
    /// Applies one finished round. A loss breaks the streak.
    pub fn record(&mut self, won: bool, hints_used: u32) {
        self.total_played = self.total_played.saturating_add(1);
        self.hints_used = self.hints_used.saturating_add(hints_used);
        if won {
            self.streak = self.streak.saturating_add(1);
        } else {
            self.streak = 0;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProgress {
    pub words: Vec<WordEntry>,
    pub stats: PlayStats,
}

impl UserProgress {
    pub fn new(bank: &WordBank) -> Self {
        Self {
            words: bank
                .words()
                .iter()
                .enumerate()
                .map(|(index, entry)| WordEntry::from_bank(index, entry))
                .collect(),
            stats: PlayStats::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_progress_copies_bank_with_indices() {
        let bank = WordBank::embedded().unwrap();
        let progress = UserProgress::new(&bank);
        assert_eq!(progress.words.len(), bank.len());
        for (i, entry) in progress.words.iter().enumerate() {
            assert_eq!(entry.index, i);
            assert_eq!(entry.weight, 1.0);
            assert!(entry.last_played.is_none());
            assert_eq!(entry.word, bank.words()[i].word);
        }
        assert_eq!(progress.stats, PlayStats::default());
    }

    #[test]
    fn test_streak_sequence() {
        let mut stats = PlayStats::default();
        let streaks: Vec<u32> = [true, true, false, true]
            .into_iter()
            .map(|won| {
                stats.record(won, 1);
                stats.streak
            })
            .collect();
        assert_eq!(streaks, vec![1, 2, 0, 1]);
        assert_eq!(stats.total_played, 4);
        assert_eq!(stats.hints_used, 4);
    }
}
