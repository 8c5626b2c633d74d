use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

// === API types shared by the server and the client ===

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Hints {
    pub hint1: String,
    pub hint2: String,
    pub hint3: String,
}

impl Hints {
    /// Hint text for tier 1..=3.
    pub fn tier(&self, level: u32) -> Option<&str> {
        match level {
            1 => Some(&self.hint1),
            2 => Some(&self.hint2),
            3 => Some(&self.hint3),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IssuedWordResponse {
    // Echoed back, or freshly minted when the request carried none
    pub user_id: String,
    pub word: String,
    pub hints: Hints,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProgressRequest {
    pub user_id: String,
    pub won: bool,
    #[serde(default)]
    pub hints_used: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResponse {
    pub current_streak: u32,
    pub total_words_played: u32,
    pub total_hints_used: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LogEventRequest {
    pub event: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct InvalidWordRequest {
    pub word: String,
}

// === Guess evaluation ===

/// Per-letter verdict. Ordered so that a better verdict compares greater.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LetterStatus {
    Absent,
    Present,
    Correct,
}

impl LetterStatus {
    pub fn emoji(self) -> &'static str {
        match self {
            Self::Correct => "🟩",
            Self::Present => "🟨",
            Self::Absent => "⬛",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct LetterTile {
    pub letter: char,
    pub status: LetterStatus,
}

/// Classifies every position of `guess` against `answer` with the usual
/// Wordle duplicate-letter rules. Both words must have the same length;
/// callers reject mismatched guesses before getting here.
pub fn classify(answer: &str, guess: &str) -> Vec<LetterStatus> {
    let answer: Vec<char> = answer.chars().collect();
    let guess: Vec<char> = guess.chars().collect();
    debug_assert_eq!(answer.len(), guess.len());

    let mut statuses = vec![LetterStatus::Absent; guess.len()];
    // Letters of the answer still available for a "present" marking
    let mut remaining: HashMap<char, usize> = HashMap::new();

    // First pass: exact matches
    for (i, &ch) in guess.iter().enumerate() {
        if answer.get(i) == Some(&ch) {
            statuses[i] = LetterStatus::Correct;
        } else if let Some(&answer_ch) = answer.get(i) {
            *remaining.entry(answer_ch).or_insert(0) += 1;
        }
    }

    // Second pass: misplaced letters, left to right, bounded by what is left
    for (i, &ch) in guess.iter().enumerate() {
        if statuses[i] == LetterStatus::Correct {
            continue;
        }
        if let Some(count) = remaining.get_mut(&ch).filter(|count| **count > 0) {
            *count -= 1;
            statuses[i] = LetterStatus::Present;
        }
    }

    statuses
}

/// Classifies a guess into tiles, or `None` when the lengths differ.
pub fn evaluate_guess(answer: &str, guess: &str) -> Option<Vec<LetterTile>> {
    if answer.chars().count() != guess.chars().count() {
        return None;
    }
    Some(
        guess
            .chars()
            .zip(classify(answer, guess))
            .map(|(letter, status)| LetterTile { letter, status })
            .collect(),
    )
}

/// Best verdict seen for each letter during a round.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct KeyboardState {
    letters: BTreeMap<char, LetterStatus>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges a classified row. Letters only ever move towards `Correct`.
    pub fn record(&mut self, tiles: &[LetterTile]) {
        for tile in tiles {
            let letter = tile.letter.to_ascii_uppercase();
            self.letters
                .entry(letter)
                .and_modify(|status| *status = (*status).max(tile.status))
                .or_insert(tile.status);
        }
    }

    pub fn status(&self, letter: char) -> Option<LetterStatus> {
        self.letters.get(&letter.to_ascii_uppercase()).copied()
    }

    pub fn clear(&mut self) {
        self.letters.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, LetterStatus)> + '_ {
        self.letters.iter().map(|(&letter, &status)| (letter, status))
    }
}
