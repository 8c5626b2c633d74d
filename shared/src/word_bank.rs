use std::collections::HashSet;
use std::fmt;
#[cfg(not(target_arch = "wasm32"))]
use std::{fs, path::Path};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::shared_word_game::Hints;

/// One entry of the static bank: a place name and its three hint tiers.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BankWord {
    pub word: String,
    pub hint1: String,
    pub hint2: String,
    pub hint3: String,
}

impl BankWord {
    pub fn hints(&self) -> Hints {
        Hints {
            hint1: self.hint1.clone(),
            hint2: self.hint2.clone(),
            hint3: self.hint3.clone(),
        }
    }
}

#[derive(Debug)]
pub enum WordBankError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Empty,
    InvalidWord { index: usize, word: String },
}

impl fmt::Display for WordBankError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "Cannot read word bank: {}", e),
            Self::Parse(e) => write!(f, "Malformed word bank: {}", e),
            Self::Empty => write!(f, "Word bank is empty"),
            Self::InvalidWord { index, word } => {
                write!(f, "Word bank entry {} ({:?}) must contain only letters", index, word)
            }
        }
    }
}

impl std::error::Error for WordBankError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for WordBankError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for WordBankError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

/// Ordered, non-empty list of bank words. Words are normalized to uppercase.
#[derive(Debug, Clone, PartialEq)]
pub struct WordBank {
    words: Vec<BankWord>,
}

impl WordBank {
    pub fn new(words: Vec<BankWord>) -> Result<Self, WordBankError> {
        if words.is_empty() {
            return Err(WordBankError::Empty);
        }

        let mut normalized = Vec::with_capacity(words.len());
        for (index, mut entry) in words.into_iter().enumerate() {
            let word = entry.word.trim().to_ascii_uppercase();
            if word.is_empty() || !word.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(WordBankError::InvalidWord { index, word: entry.word });
            }
            entry.word = word;
            normalized.push(entry);
        }

        Ok(Self { words: normalized })
    }

    pub fn from_json(json: &str) -> Result<Self, WordBankError> {
        let words: Vec<BankWord> = serde_json::from_str(json)?;
        Self::new(words)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_file(path: &Path) -> Result<Self, WordBankError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// The bank compiled into the crate.
    pub fn embedded() -> Result<Self, WordBankError> {
        Self::from_json(include_str!("geo_words.json"))
    }

    pub fn words(&self) -> &[BankWord] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Something that can tell whether a guess is a real word.
pub trait Dictionary {
    fn contains(&self, word: &str) -> bool;
}

// Place names accepted as guesses in addition to the bank itself
static PLACE_NAMES: Lazy<Vec<String>> = Lazy::new(|| {
    include_str!("place_names.txt")
        .lines()
        .map(|line| line.trim().to_ascii_uppercase())
        .filter(|w| !w.is_empty())
        .collect()
});

/// Countries and cities a player may guess.
#[derive(Debug, Clone, Default)]
pub struct GeoDictionary {
    words: HashSet<String>,
}

impl GeoDictionary {
    pub fn new(bank: &WordBank) -> Self {
        let mut words: HashSet<String> = PLACE_NAMES.iter().cloned().collect();
        words.extend(bank.words().iter().map(|entry| entry.word.clone()));
        Self { words }
    }

    pub fn insert(&mut self, word: &str) {
        self.words.insert(word.trim().to_ascii_uppercase());
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Dictionary for GeoDictionary {
    fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.trim().to_ascii_uppercase())
    }
}
