use std::fmt;

use shared::constants::{MAX_GUESSES, UNKNOWN_WORD_ERROR};
use shared::shared_word_game::{evaluate_guess, Hints, IssuedWordResponse, KeyboardState, LetterTile};
use shared::validation::{is_letter_key, validate_guess};
use shared::word_bank::Dictionary;
use validator::ValidationError;

use super::hints::HintReveal;
use super::share::share_text;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundState {
    Loading,
    Playing,
    Won,
    Lost,
}

impl RoundState {
    pub fn is_over(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Letter(char),
    Backspace,
    Enter,
}

impl Key {
    /// Maps a key name as a keyboard reports it ("Enter", "Backspace", "q").
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Enter" => Some(Self::Enter),
            "Backspace" => Some(Self::Backspace),
            _ if is_letter_key(raw) => raw.chars().next().map(|c| Self::Letter(c.to_ascii_uppercase())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GuessRow {
    pub word: String,
    pub tiles: Vec<LetterTile>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundOutcome {
    pub won: bool,
    pub attempts: u32,
    pub hints_used: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum KeyOutcome {
    Ignored,
    Edited,
    Accepted(GuessRow),
    Finished(RoundOutcome),
}

/// Why a submitted guess was refused. The typed input is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuessRejected {
    WrongLength { expected: usize },
    UnknownWord(String),
}

impl GuessRejected {
    fn from_validation(err: &ValidationError, guess: &str, expected: usize) -> Self {
        if err.code == "wrong_length" {
            Self::WrongLength { expected }
        } else {
            Self::UnknownWord(guess.to_string())
        }
    }
}

impl fmt::Display for GuessRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongLength { expected } => write!(f, "Word must be {} letters", expected),
            Self::UnknownWord(_) => write!(f, "{}", UNKNOWN_WORD_ERROR),
        }
    }
}

/// One round of the game: `Loading -> Playing -> Won | Lost`.
#[derive(Debug, Clone)]
pub struct GameController {
    state: RoundState,
    answer: String,
    hints: Hints,
    rows: Vec<GuessRow>,
    current: String,
    keyboard: KeyboardState,
    hint_reveal: HintReveal,
}

impl Default for GameController {
    fn default() -> Self {
        Self::new()
    }
}

impl GameController {
    pub fn new() -> Self {
        Self {
            state: RoundState::Loading,
            answer: String::new(),
            hints: Hints::default(),
            rows: Vec::with_capacity(MAX_GUESSES),
            current: String::new(),
            keyboard: KeyboardState::new(),
            hint_reveal: HintReveal::new(),
        }
    }

    /// Back to `Loading` while the next word is fetched. Returns the state to
    /// fall back to if the fetch fails.
    pub fn begin_loading(&mut self) -> RoundState {
        std::mem::replace(&mut self.state, RoundState::Loading)
    }

    /// Restores the board that was showing before a failed fetch.
    pub fn cancel_loading(&mut self, previous: RoundState) {
        if self.state == RoundState::Loading {
            self.state = previous;
        }
    }

    pub fn start_round(&mut self, issued: &IssuedWordResponse) {
        self.answer = issued.word.trim().to_ascii_uppercase();
        self.hints = issued.hints.clone();
        self.rows.clear();
        self.current.clear();
        self.keyboard.clear();
        self.hint_reveal = HintReveal::new();
        self.state = RoundState::Playing;
    }

    pub fn press<D: Dictionary + ?Sized>(
        &mut self,
        key: Key,
        dictionary: &D,
    ) -> Result<KeyOutcome, GuessRejected> {
        if self.state != RoundState::Playing {
            return Ok(KeyOutcome::Ignored);
        }

        match key {
            Key::Letter(c) => {
                if !c.is_ascii_alphabetic() || self.current.chars().count() >= self.answer_len() {
                    return Ok(KeyOutcome::Ignored);
                }
                self.current.push(c.to_ascii_uppercase());
                Ok(KeyOutcome::Edited)
            }
            Key::Backspace => Ok(match self.current.pop() {
                Some(_) => KeyOutcome::Edited,
                None => KeyOutcome::Ignored,
            }),
            Key::Enter => self.submit(dictionary),
        }
    }

    fn submit<D: Dictionary + ?Sized>(&mut self, dictionary: &D) -> Result<KeyOutcome, GuessRejected> {
        let expected = self.answer_len();
        validate_guess(&self.current, expected, dictionary)
            .map_err(|e| GuessRejected::from_validation(&e, &self.current, expected))?;

        let guess = std::mem::take(&mut self.current);
        let tiles = evaluate_guess(&self.answer, &guess)
            .ok_or(GuessRejected::WrongLength { expected })?;
        self.keyboard.record(&tiles);
        let row = GuessRow { word: guess, tiles };
        let solved = row.word == self.answer;
        self.rows.push(row.clone());

        if solved {
            self.state = RoundState::Won;
        } else if self.rows.len() >= MAX_GUESSES {
            self.state = RoundState::Lost;
        }

        Ok(match self.outcome() {
            Some(outcome) => KeyOutcome::Finished(outcome),
            None => KeyOutcome::Accepted(row),
        })
    }

    /// Reveals the next hint tier while the round is being played.
    pub fn reveal_hint(&mut self) -> Option<&str> {
        if self.state != RoundState::Playing {
            return None;
        }
        let level = self.hint_reveal.reveal_next()?;
        self.hints.tier(level)
    }

    pub fn visible_hints(&self) -> Vec<&str> {
        self.hint_reveal.visible(&self.hints)
    }

    pub fn outcome(&self) -> Option<RoundOutcome> {
        if !self.state.is_over() {
            return None;
        }
        Some(RoundOutcome {
            won: self.state == RoundState::Won,
            attempts: self.rows.len() as u32,
            hints_used: self.hint_reveal.used(),
        })
    }

    /// Shareable result, only once the round is over.
    pub fn share_text(&self, play_link: &str) -> Option<String> {
        self.state.is_over().then(|| share_text(&self.rows, play_link))
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    /// The answer, for the end-of-round message. Empty before the first round.
    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn answer_len(&self) -> usize {
        self.answer.chars().count()
    }

    pub fn rows(&self) -> &[GuessRow] {
        &self.rows
    }

    pub fn current_input(&self) -> &str {
        &self.current
    }

    pub fn keyboard(&self) -> &KeyboardState {
        &self.keyboard
    }

    pub fn hints_used(&self) -> u32 {
        self.hint_reveal.used()
    }
}
