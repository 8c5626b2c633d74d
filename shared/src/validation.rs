use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

use crate::word_bank::Dictionary;

static LETTER_KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z]$").expect("valid letter pattern"));

/// True for a single ASCII letter, the only character keys a round accepts.
pub fn is_letter_key(key: &str) -> bool {
    LETTER_KEY.is_match(key)
}

pub fn validate_guess_length(guess: &str, answer_len: usize) -> Result<(), ValidationError> {
    if guess.chars().count() != answer_len {
        let mut err = ValidationError::new("wrong_length");
        err.add_param("expected".into(), &answer_len);
        return Err(err);
    }
    Ok(())
}

/// Checks a submitted guess before it is evaluated: it must be exactly as
/// long as the answer and must be a known place name.
pub fn validate_guess<D: Dictionary + ?Sized>(
    guess: &str,
    answer_len: usize,
    dictionary: &D,
) -> Result<(), ValidationError> {
    validate_guess_length(guess, answer_len)?;
    if !dictionary.contains(guess) {
        let mut err = ValidationError::new("unknown_word");
        err.add_param("word".into(), &guess);
        return Err(err);
    }
    Ok(())
}
