//! Weighted word selection. Every pick halves a word's chance of coming
//! back soon; once the whole list is spent it is refilled.

use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::debug;

use crate::models::WordEntry;

pub const INITIAL_WEIGHT: f64 = 1.0;
pub const WEIGHT_DECAY: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectError {
    EmptyWordList,
}

impl fmt::Display for SelectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyWordList => write!(f, "Cannot select from an empty word list"),
        }
    }
}

impl std::error::Error for SelectError {}

/// Refills every weight when all of them are spent. Returns whether a reset happened.
pub fn reset_exhausted_weights(words: &mut [WordEntry]) -> bool {
    if words.is_empty() || words.iter().any(|entry| entry.weight > 0.0) {
        return false;
    }
    for entry in words.iter_mut() {
        entry.weight = INITIAL_WEIGHT;
    }
    true
}

/// Walks `weights` subtracting each one from `draw` until the draw falls
/// inside an entry. Falls back to the last index when rounding leaves the
/// draw past the end.
pub fn weighted_index(weights: &[f64], draw: f64) -> Option<usize> {
    if weights.is_empty() {
        return None;
    }
    let mut remaining = draw;
    for (i, &weight) in weights.iter().enumerate() {
        if remaining < weight {
            return Some(i);
        }
        remaining -= weight;
    }
    Some(weights.len() - 1)
}

pub fn decay(entry: &mut WordEntry, now: DateTime<Utc>) {
    entry.weight = (entry.weight - WEIGHT_DECAY).max(0.0);
    entry.last_played = Some(now);
}

/// Picks an entry by weight and decays it in place, returning its position.
pub fn select_word<R: Rng + ?Sized>(
    words: &mut [WordEntry],
    rng: &mut R,
    now: DateTime<Utc>,
) -> Result<usize, SelectError> {
    if words.is_empty() {
        return Err(SelectError::EmptyWordList);
    }

    if reset_exhausted_weights(words) {
        debug!("All {} word weights exhausted, refilled the pool", words.len());
    }

    let weights: Vec<f64> = words.iter().map(|entry| entry.weight).collect();
    let total: f64 = weights.iter().sum();
    let draw = rng.gen::<f64>() * total;
    let index = weighted_index(&weights, draw).ok_or(SelectError::EmptyWordList)?;

    decay(&mut words[index], now);
    Ok(index)
}
