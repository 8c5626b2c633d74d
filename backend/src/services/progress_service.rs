use chrono::{DateTime, Utc};
use rand::Rng;
use shared::shared_word_game::Hints;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::PlayStats;
use crate::services::progress_store::{modify_progress, ProgressStore};
use crate::services::word_selector::{select_word, SelectError};

#[derive(Debug, Clone, PartialEq)]
pub struct IssuedWord {
    pub word: String,
    pub hints: Hints,
    pub index: usize,
}

/// Fresh opaque identifier for a player who arrived without one.
pub fn mint_user_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Draws the user's next word and stores the decayed weights.
pub fn issue_word<S, R>(
    store: &S,
    user_id: &str,
    rng: &mut R,
    now: DateTime<Utc>,
) -> Result<IssuedWord, AppError>
where
    S: ProgressStore + ?Sized,
    R: Rng + ?Sized,
{
    let issued = modify_progress(store, user_id, |progress| {
        let index = select_word(&mut progress.words, rng, now)?;
        let entry = &progress.words[index];
        Ok::<_, SelectError>(IssuedWord {
            word: entry.word.clone(),
            hints: entry.hints.clone(),
            index: entry.index,
        })
    })??;
    Ok(issued)
}

/// Applies a finished round and returns the updated totals.
pub fn record_outcome<S>(
    store: &S,
    user_id: &str,
    won: bool,
    hints_used: u32,
) -> Result<PlayStats, AppError>
where
    S: ProgressStore + ?Sized,
{
    let stats = modify_progress(store, user_id, |progress| {
        progress.stats.record(won, hints_used);
        progress.stats
    })?;

    info!(
        "Round recorded for {}: {} with {} hints, streak now {}",
        user_id,
        if won { "won" } else { "lost" },
        hints_used,
        stats.streak
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::progress_store::InMemoryProgressStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use shared::word_bank::{BankWord, WordBank};
    use std::sync::Arc;

    fn single_word_store() -> InMemoryProgressStore {
        let bank = WordBank::new(vec![BankWord {
            word: "oslo".to_string(),
            hint1: "a".to_string(),
            hint2: "b".to_string(),
            hint3: "c".to_string(),
        }])
        .unwrap();
        InMemoryProgressStore::new(Arc::new(bank))
    }

    #[test]
    fn test_issue_word_persists_decay() {
        let store = single_word_store();
        let mut rng = StdRng::seed_from_u64(5);
        let issued = issue_word(&store, "u1", &mut rng, Utc::now()).unwrap();
        assert_eq!(issued.word, "OSLO");
        assert_eq!(issued.hints.hint1, "a");
        assert_eq!(store.get_or_create("u1").unwrap().words[0].weight, 0.5);

        issue_word(&store, "u1", &mut rng, Utc::now()).unwrap();
        assert_eq!(store.get_or_create("u1").unwrap().words[0].weight, 0.0);
    }

    #[test]
    fn test_record_outcome_sequence() {
        let store = single_word_store();
        let streaks: Vec<u32> = [true, true, false, true]
            .into_iter()
            .map(|won| record_outcome(&store, "u1", won, 2).unwrap().streak)
            .collect();
        assert_eq!(streaks, vec![1, 2, 0, 1]);

        let stats = store.get_or_create("u1").unwrap().stats;
        assert_eq!(stats.total_played, 4);
        assert_eq!(stats.hints_used, 8);
    }

    #[test]
    fn test_outcomes_survive_concurrent_word_draws() {
        let store = Arc::new(single_word_store());
        let rounds = 2_000u32;

        let drawers: Vec<_> = (0..4u64)
            .map(|seed| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    let mut rng = StdRng::seed_from_u64(seed);
                    for _ in 0..rounds {
                        issue_word(store.as_ref(), "shared-user", &mut rng, Utc::now()).unwrap();
                    }
                })
            })
            .collect();
        let recorder = {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                for _ in 0..rounds {
                    record_outcome(store.as_ref(), "shared-user", true, 0).unwrap();
                }
            })
        };

        for handle in drawers {
            handle.join().unwrap();
        }
        recorder.join().unwrap();

        let stats = store.get_or_create("shared-user").unwrap().stats;
        assert_eq!(stats.total_played, rounds);
        assert_eq!(stats.streak, rounds);
    }

    #[test]
    fn test_minted_ids_are_unique_hex() {
        let a = mint_user_id();
        let b = mint_user_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
