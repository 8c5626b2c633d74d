use log::{error, info, warn};
use shared::constants::{
    FINISH_ROUND_FIRST, LOAD_GAME_ERROR, LOAD_STATS_ERROR, UPDATE_STATS_ERROR, WIN_MESSAGE,
};
use shared::shared_word_game::UpdateProgressRequest;
use shared::word_bank::GeoDictionary;

use crate::api::WordApi;
use crate::game::{GameController, GuessRejected, Key, KeyOutcome, RoundOutcome, RoundState};
use crate::stats::{SessionStats, StoredStats};
use crate::storage::{Storage, STATS_KEY, USER_ID_KEY, WELCOME_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A short message for the player, the terminal equivalent of a toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Error, message: message.into() }
    }
}

/// Drives rounds against the progress API and keeps local statistics.
pub struct Session<A, S> {
    api: A,
    storage: S,
    dictionary: GeoDictionary,
    controller: GameController,
    user_id: Option<String>,
    stats: StoredStats,
    session_stats: SessionStats,
    play_link: String,
    pending: Vec<Notice>,
}

impl<A: WordApi, S: Storage> Session<A, S> {
    pub fn new(api: A, storage: S, dictionary: GeoDictionary, play_link: impl Into<String>) -> Self {
        let user_id = storage.get_item(USER_ID_KEY).filter(|id| !id.is_empty());
        let mut pending = Vec::new();
        let stats = match storage.get_item(STATS_KEY) {
            None => StoredStats::default(),
            Some(raw) => StoredStats::parse(&raw).unwrap_or_else(|e| {
                warn!("Error loading stats, using default values: {}", e);
                pending.push(Notice::error(LOAD_STATS_ERROR));
                StoredStats::default()
            }),
        };
        Self {
            api,
            storage,
            dictionary,
            controller: GameController::new(),
            user_id,
            stats,
            session_stats: SessionStats::default(),
            play_link: play_link.into(),
            pending,
        }
    }

    /// Notices raised outside of a key press, such as unreadable saved stats.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.pending)
    }

    /// True the first time it is ever called for this storage.
    pub fn take_welcome(&mut self) -> bool {
        if self.storage.get_item(WELCOME_KEY).is_some() {
            return false;
        }
        if let Err(e) = self.storage.set_item(WELCOME_KEY, "true") {
            warn!("Could not remember the welcome screen: {}", e);
        }
        true
    }

    /// Fetches a word and starts a round. On failure the previous board stays.
    /// A round in progress has to be finished first.
    pub async fn next_word(&mut self) -> Result<(), Notice> {
        if self.controller.state() == RoundState::Playing {
            return Err(Notice::error(FINISH_ROUND_FIRST));
        }
        let previous = self.controller.begin_loading();

        let issued = match self.api.get_word(self.user_id.as_deref()).await {
            Ok(issued) => issued,
            Err(e) => {
                error!("Error fetching new word: {}", e);
                self.controller.cancel_loading(previous);
                return Err(Notice::error(LOAD_GAME_ERROR));
            }
        };

        if self.user_id.as_deref() != Some(issued.user_id.as_str()) && !issued.user_id.is_empty() {
            if let Err(e) = self.storage.set_item(USER_ID_KEY, &issued.user_id) {
                warn!("Could not persist user id: {}", e);
            }
            self.user_id = Some(issued.user_id.clone());
        }

        // The answer is always an acceptable guess, even if the local list lacks it
        self.dictionary.insert(&issued.word);
        self.controller.start_round(&issued);
        self.session_stats.words_played += 1;
        info!("New word fetched ({} letters)", self.controller.answer_len());
        Ok(())
    }

    /// Handles one key press and returns whatever the player should be told.
    pub async fn press(&mut self, key: Key) -> Vec<Notice> {
        match self.controller.press(key, &self.dictionary) {
            Ok(KeyOutcome::Finished(outcome)) => self.finish_round(outcome).await,
            Ok(_) => Vec::new(),
            Err(rejected) => {
                if let GuessRejected::UnknownWord(word) = &rejected {
                    if let Err(e) = self.api.log_invalid_word(word).await {
                        warn!("Error logging invalid word {}: {}", word, e);
                    }
                }
                vec![Notice::error(rejected.to_string())]
            }
        }
    }

    /// Submits a whole typed word, replacing any partial input. Lines that are
    /// not exactly one letter per tile are refused before any key is pressed.
    pub async fn submit_line(&mut self, line: &str) -> Vec<Notice> {
        if self.controller.state() != RoundState::Playing {
            return Vec::new();
        }
        let expected = self.controller.answer_len();
        let letters: Vec<Key> = line.chars().filter_map(|c| Key::parse(&c.to_string())).collect();
        if letters.len() != line.chars().count() || letters.len() != expected {
            return vec![Notice::error(GuessRejected::WrongLength { expected }.to_string())];
        }

        while !self.controller.current_input().is_empty() {
            let _ = self.controller.press(Key::Backspace, &self.dictionary);
        }
        for key in letters {
            let _ = self.controller.press(key, &self.dictionary);
        }
        self.press(Key::Enter).await
    }

    /// Reveals the next hint tier, if any remain.
    pub fn reveal_hint(&mut self) -> Option<String> {
        self.controller.reveal_hint().map(str::to_string)
    }

    pub fn share_text(&self) -> Option<String> {
        self.controller.share_text(&self.play_link)
    }

    async fn finish_round(&mut self, outcome: RoundOutcome) -> Vec<Notice> {
        let mut notices = vec![if outcome.won {
            Notice::success(WIN_MESSAGE)
        } else {
            Notice::error(format!("Game over. The word was {}.", self.controller.answer()))
        }];

        let Some(user_id) = self.user_id.clone() else {
            notices.push(Notice::error(UPDATE_STATS_ERROR));
            return notices;
        };

        let request = UpdateProgressRequest {
            user_id,
            won: outcome.won,
            hints_used: outcome.hints_used,
        };
        match self.api.update_progress(&request).await {
            Ok(progress) => {
                self.stats.record_round(outcome.won, outcome.attempts, progress.current_streak);
                self.persist_stats();
                self.session_stats.hints_used += outcome.hints_used;
            }
            Err(e) => {
                error!("Error updating stats: {}", e);
                notices.push(Notice::error(UPDATE_STATS_ERROR));
            }
        }
        notices
    }

    fn persist_stats(&mut self) {
        match serde_json::to_string(&self.stats) {
            Ok(raw) => {
                if let Err(e) = self.storage.set_item(STATS_KEY, &raw) {
                    error!("Error saving stats: {}", e);
                }
            }
            Err(e) => error!("Error encoding stats: {}", e),
        }
    }

    pub fn controller(&self) -> &GameController {
        &self.controller
    }

    pub fn stats(&self) -> &StoredStats {
        &self.stats
    }

    pub fn session_stats(&self) -> SessionStats {
        self.session_stats
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::game::RoundState;
    use crate::storage::MemoryStorage;
    use shared::constants::UNKNOWN_WORD_ERROR;
    use shared::shared_word_game::{Hints, IssuedWordResponse, ProgressResponse};
    use shared::word_bank::WordBank;
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct FakeApi {
        fail_get: Cell<bool>,
        fail_update: Cell<bool>,
        streak: Cell<u32>,
        requested_ids: RefCell<Vec<Option<String>>>,
        updates: RefCell<Vec<UpdateProgressRequest>>,
        invalid_words: RefCell<Vec<String>>,
    }

    fn unavailable() -> ApiError {
        ApiError::Status { status: 503, body: "down".to_string() }
    }

    impl WordApi for FakeApi {
        async fn get_word(&self, user_id: Option<&str>) -> Result<IssuedWordResponse, ApiError> {
            self.requested_ids.borrow_mut().push(user_id.map(str::to_string));
            if self.fail_get.get() {
                return Err(unavailable());
            }
            Ok(IssuedWordResponse {
                user_id: user_id.unwrap_or("minted-id").to_string(),
                word: "paris".to_string(),
                hints: Hints {
                    hint1: "On the Seine".to_string(),
                    hint2: "The Louvre".to_string(),
                    hint3: "Eiffel Tower".to_string(),
                },
            })
        }

        async fn update_progress(&self, request: &UpdateProgressRequest) -> Result<ProgressResponse, ApiError> {
            if self.fail_update.get() {
                return Err(unavailable());
            }
            self.updates.borrow_mut().push(request.clone());
            let streak = if request.won { self.streak.get() + 1 } else { 0 };
            self.streak.set(streak);
            Ok(ProgressResponse {
                current_streak: streak,
                total_words_played: self.updates.borrow().len() as u32,
                total_hints_used: request.hints_used,
            })
        }

        async fn log_invalid_word(&self, word: &str) -> Result<(), ApiError> {
            self.invalid_words.borrow_mut().push(word.to_string());
            Ok(())
        }
    }

    fn session_with(storage: MemoryStorage) -> Session<FakeApi, MemoryStorage> {
        let dictionary = GeoDictionary::new(&WordBank::embedded().unwrap());
        Session::new(FakeApi::default(), storage, dictionary, "https://example.test/")
    }

    async fn submit(session: &mut Session<FakeApi, MemoryStorage>, word: &str) -> Vec<Notice> {
        for c in word.chars() {
            session.press(Key::Letter(c)).await;
        }
        session.press(Key::Enter).await
    }

    #[tokio::test]
    async fn test_minted_id_is_persisted_and_reused() {
        let mut session = session_with(MemoryStorage::new());
        session.next_word().await.unwrap();
        assert_eq!(session.user_id(), Some("minted-id"));
        assert_eq!(session.storage().get_item(USER_ID_KEY).as_deref(), Some("minted-id"));

        submit(&mut session, "paris").await;
        session.next_word().await.unwrap();
        let requested = session.api.requested_ids.borrow().clone();
        assert_eq!(requested, vec![None, Some("minted-id".to_string())]);
        assert_eq!(session.session_stats().words_played, 2);
    }

    #[tokio::test]
    async fn test_won_round_updates_stats() {
        let mut session = session_with(MemoryStorage::new());
        session.next_word().await.unwrap();
        assert_eq!(session.reveal_hint().as_deref(), Some("The Louvre"));

        assert!(submit(&mut session, "spain").await.is_empty());
        let notices = submit(&mut session, "paris").await;
        assert_eq!(notices, vec![Notice::success(WIN_MESSAGE)]);
        assert_eq!(session.controller().state(), RoundState::Won);

        let updates = session.api.updates.borrow().clone();
        assert_eq!(updates.len(), 1);
        assert!(updates[0].won);
        assert_eq!(updates[0].hints_used, 1);
        assert_eq!(updates[0].user_id, "minted-id");

        let stats = session.stats();
        assert_eq!((stats.played, stats.won, stats.streak, stats.max_streak), (1, 1, 1, 1));
        assert_eq!(stats.guesses.get(&2), Some(&1));
        assert_eq!(session.session_stats().hints_used, 1);

        let saved = StoredStats::parse(&session.storage().get_item(STATS_KEY).unwrap()).unwrap();
        assert_eq!(&saved, session.stats());
        assert!(session.share_text().unwrap().starts_with("GeoWordle 2/6"));
    }

    #[tokio::test]
    async fn test_lost_round_resets_streak_keeps_max() {
        let mut session = session_with(MemoryStorage::new());
        session.next_word().await.unwrap();
        submit(&mut session, "paris").await;

        session.next_word().await.unwrap();
        let mut notices = Vec::new();
        for word in ["spain", "china", "italy", "india", "nepal", "malta"] {
            notices = submit(&mut session, word).await;
        }
        assert_eq!(notices, vec![Notice::error("Game over. The word was PARIS.")]);
        assert_eq!(session.controller().state(), RoundState::Lost);

        let stats = session.stats();
        assert_eq!((stats.played, stats.won, stats.streak, stats.max_streak), (2, 1, 0, 1));
        assert_eq!(stats.guesses.get(&6), Some(&1));
    }

    #[tokio::test]
    async fn test_unknown_word_is_reported() {
        let mut session = session_with(MemoryStorage::new());
        session.next_word().await.unwrap();
        let notices = submit(&mut session, "qwert").await;
        assert_eq!(notices, vec![Notice::error(UNKNOWN_WORD_ERROR)]);
        assert_eq!(session.api.invalid_words.borrow().as_slice(), ["QWERT".to_string()]);
        assert_eq!(session.controller().current_input(), "QWERT");
    }

    #[tokio::test]
    async fn test_failed_fetch_is_a_notice() {
        let mut session = session_with(MemoryStorage::new());
        session.api.fail_get.set(true);
        assert_eq!(session.next_word().await, Err(Notice::error(LOAD_GAME_ERROR)));
        assert_eq!(session.controller().state(), RoundState::Loading);
        assert_eq!(session.session_stats().words_played, 0);

        // Manual retry once the server is back
        session.api.fail_get.set(false);
        session.next_word().await.unwrap();
        assert_eq!(session.controller().state(), RoundState::Playing);
    }

    #[tokio::test]
    async fn test_failed_progress_update_leaves_stats() {
        let mut session = session_with(MemoryStorage::new());
        session.next_word().await.unwrap();
        session.api.fail_update.set(true);
        let notices = submit(&mut session, "paris").await;
        assert_eq!(
            notices,
            vec![Notice::success(WIN_MESSAGE), Notice::error(UPDATE_STATS_ERROR)]
        );
        assert_eq!(session.stats(), &StoredStats::default());
    }

    #[tokio::test]
    async fn test_corrupt_stored_stats_are_replaced() {
        let mut storage = MemoryStorage::new();
        storage.set_item(STATS_KEY, "not json").unwrap();
        storage.set_item(USER_ID_KEY, "returning").unwrap();
        let mut session = session_with(storage);
        assert_eq!(session.stats(), &StoredStats::default());
        assert_eq!(session.take_notices(), vec![Notice::error(LOAD_STATS_ERROR)]);
        assert!(session.take_notices().is_empty());

        session.next_word().await.unwrap();
        assert_eq!(session.user_id(), Some("returning"));
    }

    #[tokio::test]
    async fn test_unfinished_round_cannot_be_skipped() {
        let mut session = session_with(MemoryStorage::new());
        session.next_word().await.unwrap();
        submit(&mut session, "spain").await;

        assert_eq!(session.next_word().await, Err(Notice::error(FINISH_ROUND_FIRST)));
        assert_eq!(session.controller().state(), RoundState::Playing);
        assert_eq!(session.controller().rows().len(), 1);
        assert_eq!(session.api.requested_ids.borrow().len(), 1);
        assert_eq!(session.session_stats().words_played, 1);

        submit(&mut session, "paris").await;
        session.next_word().await.unwrap();
        assert_eq!(session.session_stats().words_played, 2);
    }

    #[tokio::test]
    async fn test_line_of_wrong_length_is_refused_whole() {
        let mut session = session_with(MemoryStorage::new());
        session.next_word().await.unwrap();

        let notices = session.submit_line("SPAINX").await;
        assert_eq!(notices, vec![Notice::error("Word must be 5 letters")]);
        assert!(session.controller().rows().is_empty());

        let notices = session.submit_line("SP-IN").await;
        assert_eq!(notices, vec![Notice::error("Word must be 5 letters")]);
        assert!(session.controller().rows().is_empty());

        session.press(Key::Letter('Q')).await;
        assert!(session.submit_line("spain").await.is_empty());
        assert_eq!(session.controller().rows()[0].word, "SPAIN");

        let notices = session.submit_line("paris").await;
        assert_eq!(notices, vec![Notice::success(WIN_MESSAGE)]);
    }

    #[test]
    fn test_welcome_is_shown_once() {
        let mut session = session_with(MemoryStorage::new());
        assert!(session.take_welcome());
        assert!(!session.take_welcome());
    }
}
