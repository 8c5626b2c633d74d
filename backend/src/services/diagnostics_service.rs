use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{error, info};

/// Append-only flat files for client analytics events and rejected guesses.
pub struct DiagnosticsLog {
    analytics_path: PathBuf,
    invalid_words_path: PathBuf,
    // Words already written to the invalid-words log
    invalid_words: Mutex<BTreeSet<String>>,
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

async fn append_line(path: &Path, line: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path).await?;
    file.write_all(line.as_bytes()).await?;
    file.flush().await
}

/// Extracts the word from a `"<timestamp> - <word>"` line.
fn parse_invalid_word_line(line: &str) -> Option<&str> {
    line.split_once(" - ")
        .map(|(_, word)| word.trim())
        .filter(|word| !word.is_empty())
}

impl DiagnosticsLog {
    pub fn new(analytics_path: PathBuf, invalid_words_path: PathBuf) -> Self {
        Self {
            analytics_path,
            invalid_words_path,
            invalid_words: Mutex::new(BTreeSet::new()),
        }
    }

    /// Write failures are logged and swallowed.
    pub async fn log_event(&self, event: &serde_json::Value) {
        let entry = format!("{} - {}\n", timestamp(), event);
        if let Err(e) = append_line(&self.analytics_path, &entry).await {
            error!("Error logging analytics event: {}", e);
        }
    }

    pub async fn log_invalid_word(&self, word: &str) {
        let word = word.trim();
        if word.is_empty() {
            return;
        }

        let mut cache = self.invalid_words.lock().await;
        if cache.contains(word) {
            return;
        }

        let entry = format!("{} - {}\n", timestamp(), word);
        match append_line(&self.invalid_words_path, &entry).await {
            Ok(()) => {
                cache.insert(word.to_string());
                info!("Invalid word logged: {}", word);
            }
            Err(e) => error!("Error logging invalid word {}: {}", word, e),
        }
    }

    /// Every word logged so far. An empty cache is rebuilt from the log file.
    pub async fn invalid_words(&self) -> io::Result<Vec<String>> {
        let mut cache = self.invalid_words.lock().await;
        if cache.is_empty() {
            match fs::read_to_string(&self.invalid_words_path).await {
                Ok(content) => {
                    cache.extend(
                        content
                            .lines()
                            .filter_map(parse_invalid_word_line)
                            .map(str::to_string),
                    );
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e),
            }
        }
        Ok(cache.iter().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_paths(tag: &str) -> (PathBuf, PathBuf) {
        let dir = std::env::temp_dir().join(format!(
            "geowordle-diagnostics-{}-{}",
            tag,
            uuid::Uuid::new_v4().simple()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        (dir.join("analytics.log"), dir.join("invalid_words.log"))
    }

    #[test]
    fn test_parse_invalid_word_line() {
        assert_eq!(parse_invalid_word_line("2024-01-01T00:00:00.000Z - ATLANTIS"), Some("ATLANTIS"));
        assert_eq!(parse_invalid_word_line("garbage"), None);
        assert_eq!(parse_invalid_word_line("2024 - "), None);
    }

    #[tokio::test]
    async fn test_invalid_words_are_deduplicated() {
        let (analytics, invalid) = temp_paths("dedup");
        let log = DiagnosticsLog::new(analytics, invalid.clone());
        log.log_invalid_word("ATLANTIS").await;
        log.log_invalid_word("ATLANTIS").await;
        log.log_invalid_word("ELDORADO").await;

        let content = std::fs::read_to_string(&invalid).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert_eq!(log.invalid_words().await.unwrap(), vec!["ATLANTIS", "ELDORADO"]);
    }

    #[tokio::test]
    async fn test_cache_is_rebuilt_from_file() {
        let (analytics, invalid) = temp_paths("rebuild");
        std::fs::write(&invalid, "2024-05-01T10:00:00.000Z - SHANGRILA\n\n2024-05-01T10:00:01.000Z - AVALON\n").unwrap();
        let log = DiagnosticsLog::new(analytics, invalid);
        assert_eq!(log.invalid_words().await.unwrap(), vec!["AVALON", "SHANGRILA"]);
    }

    #[tokio::test]
    async fn test_missing_log_file_is_empty() {
        let (analytics, invalid) = temp_paths("missing");
        let log = DiagnosticsLog::new(analytics, invalid);
        assert!(log.invalid_words().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_events_are_appended() {
        let (analytics, invalid) = temp_paths("events");
        let log = DiagnosticsLog::new(analytics.clone(), invalid);
        log.log_event(&serde_json::json!({ "name": "game_start" })).await;
        log.log_event(&serde_json::json!({ "name": "guess_made", "value": 3 })).await;

        let content = std::fs::read_to_string(&analytics).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(r#" - {"name":"game_start"}"#));
        assert!(lines[1].contains("guess_made"));
    }
}
