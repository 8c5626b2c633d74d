use std::env;
use std::path::PathBuf;

use shared::constants::DEFAULT_PLAY_LINK;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5001";
pub const DEFAULT_STATE_PATH: &str = ".geowordle.json";

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub fn get_api_base_url() -> String {
    non_empty_var("GEOWORDLE_API_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
}

/// File backing the local key-value storage.
pub fn get_state_path() -> PathBuf {
    non_empty_var("GEOWORDLE_STATE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_PATH))
}

pub fn get_play_link() -> String {
    non_empty_var("GEOWORDLE_PLAY_LINK").unwrap_or_else(|| DEFAULT_PLAY_LINK.to_string())
}
