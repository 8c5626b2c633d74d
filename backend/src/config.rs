use std::env;
use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;

use shared::word_bank::{WordBank, WordBankError};
use tracing::{info, warn};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5001;
pub const DEFAULT_ANALYTICS_LOG: &str = "analytics.log";
pub const DEFAULT_INVALID_WORDS_LOG: &str = "invalid_words.log";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub word_bank_path: Option<PathBuf>,
    pub analytics_log_path: PathBuf,
    pub invalid_words_log_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!("Ignoring invalid PORT {:?}, using {}", raw, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        Self {
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            word_bank_path: lookup("WORD_BANK_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            analytics_log_path: lookup("ANALYTICS_LOG_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ANALYTICS_LOG)),
            invalid_words_log_path: lookup("INVALID_WORDS_LOG_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_INVALID_WORDS_LOG)),
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    pub fn load_word_bank(&self) -> Result<WordBank, WordBankError> {
        match &self.word_bank_path {
            Some(path) => {
                info!("Loading word bank from {}", path.display());
                WordBank::from_file(path)
            }
            None => WordBank::embedded(),
        }
    }
}
