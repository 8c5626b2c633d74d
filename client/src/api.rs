use std::fmt;

use log::debug;
use serde::de::DeserializeOwned;
use shared::constants::{GET_WORD_ENDPOINT, LOG_INVALID_WORD_ENDPOINT, UPDATE_PROGRESS_ENDPOINT};
use shared::shared_word_game::{
    InvalidWordRequest, IssuedWordResponse, ProgressResponse, UpdateProgressRequest,
};

#[derive(Debug)]
pub enum ApiError {
    Transport(reqwest::Error),
    Status { status: u16, body: String },
    Decode(serde_json::Error),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "Network error: {}", e),
            Self::Status { status, body } => write!(f, "Server returned {}: {}", status, body),
            Self::Decode(e) => write!(f, "Unexpected response body: {}", e),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(e) => Some(e),
            Self::Status { .. } => None,
            Self::Decode(e) => Some(e),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err)
    }
}

/// The progress API as the game sees it.
#[allow(async_fn_in_trait)]
pub trait WordApi {
    async fn get_word(&self, user_id: Option<&str>) -> Result<IssuedWordResponse, ApiError>;
    async fn update_progress(&self, request: &UpdateProgressRequest) -> Result<ProgressResponse, ApiError>;
    async fn log_invalid_word(&self, word: &str) -> Result<(), ApiError>;
}

/// `WordApi` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Status { status: status.as_u16(), body })
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let bytes = Self::check(response).await?.bytes().await?;
        decode_body(&bytes)
    }
}

fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(bytes).map_err(ApiError::Decode)
}

impl WordApi for HttpApi {
    async fn get_word(&self, user_id: Option<&str>) -> Result<IssuedWordResponse, ApiError> {
        let url = self.url(GET_WORD_ENDPOINT);
        debug!("Making request to: {}", url);
        let response = self
            .client
            .get(&url)
            .query(&[("userId", user_id.unwrap_or_default())])
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn update_progress(&self, request: &UpdateProgressRequest) -> Result<ProgressResponse, ApiError> {
        let response = self
            .client
            .post(self.url(UPDATE_PROGRESS_ENDPOINT))
            .json(request)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn log_invalid_word(&self, word: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url(LOG_INVALID_WORD_ENDPOINT))
            .json(&InvalidWordRequest { word: word.to_string() })
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
