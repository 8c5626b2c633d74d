use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use shared::word_bank::WordBank;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{error, info, Level};

use crate::config::Config;
use crate::games::backend_word_game::create_router as create_word_game_router;
use crate::handlers::{create_diagnostics_router, health_check};
use crate::services::diagnostics_service::DiagnosticsLog;
use crate::services::progress_store::{InMemoryProgressStore, ProgressStore};

mod config;
mod error;
mod games;
mod handlers;
mod logging;
mod models;
mod services;

#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn ProgressStore>,
    diagnostics: Arc<DiagnosticsLog>,
}

impl AppState {
    pub fn new(bank: WordBank, config: &Config) -> Self {
        Self {
            store: Arc::new(InMemoryProgressStore::new(Arc::new(bank))),
            diagnostics: Arc::new(DiagnosticsLog::new(
                config.analytics_log_path.clone(),
                config.invalid_words_log_path.clone(),
            )),
        }
    }
}

pub fn app(state: AppState) -> Router {
    let api_routes = create_word_game_router().merge(create_diagnostics_router());

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(health_check))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    if let Err(e) = logging::setup() {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    let config = Config::from_env();

    // A server without words cannot answer anything
    let bank = match config.load_word_bank() {
        Ok(bank) => bank,
        Err(e) => {
            error!("Failed to load word bank: {}", e);
            std::process::exit(1);
        }
    };
    info!("📚 Loaded {} words", bank.len());

    let addr = config.socket_addr()?;
    let state = AppState::new(bank, &config);

    let listener = TcpListener::bind(addr).await.map_err(|e| {
        error!("Failed to bind {}: {}", addr, e);
        e
    })?;
    info!("🚀 Server running on {}", addr);

    axum::serve(listener, app(state)).await?;
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;
    use tracing::{Event, Subscriber};
    use tracing_subscriber::layer::Context;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{EnvFilter, Layer, Registry};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<(String, Level)>>>);

    impl<S: Subscriber> Layer<S> for Captured {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let metadata = event.metadata();
            self.0
                .lock()
                .unwrap()
                .push((metadata.target().to_string(), *metadata.level()));
        }
    }

    #[tokio::test]
    async fn test_requests_are_traced_under_default_filter() {
        let captured = Captured::default();
        let subscriber = Registry::default()
            .with(EnvFilter::new(logging::DEFAULT_FILTER))
            .with(captured.clone());
        let _guard = tracing::subscriber::set_default(subscriber);

        let response = app(test_support::test_state())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let events = captured.0.lock().unwrap().clone();
        assert!(events
            .iter()
            .any(|(target, level)| target.starts_with("tower_http") && *level == Level::INFO));
    }

    #[tokio::test]
    async fn test_routes_are_mounted_under_api() {
        let app = app(test_support::test_state());

        let response = app
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(Request::get("/api/get-word").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(Request::get("/api/invalid-words").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
