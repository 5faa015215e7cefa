//! seminar-console library interface
//!
//! Exposes the application state and router for the binary and for
//! integration tests.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod workflow;

pub use crate::error::{ApiError, ApiResult};

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ConsoleConfig;
use crate::services::{FaceVerifier, OAuth2Client, TtsJobQueue};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Shared database connection pool
    pub db: SqlitePool,
    /// Startup-time configuration, never re-read afterwards
    pub config: Arc<ConsoleConfig>,
    /// Identity provider client
    pub oauth: Arc<OAuth2Client>,
    /// Face verification gate
    pub verifier: Arc<FaceVerifier>,
    /// TTS job queue
    pub jobs: Arc<dyn TtsJobQueue>,
    /// Plain HTTP client for non-identity upstream calls
    pub http: reqwest::Client,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        db: SqlitePool,
        config: Arc<ConsoleConfig>,
        oauth: Arc<OAuth2Client>,
        verifier: Arc<FaceVerifier>,
        jobs: Arc<dyn TtsJobQueue>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            db,
            config,
            oauth,
            verifier,
            jobs,
            http,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
///
/// Session middleware wraps every resource route; login endpoints, health
/// and the worker callback stay outside it.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;

    let protected = Router::new()
        .merge(api::user_routes())
        .merge(api::seminar_routes())
        .merge(api::avatar_routes())
        .merge(api::speaker_routes())
        .merge(api::voice_routes())
        .merge(api::generation_order_routes())
        .merge(api::tts_order_routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth::session_middleware,
        ));

    let public = Router::new()
        .merge(api::health_routes())
        .merge(api::oauth_routes())
        .merge(api::tts_orders::callback_routes());

    let mut router = Router::new()
        .merge(protected)
        .merge(public)
        .layer(TraceLayer::new_for_http());

    let origins: Vec<HeaderValue> = state
        .config
        .server
        .cors_allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    if !origins.is_empty() {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_credentials(true)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE]),
        );
    }

    router.with_state(state)
}
