//! Shared test harness: in-memory database, fake job queue, seeded users

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{Duration as ChronoDuration, Utc};
use serde_json::Value;
use sqlx::SqlitePool;
use tower::util::ServiceExt; // for `oneshot`
use uuid::Uuid;

use seminar_console::api::auth::hash_password;
use seminar_console::config::ConsoleConfig;
use seminar_console::db;
use seminar_console::models::{
    AvatarMotions, ResourceType, Speaker, SpeakerCovers, User, Voice,
};
use seminar_console::services::{
    DispatchError, FaceVerifier, OAuth2Client, TtsJobMessage, TtsJobQueue,
};
use seminar_console::{build_router, AppState};

/// Job queue fake: records enqueued messages, or fails every enqueue
pub struct RecordingQueue {
    pub sent: Mutex<Vec<TtsJobMessage>>,
    pub fail: bool,
}

#[async_trait]
impl TtsJobQueue for RecordingQueue {
    async fn enqueue(&self, message: &TtsJobMessage) -> Result<(), DispatchError> {
        if self.fail {
            return Err(DispatchError::Unreachable("broker down".to_string()));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub db: SqlitePool,
    pub queue: Arc<RecordingQueue>,
    _media: tempfile::TempDir,
}

#[derive(Default)]
pub struct TestOptions {
    pub worker_secret: String,
    pub failing_queue: bool,
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(TestOptions::default()).await
}

pub async fn spawn_app_with(options: TestOptions) -> TestApp {
    let db = db::connect_memory().await.expect("in-memory database");
    let media = tempfile::tempdir().expect("media dir");

    let mut config = ConsoleConfig::default();
    config.face_verify_enabled = false;
    config.worker_secret = options.worker_secret;
    config.media.root = media.path().to_path_buf();
    config.oauth2.authorize_url = "https://idp.invalid/oauth2/authorize".to_string();
    config.oauth2.user_photo_url = "https://idp.invalid/api/v1/user/photo".to_string();
    let config = Arc::new(config);

    let timeout = Duration::from_secs(2);
    let oauth =
        Arc::new(OAuth2Client::new(config.oauth2.clone(), timeout).expect("identity client"));
    let verifier = Arc::new(
        FaceVerifier::new(false, &config.oauth2, oauth.clone(), timeout).expect("verifier"),
    );
    let queue = Arc::new(RecordingQueue {
        sent: Mutex::new(Vec::new()),
        fail: options.failing_queue,
    });
    let http = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .expect("http client");

    let state = AppState::new(
        db.clone(),
        config,
        oauth,
        verifier,
        queue.clone(),
        http,
    );

    TestApp {
        router: build_router(state),
        db,
        queue,
        _media: media,
    }
}

/// Create a user with a local (never-expiring) session
pub async fn seed_user(db: &SqlitePool, username: &str) -> (User, Uuid) {
    let user = db::users::create_local(db, username, &hash_password("secret"))
        .await
        .expect("seed user");
    let token = db::sessions::create(db, user.id, None, None)
        .await
        .expect("seed session");
    (user, token)
}

/// Create a user with an OAuth2 session whose token expired an hour ago
pub async fn seed_user_expired(db: &SqlitePool, username: &str) -> (User, Uuid) {
    let user = db::users::create_local(db, username, &hash_password("secret"))
        .await
        .expect("seed user");
    let token = db::sessions::create(
        db,
        user.id,
        Some("stale-token"),
        Some(Utc::now() - ChronoDuration::hours(1)),
    )
    .await
    .expect("seed session");
    (user, token)
}

/// Insert a speaker row directly
pub async fn seed_speaker(db: &SqlitePool, owner: Uuid, kind: ResourceType) -> Speaker {
    let speaker = Speaker {
        id: Uuid::new_v4(),
        name: format!("speaker-{}", kind.as_str()),
        description: String::new(),
        avatar: None,
        voice: None,
        owner,
        kind,
        motions: AvatarMotions::default(),
        covers: SpeakerCovers::default(),
    };
    db::speakers::create(db, &speaker).await.expect("seed speaker");
    speaker
}

/// Insert a voice catalog row directly
pub async fn seed_voice(db: &SqlitePool) -> Voice {
    let voice = Voice {
        id: Uuid::new_v4(),
        title: "Narrator".to_string(),
        code: "narrator-1".to_string(),
        description: String::new(),
        sample: String::new(),
    };
    db::voices::create(db, &voice).await.expect("seed voice");
    voice
}

/// GET request, optionally authenticated
pub fn get(uri: &str, session: Option<Uuid>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = session {
        builder = builder.header(header::COOKIE, format!("session_id={}", token));
    }
    builder.body(Body::empty()).unwrap()
}

/// JSON request, optionally authenticated
pub fn json_request(
    method: &str,
    uri: &str,
    session: Option<Uuid>,
    body: Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = session {
        builder = builder.header(header::COOKIE, format!("session_id={}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Fire a request and decode the envelope (Null for empty bodies)
pub async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

/// Fire a request and return the raw response (for non-JSON bodies)
pub async fn send_raw(
    app: &TestApp,
    request: Request<Body>,
) -> axum::http::Response<axum::body::Body> {
    app.router.clone().oneshot(request).await.unwrap()
}

/// Pull a uuid out of an envelope field
pub fn uuid_field(value: &Value) -> Uuid {
    Uuid::parse_str(value.as_str().expect("uuid string")).expect("valid uuid")
}
