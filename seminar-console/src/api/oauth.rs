//! Login endpoints: OAuth2 redirect flow, local login, logout
//!
//! The OAuth2 `state` value and the post-login destination ride in
//! short-lived HttpOnly cookies between `/oauth2/login` and
//! `/oauth2/callback`; the session itself is a database row keyed by the
//! cookie token.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Duration, Utc};
use serde::Deserialize;
use uuid::Uuid;

use seminar_common::response::Envelope;

use crate::api::auth::{
    clear_cookie, cookie_value, hash_password, session_cookie, transient_cookie, SESSION_COOKIE,
};
use crate::error::{ApiError, ApiResult};
use crate::models::User;
use crate::{db, AppState};

const STATE_COOKIE: &str = "oauth_state";
const NEXT_COOKIE: &str = "oauth_next";

#[derive(Debug, Deserialize)]
pub struct LoginParams {
    pub next: Option<String>,
}

/// GET /oauth2/login
///
/// Redirects the browser to the provider authorization URL.
pub async fn oauth_login(
    State(state): State<AppState>,
    Query(params): Query<LoginParams>,
) -> ApiResult<Response> {
    let csrf = Uuid::new_v4().simple().to_string();
    let url = state.oauth.authorize_url(&csrf)?;
    let next = params.next.unwrap_or_else(|| "/".to_string());

    Ok((
        AppendHeaders([
            (header::SET_COOKIE, transient_cookie(STATE_COOKIE, &csrf)),
            (header::SET_COOKIE, transient_cookie(NEXT_COOKIE, &next)),
        ]),
        Redirect::to(&url),
    )
        .into_response())
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: String,
    pub state: String,
}

/// GET /oauth2/callback
///
/// Exchanges the authorization code, upserts the local user and opens a
/// session.
pub async fn oauth_callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<CallbackParams>,
) -> ApiResult<Response> {
    let expected = cookie_value(&headers, STATE_COOKIE)
        .ok_or_else(|| ApiError::InvalidArgument("missing oauth state".to_string()))?;
    if expected != params.state {
        return Err(ApiError::InvalidArgument("oauth state mismatch".to_string()));
    }

    let grant = state.oauth.exchange_code(&params.code).await?;
    let profile = state.oauth.fetch_userinfo(&grant.access_token).await?;

    let user = db::users::upsert_from_provider(
        &state.db,
        &profile.username,
        &profile.email,
        &profile.name,
    )
    .await?;
    tracing::info!(username = %user.username, "OAuth2 login");

    let expires_at = Utc::now() + Duration::seconds(grant.expires_in.max(0));
    let token = db::sessions::create(
        &state.db,
        user.id,
        Some(&grant.access_token),
        Some(expires_at),
    )
    .await?;

    let next = cookie_value(&headers, NEXT_COOKIE)
        .unwrap_or_else(|| state.config.session.post_login_redirect.clone());

    Ok((
        AppendHeaders([
            (
                header::SET_COOKIE,
                session_cookie(token, state.config.session.max_age_seconds),
            ),
            (header::SET_COOKIE, clear_cookie(STATE_COOKIE)),
            (header::SET_COOKIE, clear_cookie(NEXT_COOKIE)),
        ]),
        Redirect::to(&next),
    )
        .into_response())
}

#[derive(Debug, Deserialize)]
pub struct LocalLoginRequest {
    pub username: String,
    pub password: String,
}

/// POST /login
///
/// Local account login; sessions created here carry no provider token and
/// never expire via token checks.
pub async fn local_login(
    State(state): State<AppState>,
    Json(request): Json<LocalLoginRequest>,
) -> ApiResult<Response> {
    if request.username.is_empty() || request.password.is_empty() {
        return Err(ApiError::InvalidArgument(
            "username and password are required".to_string(),
        ));
    }

    let stored = db::users::get_password_hash(&state.db, &request.username)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("invalid credentials".to_string()))?;

    if hash_password(&request.password) != stored {
        return Err(ApiError::Unauthorized("invalid credentials".to_string()));
    }

    let user: User = db::users::get_by_username(&state.db, &request.username)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("invalid credentials".to_string()))?;

    let token = db::sessions::create(&state.db, user.id, None, None).await?;
    tracing::info!(username = %user.username, "Local login");

    Ok((
        AppendHeaders([(
            header::SET_COOKIE,
            session_cookie(token, state.config.session.max_age_seconds),
        )]),
        Json(Envelope::ok(user)),
    )
        .into_response())
}

/// GET /logout
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Response> {
    if let Some(token) =
        cookie_value(&headers, SESSION_COOKIE).and_then(|v| Uuid::parse_str(&v).ok())
    {
        db::sessions::delete(&state.db, token).await?;
    }

    Ok((
        AppendHeaders([(header::SET_COOKIE, clear_cookie(SESSION_COOKIE))]),
        Redirect::to(&state.config.session.post_logout_redirect),
    )
        .into_response())
}

/// Build login/logout routes (none require an existing session)
pub fn oauth_routes() -> Router<AppState> {
    Router::new()
        .route("/oauth2/login", get(oauth_login))
        .route("/oauth2/callback", get(oauth_callback))
        .route("/login", post(local_login))
        .route("/logout", get(logout))
}
