//! Session authentication middleware
//!
//! Protected routes run behind `session_middleware`: cookie → session row →
//! user, with OAuth2 token expiry checked on every request. Local sessions
//! carry no token and never expire this way.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{Session, User};
use crate::{db, AppState};

/// Session cookie name
pub const SESSION_COOKIE: &str = "session_id";

/// The authenticated caller, injected as a request extension
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub session: Session,
}

/// Extract a named cookie from the Cookie header
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let header = headers.get(header::COOKIE)?.to_str().ok()?;
    for pair in header.split(';') {
        let mut parts = pair.trim().splitn(2, '=');
        match (parts.next(), parts.next()) {
            (Some(k), Some(v)) if k == name => return Some(v.to_string()),
            _ => {}
        }
    }
    None
}

/// Session cookie for a fresh login
pub fn session_cookie(token: Uuid, max_age_seconds: i64) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, token, max_age_seconds
    )
}

/// Short-lived cookie used during the OAuth2 redirect dance
pub fn transient_cookie(name: &str, value: &str) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age=600", name, value)
}

/// Expire a cookie immediately
pub fn clear_cookie(name: &str) -> String {
    format!("{}=; Path=/; HttpOnly; Max-Age=0", name)
}

/// Hex SHA-256 of a local account password
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// Authentication middleware for protected routes
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = cookie_value(request.headers(), SESSION_COOKIE)
        .and_then(|v| Uuid::parse_str(&v).ok())
        .ok_or_else(|| ApiError::Unauthorized("authentication required".to_string()))?;

    let session = db::sessions::get(&state.db, token)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("session not found".to_string()))?;

    if session.is_expired(Utc::now()) {
        return Err(ApiError::Unauthorized("token expired".to_string()));
    }

    let user = db::users::get_by_id(&state.db, session.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("session user no longer exists".to_string()))?;

    request.extensions_mut().insert(CurrentUser { user, session });
    Ok(next.run(request).await)
}
