//! Current-user endpoints

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

use seminar_common::response::Envelope;

use crate::error::ApiResult;
use crate::services::media;
use crate::{api::CurrentUser, AppState};

/// GET /user/me response payload
#[derive(Debug, Serialize)]
pub struct UserMe {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Relative path to the portrait proxy endpoint
    pub portrait: String,
}

/// GET /user/me
pub async fn me(Extension(current): Extension<CurrentUser>) -> ApiResult<Json<Envelope<UserMe>>> {
    let user = current.user;
    Ok(Json(Envelope::ok(UserMe {
        id: user.id,
        username: user.username,
        email: user.email,
        first_name: user.first_name,
        last_name: user.last_name,
        portrait: "./portrait".to_string(),
    })))
}

/// GET /user/me/portrait
///
/// Proxies the provider photo; any failure (no token, provider error,
/// timeout) falls back to a generated placeholder rather than surfacing a
/// transport error.
pub async fn portrait(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Response {
    if let Some(token) = &current.session.access_token {
        match state
            .oauth
            .fetch_user_photo(&current.user.username, token)
            .await
        {
            Ok((bytes, content_type)) if !bytes.is_empty() => {
                return ([(header::CONTENT_TYPE, content_type)], bytes).into_response();
            }
            Ok(_) => {
                tracing::debug!(user = %current.user.username, "Provider returned empty photo");
            }
            Err(e) => {
                tracing::warn!(user = %current.user.username, "Provider photo fetch failed: {}", e);
            }
        }
    }

    let (svg, content_type) = media::placeholder_portrait(&current.user.username);
    ([(header::CONTENT_TYPE, content_type)], svg).into_response()
}

/// Build current-user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user/me", get(me))
        .route("/user/me/portrait", get(portrait))
}
