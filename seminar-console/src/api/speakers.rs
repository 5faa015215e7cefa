//! Speaker endpoints
//!
//! POST is the avatar+voice binding flow: the uploaded portrait passes the
//! face gate (unless bypassed by config), becomes a fresh user avatar, and
//! the speaker binds that avatar to the chosen voice.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use base64::Engine;
use serde::Deserialize;
use uuid::Uuid;

use seminar_common::pagination::Page;
use seminar_common::response::{Envelope, PageResults};

use crate::error::{ApiError, ApiResult};
use crate::models::{Avatar, Speaker};
use crate::services::media;
use crate::{api::CurrentUser, db, AppState};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

/// GET /speakers
pub async fn list_speakers(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Envelope<PageResults<Speaker>>>> {
    let page = Page::resolve(params.page, params.size);
    let (count, results) = db::speakers::list_visible(&state.db, current.user.id, &page).await?;
    let (next, previous) = page.links("/speakers", count);

    Ok(Json(Envelope::ok(PageResults {
        count,
        next,
        previous,
        results,
    })))
}

/// GET /speakers/:id
pub async fn get_speaker(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Envelope<Speaker>>> {
    let speaker = db::speakers::get_visible(&state.db, id, current.user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Speaker not exists".to_string()))?;

    Ok(Json(Envelope::ok(speaker)))
}

#[derive(Debug, Deserialize)]
pub struct CreateSpeakerRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub voice: Option<Uuid>,
    /// Base64-encoded portrait photo
    pub portrait: Option<String>,
}

/// POST /speakers
pub async fn create_speaker(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<CreateSpeakerRequest>,
) -> ApiResult<Response> {
    let portrait_b64 = request
        .portrait
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::InvalidArgument("portrait is required".to_string()))?;
    let name = request
        .name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| ApiError::InvalidArgument("name is required".to_string()))?;
    let voice_id = request
        .voice
        .ok_or_else(|| ApiError::InvalidArgument("voice is required".to_string()))?;

    let voice = db::voices::get_by_id(&state.db, voice_id)
        .await?
        .ok_or_else(|| ApiError::InvalidArgument(format!("voice {} not exists", voice_id)))?;

    let portrait_bytes = media::decode_image(&portrait_b64)?;

    if state.verifier.is_enabled() {
        // The reference photo comes through the CALLER's session token; a
        // machine-to-machine token cannot fetch it.
        let access_token = current.session.access_token.as_ref().ok_or_else(|| {
            ApiError::Unauthorized("OAuth2 session required for face verification".to_string())
        })?;

        let (reference, _) = state
            .oauth
            .fetch_user_photo(&current.user.username, access_token)
            .await
            .map_err(|e| {
                tracing::warn!(user = %current.user.username, "Reference photo fetch failed: {}", e);
                ApiError::from(e)
            })?;
        if reference.is_empty() {
            return Err(ApiError::InvalidArgument(
                "user has no reference photo".to_string(),
            ));
        }

        let encoder = base64::engine::general_purpose::STANDARD;
        let verified = state
            .verifier
            .verify(&encoder.encode(&portrait_bytes), &encoder.encode(&reference))
            .await?;
        if !verified {
            return Err(ApiError::InvalidArgument(
                "face verification failed".to_string(),
            ));
        }
    }

    let saved_path = media::save_portrait(
        &state.config.media.root,
        &current.user.username,
        &portrait_bytes,
    )?;

    let short = Uuid::new_v4().simple().to_string();
    let avatar = Avatar::new_user_owned(
        format!("{}-{}", current.user.username, &short[..8]),
        saved_path,
        current.user.id,
    );
    db::avatars::create(&state.db, &avatar).await?;

    let speaker = Speaker::new_user_owned(
        name,
        request.description.unwrap_or_default(),
        avatar.id,
        voice.id,
        current.user.id,
    );
    db::speakers::create(&state.db, &speaker).await?;
    tracing::info!(speaker = %speaker.id, avatar = %avatar.id, "Speaker registered");

    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_code(201, speaker)),
    )
        .into_response())
}

#[derive(Debug, Deserialize)]
pub struct UpdateSpeakerRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// PUT /speakers/:id
pub async fn update_speaker(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateSpeakerRequest>,
) -> ApiResult<Json<Envelope<Speaker>>> {
    let mut speaker = db::speakers::get_owned(&state.db, id, current.user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Speaker not exists".to_string()))?;

    if let Some(name) = request.name {
        if name.trim().is_empty() {
            return Err(ApiError::InvalidArgument(
                "name must not be empty".to_string(),
            ));
        }
        speaker.name = name;
    }
    if let Some(description) = request.description {
        speaker.description = description;
    }

    db::speakers::update(&state.db, &speaker).await?;
    Ok(Json(Envelope::ok(speaker)))
}

/// DELETE /speakers/:id
pub async fn delete_speaker(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if !db::speakers::delete_user_owned(&state.db, id, current.user.id).await? {
        return Err(ApiError::NotFound("Speaker not exists".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Build speaker routes
pub fn speaker_routes() -> Router<AppState> {
    Router::new()
        .route("/speakers", get(list_speakers).post(create_speaker))
        .route(
            "/speakers/:id",
            get(get_speaker).put(update_speaker).delete(delete_speaker),
        )
}
