//! Avatar endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use seminar_common::pagination::Page;
use seminar_common::response::{Envelope, PageResults};

use crate::error::{ApiError, ApiResult};
use crate::models::{Avatar, AvatarAction};
use crate::{api::CurrentUser, db, AppState};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

/// GET /avatars
pub async fn list_avatars(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Envelope<PageResults<Avatar>>>> {
    let page = Page::resolve(params.page, params.size);
    let (count, results) = db::avatars::list_visible(&state.db, current.user.id, &page).await?;
    let (next, previous) = page.links("/avatars", count);

    Ok(Json(Envelope::ok(PageResults {
        count,
        next,
        previous,
        results,
    })))
}

/// GET /avatars/:id payload: the avatar with its motion clips embedded
#[derive(Debug, Serialize)]
pub struct AvatarDetail {
    #[serde(flatten)]
    pub avatar: Avatar,
    pub actions: Vec<AvatarAction>,
}

/// GET /avatars/:id
pub async fn get_avatar(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Envelope<AvatarDetail>>> {
    let avatar = db::avatars::get_visible(&state.db, id, current.user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Avatar not exists".to_string()))?;
    let actions = db::avatars::list_actions(&state.db, avatar.id).await?;

    Ok(Json(Envelope::ok(AvatarDetail { avatar, actions })))
}

#[derive(Debug, Deserialize)]
pub struct UpdateAvatarRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// PUT /avatars/:id
pub async fn update_avatar(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateAvatarRequest>,
) -> ApiResult<Json<Envelope<Avatar>>> {
    let mut avatar = db::avatars::get_owned(&state.db, id, current.user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Avatar not exists".to_string()))?;

    if let Some(name) = request.name {
        if name.trim().is_empty() {
            return Err(ApiError::InvalidArgument(
                "name must not be empty".to_string(),
            ));
        }
        avatar.name = name;
    }
    if let Some(description) = request.description {
        avatar.description = description;
    }

    db::avatars::update(&state.db, &avatar).await?;
    Ok(Json(Envelope::ok(avatar)))
}

/// DELETE /avatars/:id
///
/// Only user-type avatars owned by the caller are deletable; system
/// avatars answer NotFound like everything else the caller cannot touch.
pub async fn delete_avatar(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if !db::avatars::delete_user_owned(&state.db, id, current.user.id).await? {
        return Err(ApiError::NotFound("Avatar not exists".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Build avatar routes
pub fn avatar_routes() -> Router<AppState> {
    Router::new()
        .route("/avatars", get(list_avatars))
        .route(
            "/avatars/:id",
            get(get_avatar).put(update_avatar).delete(delete_avatar),
        )
}
