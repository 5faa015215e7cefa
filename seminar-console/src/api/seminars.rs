//! Seminar endpoints
//!
//! PUT runs the lifecycle engine: every check happens before the single
//! save, and archiving creates the generation order before the seminar row
//! is touched (a failed order creation aborts the whole update).

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use seminar_common::pagination::Page;
use seminar_common::response::{Envelope, PageResults};

use crate::db::generation_orders::CreateOutcome;
use crate::db::seminars::SeminarFilter;
use crate::error::{ApiError, ApiResult};
use crate::models::{GenerationOrder, Seminar, SeminarResources};
use crate::workflow::seminar::{apply_transition, plan_transition, Transition};
use crate::{api::CurrentUser, db, AppState};

#[derive(Debug, Deserialize)]
pub struct SeminarListParams {
    pub state: Option<String>,
    pub name: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

/// GET /seminars
pub async fn list_seminars(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(params): Query<SeminarListParams>,
) -> ApiResult<Json<Envelope<PageResults<Seminar>>>> {
    let mut states: Vec<String> = params
        .state
        .as_deref()
        .unwrap_or("")
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    // a single "all" disables the state filter
    if states.len() == 1 && states[0] == "all" {
        states.clear();
    }

    let name = params
        .name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let filter = SeminarFilter { states, name };
    let page = Page::resolve(params.page, params.size);
    let (count, results) =
        db::seminars::list_owned(&state.db, current.user.id, &filter, &page).await?;
    let (next, previous) = page.links("/seminars", count);

    Ok(Json(Envelope::ok(PageResults {
        count,
        next,
        previous,
        results,
    })))
}

#[derive(Debug, Deserialize)]
pub struct CreateSeminarRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub speaker: Option<Uuid>,
}

/// POST /seminars
pub async fn create_seminar(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<CreateSeminarRequest>,
) -> ApiResult<Response> {
    let title = request.title.filter(|t| !t.trim().is_empty());
    let (title, speaker_id) = match (title, request.speaker) {
        (Some(t), Some(s)) => (t, s),
        _ => {
            return Err(ApiError::InvalidArgument(
                "title and speaker are required".to_string(),
            ))
        }
    };

    // the referenced speaker must be visible to the caller
    if db::speakers::get_visible(&state.db, speaker_id, current.user.id)
        .await?
        .is_none()
    {
        return Err(ApiError::InvalidArgument(format!(
            "speaker {} not exists",
            speaker_id
        )));
    }

    let seminar = Seminar::new(
        title,
        request.description.unwrap_or_default(),
        speaker_id,
        current.user.id,
    );
    db::seminars::create(&state.db, &seminar).await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_code(201, seminar)),
    )
        .into_response())
}

/// GET /seminars/:id
pub async fn get_seminar(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Envelope<Seminar>>> {
    let seminar = db::seminars::get_owned(&state.db, id, current.user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Seminar not exists".to_string()))?;

    Ok(Json(Envelope::ok(seminar)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateSeminarRequest {
    pub state: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub cover: Option<String>,
    pub speaker: Option<Uuid>,
    pub resources: Option<SeminarResources>,
}

/// PUT /seminars/:id
pub async fn update_seminar(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateSeminarRequest>,
) -> ApiResult<Json<Envelope<Seminar>>> {
    let mut seminar = db::seminars::get_owned(&state.db, id, current.user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Seminar not exists".to_string()))?;

    // Validate everything before any side effect
    let plan = plan_transition(&seminar.state, request.state.as_deref())?;

    if let Some(title) = request.title {
        if title.trim().is_empty() {
            return Err(ApiError::InvalidArgument(
                "title must not be empty".to_string(),
            ));
        }
        seminar.title = title;
    }
    if let Some(description) = request.description {
        seminar.description = description;
    }
    if let Some(cover) = request.cover {
        seminar.cover = Some(cover);
    }
    if let Some(speaker_id) = request.speaker {
        if db::speakers::get_visible(&state.db, speaker_id, current.user.id)
            .await?
            .is_none()
        {
            return Err(ApiError::InvalidArgument(format!(
                "speaker {} not exists",
                speaker_id
            )));
        }
        seminar.speaker = Some(speaker_id);
    }
    if let Some(resources) = request.resources {
        seminar.resources = resources;
    }

    if let Some(transition) = plan {
        if transition == Transition::DraftToArchived {
            // Archiving submits for generation: the order must exist before
            // the seminar row changes, and its failure aborts the update.
            match db::generation_orders::create(&state.db, &GenerationOrder::new(seminar.id)).await
            {
                Ok(CreateOutcome::Created(order)) => {
                    tracing::info!(seminar = %seminar.id, order = %order.id, "Generation order created");
                }
                Ok(CreateOutcome::AlreadyExists) => {
                    return Err(ApiError::DependencyFailure(
                        "generation order already exists for this seminar".to_string(),
                    ));
                }
                Err(e) => {
                    return Err(ApiError::DependencyFailure(format!(
                        "generation order creation failed: {}",
                        e
                    )));
                }
            }
        }
        apply_transition(&mut seminar, transition);
    }

    db::seminars::update(&state.db, &seminar).await?;
    Ok(Json(Envelope::ok(seminar)))
}

/// DELETE /seminars/:id
pub async fn delete_seminar(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if !db::seminars::delete_owned(&state.db, id, current.user.id).await? {
        return Err(ApiError::NotFound("Seminar not exists".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Build seminar routes
pub fn seminar_routes() -> Router<AppState> {
    Router::new()
        .route("/seminars", get(list_seminars).post(create_seminar))
        .route(
            "/seminars/:id",
            get(get_seminar).put(update_seminar).delete(delete_seminar),
        )
}
