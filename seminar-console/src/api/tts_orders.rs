//! TTS order endpoints
//!
//! Creation blocks only on enqueuing the job; the worker reports progress
//! through the callback endpoint, which is worker-secret guarded and
//! session-free. A failed enqueue marks the order failed before the error
//! reaches the client, so an order is never left pending with no job.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use seminar_common::pagination::Page;
use seminar_common::response::{Envelope, PageResults};

use crate::error::{ApiError, ApiResult};
use crate::models::{TtsOrder, TtsOrderState};
use crate::services::TtsJobMessage;
use crate::workflow::tts::{apply_callback, CallbackPayload};
use crate::{api::CurrentUser, db, AppState};

/// Header the worker presents on the callback path
pub const WORKER_TOKEN_HEADER: &str = "x-worker-token";

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

/// GET /tts_orders
pub async fn list_tts_orders(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Envelope<PageResults<TtsOrder>>>> {
    let page = Page::resolve(params.page, params.size);
    let (count, results) = db::tts_orders::list_owned(&state.db, current.user.id, &page).await?;
    let (next, previous) = page.links("/tts_orders", count);

    Ok(Json(Envelope::ok(PageResults {
        count,
        next,
        previous,
        results,
    })))
}

#[derive(Debug, Deserialize)]
pub struct CreateTtsOrderRequest {
    pub text: Option<String>,
    pub spk_id: Option<String>,
}

/// POST /tts_orders
pub async fn create_tts_order(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<CreateTtsOrderRequest>,
) -> ApiResult<Response> {
    let text = request.text.filter(|t| !t.trim().is_empty());
    let spk_id = request.spk_id.filter(|s| !s.trim().is_empty());
    let (text, spk_id) = match (text, spk_id) {
        (Some(t), Some(s)) => (t, s),
        _ => {
            return Err(ApiError::InvalidArgument(
                "text and spk_id are required".to_string(),
            ))
        }
    };

    let order = TtsOrder::new(text, spk_id, current.user.id);
    db::tts_orders::create(&state.db, &order).await?;

    if let Err(e) = state.jobs.enqueue(&TtsJobMessage::from_order(&order)).await {
        // Compensate before reporting: the order must never sit pending
        // with no enqueued job behind it.
        let mut failed = order;
        failed.state = TtsOrderState::Failed;
        failed.status.error = format!("dispatch failed: {}", e);
        failed.updated_at = Utc::now();
        db::tts_orders::update_lifecycle(&state.db, &failed).await?;
        tracing::error!(order = %failed.id, "TTS dispatch failed: {}", e);

        return Err(ApiError::DispatchFailure(format!(
            "failed to enqueue TTS job: {}",
            e
        )));
    }

    Ok((StatusCode::CREATED, Json(Envelope::with_code(201, order))).into_response())
}

/// GET /tts_orders/:id
pub async fn get_tts_order(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Envelope<TtsOrder>>> {
    let order = db::tts_orders::get_owned(&state.db, id, current.user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("TTS order not exists".to_string()))?;

    Ok(Json(Envelope::ok(order)))
}

/// POST /tts_orders/:id/callback
///
/// Worker-only entry point keyed by the order id the job message carried.
/// Guarded by the shared worker secret (an empty configured secret disables
/// the check for trusted-network deployments); session auth never applies
/// here.
pub async fn worker_callback(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(payload): Json<CallbackPayload>,
) -> ApiResult<Json<Envelope<TtsOrder>>> {
    let secret = &state.config.worker_secret;
    if !secret.is_empty() {
        let provided = headers
            .get(WORKER_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        if provided != secret {
            return Err(ApiError::Unauthorized("invalid worker token".to_string()));
        }
    }

    let mut order = db::tts_orders::get_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("TTS order not exists".to_string()))?;

    // Rejected callbacks (regressions, terminal crossovers) persist nothing
    apply_callback(&mut order, payload)?;
    db::tts_orders::update_lifecycle(&state.db, &order).await?;
    tracing::info!(order = %order.id, state = order.state.as_str(), "TTS callback applied");

    Ok(Json(Envelope::ok(order)))
}

/// Build session-protected TTS order routes (the callback route is wired
/// separately, outside the session middleware)
pub fn tts_order_routes() -> Router<AppState> {
    Router::new()
        .route("/tts_orders", get(list_tts_orders).post(create_tts_order))
        .route("/tts_orders/:id", get(get_tts_order))
}

/// Build the worker callback route
pub fn callback_routes() -> Router<AppState> {
    Router::new().route("/tts_orders/:id/callback", post(worker_callback))
}
