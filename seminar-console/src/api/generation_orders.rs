//! Generation order endpoints

use axum::{extract::State, routing::post, Extension, Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use seminar_common::response::Envelope;

use crate::db::generation_orders::CreateOutcome;
use crate::error::{ApiError, ApiResult};
use crate::models::GenerationOrder;
use crate::{api::CurrentUser, db, AppState};

#[derive(Debug, Deserialize)]
pub struct CreateGenerationOrderRequest {
    pub seminar: Option<Uuid>,
}

/// POST /generation_orders
///
/// Explicit order creation for a seminar the caller owns. Uniqueness is the
/// store's unique index; losing the race reads the same as the row already
/// existing.
pub async fn create_generation_order(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<CreateGenerationOrderRequest>,
) -> ApiResult<Json<Envelope<GenerationOrder>>> {
    let seminar_id = request
        .seminar
        .ok_or_else(|| ApiError::InvalidArgument("seminar is required".to_string()))?;

    let seminar = db::seminars::get_owned(&state.db, seminar_id, current.user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Seminar not exists".to_string()))?;

    match db::generation_orders::create(&state.db, &GenerationOrder::new(seminar.id)).await? {
        CreateOutcome::Created(order) => {
            tracing::info!(seminar = %seminar.id, order = %order.id, "Generation order created");
            Ok(Json(Envelope::ok(order)))
        }
        CreateOutcome::AlreadyExists => Err(ApiError::DependencyFailure(
            "generation order already exists for this seminar".to_string(),
        )),
    }
}

/// Build generation order routes
pub fn generation_order_routes() -> Router<AppState> {
    Router::new().route("/generation_orders", post(create_generation_order))
}
