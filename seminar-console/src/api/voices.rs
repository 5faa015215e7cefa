//! Voice catalog endpoints

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use seminar_common::response::Envelope;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct VoicesParams {
    /// `db` (default) lists the stored catalog; `tts` asks the engine live
    pub source: Option<String>,
}

/// Voice entry as reported by the TTS engine catalog endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct TtsCatalogVoice {
    pub code: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// GET /voices
pub async fn list_voices(
    State(state): State<AppState>,
    Query(params): Query<VoicesParams>,
) -> ApiResult<Json<Envelope<Value>>> {
    match params.source.as_deref() {
        None | Some("db") => {
            let voices = crate::db::voices::list_all(&state.db).await?;
            let data = serde_json::to_value(voices)
                .map_err(|e| ApiError::Internal(e.to_string()))?;
            Ok(Json(Envelope::ok(data)))
        }
        Some("tts") => {
            let url = state.config.tts.voices_url.as_ref().ok_or_else(|| {
                ApiError::InvalidArgument("tts voice source is not configured".to_string())
            })?;

            let response = state.http.get(url).send().await.map_err(|e| {
                if e.is_timeout() {
                    ApiError::UpstreamUnavailable(format!("TTS catalog timed out: {}", e))
                } else {
                    ApiError::UpstreamUnavailable(format!("TTS catalog unreachable: {}", e))
                }
            })?;

            let status = response.status();
            if !status.is_success() {
                return Err(ApiError::UpstreamRejected(format!(
                    "TTS catalog answered {}",
                    status
                )));
            }

            let voices: Vec<TtsCatalogVoice> = response
                .json()
                .await
                .map_err(|e| ApiError::UpstreamRejected(format!("Bad TTS catalog body: {}", e)))?;
            let data = serde_json::to_value(voices)
                .map_err(|e| ApiError::Internal(e.to_string()))?;
            Ok(Json(Envelope::ok(data)))
        }
        Some(other) => Err(ApiError::InvalidArgument(format!(
            "source must be 'tts' or 'db', got '{}'",
            other
        ))),
    }
}

/// Build voice routes
pub fn voice_routes() -> Router<AppState> {
    Router::new().route("/voices", get(list_voices))
}
