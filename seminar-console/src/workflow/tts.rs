//! TTS order lifecycle engine
//!
//! Worker callbacks may only move an order forward: pending → handling →
//! completed | failed. Re-delivering the current state is accepted so
//! duplicate callbacks stay idempotent (and may refresh status or
//! output_file); a regression, or a hop between the two terminal states,
//! is rejected and nothing is persisted.

use chrono::Utc;
use serde::Deserialize;

use super::WorkflowError;
use crate::models::{TtsOrder, TtsOrderState, TtsStatus};

/// Fields a worker callback may carry; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackPayload {
    pub state: Option<TtsOrderState>,
    pub status: Option<TtsStatus>,
    pub output_file: Option<String>,
}

/// Apply a worker callback to the in-memory order.
///
/// Validates the state change (if any) before mutating anything, so a
/// rejected callback leaves the record untouched.
pub fn apply_callback(
    order: &mut TtsOrder,
    payload: CallbackPayload,
) -> Result<(), WorkflowError> {
    if let Some(new_state) = payload.state {
        let current = order.state;
        let forward = new_state.rank() > current.rank();
        let duplicate = new_state == current;
        if !forward && !duplicate {
            return Err(WorkflowError::InvalidTransition {
                from: current.as_str().to_string(),
                to: new_state.as_str().to_string(),
            });
        }
        order.state = new_state;
    }

    if let Some(status) = payload.status {
        order.status = status;
    }
    if let Some(output_file) = payload.output_file {
        order.output_file = output_file;
    }
    order.updated_at = Utc::now();

    Ok(())
}
