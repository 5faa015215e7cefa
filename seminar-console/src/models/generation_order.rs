//! Generation order records
//!
//! One order renders one seminar's final video. The store enforces at most
//! one order per seminar via a unique index on `seminar_id`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Free-text progress description from the renderer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationStatus {
    #[serde(default)]
    pub description: String,
}

/// A request to render a seminar's final video
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationOrder {
    pub id: Uuid,
    pub state: String,
    pub status: GenerationStatus,
    pub created_at: DateTime<Utc>,
    pub seminar: Uuid,
}

impl GenerationOrder {
    /// New pending order for `seminar`
    pub fn new(seminar: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            state: "pending".to_string(),
            status: GenerationStatus::default(),
            created_at: Utc::now(),
            seminar,
        }
    }
}
