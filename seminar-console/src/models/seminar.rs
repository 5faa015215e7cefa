//! Seminar (microlecture) records
//!
//! The `state` column is a free-form string: legacy rows carry values the
//! workflow engine does not enumerate. The engine only validates the two
//! transitions it owns (see `workflow::seminar`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Well-known seminar states
pub mod state {
    pub const EMPTY: &str = "empty";
    pub const DRAFT: &str = "draft";
    pub const PENDING: &str = "pending";
    pub const ARCHIVED: &str = "archived";
}

/// Generation progress snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeminarStatus {
    #[serde(default)]
    pub progress: i64,
    #[serde(default)]
    pub queuing: i64,
    /// Authoring step: 1 after creation, 2 once drafted
    #[serde(default)]
    pub step: i64,
}

/// Attached media resources
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeminarResources {
    #[serde(default)]
    pub slides: Vec<String>,
}

/// A microlecture
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seminar {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub owner: Uuid,
    pub state: String,
    pub speaker: Option<Uuid>,
    pub cover: Option<String>,
    pub status: SeminarStatus,
    pub resources: SeminarResources,
}

impl Seminar {
    /// New seminar in the `empty` state with authoring step 1
    pub fn new(title: String, description: String, speaker: Uuid, owner: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            date: Utc::now(),
            owner,
            state: state::EMPTY.to_string(),
            speaker: Some(speaker),
            cover: None,
            status: SeminarStatus {
                step: 1,
                ..SeminarStatus::default()
            },
            resources: SeminarResources::default(),
        }
    }
}
