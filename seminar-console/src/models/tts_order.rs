//! TTS conversion job records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// TTS order lifecycle state
///
/// pending → handling → completed | failed. Callback application enforces
/// this ordering (see `workflow::tts`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TtsOrderState {
    Pending,
    Handling,
    Completed,
    Failed,
}

impl TtsOrderState {
    /// Stored string form
    pub fn as_str(&self) -> &'static str {
        match self {
            TtsOrderState::Pending => "pending",
            TtsOrderState::Handling => "handling",
            TtsOrderState::Completed => "completed",
            TtsOrderState::Failed => "failed",
        }
    }

    /// Parse the stored string form
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(TtsOrderState::Pending),
            "handling" => Some(TtsOrderState::Handling),
            "completed" => Some(TtsOrderState::Completed),
            "failed" => Some(TtsOrderState::Failed),
            _ => None,
        }
    }

    /// Position in the lifecycle; both terminal states share the top rank
    pub fn rank(&self) -> u8 {
        match self {
            TtsOrderState::Pending => 0,
            TtsOrderState::Handling => 1,
            TtsOrderState::Completed | TtsOrderState::Failed => 2,
        }
    }

    /// Terminal states accept no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, TtsOrderState::Completed | TtsOrderState::Failed)
    }
}

/// Worker-reported progress and error detail
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TtsStatus {
    #[serde(default)]
    pub progress: i64,
    #[serde(default)]
    pub error: String,
}

/// A text-to-speech conversion job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsOrder {
    pub id: Uuid,
    pub text: String,
    /// Engine voice id the text is synthesized with
    pub spk_id: String,
    pub state: TtsOrderState,
    pub status: TtsStatus,
    pub output_file: String,
    pub owner: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TtsOrder {
    /// New pending order owned by `owner`
    pub fn new(text: String, spk_id: String, owner: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            text,
            spk_id,
            state: TtsOrderState::Pending,
            status: TtsStatus::default(),
            output_file: String::new(),
            owner,
            created_at: now,
            updated_at: now,
        }
    }
}
