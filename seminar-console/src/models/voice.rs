//! Voice catalog entry
//!
//! Immutable catalog rows created by the admin service; the console only
//! lists them and resolves references from speakers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A synthesizable voice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Voice {
    pub id: Uuid,
    pub title: String,
    /// Engine-side voice code (spk_id namespace)
    pub code: String,
    pub description: String,
    /// Sample audio reference (media path)
    pub sample: String,
}
