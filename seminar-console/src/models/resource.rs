//! Resource ownership classification

use serde::{Deserialize, Serialize};

/// Who a catalog resource belongs to
///
/// System resources are platform-provided, visible to every user and never
/// deletable through this API. User resources are visible and mutable only
/// by their owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    System,
    User,
}

impl ResourceType {
    /// Stored string form (matches the shared database columns)
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::System => "system",
            ResourceType::User => "user",
        }
    }

    /// Parse the stored string form
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "system" => Some(ResourceType::System),
            "user" => Some(ResourceType::User),
            _ => None,
        }
    }
}
