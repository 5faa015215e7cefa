//! Avatar records and their motion-clip mapping

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ResourceType;

/// Motion clip references for an avatar
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AvatarMotions {
    #[serde(default)]
    pub silent: String,
    #[serde(default)]
    pub talking: String,
}

/// A visual avatar
///
/// User-type avatars must have an owner; system avatars are globally
/// visible and never deletable through this API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Avatar {
    pub id: Uuid,
    pub name: String,
    /// Portrait image reference (media path)
    pub portrait: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: ResourceType,
    pub owner: Uuid,
    pub motions: AvatarMotions,
}

impl Avatar {
    /// New user-owned avatar with empty motion mapping
    pub fn new_user_owned(name: String, portrait: String, owner: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            portrait,
            description: String::new(),
            kind: ResourceType::User,
            owner,
            motions: AvatarMotions::default(),
        }
    }
}

/// A motion clip belonging to exactly one avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvatarAction {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub avatar: Uuid,
}
