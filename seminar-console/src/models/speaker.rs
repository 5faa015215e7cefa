//! Speaker records: an avatar (visual) bound to a voice (audio)

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AvatarMotions, ResourceType};

/// Cover image mapping per aspect ratio
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpeakerCovers {
    #[serde(rename = "_16x9", default)]
    pub wide: String,
    #[serde(rename = "_4x3", default)]
    pub standard: String,
}

/// A narrating speaker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Speaker {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub avatar: Option<Uuid>,
    pub voice: Option<Uuid>,
    pub owner: Uuid,
    #[serde(rename = "type")]
    pub kind: ResourceType,
    pub motions: AvatarMotions,
    pub covers: SpeakerCovers,
}

impl Speaker {
    /// New user-owned speaker binding an avatar and a voice
    pub fn new_user_owned(
        name: String,
        description: String,
        avatar: Uuid,
        voice: Uuid,
        owner: Uuid,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            description,
            avatar: Some(avatar),
            voice: Some(voice),
            owner,
            kind: ResourceType::User,
            motions: AvatarMotions::default(),
            covers: SpeakerCovers::default(),
        }
    }
}
