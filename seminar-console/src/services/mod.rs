//! Outbound collaborators: broker dispatch, identity provider, face
//! verification, media storage

pub mod dispatch;
pub mod face_verify;
pub mod media;
pub mod oauth_client;

pub use dispatch::{DispatchError, MqttJobQueue, TtsJobMessage, TtsJobQueue};
pub use face_verify::FaceVerifier;
pub use oauth_client::{IdentityError, OAuth2Client, TokenGrant, UserProfile};
