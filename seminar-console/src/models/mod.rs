//! Record types for the portal resources
//!
//! Catalog tables (voices, avatars, speakers, seminars, generation orders)
//! are provisioned by the external admin service; the console owns only
//! users, sessions and TTS orders.

pub mod avatar;
pub mod generation_order;
pub mod resource;
pub mod seminar;
pub mod speaker;
pub mod tts_order;
pub mod user;
pub mod voice;

pub use avatar::{Avatar, AvatarAction, AvatarMotions};
pub use generation_order::{GenerationOrder, GenerationStatus};
pub use resource::ResourceType;
pub use seminar::{Seminar, SeminarResources, SeminarStatus};
pub use speaker::{Speaker, SpeakerCovers};
pub use tts_order::{TtsOrder, TtsOrderState, TtsStatus};
pub use user::{Session, User};
pub use voice::Voice;
