//! HTTP API handlers for seminar-console

pub mod auth;
pub mod avatars;
pub mod generation_orders;
pub mod health;
pub mod oauth;
pub mod seminars;
pub mod speakers;
pub mod tts_orders;
pub mod user;
pub mod voices;

pub use auth::CurrentUser;
pub use avatars::avatar_routes;
pub use generation_orders::generation_order_routes;
pub use health::health_routes;
pub use oauth::oauth_routes;
pub use seminars::seminar_routes;
pub use speakers::speaker_routes;
pub use tts_orders::tts_order_routes;
pub use user::user_routes;
pub use voices::voice_routes;
