//! Local user records and sessions
//!
//! Users are keyed by the external identity provider's username; the console
//! creates them on first OAuth2 login. Sessions are console-owned: an OAuth2
//! session carries the provider access token and its absolute expiry, a
//! local session carries neither and never expires that way.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A portal user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// An authenticated session
#[derive(Debug, Clone)]
pub struct Session {
    pub token: Uuid,
    pub user_id: Uuid,
    /// OAuth2 access token, absent for local sessions
    pub access_token: Option<String>,
    /// Absolute token expiry, absent for local sessions
    pub token_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// An OAuth2 session is expired once its token expiry has passed.
    /// Local sessions (no token) are always considered valid.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.token_expires_at {
            Some(expires_at) => expires_at < now,
            None => false,
        }
    }
}
