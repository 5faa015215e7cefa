//! Configuration for seminar-console
//!
//! Resolution order: CLI flag → `SEMINAR_CONSOLE_CONFIG` env var → default
//! path, then a handful of env overrides for deployment secrets. The loaded
//! struct is handed to `AppState` at startup; nothing reads ambient process
//! state afterwards.

use seminar_common::{config::load_toml_or_default, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// HTTP server settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Browser origins allowed to call the API with credentials
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
}

fn default_bind() -> String {
    "127.0.0.1:8300".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            cors_allowed_origins: Vec::new(),
        }
    }
}

/// Database location
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./seminar.db")
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Media storage root for uploaded portraits
#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    #[serde(default = "default_media_root")]
    pub root: PathBuf,
}

fn default_media_root() -> PathBuf {
    PathBuf::from("./medias")
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root: default_media_root(),
        }
    }
}

/// Session cookie behaviour and redirect targets
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Cookie lifetime in seconds
    #[serde(default = "default_session_max_age")]
    pub max_age_seconds: i64,
    #[serde(default = "default_post_login_redirect")]
    pub post_login_redirect: String,
    #[serde(default = "default_post_logout_redirect")]
    pub post_logout_redirect: String,
}

fn default_session_max_age() -> i64 {
    3600
}

fn default_post_login_redirect() -> String {
    "/#/welcome".to_string()
}

fn default_post_logout_redirect() -> String {
    "/login".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_age_seconds: default_session_max_age(),
            post_login_redirect: default_post_login_redirect(),
            post_logout_redirect: default_post_logout_redirect(),
        }
    }
}

/// Identity provider endpoints and client credentials
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OAuth2Config {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default)]
    pub authorize_url: String,
    #[serde(default)]
    pub token_url: String,
    #[serde(default)]
    pub userinfo_url: String,
    #[serde(default)]
    pub user_photo_url: String,
    #[serde(default)]
    pub face_compare_url: String,
    #[serde(default)]
    pub redirect_uri: String,
}

/// Message broker connection for TTS job dispatch
#[derive(Debug, Clone, Deserialize)]
pub struct BrokerConfig {
    #[serde(default = "default_broker_host")]
    pub host: String,
    #[serde(default = "default_broker_port")]
    pub port: u16,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Topic the worker consumes TTS jobs from
    #[serde(default = "default_broker_topic")]
    pub topic: String,
}

fn default_broker_host() -> String {
    "localhost".to_string()
}

fn default_broker_port() -> u16 {
    1883
}

fn default_broker_topic() -> String {
    "tts/orders".to_string()
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            host: default_broker_host(),
            port: default_broker_port(),
            username: String::new(),
            password: String::new(),
            topic: default_broker_topic(),
        }
    }
}

/// TTS engine side-channel (voice catalog lookup)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TtsConfig {
    /// Catalog endpoint for `GET /voices?source=tts`; unset disables the source
    #[serde(default)]
    pub voices_url: Option<String>,
}

/// Top-level console configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub media: MediaConfig,
    pub session: SessionConfig,
    pub oauth2: OAuth2Config,
    pub broker: BrokerConfig,
    pub tts: TtsConfig,
    /// Verify uploaded speaker portraits against the provider photo
    pub face_verify_enabled: bool,
    /// Shared secret for the worker callback endpoint; empty disables the check
    pub worker_secret: String,
    /// Timeout applied to every outbound HTTP call
    pub http_timeout_seconds: u64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            media: MediaConfig::default(),
            session: SessionConfig::default(),
            oauth2: OAuth2Config::default(),
            broker: BrokerConfig::default(),
            tts: TtsConfig::default(),
            face_verify_enabled: true,
            worker_secret: String::new(),
            http_timeout_seconds: 10,
        }
    }
}

impl ConsoleConfig {
    /// Load configuration, applying env overrides for deployment secrets
    pub fn load(cli_path: Option<&Path>) -> Result<Self> {
        let path = match cli_path {
            Some(p) => p.to_path_buf(),
            None => std::env::var("SEMINAR_CONSOLE_CONFIG")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./seminar-console.toml")),
        };

        let mut config: ConsoleConfig = load_toml_or_default(&path)?;

        // Env overrides for values that rarely belong in a checked-in file
        if let Ok(v) = std::env::var("SEMINAR_OAUTH2_CLIENT_ID") {
            config.oauth2.client_id = v;
        }
        if let Ok(v) = std::env::var("SEMINAR_OAUTH2_CLIENT_SECRET") {
            config.oauth2.client_secret = v;
        }
        if let Ok(v) = std::env::var("SEMINAR_BROKER_PASSWORD") {
            config.broker.password = v;
        }
        if let Ok(v) = std::env::var("SEMINAR_WORKER_SECRET") {
            config.worker_secret = v;
        }
        if let Ok(v) = std::env::var("SEMINAR_DATABASE_PATH") {
            config.database.path = PathBuf::from(v);
        }

        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConsoleConfig::default();
        assert_eq!(config.server.bind, "127.0.0.1:8300");
        assert_eq!(config.session.max_age_seconds, 3600);
        assert_eq!(config.broker.port, 1883);
        assert_eq!(config.broker.topic, "tts/orders");
        assert!(config.worker_secret.is_empty());
        assert!(config.face_verify_enabled);
        assert_eq!(config.http_timeout_seconds, 10);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let parsed: ConsoleConfig = toml::from_str(
            r#"
            face_verify_enabled = false

            [oauth2]
            client_id = "console"

            [broker]
            host = "mq.internal"
            "#,
        )
        .unwrap();
        assert!(!parsed.face_verify_enabled);
        assert_eq!(parsed.oauth2.client_id, "console");
        assert_eq!(parsed.broker.host, "mq.internal");
        assert_eq!(parsed.broker.port, 1883);
        assert_eq!(parsed.session.max_age_seconds, 3600);
    }
}
