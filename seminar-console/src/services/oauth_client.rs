//! Identity provider client
//!
//! Covers the token/state contract only: authorization-code exchange,
//! client-credentials exchange, userinfo and the user photo lookup. Every
//! call shares one reqwest client with an explicit timeout; a timeout is a
//! transient failure, distinct from an explicit provider rejection.

use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::config::OAuth2Config;

/// Identity provider errors
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Outbound call exceeded the configured timeout (transient)
    #[error("Identity provider timed out: {0}")]
    Timeout(String),

    /// Transport-level failure (transient)
    #[error("Identity provider unreachable: {0}")]
    Transport(String),

    /// Provider answered with a non-success status
    #[error("Identity provider rejected request ({0}): {1}")]
    Rejected(u16, String),

    /// Provider answered with a body we cannot interpret
    #[error("Unexpected identity provider response: {0}")]
    Parse(String),
}

fn transport_error(e: reqwest::Error) -> IdentityError {
    if e.is_timeout() {
        IdentityError::Timeout(e.to_string())
    } else {
        IdentityError::Transport(e.to_string())
    }
}

/// Access token grant
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    /// Seconds until expiry
    #[serde(default)]
    pub expires_in: i64,
}

#[derive(Debug, Deserialize)]
struct UserInfoResponse {
    #[serde(default)]
    data: UserInfoData,
}

#[derive(Debug, Default, Deserialize)]
struct UserInfoData {
    #[serde(rename = "userId")]
    user_id: Option<String>,
    name: Option<String>,
    email: Option<String>,
}

/// Profile fields the console keeps locally
#[derive(Debug, Clone)]
pub struct UserProfile {
    /// Provider user id; becomes the local username
    pub username: String,
    pub name: String,
    pub email: String,
}

/// OAuth2 identity provider client
pub struct OAuth2Client {
    http: Client,
    config: OAuth2Config,
}

impl OAuth2Client {
    pub fn new(config: OAuth2Config, timeout: Duration) -> Result<Self, IdentityError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| IdentityError::Transport(e.to_string()))?;
        Ok(Self { http, config })
    }

    /// Authorization URL the browser is redirected to on login
    pub fn authorize_url(&self, state: &str) -> Result<String, IdentityError> {
        let url = Url::parse_with_params(
            &self.config.authorize_url,
            &[
                ("response_type", "code"),
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("state", state),
            ],
        )
        .map_err(|e| IdentityError::Parse(format!("Bad authorize URL: {}", e)))?;
        Ok(url.into())
    }

    /// Exchange an authorization code for an access token
    pub async fn exchange_code(&self, code: &str) -> Result<TokenGrant, IdentityError> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];

        let response = self
            .http
            .post(&self.config.token_url)
            .form(&params)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(IdentityError::Rejected(status.as_u16(), detail));
        }

        response
            .json()
            .await
            .map_err(|e| IdentityError::Parse(e.to_string()))
    }

    /// Machine-to-machine token for the face-compare service
    pub async fn client_credentials_token(&self) -> Result<TokenGrant, IdentityError> {
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
        ];

        let response = self
            .http
            .post(&self.config.token_url)
            .form(&params)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(IdentityError::Rejected(status.as_u16(), detail));
        }

        response
            .json()
            .await
            .map_err(|e| IdentityError::Parse(e.to_string()))
    }

    /// Fetch the profile document for an access token
    pub async fn fetch_userinfo(&self, access_token: &str) -> Result<UserProfile, IdentityError> {
        let response = self
            .http
            .get(&self.config.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(IdentityError::Rejected(status.as_u16(), detail));
        }

        let info: UserInfoResponse = response
            .json()
            .await
            .map_err(|e| IdentityError::Parse(e.to_string()))?;

        let username = info
            .data
            .user_id
            .filter(|s| !s.is_empty())
            .ok_or_else(|| IdentityError::Parse("userinfo missing userId".to_string()))?;

        Ok(UserProfile {
            username,
            name: info.data.name.unwrap_or_else(|| "N/A".to_string()),
            email: info.data.email.unwrap_or_default(),
        })
    }

    /// Fetch the provider photo for a user; returns bytes and content type
    pub async fn fetch_user_photo(
        &self,
        username: &str,
        access_token: &str,
    ) -> Result<(Vec<u8>, String), IdentityError> {
        let url = Url::parse_with_params(
            &self.config.user_photo_url,
            &[("userId", username), ("access_token", access_token)],
        )
        .map_err(|e| IdentityError::Parse(format!("Bad photo URL: {}", e)))?;

        let response = self.http.get(url).send().await.map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(IdentityError::Rejected(status.as_u16(), String::new()));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();

        let bytes = response.bytes().await.map_err(transport_error)?;
        Ok((bytes.to_vec(), content_type))
    }
}
