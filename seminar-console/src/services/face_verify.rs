//! Face verification gate for speaker creation
//!
//! Delegates the similarity decision to the provider's face-compare
//! service using a machine-to-machine token. The gate is bypassable by
//! configuration; when bypassed, verification always passes.

use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use super::oauth_client::{IdentityError, OAuth2Client};
use crate::config::OAuth2Config;

/// Provider false-accept-rate tier the confidence is compared against
const THRESHOLD_TIER: &str = "1e-4";

#[derive(Debug, Deserialize)]
struct CompareResponse {
    data: CompareData,
}

#[derive(Debug, Deserialize)]
struct CompareData {
    confidence: f64,
    thresholds: HashMap<String, f64>,
}

/// Photo-similarity gate
pub struct FaceVerifier {
    enabled: bool,
    http: reqwest::Client,
    compare_url: String,
    oauth: Arc<OAuth2Client>,
}

impl FaceVerifier {
    pub fn new(
        enabled: bool,
        config: &OAuth2Config,
        oauth: Arc<OAuth2Client>,
        timeout: Duration,
    ) -> Result<Self, IdentityError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| IdentityError::Transport(e.to_string()))?;
        Ok(Self {
            enabled,
            http,
            compare_url: config.face_compare_url.clone(),
            oauth,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Compare two base64-encoded photos.
    ///
    /// Returns Ok(false) on an explicit provider rejection or a confidence
    /// below the threshold tier; transport failures and timeouts surface as
    /// errors so callers can distinguish "no" from "unavailable".
    pub async fn verify(
        &self,
        new_photo_b64: &str,
        reference_b64: &str,
    ) -> Result<bool, IdentityError> {
        if !self.enabled {
            return Ok(true);
        }

        let grant = self.oauth.client_credentials_token().await?;

        let body = serde_json::json!({
            "image1": new_photo_b64,
            "image2": reference_b64,
        });

        let response = self
            .http
            .post(&self.compare_url)
            .bearer_auth(&grant.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    IdentityError::Timeout(e.to_string())
                } else {
                    IdentityError::Transport(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            tracing::warn!("Face compare rejected with status {}", response.status());
            return Ok(false);
        }

        let compare: CompareResponse = response
            .json()
            .await
            .map_err(|e| IdentityError::Parse(e.to_string()))?;

        let threshold = compare
            .data
            .thresholds
            .get(THRESHOLD_TIER)
            .copied()
            .ok_or_else(|| {
                IdentityError::Parse(format!("thresholds missing tier {}", THRESHOLD_TIER))
            })?;

        Ok(compare.data.confidence >= threshold)
    }
}
