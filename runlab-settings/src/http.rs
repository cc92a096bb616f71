//! HTTP implementation of the settings service.
//!
//! Talks to the Runlab API's user-settings endpoints. All calls are scoped
//! to the session owning the bearer token.

use crate::error::{ServiceError, ServiceResult};
use crate::service::SettingsService;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use runlab_types::SettingsPath;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// Configuration for the HTTP settings service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpServiceConfig {
    /// Base URL of the Runlab API (e.g. `https://api.runlab.dev`).
    pub base_url: String,
    /// Bearer token of the authenticated session.
    pub auth_token: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HttpServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.runlab.dev".to_string(),
            auth_token: String::new(),
            timeout_secs: 30,
        }
    }
}

/// Wire structures for the settings endpoints.
#[derive(Debug, Deserialize)]
struct SettingsResponse {
    settings: Vec<SettingEntry>,
}

#[derive(Debug, Deserialize)]
struct SettingEntry {
    path: String,
    value: Value,
}

#[derive(Debug, Serialize)]
struct UpdateRequest<'a> {
    value: &'a Value,
}

/// Settings service backed by the Runlab HTTP API.
pub struct HttpSettingsService {
    config: HttpServiceConfig,
    client: Client,
}

impl HttpSettingsService {
    /// Creates a new HTTP settings service.
    pub fn new(config: HttpServiceConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("failed to create HTTP client");

        Self { config, client }
    }

    fn settings_url(&self) -> String {
        format!("{}/api/v1/settings", self.config.base_url)
    }

    fn setting_url(&self, path: &SettingsPath) -> String {
        format!(
            "{}/api/v1/settings/{}",
            self.config.base_url,
            urlencoding::encode(path.as_str())
        )
    }

    fn map_request_error(error: reqwest::Error) -> ServiceError {
        if error.is_timeout() {
            ServiceError::Timeout
        } else {
            ServiceError::Network(error.to_string())
        }
    }

    async fn check_status(response: reqwest::Response) -> ServiceResult<reqwest::Response> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ServiceError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Http {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl SettingsService for HttpSettingsService {
    async fn fetch_all(&self) -> ServiceResult<HashMap<SettingsPath, Value>> {
        let response = self
            .client
            .get(self.settings_url())
            .bearer_auth(&self.config.auth_token)
            .send()
            .await
            .map_err(Self::map_request_error)?;
        let response = Self::check_status(response).await?;

        let body = response.text().await.map_err(Self::map_request_error)?;
        let payload: SettingsResponse = serde_json::from_str(&body)?;

        debug!(count = payload.settings.len(), "fetched settings");

        let mut settings = HashMap::with_capacity(payload.settings.len());
        for entry in payload.settings {
            let path = SettingsPath::new(&entry.path)
                .map_err(|_| ServiceError::Protocol(format!("invalid path `{}`", entry.path)))?;
            settings.insert(path, entry.value);
        }
        Ok(settings)
    }

    async fn persist(&self, path: &SettingsPath, value: &Value) -> ServiceResult<()> {
        let response = self
            .client
            .put(self.setting_url(path))
            .bearer_auth(&self.config.auth_token)
            .json(&UpdateRequest { value })
            .send()
            .await
            .map_err(Self::map_request_error)?;
        Self::check_status(response).await?;
        debug!(path = %path, "persisted setting");
        Ok(())
    }

    async fn remove(&self, path: &SettingsPath) -> ServiceResult<()> {
        let response = self
            .client
            .delete(self.setting_url(path))
            .bearer_auth(&self.config.auth_token)
            .send()
            .await
            .map_err(Self::map_request_error)?;
        Self::check_status(response).await?;
        debug!(path = %path, "reset setting");
        Ok(())
    }

    async fn reset_all(&self) -> ServiceResult<()> {
        let response = self
            .client
            .delete(self.settings_url())
            .bearer_auth(&self.config.auth_token)
            .send()
            .await
            .map_err(Self::map_request_error)?;
        Self::check_status(response).await?;
        debug!("reset all settings");
        Ok(())
    }
}
