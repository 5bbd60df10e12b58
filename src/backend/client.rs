//! HTTP client for the hosted inference endpoint.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Response;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use tracing::debug;

use super::Backend;
use super::types::{ApiErrorBody, BackendConfig, BackendError, ModelInfo, SynthesizeRequest};

/// Health checks answer quickly or count as down.
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP-based backend client.
pub struct HttpBackend {
    config: BackendConfig,
    client: reqwest::blocking::Client,
}

impl HttpBackend {
    /// Create a new HTTP backend client.
    pub fn new(config: BackendConfig) -> Result<Self, BackendError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BackendError::ConnectionFailed(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Get the endpoint URL for this backend.
    pub fn api_url(&self) -> &str {
        &self.config.api_url
    }

    fn authorize(
        &self,
        request: reqwest::blocking::RequestBuilder,
    ) -> reqwest::blocking::RequestBuilder {
        match &self.config.api_key {
            Some(key) => request.header(AUTHORIZATION, format!("Bearer {key}")),
            None => request,
        }
    }

    /// Map a non-success response to a backend error.
    fn error_for(response: Response) -> BackendError {
        let status = response.status();
        let body = response.text().unwrap_or_default();
        let parsed: Option<ApiErrorBody> = serde_json::from_str(&body).ok();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return BackendError::Unauthorized(status.to_string());
        }

        if status == StatusCode::SERVICE_UNAVAILABLE
            && let Some(estimated) = parsed.as_ref().and_then(|b| b.estimated_time)
        {
            return BackendError::ModelLoading(estimated);
        }

        match parsed.and_then(|b| b.error) {
            Some(message) => BackendError::RequestFailed(format!("{status}: {message}")),
            None => BackendError::RequestFailed(format!("Status: {status}")),
        }
    }
}

impl Backend for HttpBackend {
    fn health(&self) -> Result<bool, BackendError> {
        let response = self
            .authorize(self.client.get(&self.config.api_url))
            .timeout(HEALTH_TIMEOUT.min(self.config.timeout))
            .send()
            .map_err(|e| BackendError::ConnectionFailed(e.to_string()))?;

        debug!("Health check returned {}", response.status());
        Ok(response.status().is_success())
    }

    fn load_model(&self) -> Result<ModelInfo, BackendError> {
        let response = self
            .authorize(self.client.get(&self.config.api_url))
            .send()
            .map_err(|e| BackendError::ConnectionFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_for(response));
        }

        Ok(ModelInfo::from_endpoint(&self.config.api_url))
    }

    fn synthesize(&self, request: &SynthesizeRequest) -> Result<Vec<u8>, BackendError> {
        let response = self
            .authorize(self.client.post(&self.config.api_url))
            .header(ACCEPT, "audio/wav")
            .json(request)
            .send()
            .map_err(|e| BackendError::ConnectionFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_for(response));
        }

        let audio = response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

        if audio.is_empty() {
            return Err(BackendError::InvalidResponse(
                "Empty audio response".to_string(),
            ));
        }

        Ok(audio)
    }
}
