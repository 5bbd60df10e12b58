//! Backend request/response types.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hosted inference endpoint for Kokoro-82M.
pub const DEFAULT_API_URL: &str =
    "https://api-inference.huggingface.co/models/hexgrad/Kokoro-82M";

/// Errors that can occur when communicating with the backend.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Unauthorized: check HUGGINGFACE_API_KEY ({0})")]
    Unauthorized(String),

    #[error("Model is still loading (estimated {0:.0}s)")]
    ModelLoading(f32),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Connection settings for the inference backend.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Descriptor of a loaded model, kept for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    /// Model repository id, e.g. `hexgrad/Kokoro-82M`.
    pub model_id: String,
    pub endpoint: String,
}

impl ModelInfo {
    /// Build a descriptor for an endpoint URL.
    ///
    /// The model id is taken from the last two path segments; the
    /// `scheme://authority` prefix never contributes. An endpoint without a
    /// path is identified by its authority.
    pub fn from_endpoint(endpoint: &str) -> Self {
        let (authority, path) = match endpoint.split_once("://") {
            Some((_, rest)) => rest.split_once('/').unwrap_or((rest, "")),
            None => ("", endpoint),
        };

        let mut segments = path.rsplit('/').filter(|s| !s.is_empty());
        let model_id = match (segments.next(), segments.next()) {
            (Some(name), Some(owner)) => format!("{owner}/{name}"),
            (Some(name), None) => name.to_string(),
            _ => authority.to_string(),
        };

        Self {
            model_id,
            endpoint: endpoint.to_string(),
        }
    }
}

/// Generation parameters sent alongside the text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisParameters {
    pub speaker: String,
    #[serde(default = "default_speed")]
    pub speed: f32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

/// Request for speech synthesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesizeRequest {
    #[serde(rename = "inputs")]
    pub text: String,
    pub parameters: SynthesisParameters,
}

fn default_speed() -> f32 {
    1.0
}

fn default_temperature() -> f32 {
    0.7
}

impl SynthesizeRequest {
    /// Create a new synthesis request.
    pub fn new(text: impl Into<String>, speaker: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parameters: SynthesisParameters {
                speaker: speaker.into(),
                speed: default_speed(),
                temperature: default_temperature(),
            },
        }
    }

    /// Set the speech speed.
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.parameters.speed = speed;
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.parameters.temperature = temperature;
        self
    }
}

/// Error body returned by the inference API.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: Option<String>,
    pub estimated_time: Option<f32>,
}
