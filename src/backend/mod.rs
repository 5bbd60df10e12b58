//! Backend communication with the Kokoro inference endpoint.
//!
//! Provides the trait the engine synthesizes through and the HTTP
//! implementation that talks to a hosted Kokoro-82M model.

mod client;
mod types;

pub use client::{HEALTH_TIMEOUT, HttpBackend};
pub use types::{
    BackendConfig, BackendError, DEFAULT_API_URL, ModelInfo, SynthesisParameters,
    SynthesizeRequest,
};

/// Trait for TTS backend communication.
///
/// This trait abstracts the model runtime, allowing for mock
/// implementations in tests.
#[cfg_attr(test, mockall::automock)]
pub trait Backend: Send + Sync {
    /// Check whether the model endpoint is reachable.
    fn health(&self) -> Result<bool, BackendError>;

    /// Prepare the model for generation.
    ///
    /// Called at most once per engine; the result is cached.
    fn load_model(&self) -> Result<ModelInfo, BackendError>;

    /// Synthesize speech from text.
    ///
    /// # Arguments
    /// * `request` - Synthesis request parameters
    ///
    /// # Returns
    /// Encoded audio bytes as returned by the model
    fn synthesize(&self, request: &SynthesizeRequest) -> Result<Vec<u8>, BackendError>;
}

/// Create a backend for the given configuration.
pub fn create_backend(config: BackendConfig) -> Result<HttpBackend, BackendError> {
    HttpBackend::new(config)
}
