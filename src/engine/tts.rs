//! TTS Engine implementation.

use std::sync::OnceLock;

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::audio::{AudioError, SpeechAudio, decode_wav, format_duration};
use crate::backend::{Backend, BackendError, ModelInfo, SynthesizeRequest};
use crate::cache::AudioCache;
use crate::cli::SynthesisInput;
use crate::voice::resolve_voice_id;

/// Service name reported by health checks.
pub const SERVICE_NAME: &str = "Kokoro TTS";

/// Number of characters of the text echoed in progress messages.
const PREVIEW_CHARS: usize = 50;

/// Errors that can occur during TTS operations.
#[derive(Error, Debug)]
pub enum TTSError {
    #[error("Model error: {0}")]
    BackendError(#[from] BackendError),

    #[error("Audio error: {0}")]
    AudioError(#[from] AudioError),
}

/// Result of a health check, printed as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: String,
    pub timestamp: String,
    pub service: &'static str,
}

impl HealthReport {
    /// Whether the backend answered the check.
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// The main TTS engine that orchestrates between components.
pub struct TTSEngine<B: Backend> {
    backend: B,
    cache: Option<AudioCache>,
    temperature: f32,
    model: OnceLock<ModelInfo>,
}

impl<B: Backend> TTSEngine<B> {
    /// Create a new TTS engine without an audio cache.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            cache: None,
            temperature: 0.7,
            model: OnceLock::new(),
        }
    }

    /// Serve repeated syntheses from `cache`.
    pub fn with_cache(mut self, cache: AudioCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Set the sampling temperature sent to the model.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Whether the model has been loaded by this engine.
    pub fn is_model_loaded(&self) -> bool {
        self.model.get().is_some()
    }

    /// Load the model on first use and return the cached descriptor.
    pub fn model(&self) -> Result<&ModelInfo, TTSError> {
        if let Some(model) = self.model.get() {
            return Ok(model);
        }

        info!("Loading Kokoro model...");
        let model = self.backend.load_model()?;
        info!("Model loaded: {}", model.model_id);

        Ok(self.model.get_or_init(|| model))
    }

    /// Check backend health status.
    ///
    /// Connection failures are reported as unhealthy rather than as errors.
    pub fn health_check(&self) -> HealthReport {
        let healthy = match self.backend.health() {
            Ok(healthy) => healthy,
            Err(e) => {
                warn!("Health check failed: {}", e);
                false
            }
        };

        HealthReport {
            status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
            timestamp: Utc::now().to_rfc3339(),
            service: SERVICE_NAME,
        }
    }

    /// Synthesize speech for validated input.
    ///
    /// The returned audio has been decoded from WAV; backend output that is not
    /// audio is rejected.
    pub fn synthesize(&self, input: &SynthesisInput) -> Result<SpeechAudio, TTSError> {
        let voice = resolve_voice_id(&input.voice_id);
        if voice != input.voice_id {
            info!("Using preset {} ({})", input.voice_id, voice);
        }

        if let Some(audio) = self.cached(&input.text, voice, input.speed) {
            return Ok(audio);
        }

        self.model()?;

        let preview: String = input.text.chars().take(PREVIEW_CHARS).collect();
        info!("Generating audio for: '{}...'", preview);

        let request = SynthesizeRequest::new(input.text.as_str(), voice)
            .with_speed(input.speed)
            .with_temperature(self.temperature);

        let bytes = self.backend.synthesize(&request)?;
        debug!("Backend returned {} bytes", bytes.len());

        let audio = decode_wav(&bytes)?;
        info!(
            "Audio generated ({} samples, {})",
            audio.samples.len(),
            format_duration(audio.duration_secs())
        );

        self.store(&input.text, voice, input.speed, &audio);

        Ok(audio)
    }

    fn cached(&self, text: &str, voice: &str, speed: f32) -> Option<SpeechAudio> {
        let bytes = self.cache.as_ref()?.get(text, voice, speed)?;

        match decode_wav(&bytes) {
            Ok(audio) => {
                info!("Audio found in cache");
                Some(audio)
            }
            Err(e) => {
                warn!("Ignoring unreadable cache entry: {}", e);
                None
            }
        }
    }

    fn store(&self, text: &str, voice: &str, speed: f32, audio: &SpeechAudio) {
        let Some(cache) = &self.cache else {
            return;
        };

        let wav = match audio.wav_bytes() {
            Ok(wav) => wav,
            Err(e) => {
                warn!("Could not encode audio for cache: {}", e);
                return;
            }
        };

        match cache.save(text, voice, speed, &wav) {
            Ok(path) => debug!("Cached audio at {}", path.display()),
            Err(e) => warn!("Could not write audio cache: {}", e),
        }
    }
}
