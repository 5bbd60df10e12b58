//! TTS Engine orchestrator.
//!
//! This module provides the main engine that coordinates between
//! the CLI input, the audio cache, and the Backend to perform synthesis.

mod tts;

pub use tts::{HealthReport, SERVICE_NAME, TTSEngine, TTSError};
