//! CLI argument definitions and input validation.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use thiserror::Error;

use crate::backend::{BackendConfig, DEFAULT_API_URL};
use crate::voice::Gender;

/// Maximum number of characters accepted for synthesis.
pub const MAX_TEXT_CHARS: usize = 500;

/// Lowest accepted speed multiplier.
pub const MIN_SPEED: f32 = 0.5;

/// Highest accepted speed multiplier.
pub const MAX_SPEED: f32 = 2.0;

/// Usage line shown when positional arguments are missing.
pub const USAGE: &str = "Usage: kokoro-tts <text> <voice_id> [speed]";

/// Kokoro text-to-speech CLI.
///
/// Synthesized audio is written to stdout; progress and errors go to stderr.
#[derive(Parser, Debug)]
#[command(name = "kokoro-tts")]
#[command(about = "Synthesize speech with Kokoro-82M and write the audio to stdout")]
#[command(version)]
#[command(allow_negative_numbers = true)]
pub struct Args {
    /// Text to synthesize (at most 500 characters)
    #[arg(required_unless_present_any = ["list_voices", "health", "clean_cache"])]
    pub text: Option<String>,

    /// Voice id (e.g. "af_bella") or preset name (e.g. "NARRATOR")
    #[arg(required_unless_present_any = ["list_voices", "health", "clean_cache"])]
    pub voice_id: Option<String>,

    /// Speech speed multiplier (0.5 to 2.0)
    #[arg(default_value = "1.0")]
    pub speed: f32,

    /// Output audio format
    #[arg(short, long, value_enum, default_value = "wav")]
    pub format: OutputFormat,

    /// Write audio to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Inference endpoint for the Kokoro model
    #[arg(long, env = "KOKORO_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Bearer token for the inference endpoint
    #[arg(long, env = "HUGGINGFACE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout: u64,

    /// Sampling temperature passed to the model
    #[arg(long, default_value = "0.7")]
    pub temperature: f32,

    /// Directory for cached audio files
    #[arg(long, env = "KOKORO_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Always synthesize, bypassing the audio cache
    #[arg(long)]
    pub no_cache: bool,

    /// Remove cached audio older than DAYS and exit
    #[arg(long, value_name = "DAYS", num_args = 0..=1, default_missing_value = "7")]
    pub clean_cache: Option<u64>,

    /// List voice presets and exit
    #[arg(long)]
    pub list_voices: bool,

    /// Only list presets of this gender
    #[arg(long, value_enum, requires = "list_voices")]
    pub gender: Option<Gender>,

    /// Check that the inference endpoint is reachable and exit
    #[arg(long)]
    pub health: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Validate the positional arguments into a synthesis input.
    pub fn synthesis_input(&self) -> Result<SynthesisInput, ValidationError> {
        let text = self
            .text
            .as_deref()
            .ok_or(ValidationError::MissingArgument("text"))?;
        let voice_id = self
            .voice_id
            .as_deref()
            .ok_or(ValidationError::MissingArgument("voice_id"))?;

        SynthesisInput::new(text, voice_id, self.speed)
    }

    /// Backend settings derived from the command line and environment.
    pub fn backend_config(&self) -> BackendConfig {
        BackendConfig {
            api_url: self.api_url.clone(),
            api_key: self.api_key.clone().filter(|key| !key.is_empty()),
            timeout: Duration::from_secs(self.timeout),
        }
    }
}

/// Encoding of the audio written to the output.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// RIFF/WAVE file
    #[default]
    Wav,

    /// Raw signed 16-bit little-endian mono samples
    Pcm,
}

impl OutputFormat {
    /// Returns the CLI argument string for this format.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Wav => "wav",
            OutputFormat::Pcm => "pcm",
        }
    }
}

/// Input that passed validation and is ready for synthesis.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisInput {
    pub text: String,
    pub voice_id: String,
    pub speed: f32,
}

/// Errors produced while validating synthesis input.
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Missing required argument <{0}>\n{usage}", usage = USAGE)]
    MissingArgument(&'static str),

    #[error("Text cannot be empty")]
    EmptyText,

    #[error("Text too long (maximum 500 characters, got {0})")]
    TextTooLong(usize),

    #[error("Speed must be between 0.5 and 2.0 (got {0})")]
    SpeedOutOfRange(f32),
}

impl SynthesisInput {
    /// Validate text, voice and speed.
    ///
    /// Text length is measured in characters, not bytes. Checks run in the
    /// order empty text, text length, speed.
    ///
    /// # Examples
    /// ```
    /// use kokoro_tts::cli::SynthesisInput;
    /// let input = SynthesisInput::new("Hello there", "af_bella", 1.0).unwrap();
    /// assert_eq!(input.voice_id, "af_bella");
    /// ```
    pub fn new(text: &str, voice_id: &str, speed: f32) -> Result<Self, ValidationError> {
        if text.is_empty() {
            return Err(ValidationError::EmptyText);
        }

        let chars = text.chars().count();
        if chars > MAX_TEXT_CHARS {
            return Err(ValidationError::TextTooLong(chars));
        }

        // NaN falls outside the range
        if !(MIN_SPEED..=MAX_SPEED).contains(&speed) {
            return Err(ValidationError::SpeedOutOfRange(speed));
        }

        Ok(Self {
            text: text.to_string(),
            voice_id: voice_id.to_string(),
            speed,
        })
    }
}
