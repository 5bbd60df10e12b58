//! WAV decoding and encoding of synthesized speech.

use std::io::Cursor;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use thiserror::Error;

/// Errors that can occur while handling audio data.
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Backend returned audio in an unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Audio contains no samples")]
    Empty,

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
}

/// Mono speech samples normalized to [-1.0, 1.0].
///
/// Audio decoded from a WAV file keeps the verified file bytes so they can be
/// written out without re-quantizing.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    source: Option<Vec<u8>>,
}

impl SpeechAudio {
    /// Create audio from mono samples.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
            source: None,
        }
    }

    /// The WAV file this audio was decoded from, if any.
    pub fn source_wav(&self) -> Option<&[u8]> {
        self.source.as_deref()
    }

    /// WAV bytes for output: the original file when there is one, otherwise
    /// a 16-bit mono encoding of the samples.
    pub fn wav_bytes(&self) -> Result<Vec<u8>, AudioError> {
        match &self.source {
            Some(bytes) => Ok(bytes.clone()),
            None => self.to_wav_bytes(),
        }
    }

    /// Duration of the audio in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }

    /// Encode as a 16-bit mono WAV file.
    pub fn to_wav_bytes(&self) -> Result<Vec<u8>, AudioError> {
        let spec = WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };

        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut cursor, spec)?;
            for &sample in &self.samples {
                writer.write_sample(quantize(sample))?;
            }
            writer.finalize()?;
        }

        Ok(cursor.into_inner())
    }

    /// Encode as raw signed 16-bit little-endian samples.
    pub fn to_pcm_bytes(&self) -> Vec<u8> {
        self.samples
            .iter()
            .flat_map(|&s| quantize(s).to_le_bytes())
            .collect()
    }
}

fn quantize(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16
}

/// Name the container of non-WAV audio for error messages.
fn sniff_format(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(b"fLaC") {
        "flac"
    } else if bytes.starts_with(b"OggS") {
        "ogg"
    } else if bytes.starts_with(b"ID3") || bytes.starts_with(&[0xFF, 0xFB]) {
        "mp3"
    } else if bytes.first() == Some(&b'{') {
        "json"
    } else {
        "unknown"
    }
}

/// Decode WAV bytes into mono samples.
///
/// Multi-channel audio is mixed down by averaging each frame.
///
/// # Errors
/// Returns `UnsupportedFormat` if the data is not RIFF/WAVE, `Wav` if the
/// file is malformed, and `Empty` if it holds no samples.
pub fn decode_wav(bytes: &[u8]) -> Result<SpeechAudio, AudioError> {
    if bytes.len() < 12 || &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
        return Err(AudioError::UnsupportedFormat(sniff_format(bytes).to_string()));
    }

    let reader = WavReader::new(Cursor::new(bytes))?;
    let spec = reader.spec();

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader.into_samples::<f32>().collect::<Result<_, _>>()?,
        SampleFormat::Int => {
            let scale = (1_i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()?
        }
    };

    let channels = usize::from(spec.channels.max(1));
    let samples: Vec<f32> = if channels == 1 {
        interleaved
    } else {
        interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect()
    };

    if samples.is_empty() {
        return Err(AudioError::Empty);
    }

    Ok(SpeechAudio {
        samples,
        sample_rate: spec.sample_rate,
        source: Some(bytes.to_vec()),
    })
}
