//! Audio handling for synthesized speech.
//!
//! Verifies that backend output really is audio, converts it to the
//! requested output encoding, and estimates durations.

mod wav;

pub use wav::{AudioError, SpeechAudio, decode_wav};

/// Speaking rate used for duration estimates.
const WORDS_PER_MINUTE: f64 = 150.0;

/// Format a duration in seconds as `m:ss`.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0).floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Estimate how many seconds it takes to speak `text`, rounded up.
pub fn estimate_duration(text: &str) -> u64 {
    let words = text.split_whitespace().count() as f64;
    (words / (WORDS_PER_MINUTE / 60.0)).ceil() as u64
}
