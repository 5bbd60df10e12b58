//! Voice presets for character dialogue and narration.
//!
//! Voice ids are opaque to this crate; presets only give friendly names to
//! a handful of Kokoro voices.

mod presets;

pub use presets::{
    AgeRange, Gender, VoicePreset, all_voices, get_preset, get_voice_by_id, resolve_voice_id,
    voices_by_gender,
};
