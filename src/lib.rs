//! kokoro-tts: Kokoro text-to-speech for subprocess callers.
//!
//! This crate validates synthesis requests, drives a Kokoro-82M inference
//! backend, verifies that what comes back is real audio, and writes it as
//! WAV or raw PCM.

pub mod audio;
pub mod backend;
pub mod cache;
pub mod cli;
pub mod engine;
pub mod voice;
