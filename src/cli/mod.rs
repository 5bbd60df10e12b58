//! CLI argument parsing and validation.

mod args;

pub use args::{
    Args, MAX_SPEED, MAX_TEXT_CHARS, MIN_SPEED, OutputFormat, SynthesisInput, USAGE,
    ValidationError,
};
