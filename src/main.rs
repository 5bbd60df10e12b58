//! kokoro-tts CLI entry point.
//!
//! Audio goes to stdout (or `--output`); every status line goes to stderr.

use std::fs;
use std::io::{IsTerminal, Write};

use anyhow::{Context, Result, bail};
use clap::Parser;
use kokoro_tts::audio::{estimate_duration, format_duration};
use kokoro_tts::backend::{Backend, create_backend};
use kokoro_tts::cache::{AudioCache, CacheError};
use kokoro_tts::cli::{Args, OutputFormat};
use kokoro_tts::engine::TTSEngine;
use kokoro_tts::voice::{self, Gender};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // clap uses status 2 for usage errors; callers expect 1
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    init_tracing(args.verbose);

    // Handle utility commands first
    if args.list_voices {
        list_voices(args.gender);
        return Ok(());
    }

    if let Some(days) = args.clean_cache {
        return clean_cache(&args, days);
    }

    let backend = create_backend(args.backend_config()).context("Failed to create backend")?;
    let engine = TTSEngine::new(backend).with_temperature(args.temperature);

    if args.health {
        return health(&engine);
    }

    let input = args.synthesis_input()?;
    debug!(
        "Estimated speech length: {}",
        format_duration(estimate_duration(&input.text) as f64)
    );

    let engine = if args.no_cache {
        engine
    } else {
        match open_cache(&args) {
            Ok(cache) => engine.with_cache(cache),
            Err(e) => {
                warn!("Audio cache disabled: {}", e);
                engine
            }
        }
    };

    let audio = engine
        .synthesize(&input)
        .context("Failed to generate audio")?;

    let bytes = match args.format {
        OutputFormat::Wav => audio.wav_bytes().context("Failed to encode WAV")?,
        OutputFormat::Pcm => audio.to_pcm_bytes(),
    };

    match &args.output {
        Some(path) => {
            fs::write(path, &bytes)
                .with_context(|| format!("Failed to write audio to: {}", path.display()))?;
            info!("Audio saved to: {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(&bytes)
                .and_then(|()| stdout.flush())
                .context("Failed to write audio to stdout")?;
        }
    }

    info!(
        "Wrote {} bytes of {} audio at {} Hz",
        bytes.len(),
        args.format.as_str(),
        audio.sample_rate
    );

    Ok(())
}

/// Send all logging to stderr so stdout carries only audio.
fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("kokoro_tts={level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn open_cache(args: &Args) -> Result<AudioCache, CacheError> {
    match &args.cache_dir {
        Some(dir) => Ok(AudioCache::with_dir(dir.clone())),
        None => AudioCache::new(),
    }
}

fn list_voices(gender: Option<Gender>) {
    let voices = match gender {
        Some(gender) => voice::voices_by_gender(gender),
        None => voice::all_voices().iter().collect(),
    };

    if voices.is_empty() {
        println!("No voices found.");
        return;
    }

    println!("Available voices:");
    for preset in voices {
        println!("  {} -> {} ({})", preset.key, preset.id, preset.name);
        println!("    {}", preset.description);
        println!("    Traits: {}", preset.personality.join(", "));
    }
}

fn clean_cache(args: &Args, days: u64) -> Result<()> {
    let cache = open_cache(args).context("Failed to locate audio cache")?;

    let deleted = cache
        .clean_older_than(days)
        .with_context(|| format!("Failed to clean cache at {}", cache.dir().display()))?;

    info!(
        "Removed {} cached file(s) older than {} day(s) from {}",
        deleted,
        days,
        cache.dir().display()
    );
    Ok(())
}

fn health<B: Backend>(engine: &TTSEngine<B>) -> Result<()> {
    let report = engine.health_check();

    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("Failed to serialize health report")?
    );

    if !report.is_healthy() {
        bail!("Kokoro backend is unhealthy");
    }
    Ok(())
}
