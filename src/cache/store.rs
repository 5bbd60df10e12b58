//! On-disk store for synthesized WAV files.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::debug;

const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// Errors that can occur while using the audio cache.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("No cache directory available on this platform")]
    NoCacheDir,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Caches synthesized audio keyed by text, voice and speed.
pub struct AudioCache {
    dir: PathBuf,
}

/// Derive the cache key for a synthesis.
pub fn cache_key(text: &str, voice_id: &str, speed: f32) -> String {
    let digest = Sha256::digest(format!("{text}-{voice_id}-{speed:.2}").as_bytes());
    format!("{digest:x}")
}

impl AudioCache {
    /// Create a cache in the platform cache directory.
    pub fn new() -> Result<Self, CacheError> {
        let dir = dirs::cache_dir()
            .ok_or(CacheError::NoCacheDir)?
            .join("kokoro-tts")
            .join("audio");

        Ok(Self { dir })
    }

    /// Create a cache in a custom directory.
    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Get the cache directory path.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the cached file for a synthesis.
    pub fn path_for(&self, text: &str, voice_id: &str, speed: f32) -> PathBuf {
        self.dir
            .join(format!("{}.wav", cache_key(text, voice_id, speed)))
    }

    /// Load cached audio, if present.
    pub fn get(&self, text: &str, voice_id: &str, speed: f32) -> Option<Vec<u8>> {
        let path = self.path_for(text, voice_id, speed);
        match std::fs::read(&path) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                debug!("Cache miss for {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Store audio and return the file path.
    pub fn save(
        &self,
        text: &str,
        voice_id: &str,
        speed: f32,
        wav: &[u8],
    ) -> Result<PathBuf, CacheError> {
        std::fs::create_dir_all(&self.dir)?;

        let path = self.path_for(text, voice_id, speed);
        std::fs::write(&path, wav)?;

        Ok(path)
    }

    /// Remove cached files last modified more than `days` days ago.
    ///
    /// Returns the number of files removed. A missing directory is empty.
    pub fn clean_older_than(&self, days: u64) -> Result<usize, CacheError> {
        let max_age = Duration::from_secs(days.saturating_mul(SECS_PER_DAY));
        self.clean_older_than_duration(max_age, SystemTime::now())
    }

    pub(crate) fn clean_older_than_duration(
        &self,
        max_age: Duration,
        now: SystemTime,
    ) -> Result<usize, CacheError> {
        if !self.dir.exists() {
            return Ok(0);
        }

        let mut deleted = 0;

        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }

            let modified = std::fs::metadata(&path)?.modified()?;
            let age = now.duration_since(modified).unwrap_or_default();

            if age > max_age {
                std::fs::remove_file(&path)?;
                deleted += 1;
            }
        }

        Ok(deleted)
    }
}
