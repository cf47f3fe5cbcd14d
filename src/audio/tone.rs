//! Sine-tone placeholder for speech.
//!
//! The tone stands in for narration when no speech engine exists. It is not
//! meant to be intelligible; only its length tracks the text.

use std::f64::consts::PI;
use std::path::{Path, PathBuf};

use log::debug;

use crate::errors::AppError;
use crate::file_utils::FileManager;

/// Default sample rate in Hz
pub const DEFAULT_SAMPLE_RATE: u32 = 22050;

/// Tone frequency in Hz
pub const TONE_FREQUENCY_HZ: f64 = 220.0;

/// Peak amplitude of the 16-bit samples
pub const TONE_AMPLITUDE: f64 = 12000.0;

/// Shortest tone, in seconds
pub const MIN_TONE_SECS: u32 = 2;

/// Longest tone, in seconds
pub const MAX_TONE_SECS: u32 = 30;

/// Tone length for `text`: one second per 18 characters, within [2, 30]
pub fn tone_duration_secs(text: &str) -> u32 {
    let chars = text.chars().count() / 18;
    (chars.min(MAX_TONE_SECS as usize) as u32).max(MIN_TONE_SECS)
}

/// Writes mono 16-bit PCM sine tones
#[derive(Debug, Clone, Copy)]
pub struct ToneSynthesizer {
    sample_rate: u32,
}

impl Default for ToneSynthesizer {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE)
    }
}

impl ToneSynthesizer {
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Write a tone as long as `text` would take to read to `destination`
    pub fn synthesize<P: AsRef<Path>>(&self, text: &str, destination: P) -> Result<PathBuf, AppError> {
        let destination = destination.as_ref();
        let duration = tone_duration_secs(text);
        let total_samples = u64::from(duration) * u64::from(self.sample_rate);
        debug!(
            "Writing {}s placeholder tone ({} samples) to {}",
            duration,
            total_samples,
            destination.display()
        );

        FileManager::ensure_parent(destination)?;

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(destination, spec)?;

        let step = 2.0 * PI * TONE_FREQUENCY_HZ / f64::from(self.sample_rate);
        for i in 0..total_samples {
            let value = (TONE_AMPLITUDE * (step * i as f64).sin()) as i16;
            writer.write_sample(value)?;
        }
        writer.finalize()?;

        Ok(destination.to_path_buf())
    }
}
