/*!
 * Speech output.
 *
 * `SpeechSynthesizer` routes text to a real `SpeechEngine` when one is
 * plugged in and to the sine-tone placeholder otherwise.
 */

use std::fmt::Debug;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::errors::AppError;

pub mod tone;

pub use tone::{tone_duration_secs, ToneSynthesizer, DEFAULT_SAMPLE_RATE};

/// File name of the default narration output inside `.mp`
pub const DEFAULT_AUDIO_FILE: &str = "audio.wav";

/// A real text-to-speech engine
pub trait SpeechEngine: Send + Sync + Debug {
    /// Speak `text` into a WAV file at `destination`
    fn speak(&self, text: &str, destination: &Path) -> Result<(), AppError>;
}

/// Speech facade with a tone fallback
#[derive(Debug)]
pub struct SpeechSynthesizer {
    engine: Option<Box<dyn SpeechEngine>>,
    tone: ToneSynthesizer,
    default_output: PathBuf,
}

impl SpeechSynthesizer {
    /// Synthesizer that only produces placeholder tones
    pub fn tone_only(tone: ToneSynthesizer, mp_dir: &Path) -> Self {
        Self {
            engine: None,
            tone,
            default_output: mp_dir.join(DEFAULT_AUDIO_FILE),
        }
    }

    /// Plug in a real speech engine
    pub fn with_engine(mut self, engine: Box<dyn SpeechEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Whether a real engine is configured
    pub fn has_engine(&self) -> bool {
        self.engine.is_some()
    }

    /// Path used when no destination is given
    pub fn default_output(&self) -> &Path {
        &self.default_output
    }

    /// Speak `text` to `destination` (or the default output)
    ///
    /// Engine failures degrade to the placeholder tone.
    pub fn synthesize(&self, text: &str, destination: Option<&Path>) -> Result<PathBuf, AppError> {
        let destination = destination.unwrap_or(&self.default_output);

        if let Some(engine) = &self.engine {
            match engine.speak(text, destination) {
                Ok(()) => return Ok(destination.to_path_buf()),
                Err(e) => warn!("Speech engine failed, writing placeholder tone: {}", e),
            }
        } else {
            debug!("No speech engine configured, writing placeholder tone");
        }

        self.tone.synthesize(text, destination)
    }
}
