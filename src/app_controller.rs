use anyhow::{Context, Result};
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_config::Config;
use crate::audio::{SpeechSynthesizer, ToneSynthesizer};
use crate::file_utils::FileManager;
use crate::gateway::ModelGateway;
use crate::render::ImageComposer;
use crate::script_composer::ScriptComposer;
use crate::subtitle_timer::SubtitleTimer;
use crate::text_responder::TextResponder;

// @module: Application controller for offline content generation

/// Owns every pipeline component, built from one configuration
///
/// The text and script components share a single gateway, so the backend is
/// loaded (or found unavailable) once for the whole run.
#[derive(Debug)]
pub struct Controller {
    // @field: App configuration
    config: Config,
    gateway: Arc<ModelGateway>,
    responder: TextResponder,
    composer: ScriptComposer,
    timer: SubtitleTimer,
    speech: SpeechSynthesizer,
    mp_dir: PathBuf,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let gateway = Arc::new(ModelGateway::from_config(&config));
        Self::with_gateway(config, gateway)
    }

    /// Create a controller around an existing gateway
    pub fn with_gateway(config: Config, gateway: Arc<ModelGateway>) -> Result<Self> {
        let mp_dir = FileManager::mp_dir(&config.output_root)
            .context("Failed to prepare output directory")?;
        debug!(
            "Controller ready (backend: {}, output: {})",
            config.text_backend,
            mp_dir.display()
        );

        Ok(Self {
            responder: TextResponder::new(Arc::clone(&gateway)),
            composer: ScriptComposer::new(Arc::clone(&gateway)),
            timer: SubtitleTimer::new(),
            speech: SpeechSynthesizer::tone_only(ToneSynthesizer::new(config.audio.sample_rate), &mp_dir),
            gateway,
            config,
            mp_dir,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn gateway(&self) -> &Arc<ModelGateway> {
        &self.gateway
    }

    /// Scoped output directory (`<output_root>/.mp`)
    pub fn mp_dir(&self) -> &Path {
        &self.mp_dir
    }

    pub fn speech(&self) -> &SpeechSynthesizer {
        &self.speech
    }

    /// Replace the speech facade, e.g. to plug in a real engine
    pub fn set_speech(&mut self, speech: SpeechSynthesizer) {
        self.speech = speech;
    }

    /// Reply to a content prompt, defaulting niche and language from config
    pub fn respond(&self, prompt: &str, niche: Option<&str>, language: Option<&str>) -> String {
        self.responder.respond(
            prompt,
            niche.unwrap_or(&self.config.niche),
            language.unwrap_or(&self.config.language),
        )
    }

    /// Compose a narration script
    pub fn script(&self, subject: &str, sentence_count: i64, language: Option<&str>) -> String {
        self.composer
            .compose(subject, sentence_count, language.unwrap_or(&self.config.language))
    }

    /// Write timed subtitles for `script`
    pub fn subtitles(&self, script: &str, destination: &Path) -> Result<PathBuf> {
        let path = self.timer.time(script, destination)?;
        info!("Subtitles written to {}", path.display());
        Ok(path)
    }

    /// Render a placeholder image for `prompt`
    ///
    /// The font is read at call time so font changes between runs apply.
    pub fn image(&self, prompt: &str) -> Result<PathBuf> {
        let composer = ImageComposer::new(&self.config.font_path(), &self.mp_dir);
        Ok(composer.compose(prompt)?)
    }

    /// Speak `text`, to `destination` or `.mp/audio.wav`
    pub fn speak(&self, text: &str, destination: Option<&Path>) -> Result<PathBuf> {
        let path = self.speech.synthesize(text, destination)?;
        info!("Audio written to {}", path.display());
        Ok(path)
    }
}
