use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Content language code (ISO)
    #[serde(default = "default_language")]
    pub language: String,

    /// Default niche/subject for generated content
    #[serde(default)]
    pub niche: String,

    /// Selected text backend
    #[serde(default)]
    pub text_backend: TextBackend,

    /// Local model settings
    #[serde(default)]
    pub local_model: LocalModelConfig,

    /// Font file name used for image captions
    #[serde(default = "default_font")]
    pub font: String,

    /// Directory containing font files
    #[serde(default = "default_fonts_dir")]
    pub fonts_dir: PathBuf,

    /// Root under which the `.mp` output directory lives
    #[serde(default = "default_output_root")]
    pub output_root: PathBuf,

    /// Audio settings
    #[serde(default)]
    pub audio: AudioConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Text backend selector
///
/// Any unrecognised selector deserializes as `Templates`, which keeps the
/// pipeline on its deterministic path.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TextBackend {
    // @backend: Neural generation through a local LLM server
    LocalLlm,
    // @backend: Deterministic templates only
    #[default]
    #[serde(other)]
    Templates,
}

impl TextBackend {
    // @returns: Selector identifier as written in the config file
    pub fn identifier(&self) -> &'static str {
        match self {
            Self::LocalLlm => "local_llm",
            Self::Templates => "templates",
        }
    }

    // @returns: Backend for a free-form selector, templates when unknown
    pub fn from_selector(selector: Option<&str>) -> Self {
        match selector.map(|s| s.trim().to_lowercase()) {
            Some(s) if s == "local_llm" => Self::LocalLlm,
            _ => Self::Templates,
        }
    }
}

impl std::fmt::Display for TextBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

impl std::str::FromStr for TextBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "local_llm" => Ok(Self::LocalLlm),
            "templates" => Ok(Self::Templates),
            _ => Err(anyhow!("Invalid text backend: {}", s)),
        }
    }
}

/// Local model configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LocalModelConfig {
    // @field: On-disk model directory, preferred when it exists
    #[serde(default = "default_model_dir")]
    pub model_dir: PathBuf,

    // @field: Symbolic model identifier used when no directory is present
    #[serde(default = "default_model_id")]
    pub model_id: String,

    // @field: Local LLM server URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    // @field: Timeout seconds for probes and generation requests
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Timeout seconds for downloading or registering the model
    #[serde(default = "default_pull_timeout_secs")]
    pub pull_timeout_secs: u64,
}

impl Default for LocalModelConfig {
    fn default() -> Self {
        Self {
            model_dir: default_model_dir(),
            model_id: default_model_id(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            pull_timeout_secs: default_pull_timeout_secs(),
        }
    }
}

/// Audio output configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AudioConfig {
    /// Sample rate of the fallback tone in Hz
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_language() -> String {
    "fr".to_string()
}

fn default_font() -> String {
    "bold_font.ttf".to_string()
}

fn default_fonts_dir() -> PathBuf {
    PathBuf::from("fonts")
}

fn default_output_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_model_dir() -> PathBuf {
    PathBuf::from("models/qwen2.5-0.5b")
}

// Ollama registry name
fn default_model_id() -> String {
    "qwen2.5:0.5b".to_string()
}

fn default_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_pull_timeout_secs() -> u64 {
    3600
}

fn default_sample_rate() -> u32 {
    22050
}

impl Config {
    /// Load a configuration file, writing the defaults when it does not exist yet
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))?;
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        crate::language_utils::get_language_name(&self.language)?;

        if self.audio.sample_rate == 0 {
            return Err(anyhow!("Audio sample rate must be greater than zero"));
        }

        if self.text_backend == TextBackend::LocalLlm {
            if self.local_model.endpoint.trim().is_empty() {
                return Err(anyhow!("An endpoint is required for the local_llm backend"));
            }
            if self.local_model.model_id.trim().is_empty() && !self.local_model.model_dir.is_dir() {
                return Err(anyhow!("Either a model directory or a model id is required for the local_llm backend"));
            }
        }

        Ok(())
    }

    /// Path of the font file used for captions
    pub fn font_path(&self) -> PathBuf {
        self.fonts_dir.join(&self.font)
    }

    /// Scoped temporary-output directory
    pub fn mp_dir(&self) -> PathBuf {
        self.output_root.join(".mp")
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            language: default_language(),
            niche: String::new(),
            text_backend: TextBackend::default(),
            local_model: LocalModelConfig::default(),
            font: default_font(),
            fonts_dir: default_fonts_dir(),
            output_root: default_output_root(),
            audio: AudioConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
