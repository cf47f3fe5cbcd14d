/*!
 * Text-generation backends.
 *
 * This module contains the seams the model gateway loads through:
 * - `BackendLoader`: turns a resolved model source into a ready generator
 * - `TextGenerator`: produces raw text for a prompt
 * - `ollama`: local LLM server backend (feature `local-llm`)
 * - `mock`: scripted backends for tests
 */

use std::fmt::Debug;
use std::path::{Path, PathBuf};

use crate::errors::ProviderError;

/// Sampling parameters sent with every generation request
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    /// Maximum number of new tokens to produce
    pub max_new_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Nucleus sampling threshold
    pub top_p: f32,
    /// Number of sequences to return
    pub num_return_sequences: u32,
}

impl GenerationParams {
    /// Fixed stochastic sampling with the given token budget
    pub fn sampling(max_new_tokens: u32) -> Self {
        Self {
            max_new_tokens,
            temperature: 0.7,
            top_p: 0.9,
            num_return_sequences: 1,
        }
    }
}

/// Where a model is loaded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// Model files already on disk
    LocalDir(PathBuf),
    /// Symbolic identifier resolved through a model registry
    Identifier(String),
}

impl ModelSource {
    /// Prefer the on-disk directory when it exists, otherwise the identifier
    pub fn resolve(model_dir: &Path, model_id: &str) -> Self {
        if model_dir.is_dir() {
            ModelSource::LocalDir(model_dir.to_path_buf())
        } else {
            ModelSource::Identifier(model_id.to_string())
        }
    }
}

impl std::fmt::Display for ModelSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelSource::LocalDir(path) => write!(f, "{}", path.display()),
            ModelSource::Identifier(id) => write!(f, "{}", id),
        }
    }
}

/// A loaded text-generation backend
pub trait TextGenerator: Send + Sync + Debug {
    /// Generate raw text for a prompt
    ///
    /// The returned text may still echo the prompt; the gateway strips it.
    fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String, ProviderError>;
}

/// Loads a backend from a model source
///
/// Loading is expensive and may fail permanently; the gateway calls this at
/// most once.
pub trait BackendLoader: Send + Sync + Debug {
    /// Load a generator for the given source
    fn load(&self, source: &ModelSource) -> Result<Box<dyn TextGenerator>, ProviderError>;
}

#[cfg(feature = "local-llm")]
pub mod ollama;
pub mod mock;
