/*!
 * Lazily loaded neural text backend.
 *
 * The gateway owns a three-state slot:
 *
 * ```text
 * Unloaded --load ok--> Loaded(generator)
 *     \
 *      `---load err--> Disabled
 * ```
 *
 * The transition out of `Unloaded` happens at most once. A failed load is
 * remembered for the lifetime of the gateway, so later calls fall straight
 * through to the caller's templates without paying for another attempt.
 */

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::{debug, info, warn};
use parking_lot::Mutex;

use crate::app_config::{Config, TextBackend};
use crate::providers::{BackendLoader, GenerationParams, ModelSource, TextGenerator};

/// Observable state of the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayState {
    /// No load attempted yet
    Unloaded,
    /// A generator is ready
    Loaded,
    /// Loading failed; never retried
    Disabled,
}

enum Slot {
    Unloaded,
    Loaded(Box<dyn TextGenerator>),
    Disabled,
}

impl Slot {
    fn state(&self) -> GatewayState {
        match self {
            Slot::Unloaded => GatewayState::Unloaded,
            Slot::Loaded(_) => GatewayState::Loaded,
            Slot::Disabled => GatewayState::Disabled,
        }
    }
}

/// Single entry point to the optional neural backend
pub struct ModelGateway {
    backend: TextBackend,
    source: ModelSource,
    loader: Option<Box<dyn BackendLoader>>,
    slot: Mutex<Slot>,
    load_attempts: AtomicUsize,
}

impl fmt::Debug for ModelGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelGateway")
            .field("backend", &self.backend)
            .field("source", &self.source)
            .field("loader", &self.loader)
            .field("state", &self.state())
            .finish()
    }
}

impl ModelGateway {
    /// Create a gateway with an explicit loader
    ///
    /// `loader` is `None` when no backend implementation is compiled in.
    pub fn new(backend: TextBackend, source: ModelSource, loader: Option<Box<dyn BackendLoader>>) -> Self {
        Self {
            backend,
            source,
            loader,
            slot: Mutex::new(Slot::Unloaded),
            load_attempts: AtomicUsize::new(0),
        }
    }

    /// Create a gateway from configuration with the built-in loader
    pub fn from_config(config: &Config) -> Self {
        let source = ModelSource::resolve(&config.local_model.model_dir, &config.local_model.model_id);
        Self::new(config.text_backend, source, default_loader(config))
    }

    /// Gateway that never generates
    pub fn templates_only() -> Self {
        Self::new(TextBackend::Templates, ModelSource::Identifier(String::new()), None)
    }

    /// Current state of the backend slot
    pub fn state(&self) -> GatewayState {
        self.slot.lock().state()
    }

    /// Number of load attempts made so far (0 or 1)
    pub fn load_attempts(&self) -> usize {
        self.load_attempts.load(Ordering::SeqCst)
    }

    /// Whether the neural path is selected and available at all
    pub fn is_enabled(&self) -> bool {
        self.backend == TextBackend::LocalLlm && self.loader.is_some()
    }

    /// Generate text for `prompt`, or `None` when no usable output exists
    ///
    /// Never fails: load and generation errors are logged and absorbed.
    pub fn generate(&self, prompt: &str, max_new_tokens: u32) -> Option<String> {
        if !self.is_enabled() {
            return None;
        }

        let mut slot = self.slot.lock();
        if matches!(*slot, Slot::Unloaded) {
            *slot = self.load();
        }

        let Slot::Loaded(generator) = &*slot else {
            return None;
        };

        match generator.generate(prompt, &GenerationParams::sampling(max_new_tokens)) {
            Ok(raw) => clean_output(prompt, &raw),
            Err(e) => {
                warn!("Text generation failed, using fallback: {}", e);
                None
            }
        }
    }

    fn load(&self) -> Slot {
        let Some(loader) = &self.loader else {
            return Slot::Disabled;
        };

        self.load_attempts.fetch_add(1, Ordering::SeqCst);
        debug!("Loading text backend from {}", self.source);

        match loader.load(&self.source) {
            Ok(generator) => {
                info!("Text backend loaded from {}", self.source);
                Slot::Loaded(generator)
            }
            Err(e) => {
                warn!("Text backend disabled for this session: {}", e);
                Slot::Disabled
            }
        }
    }
}

/// Strip an echoed prompt and surrounding whitespace; blank output is absent
pub fn clean_output(prompt: &str, raw: &str) -> Option<String> {
    let text = raw.strip_prefix(prompt).unwrap_or(raw).trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[cfg(feature = "local-llm")]
fn default_loader(config: &Config) -> Option<Box<dyn BackendLoader>> {
    Some(Box::new(
        crate::providers::ollama::OllamaLoader::new(
            config.local_model.endpoint.clone(),
            config.local_model.timeout_secs,
        )
        .with_pull_timeout(config.local_model.pull_timeout_secs),
    ))
}

#[cfg(not(feature = "local-llm"))]
fn default_loader(_config: &Config) -> Option<Box<dyn BackendLoader>> {
    None
}
