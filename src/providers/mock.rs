/*!
 * Mock backend implementations for testing.
 *
 * This module provides mock loaders that simulate different behaviors:
 * - `MockLoader::working(reply)` - Loads, then always answers with `reply`
 * - `MockLoader::echoing()` - Loads, then answers with the prompt plus a suffix
 * - `MockLoader::failing_load()` - Every load attempt fails
 * - `MockLoader::failing_generation()` - Loads, then every generation fails
 * - `MockLoader::empty()` - Loads, then answers with whitespace only
 *
 * Every loader counts load and generation attempts so tests can assert on
 * memoization.
 */

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::errors::ProviderError;
use crate::providers::{BackendLoader, GenerationParams, ModelSource, TextGenerator};

/// Behavior mode for the mock backend
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Always answers with the given text
    Working(String),
    /// Answers with the prompt followed by the given text
    Echoing(String),
    /// Load fails
    FailingLoad,
    /// Load succeeds, generation fails
    FailingGeneration,
    /// Answers with whitespace only
    Empty,
}

/// Mock loader for testing gateway behavior
#[derive(Debug, Clone)]
pub struct MockLoader {
    /// Behavior mode
    behavior: MockBehavior,
    /// Load attempt counter
    load_count: Arc<AtomicUsize>,
    /// Generation attempt counter, shared with loaded generators
    generate_count: Arc<AtomicUsize>,
    /// Sources passed to `load`
    sources: Arc<Mutex<Vec<ModelSource>>>,
    /// Parameters passed to `generate`
    params: Arc<Mutex<Vec<GenerationParams>>>,
}

/// Generator handed out by `MockLoader`
#[derive(Debug)]
pub struct MockGenerator {
    behavior: MockBehavior,
    generate_count: Arc<AtomicUsize>,
    params: Arc<Mutex<Vec<GenerationParams>>>,
}

impl MockLoader {
    /// Create a new mock loader with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            load_count: Arc::new(AtomicUsize::new(0)),
            generate_count: Arc::new(AtomicUsize::new(0)),
            sources: Arc::new(Mutex::new(Vec::new())),
            params: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a working mock that always answers with `reply`
    pub fn working(reply: impl Into<String>) -> Self {
        Self::new(MockBehavior::Working(reply.into()))
    }

    /// Create a mock that echoes the prompt before `suffix`
    pub fn echoing(suffix: impl Into<String>) -> Self {
        Self::new(MockBehavior::Echoing(suffix.into()))
    }

    /// Create a mock whose load always fails
    pub fn failing_load() -> Self {
        Self::new(MockBehavior::FailingLoad)
    }

    /// Create a mock whose generation always fails
    pub fn failing_generation() -> Self {
        Self::new(MockBehavior::FailingGeneration)
    }

    /// Create a mock that returns blank output
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Number of load attempts so far
    pub fn load_count(&self) -> usize {
        self.load_count.load(Ordering::SeqCst)
    }

    /// Number of generation attempts so far
    pub fn generate_count(&self) -> usize {
        self.generate_count.load(Ordering::SeqCst)
    }

    /// Sources passed to `load`, in call order
    pub fn sources(&self) -> Vec<ModelSource> {
        self.sources.lock().clone()
    }

    /// Parameters passed to `generate`, in call order
    pub fn params(&self) -> Vec<GenerationParams> {
        self.params.lock().clone()
    }
}

impl BackendLoader for MockLoader {
    fn load(&self, source: &ModelSource) -> Result<Box<dyn TextGenerator>, ProviderError> {
        self.load_count.fetch_add(1, Ordering::SeqCst);
        self.sources.lock().push(source.clone());

        if self.behavior == MockBehavior::FailingLoad {
            return Err(ProviderError::BackendUnavailable("mock load failure".to_string()));
        }

        Ok(Box::new(MockGenerator {
            behavior: self.behavior.clone(),
            generate_count: Arc::clone(&self.generate_count),
            params: Arc::clone(&self.params),
        }))
    }
}

impl TextGenerator for MockGenerator {
    fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String, ProviderError> {
        self.generate_count.fetch_add(1, Ordering::SeqCst);
        self.params.lock().push(params.clone());

        match &self.behavior {
            MockBehavior::Working(reply) => Ok(reply.clone()),
            MockBehavior::Echoing(suffix) => Ok(format!("{}{}", prompt, suffix)),
            MockBehavior::FailingGeneration => {
                Err(ProviderError::RequestFailed("mock generation failure".to_string()))
            }
            MockBehavior::Empty => Ok("  \n ".to_string()),
            MockBehavior::FailingLoad => Err(ProviderError::BackendUnavailable("not loaded".to_string())),
        }
    }
}
