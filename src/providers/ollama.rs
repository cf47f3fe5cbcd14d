use log::{debug, error, info};
use reqwest::blocking::{Client, Response};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::{BackendLoader, GenerationParams, ModelSource, TextGenerator};

/// Default timeout for pulling or registering a model, in seconds
pub const DEFAULT_PULL_TIMEOUT_SECS: u64 = 3600;

/// Loads models into a local Ollama server
#[derive(Debug, Clone)]
pub struct OllamaLoader {
    /// Base URL of the Ollama API
    base_url: String,
    /// Timeout for probes and generation requests
    timeout: Duration,
    /// Timeout for `/api/pull` and `/api/create`, which only answer once the model is ready
    pull_timeout: Duration,
}

/// Generator bound to one model on an Ollama server
#[derive(Debug)]
pub struct OllamaGenerator {
    /// Base URL of the Ollama API
    base_url: String,
    /// HTTP client for making requests
    client: Client,
    /// Timeout for each generation request
    timeout: Duration,
    /// Model name registered on the server
    model: String,
}

/// Generate request for the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Model name to use for generation
    model: String,
    /// Prompt to generate from
    prompt: String,
    /// Additional model parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerateOptions>,
    /// Whether to stream the response
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

/// Generation options for the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    /// Top-p sampling
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    /// Maximum number of tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

/// Generation response from the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Model name
    #[serde(default)]
    pub model: String,
    /// Generated text
    pub response: String,
    /// Whether the generation is complete
    #[serde(default)]
    pub done: bool,
}

/// Request body shared by the model management endpoints
#[derive(Debug, Serialize)]
struct ModelRequest<'a> {
    model: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    modelfile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

impl GenerateRequest {
    /// Create a non-streaming generation request
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            options: None,
            stream: Some(false),
        }
    }

    /// Apply sampling parameters
    pub fn with_params(mut self, params: &GenerationParams) -> Self {
        self.options = Some(GenerateOptions {
            temperature: Some(params.temperature),
            top_p: Some(params.top_p),
            num_predict: Some(params.max_new_tokens),
        });
        self
    }
}

impl OllamaLoader {
    /// Create a loader for the server at `endpoint`
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        let endpoint = endpoint.into();
        let base_url = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.trim_end_matches('/').to_string()
        } else {
            format!("http://{}", endpoint.trim_end_matches('/'))
        };

        Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs.max(1)),
            pull_timeout: Duration::from_secs(DEFAULT_PULL_TIMEOUT_SECS),
        }
    }

    /// Set the timeout for model downloads and registrations
    pub fn with_pull_timeout(mut self, pull_timeout_secs: u64) -> Self {
        self.pull_timeout = Duration::from_secs(pull_timeout_secs.max(1));
        self
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn client(&self) -> Result<Client, ProviderError> {
        // Timeouts are set per request: model pulls run far longer than generations
        Client::builder()
            .build()
            .map_err(|e| ProviderError::BackendUnavailable(format!("Failed to build HTTP client: {}", e)))
    }

    /// Get the server version, which doubles as a reachability check
    fn version(&self, client: &Client) -> Result<String, ProviderError> {
        let url = format!("{}/api/version", self.base_url);
        let response = client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .map_err(|e| ProviderError::BackendUnavailable(format!("Ollama not reachable at {}: {}", self.base_url, e)))?;
        let value: serde_json::Value = check_status(response)?
            .json()
            .map_err(|e| ProviderError::ParseError(format!("Invalid version response: {}", e)))?;

        value["version"]
            .as_str()
            .map(|v| v.to_string())
            .ok_or_else(|| ProviderError::ParseError("Invalid version format in response".to_string()))
    }

    /// Whether the server already knows `model`
    fn has_model(&self, client: &Client, model: &str) -> Result<bool, ProviderError> {
        let url = format!("{}/api/show", self.base_url);
        let body = ModelRequest { model, modelfile: None, stream: None };
        let response = client
            .post(&url)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;

        if response.status().as_u16() == 404 {
            return Ok(false);
        }
        check_status(response)?;
        Ok(true)
    }

    /// Fetch `model` from the registry
    fn pull(&self, client: &Client, model: &str) -> Result<(), ProviderError> {
        info!("Pulling model '{}' from registry", model);
        let url = format!("{}/api/pull", self.base_url);
        let body = ModelRequest { model, modelfile: None, stream: Some(false) };
        let response = client
            .post(&url)
            .timeout(self.pull_timeout)
            .json(&body)
            .send()
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;
        check_status(response)
            .map_err(|e| ProviderError::ModelNotFound(format!("{}: {}", model, e)))?;
        Ok(())
    }

    /// Register the weights found in `dir` and return the model name
    fn create_from_dir(&self, client: &Client, dir: &Path) -> Result<String, ProviderError> {
        let weights = find_weights(dir)?;
        let model = model_name_for_dir(dir);
        debug!("Registering {} as '{}'", weights.display(), model);

        let url = format!("{}/api/create", self.base_url);
        let body = ModelRequest {
            model: &model,
            modelfile: Some(format!("FROM {}", weights.display())),
            stream: Some(false),
        };
        let response = client
            .post(&url)
            .timeout(self.pull_timeout)
            .json(&body)
            .send()
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;
        check_status(response)?;
        Ok(model)
    }
}

impl BackendLoader for OllamaLoader {
    fn load(&self, source: &ModelSource) -> Result<Box<dyn TextGenerator>, ProviderError> {
        let client = self.client()?;
        let version = self.version(&client)?;
        debug!("Ollama {} at {}", version, self.base_url);

        let model = match source {
            ModelSource::LocalDir(dir) => self.create_from_dir(&client, dir)?,
            ModelSource::Identifier(id) => {
                if !self.has_model(&client, id)? {
                    self.pull(&client, id)?;
                }
                id.clone()
            }
        };

        info!("Local model '{}' ready", model);
        Ok(Box::new(OllamaGenerator {
            base_url: self.base_url.clone(),
            client,
            timeout: self.timeout,
            model,
        }))
    }
}

impl TextGenerator for OllamaGenerator {
    fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String, ProviderError> {
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest::new(&self.model, prompt).with_params(params);

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        let response_text = check_status(response)?
            .text()
            .map_err(|e| ProviderError::RequestFailed(format!("Failed to get response text: {}", e)))?;

        match serde_json::from_str::<GenerateResponse>(&response_text) {
            Ok(generated) => Ok(generated.response),
            Err(e) => {
                error!(
                    "Failed to parse Ollama response: {}. Raw response (first 500 chars): {}",
                    e,
                    response_text.chars().take(500).collect::<String>()
                );
                Err(ProviderError::ParseError(e.to_string()))
            }
        }
    }
}

fn check_status(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .text()
        .unwrap_or_else(|_| "Failed to get error response text".to_string());
    Err(ProviderError::ApiError {
        status_code: status.as_u16(),
        message,
    })
}

/// First `.gguf` file in `dir`, in name order
fn find_weights(dir: &Path) -> Result<PathBuf, ProviderError> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| ProviderError::ModelNotFound(format!("{}: {}", dir.display(), e)))?;

    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("gguf"))
        })
        .collect();
    candidates.sort();

    let weights = candidates
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::ModelNotFound(format!("no .gguf weights in {}", dir.display())))?;

    Ok(std::fs::canonicalize(&weights).unwrap_or(weights))
}

/// Server-side name for a model registered from a directory
fn model_name_for_dir(dir: &Path) -> String {
    let raw = dir
        .file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let name: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '.' { c } else { '-' })
        .collect();

    if name.is_empty() {
        "localgen-model".to_string()
    } else {
        name
    }
}
