/*!
 * # localgen - offline content generation for short-form video
 *
 * Produces titles, descriptions, narration scripts, subtitles, placeholder
 * images and placeholder narration audio without any network service.
 *
 * ## Features
 *
 * - Optional local LLM backend, loaded lazily and disabled for good after a
 *   failed load
 * - Deterministic French templates for every prompt category
 * - Sentence-timed SubRip subtitles
 * - 1080x1920 placeholder cards with wrapped captions
 * - Sine-tone WAV placeholder for narration
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `gateway`: Lazily loaded neural backend with load-once memoization
 * - `providers`: Backend loaders (`ollama`, `mock`)
 * - `text_responder`: Prompt classification and template replies
 * - `script_composer`: Narration scripts
 * - `subtitle_timer`: Sentence segmentation and SRT output
 * - `render`: Placeholder image cards
 * - `audio`: Speech facade and tone fallback
 * - `app_controller`: Wires the components from one configuration
 * - `file_utils`: File system operations
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod audio;
pub mod errors;
pub mod file_utils;
pub mod gateway;
pub mod language_utils;
pub mod providers;
pub mod render;
pub mod script_composer;
pub mod subtitle_timer;
pub mod text_responder;

// Re-export main types for easier usage
pub use app_config::{Config, TextBackend};
pub use app_controller::Controller;
pub use audio::{SpeechSynthesizer, ToneSynthesizer};
pub use errors::{AppError, ProviderError};
pub use gateway::{GatewayState, ModelGateway};
pub use render::ImageComposer;
pub use script_composer::ScriptComposer;
pub use subtitle_timer::{SubtitleCue, SubtitleTimer};
pub use text_responder::{PromptCategory, TextResponder};
