// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{debug, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use localgen::app_config::{Config, LogLevel, TextBackend};
use localgen::file_utils::FileManager;
use localgen::Controller;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reply to a content prompt (title, description, post, idea, image prompts)
    Text {
        /// Prompt text
        #[arg(short, long)]
        prompt: String,

        /// Niche or subject interpolated into templates
        #[arg(short, long)]
        niche: Option<String>,

        /// Content language code
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Compose a narration script
    Script {
        /// Subject of the script
        #[arg(short, long)]
        subject: String,

        /// Requested number of sentences
        #[arg(short = 'n', long, default_value_t = 8, allow_negative_numbers = true)]
        sentences: i64,

        /// Content language code
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Write sentence-timed SubRip subtitles for a script
    Subtitles {
        #[command(flatten)]
        input: TextInput,

        /// Destination .srt file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Render a placeholder image card
    Image {
        /// Caption prompt
        #[arg(short, long)]
        prompt: String,
    },

    /// Write narration audio (placeholder tone without a speech engine)
    Speech {
        #[command(flatten)]
        input: TextInput,

        /// Destination .wav file (defaults to .mp/audio.wav)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate shell completions for localgen
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Text given inline or read from a file
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct TextInput {
    /// Inline text
    #[arg(short, long)]
    text: Option<String>,

    /// File to read the text from
    #[arg(short = 'f', long)]
    text_file: Option<PathBuf>,
}

impl TextInput {
    fn read(&self) -> Result<String> {
        match (&self.text, &self.text_file) {
            (Some(text), _) => Ok(text.clone()),
            (None, Some(path)) => FileManager::read_to_string(path),
            (None, None) => Err(anyhow!("Either --text or --text-file is required")),
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "localgen",
    version,
    about = "Offline text, subtitle, image and audio generation for short-form video"
)]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config_path: PathBuf,

    /// Text backend selector (local_llm enables the local model)
    #[arg(short, long, global = true)]
    backend: Option<String>,

    /// Root directory for the .mp output directory
    #[arg(long, global = true)]
    output_root: Option<PathBuf>,

    /// Set logging level
    #[arg(long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger { level: LevelFilter::Trace }))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji and ANSI color for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌ ", "1;31"),
            Level::Warn => ("🚧 ", "1;33"),
            Level::Info => (" ", "1;32"),
            Level::Debug => ("🔍 ", "1;36"),
            Level::Trace => ("📋 ", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (emoji, color) = Self::style_for_level(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                color,
                now,
                emoji,
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Start at info; the configured level is applied once the config is loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "localgen", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli)?;
    log::set_max_level(config.log_level.to_level_filter());
    debug!("Using configuration from {}", cli.config_path.display());

    let controller = Controller::with_config(config)?;
    run_command(&controller, cli.command)
}

fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let mut config = Config::load_or_create(&cli.config_path)?;

    // Override config with CLI options if provided
    if let Some(selector) = &cli.backend {
        config.text_backend = TextBackend::from_selector(Some(selector));
    }
    if let Some(output_root) = &cli.output_root {
        config.output_root = output_root.clone();
    }
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

fn run_command(controller: &Controller, command: Commands) -> Result<()> {
    match command {
        Commands::Text { prompt, niche, language } => {
            println!("{}", controller.respond(&prompt, niche.as_deref(), language.as_deref()));
        }
        Commands::Script { subject, sentences, language } => {
            println!("{}", controller.script(&subject, sentences, language.as_deref()));
        }
        Commands::Subtitles { input, output } => {
            let path = controller.subtitles(&input.read()?, &output)?;
            println!("{}", path.display());
        }
        Commands::Image { prompt } => {
            let path = controller.image(&prompt)?;
            println!("{}", path.display());
        }
        Commands::Speech { input, output } => {
            let path = controller.speak(&input.read()?, output.as_deref())?;
            println!("{}", path.display());
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}
