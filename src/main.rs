// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{debug, info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use ai_translate::app_config::{self, Config};
use ai_translate::file_utils::FileManager;
use ai_translate::Controller;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for ai-translate
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// ai-translate - translate text documents with AI
///
/// Splits the input into token-bounded chunks, translates them one by one
/// through OpenRouter and writes the result incrementally.
#[derive(Parser, Debug)]
#[command(name = "ai-translate")]
#[command(version)]
#[command(about = "AI-powered document translation tool")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "ai-translate splits a text document into chunks and translates them with a language model.

EXAMPLES:
    ai-translate -i book.txt -o book.ru.txt                 # Translate to the default language (russian)
    ai-translate -i notes.md -o notes.fr.md --to fr         # ISO codes are expanded to language names
    ai-translate -i doc.txt -o out.txt --chunk-size 1000    # Larger chunks
    ai-translate -i doc.txt -o out.txt -c conf.json -v      # Settings from a file, verbose logging
    ai-translate completions bash > ai-translate.bash       # Generate bash completions

CONFIGURATION:
    Settings can be stored in a JSON file passed with --config. Command line
    flags override values from the file. The API key can also be provided
    through the OPENROUTER_API_KEY environment variable.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input text file
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file, its directory is created when missing
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Target language, a name ("russian") or an ISO code ("ru")
    #[arg(short = 't', long = "to", value_name = "LANG")]
    to: Option<String>,

    /// OpenRouter API key
    #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Chunk size in estimated tokens
    #[arg(long, value_name = "TOKENS")]
    chunk_size: Option<usize>,

    /// Model identifier
    #[arg(short, long)]
    model: Option<String>,

    /// Attempts per chunk and per request, values <= 0 mean 3
    #[arg(long, allow_negative_numbers = true)]
    max_retries: Option<i32>,

    /// Verbose progress logging
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and label for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let (color, label) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, label, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Print a usage error and exit
fn usage_error(message: &str) -> ! {
    CommandLineOptions::command()
        .error(ErrorKind::MissingRequiredArgument, message)
        .exit()
}

/// Load the configuration file, creating a default one when it does not exist
fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };

    if FileManager::file_exists(path) {
        return Config::from_file(path);
    }

    warn!("Config file not found at '{}', creating default config.", path.display());
    let config = Config::default();
    let config_json = serde_json::to_string_pretty(&config).context("Failed to serialize default config to JSON")?;
    FileManager::ensure_parent_dir(path)?;
    std::fs::write(path, config_json)
        .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;

    Ok(config)
}

/// Override config values with the flags given on the command line
fn apply_overrides(config: &mut Config, options: &CommandLineOptions) {
    if let Some(target_language) = &options.to {
        config.target_language = target_language.clone();
    }

    if let Some(api_key) = &options.api_key {
        config.provider.api_key = api_key.clone();
    }

    if let Some(chunk_size) = options.chunk_size {
        config.chunk_size = chunk_size;
    }

    if let Some(model) = &options.model {
        config.model = model.clone();
    }

    if let Some(max_retries) = options.max_retries {
        config.max_retries = max_retries;
    }

    if options.verbose {
        config.verbose = true;
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info until the configuration says otherwise
    CustomLogger::init(LevelFilter::Info)?;

    let options = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = &options.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "ai-translate", &mut std::io::stdout());
        return Ok(());
    }

    let (Some(input), Some(output)) = (options.input.clone(), options.output.clone()) else {
        usage_error("both --input and --output are required");
    };

    let mut config = load_config(options.config.as_deref())?;
    apply_overrides(&mut config, &options);

    if config.provider.api_key.trim().is_empty() {
        usage_error("an API key is required: pass --api-key or set OPENROUTER_API_KEY");
    }

    log::set_max_level(config.effective_log_level().to_level_filter());
    debug!(
        "Configuration: target={}, model={}, chunk_size={}, max_retries={}, endpoint={}",
        config.target_language, config.model, config.chunk_size, config.max_retries, config.provider.endpoint
    );

    let controller = Controller::with_config(config)?;
    info!("Translating {} to {}", input.display(), controller.config().target_language);

    let summary = controller.run(&input, &output).await?;

    info!("Translation completed in {}.", Controller::format_duration(summary.elapsed));
    info!("Output written to {}", summary.output_path.display());

    Ok(())
}
