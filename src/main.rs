// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use indicatif::{ProgressBar, ProgressStyle};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error, info, warn};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use multilogue::app_config::{self, Config, StorageBackend};
use multilogue::errors::{AppError, InvalidInputError};
use multilogue::file_utils::{FileManager, FileType, SCRIPT_EXTENSIONS};
use multilogue::store;
use multilogue::{Dialogue, DisplayState, Transcoder, Workspace};

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
    /// Convert script text to markup
    Encode {
        /// Script file (stdin when omitted)
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert markup back to script text
    Decode {
        /// Markup file (stdin when omitted)
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render every script file under a directory to an .html file beside it
    RenderDir {
        /// Directory to scan recursively
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Force overwrite of existing output files
        #[arg(short, long)]
        force_overwrite: bool,
    },

    /// Print record and speaker counts
    Stats {
        /// Script or markup file (stdin when omitted)
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,

        /// Treat stdin as markup instead of script text
        #[arg(long)]
        markup: bool,

        /// Print the counts as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the stored dialogue as markup
    Show,

    /// Load a script file (.txt, .md, .text, .plato) into the store
    Load {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Save the stored dialogue to a script file
    Save {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Force overwrite of an existing file
        #[arg(short, long)]
        force_overwrite: bool,
    },

    /// Replace the stored dialogue with script text read from stdin
    Set,

    /// Write the stored dialogue as markup
    Export {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Force overwrite of an existing file
        #[arg(short, long)]
        force_overwrite: bool,
    },

    /// Decode a markup file into the store
    Import {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Generate shell completions for multilogue
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Multilogue - dialogue script transcoder
///
/// Converts `speaker: utterance` scripts to dialogue markup and back, and
/// keeps a current dialogue in a local store.
#[derive(Parser, Debug)]
#[command(name = "multilogue")]
#[command(version)]
#[command(about = "Dialogue script <-> markup transcoder")]
#[command(long_about = "Multilogue converts dialogue scripts to markup and back.

A script is a sequence of `speaker: utterance` blocks, each followed by a blank line.

EXAMPLES:
    multilogue encode play.txt -o play.html      # Script to markup
    cat play.html | multilogue decode            # Markup to script on stdout
    multilogue render-dir scripts/ -f            # Render every script under a folder
    multilogue load play.plato && multilogue show
    multilogue completions bash > multilogue.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config: PathBuf,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Keep the dialogue in memory only (nothing persists after exit)
    #[arg(long, global = true)]
    memory_store: bool,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        // Filtering is left to log::max_level so it can be raised after config load
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
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
            let level = record.level();

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                Self::get_color_for_level(level),
                now,
                Self::get_emoji_for_level(level),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() {
    // Info until the config is loaded; the level is adjusted afterwards
    if let Err(e) = CustomLogger::init(LevelFilter::Info) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    let cli = CommandLineOptions::parse();

    if let Err(e) = run(cli) {
        error!("{}", e);
        std::process::exit(e.exit_code());
    }
}

fn run(cli: CommandLineOptions) -> Result<(), AppError> {
    // If log level is set via command line, apply it immediately
    if let Some(level) = &cli.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "multilogue", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli)?;

    match cli.command {
        Commands::Encode { input, output } => {
            let transcoder = Transcoder::from_config(&config);
            let bytes = read_input(input.as_deref())?;
            let markup = transcoder.encode_bytes(&bytes)?;
            write_output(output.as_deref(), &markup)?;
        }
        Commands::Decode { input, output } => {
            let transcoder = Transcoder::from_config(&config);
            let bytes = read_input(input.as_deref())?;
            let report = transcoder.decode_bytes_with_report(&bytes)?;
            if report.skipped > 0 {
                warn!("Skipped {} dialogue elements without a speaker", report.skipped);
            }
            write_output(output.as_deref(), &report.text)?;
        }
        Commands::RenderDir { dir, force_overwrite } => {
            render_dir(&config, &dir, force_overwrite)?;
        }
        Commands::Stats { input, markup, json } => {
            print_stats(&config, input.as_deref(), markup, json)?;
        }
        Commands::Show => {
            let workspace = open_workspace(&config)?;
            match workspace.initialize()? {
                DisplayState::Dialogue { markup } => println!("{}", markup),
                DisplayState::FilePicker => {
                    info!("No dialogue stored yet. Load one with `multilogue load FILE`.")
                }
            }
        }
        Commands::Load { file } => {
            let workspace = open_workspace(&config)?;
            if workspace.load_file(&file)?.is_file_picker() {
                warn!("{:?} holds no dialogue text", file);
            }
            let records = Dialogue::from_script(
                &workspace.current_text()?,
                workspace.transcoder().script_options(),
            );
            info!("Loaded {} records from {:?}", records.len(), file);
        }
        Commands::Save { file, force_overwrite } => {
            refuse_overwrite(&file, force_overwrite)?;
            let workspace = open_workspace(&config)?;
            workspace.save_to_file(&file)?;
            info!("Success: {:?}", file);
        }
        Commands::Set => {
            let workspace = open_workspace(&config)?;
            let text = utf8_input("set", read_input(None)?)?;
            workspace.commit(&text)?;
        }
        Commands::Export { file, force_overwrite } => {
            refuse_overwrite(&file, force_overwrite)?;
            let workspace = open_workspace(&config)?;
            workspace.export_markup(&file)?;
            info!("Success: {:?}", file);
        }
        Commands::Import { file } => {
            let workspace = open_workspace(&config)?;
            let report = workspace.import_markup(&file)?;
            info!("Imported {} records ({} skipped)", report.records, report.skipped);
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}

fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let mut config = Config::load_or_create(&cli.config)?;

    if let Some(level) = &cli.log_level {
        config.log_level = level.clone().into();
    }
    if cli.memory_store {
        config.storage.backend = StorageBackend::Memory;
    }

    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if cli.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    Ok(config)
}

fn open_workspace(config: &Config) -> Result<Workspace> {
    let store = store::open_store(&config.storage)?;
    Ok(Workspace::new(store, config))
}

fn read_input(input: Option<&Path>) -> Result<Vec<u8>> {
    match input {
        Some(path) => std::fs::read(path).with_context(|| format!("Failed to read file: {:?}", path)),
        None => {
            let mut buffer = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buffer)
                .context("Failed to read stdin")?;
            Ok(buffer)
        }
    }
}

fn utf8_input(operation: &'static str, bytes: Vec<u8>) -> Result<String, InvalidInputError> {
    String::from_utf8(bytes).map_err(|e| {
        InvalidInputError::new(
            operation,
            format!(
                "non-UTF-8 bytes (invalid sequence at byte {})",
                e.utf8_error().valid_up_to()
            ),
        )
    })
}

fn write_output(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => FileManager::write_to_file(path, content),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(content.as_bytes())
                .and_then(|_| stdout.flush())
                .context("Failed to write to stdout")
        }
    }
}

fn refuse_overwrite(path: &Path, force_overwrite: bool) -> Result<(), AppError> {
    if FileManager::file_exists(path) && !force_overwrite {
        return Err(AppError::File(format!(
            "Output file already exists: {:?}. Use -f to force overwrite.",
            path
        )));
    }
    Ok(())
}

fn render_dir(config: &Config, dir: &Path, force_overwrite: bool) -> Result<()> {
    if !FileManager::dir_exists(dir) {
        return Err(anyhow::anyhow!("Input directory does not exist: {:?}", dir));
    }

    let transcoder = Transcoder::from_config(config);
    let scripts = FileManager::find_files(dir, &SCRIPT_EXTENSIONS)?;
    if scripts.is_empty() {
        warn!("No script files found in {:?}", dir);
        return Ok(());
    }
    info!("Rendering {} script files under {:?}", scripts.len(), dir);

    let progress_bar = ProgressBar::new(scripts.len() as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
        .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress_bar.set_style(style.progress_chars("█▓▒░"));

    let mut rendered = 0;
    let mut skipped = 0;
    for script in &scripts {
        let parent = script.parent().unwrap_or(Path::new("."));
        let output = FileManager::generate_output_path(script, parent, "html");
        progress_bar.set_message(script.file_name().unwrap_or_default().to_string_lossy().to_string());

        if output.exists() && !force_overwrite {
            progress_bar.suspend(|| {
                warn!("Skipping {:?}, output already exists (use -f to force overwrite)", script)
            });
            skipped += 1;
        } else {
            match FileManager::read_to_string(script) {
                Ok(text) => {
                    FileManager::write_to_file(&output, &transcoder.encode(&text))?;
                    rendered += 1;
                }
                Err(e) => {
                    progress_bar.suspend(|| error!("{:#}", e));
                    skipped += 1;
                }
            }
        }
        progress_bar.inc(1);
    }

    progress_bar.finish_and_clear();
    info!("Rendered {} files ({} skipped)", rendered, skipped);
    Ok(())
}

fn print_stats(config: &Config, input: Option<&Path>, markup: bool, json: bool) -> Result<()> {
    let as_markup = match input {
        Some(path) => FileManager::detect_file_type(path)? == FileType::Markup,
        None => markup,
    };

    let text = utf8_input("stats", read_input(input)?)?;
    let dialogue = if as_markup {
        Dialogue::from_markup(&text, &config.markup)
    } else {
        Dialogue::from_script(&text, &config.script)
    };

    let stats = dialogue.stats();
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("{}", stats);
        let speakers = dialogue.speakers();
        if !speakers.is_empty() {
            println!("Speaker list: {}", speakers.join(", "));
        }
    }
    Ok(())
}
