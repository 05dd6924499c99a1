//! Pics - date-partitioned media archive organiser
//!
//! Command dispatcher around the [`pics::Organiser`] engine: sets up
//! logging, loads configuration, runs one command and reports the result.

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use pics::{Cli, Command, Config, Organiser};
use std::path::{Path, PathBuf};
use tracing::{Dispatch, Level, error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

// CLI Output Module
mod cli_output {
    //! Consistent colours and layout for command line summaries

    use crossterm::{
        ExecutableCommand,
        style::{Color, Print, Stylize, style},
    };
    use std::io::stdout;

    /// CLI theme colours
    pub struct CliTheme;

    impl CliTheme {
        pub const SUCCESS: Color = Color::Green;
        pub const WARNING: Color = Color::Yellow;
        pub const ERROR: Color = Color::Red;
        pub const HINT: Color = Color::DarkGrey;
        pub const ACCENT: Color = Color::Cyan;
    }

    pub fn print_separator() {
        let _ = stdout().execute(Print(format!("{}\n", "─".repeat(60))));
    }

    /// Print a centred title
    pub fn print_title(title: &str) {
        let width: usize = 60;
        let padding = width.saturating_sub(title.len()) / 2;
        let left_pad = " ".repeat(padding.saturating_sub(1));

        let _ = stdout().execute(Print(format!(
            "{}{} {}{}\n",
            left_pad,
            "╔".bold(),
            title.bold(),
            "╗".bold(),
        )));
        let _ = stdout().execute(Print("\n"));
    }

    pub fn print_error(msg: &str) {
        let _ = stdout().execute(Print(style("✗ ").with(CliTheme::ERROR).bold()));
        let _ = stdout().execute(Print(format!("{}\n", msg)));
    }

    pub fn print_key_value(key: &str, value: &str) {
        let _ = stdout().execute(Print("  "));
        let _ = stdout().execute(Print(style(key).with(CliTheme::HINT)));
        let _ = stdout().execute(Print(": "));
        let _ = stdout().execute(Print(style(value).bold()));
        let _ = stdout().execute(Print("\n"));
    }

    pub fn print_stat(key: &str, value: &str, color: Color) {
        let _ = stdout().execute(Print("  "));
        let _ = stdout().execute(Print(style(key).with(CliTheme::HINT)));
        let _ = stdout().execute(Print(": "));
        let _ = stdout().execute(Print(style(value).with(color).bold()));
        let _ = stdout().execute(Print("\n"));
    }

    pub fn print_log_path(path: &str) {
        let _ = stdout().execute(Print("\n"));
        let _ = stdout().execute(Print(style("  Log file: ").with(CliTheme::HINT)));
        let _ = stdout().execute(Print(format!("{}\n", path)));
    }

    pub fn print_blank() {
        let _ = stdout().execute(Print("\n"));
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    let log_path = config.log_dir.as_deref().map(get_log_path);

    let (dispatch, guard) = setup_logging(&cli, &config, log_path.as_deref())?;
    let organiser = Organiser::with_dispatch(config, dispatch.clone());

    let result = tracing::dispatcher::with_default(&dispatch, || {
        info!(
            version = env!("CARGO_PKG_VERSION"),
            command = cli.command.name(),
            "Pics starting"
        );
        if let Some(ref path) = log_path {
            info!(log_file = %path.display(), "Log file location");
        }

        let result = run(&cli.command, &organiser);
        match &result {
            Ok(()) => {
                if let Some(ref path) = log_path {
                    cli_output::print_log_path(&path.display().to_string());
                }
            }
            Err(e) => {
                let message = format!("{:#}", e);
                error!(error = %message, "Command failed");
                cli_output::print_error(&message);
            }
        }
        result
    });

    if result.is_err() {
        // Flush the file writer before exiting
        drop(guard);
        std::process::exit(1);
    }
    Ok(())
}

/// Dispatch one command to the organiser
fn run(command: &Command, organiser: &Organiser) -> Result<()> {
    use cli_output::*;

    match command {
        Command::Organise {
            source_dir,
            target_dir,
        } => organise(organiser, source_dir, target_dir),
        Command::Rename { directory, name } => {
            let outcome = organiser
                .rename_directory(directory, name)
                .with_context(|| format!("Rename of {} failed", directory.display()))?;

            info!(
                path = %outcome.path.display(),
                images = outcome.images,
                videos = outcome.videos,
                "Rename completed successfully"
            );

            print_separator();
            print_title("Rename complete");
            print_key_value("Directory", &outcome.path.display().to_string());
            print_stat("Images renamed", &outcome.images.to_string(), CliTheme::SUCCESS);
            print_stat("Videos renamed", &outcome.videos.to_string(), CliTheme::SUCCESS);
            print_blank();
            Ok(())
        }
        Command::Count { root } => {
            let count = organiser.file_count(root)?;
            info!(root = %root.display(), count, "Counted files");
            println!("{}", count);
            Ok(())
        }
        Command::SampleConfig => {
            print!("{}", Config::sample_config());
            Ok(())
        }
    }
}

/// File a source directory into the target archive and normalise it,
/// checking that no file went missing on the way
fn organise(organiser: &Organiser, source_dir: &Path, target_dir: &Path) -> Result<()> {
    use cli_output::*;

    validate_directories(source_dir, target_dir)?;
    std::fs::create_dir_all(target_dir)
        .with_context(|| format!("Failed to create target directory {}", target_dir.display()))?;

    let verify = organiser.config().verify_file_count;
    let before = if verify {
        Some(count_files(organiser, source_dir, target_dir)?)
    } else {
        None
    };

    info!(
        source = %source_dir.display(),
        target = %target_dir.display(),
        "Starting media organisation"
    );

    let moved = organiser
        .organise_by_date(source_dir, target_dir)
        .context("Organising by date failed")?;
    let summary = organiser
        .organise_videos_and_rename_images(target_dir)
        .context("Normalising buckets failed")?;

    print_separator();
    print_title("Organisation complete");
    print_separator();
    print_blank();
    print_stat("Files moved", &moved.to_string(), CliTheme::SUCCESS);
    print_stat("Buckets", &summary.buckets.to_string(), CliTheme::ACCENT);
    print_stat("Images renamed", &summary.images.to_string(), CliTheme::SUCCESS);
    print_stat("Videos separated", &summary.videos.to_string(), CliTheme::SUCCESS);

    if let Some(before) = before {
        let after = count_files(organiser, source_dir, target_dir)?;
        if before != after {
            error!(
                before,
                after,
                difference = after as i64 - before as i64,
                "File count mismatch"
            );
            anyhow::bail!("File count mismatch: {} files before, {} after", before, after);
        }
        print_stat("Files verified", &after.to_string(), CliTheme::SUCCESS);
        info!(
            files = after,
            verification = "file counts before and after match",
            "Processing completed successfully"
        );
    } else {
        print_stat("Files verified", "skipped", CliTheme::WARNING);
        info!("Processing completed successfully");
    }
    print_blank();

    Ok(())
}

/// Non-hidden files in source and target together
fn count_files(organiser: &Organiser, source_dir: &Path, target_dir: &Path) -> Result<usize> {
    let source = organiser
        .file_count(source_dir)
        .context("Error counting source files")?;
    let target = organiser
        .file_count(target_dir)
        .context("Error counting target files")?;
    Ok(source + target)
}

/// Validate source and target before anything is moved
fn validate_directories(source_dir: &Path, target_dir: &Path) -> Result<()> {
    if !source_dir.is_dir() {
        anyhow::bail!("Source directory does not exist: {}", source_dir.display());
    }
    if target_dir.exists() && !target_dir.is_dir() {
        anyhow::bail!("Target path is not a directory: {}", target_dir.display());
    }

    let source = std::path::absolute(source_dir)?;
    let target = std::path::absolute(target_dir)?;
    if target.starts_with(&source) {
        anyhow::bail!(
            "Target directory {} is inside source directory {}",
            target.display(),
            source.display()
        );
    }
    if source.starts_with(&target) {
        anyhow::bail!(
            "Source directory {} is inside target directory {}",
            source.display(),
            target.display()
        );
    }

    Ok(())
}

/// Load configuration from file or CLI arguments
fn load_config(cli: &Cli) -> Result<Config> {
    let config = if let Some(ref config_path) = cli.config {
        let file_config = Config::load_from_file(config_path)?;
        cli.merge_with_config(file_config)
    } else {
        cli.to_config()
    };

    Ok(config)
}

/// Log file for this run: `<log_dir>/pics_<timestamp>.log`
fn get_log_path(log_dir: &Path) -> PathBuf {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    log_dir.join(format!("pics_{}.log", timestamp))
}

/// Build the log dispatcher (console, plus file when a path is given)
///
/// The dispatcher is handed to the organiser and scoped around the run; it
/// is never installed as the global default.
fn setup_logging(
    cli: &Cli,
    config: &Config,
    log_path: Option<&Path>,
) -> Result<(Dispatch, Option<WorkerGuard>)> {
    let level = if config.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let (file_layer, guard) = match log_path {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let file = std::fs::OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;

            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            let layer = if cli.json_log {
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(non_blocking)
                    .boxed()
            } else {
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking)
                    .boxed()
            };
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let console_layer = if cli.json_log {
        fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer().with_writer(std::io::stderr).boxed()
    };

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer);

    Ok((Dispatch::new(subscriber), guard))
}
