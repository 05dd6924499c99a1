//! CLI argument parsing with clap

use crate::config::Config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Pics - date-partitioned media archive organiser
///
/// Files photos and videos into one directory per day, keeps the names
/// inside each day sequential, and renames days together with their
/// contents.
#[derive(Parser, Debug)]
#[command(name = "pics")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file (TOML format)
    ///
    /// CLI arguments override config file settings.
    #[arg(short = 'C', long, global = true, env = "PICS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory for log files
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// Skip the before/after file count check of `organise`
    #[arg(long, global = true)]
    pub no_verify: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output log format as JSON
    #[arg(long, global = true)]
    pub json_log: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// File a flat directory into dated buckets and normalise every bucket
    Organise {
        /// Directory holding the unsorted media
        source_dir: PathBuf,
        /// Archive root that receives the buckets
        target_dir: PathBuf,
    },

    /// Rename a bucket and every image and video inside it
    Rename {
        /// Bucket directory (YYYY MM Month DD [name])
        directory: PathBuf,
        /// New free-text name; an empty string keeps only the date
        name: String,
    },

    /// Count non-hidden files under a directory
    Count {
        /// Directory to count
        root: PathBuf,
    },

    /// Print a sample configuration file
    SampleConfig,
}

impl Command {
    /// Short name used in logs and log file names
    pub fn name(&self) -> &'static str {
        match self {
            Command::Organise { .. } => "organise",
            Command::Rename { .. } => "rename",
            Command::Count { .. } => "count",
            Command::SampleConfig => "sample-config",
        }
    }
}

impl Cli {
    /// Merge CLI arguments with config from file
    /// CLI arguments take precedence over config file settings
    pub fn merge_with_config(&self, mut config: Config) -> Config {
        if let Some(ref log_dir) = self.log_dir {
            config.log_dir = Some(log_dir.clone());
        }
        if self.no_verify {
            config.verify_file_count = false;
        }
        if self.verbose {
            config.verbose = true;
        }

        config
    }

    /// Convert CLI arguments to Config (when no config file is used)
    pub fn to_config(&self) -> Config {
        self.merge_with_config(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_organise() {
        let cli = Cli::try_parse_from(["pics", "organise", "/in", "/out", "-v"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(
            cli.command,
            Command::Organise {
                source_dir: PathBuf::from("/in"),
                target_dir: PathBuf::from("/out"),
            }
        );
    }

    #[test]
    fn test_parse_rename_with_empty_name() {
        let cli = Cli::try_parse_from(["pics", "rename", "/a/2023 06 June 15 Paris", ""]).unwrap();
        assert_eq!(
            cli.command,
            Command::Rename {
                directory: PathBuf::from("/a/2023 06 June 15 Paris"),
                name: String::new(),
            }
        );
    }

    #[test]
    fn test_rename_requires_name() {
        assert!(Cli::try_parse_from(["pics", "rename", "/a/dir"]).is_err());
    }

    #[test]
    fn test_merge_with_config() {
        let cli = Cli::try_parse_from([
            "pics",
            "--no-verify",
            "--log-dir",
            "/var/log/pics",
            "count",
            "/photos",
        ])
        .unwrap();

        let mut file_config = Config::default();
        file_config.videos_dir = "clips".into();

        let merged = cli.merge_with_config(file_config);
        assert!(!merged.verify_file_count);
        assert_eq!(merged.log_dir, Some(PathBuf::from("/var/log/pics")));
        assert_eq!(merged.videos_dir, "clips");
    }

    #[test]
    fn test_command_name() {
        let cli = Cli::try_parse_from(["pics", "count", "/photos"]).unwrap();
        assert_eq!(cli.command.name(), "count");
    }

    #[test]
    fn test_to_config_defaults() {
        let cli = Cli::try_parse_from(["pics", "sample-config"]).unwrap();
        assert_eq!(cli.to_config(), Config::default());
    }
}
