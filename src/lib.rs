//! Pics - date-partitioned media archive organiser
//!
//! This library moves a flat collection of photos and videos into one
//! directory per calendar day (`2023 06 June 15`) and keeps the files inside
//! each day sequentially named:
//! - Date bucketing by file modification time
//! - Video separation into a `videos` subdirectory
//! - Sequential, zero-padded image and video names
//! - Renaming a bucket together with every file it contains
//! - File counting for before/after verification

pub mod cli;
pub mod config;
pub mod count;
pub mod error;
pub mod fsutil;
pub mod name;
pub mod organise;
pub mod sequence;

pub use cli::{Cli, Command};
pub use config::{Config, ConfigError, MediaKind};
pub use error::{Error, Result};
pub use name::BucketName;
pub use organise::{NormaliseSummary, Organiser, RenameOutcome};
pub use sequence::RenamePlan;
