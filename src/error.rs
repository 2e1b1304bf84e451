//! Crate-wide error type for fallible operations.

use std::path::PathBuf;

/// Errors produced by weather ingestion, series construction, and
/// validation alignment.
///
/// Config validation uses [`crate::config::ConfigError`] instead, which
/// carries a dotted field path rather than a failure cause.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A weather series must contain at least one sample.
    #[error("weather series is empty")]
    EmptySeries,

    /// Every row of the input file failed timestamp parsing.
    #[error("no usable rows in `{path}`: all {dropped} rows had unparseable timestamps")]
    AllRowsDropped {
        /// Source file.
        path: PathBuf,
        /// Number of rows dropped.
        dropped: usize,
    },

    /// The input file has no header row or no recognizable time column.
    #[error("`{path}` has no `{column}` column")]
    MissingTimeColumn {
        /// Source file.
        path: PathBuf,
        /// Name of the required column.
        column: &'static str,
    },

    /// Modeled and measured daily series share no dates within the
    /// alignment tolerance.
    #[error("modeled and measured series share no dates within {max_offset_days} day(s)")]
    NoCommonDates {
        /// Alignment tolerance that was applied.
        max_offset_days: i64,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
