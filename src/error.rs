//! Error types for loading, cleaning and presenting episodes.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, VizError>;

#[derive(Debug, Error)]
pub enum VizError {
    /// The CSV file could not be opened, read or parsed
    #[error("failed to load {}: {source}", path.display())]
    DataLoad {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A record has more fields than the header row
    #[error("{}: row {row}: expected {expected} fields, saw {found}", path.display())]
    MalformedRecord {
        path: PathBuf,
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A required column is absent from the header row
    #[error("{}: missing required column '{column}'", path.display())]
    MissingColumn { path: PathBuf, column: String },

    /// A sensor field is present but not numeric
    #[error("{}: row {row}, column '{column}': cannot parse '{value}' as a number", path.display())]
    InvalidValue {
        path: PathBuf,
        row: usize,
        column: String,
        value: String,
    },

    /// Nothing left to plot after dropping incomplete rows
    #[error("episode '{title}' has no complete rows after cleaning ({})", path.display())]
    EmptyDataset { title: String, path: PathBuf },

    /// The plotting backend failed
    #[error("render failed: {0}")]
    Render(String),

    /// The episode manifest could not be read or parsed
    #[error("invalid manifest {}: {reason}", path.display())]
    Manifest { path: PathBuf, reason: String },

    /// Writing an exported figure failed
    #[error("failed to export {}: {source}", path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}
