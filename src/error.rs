//! Error types for the MeshFlux state inspector

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the inspector
#[derive(Error, Debug)]
pub enum InspectError {
    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Settings store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Writing the report failed
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Home directory could not be resolved")]
    NoHomeDirectory,

    #[error("Log keywords must not be empty")]
    EmptyKeyword,
}

/// Settings store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Query on {table} failed: {source}")]
    Query {
        table: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Failed to close store: {0}")]
    Close(#[source] rusqlite::Error),
}

impl InspectError {
    /// Get a user-friendly error message with suggested action
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(ConfigError::NoHomeDirectory) => {
                "Could not resolve the home directory.\n  \
                Pass the container path explicitly with --base <DIR>."
                    .to_string()
            }

            Self::Config(ConfigError::EmptyKeyword) => {
                "Empty --keyword given; it would match every log line.".to_string()
            }

            Self::Store(StoreError::Open { path, source }) => {
                format!(
                    "Could not open settings store {}: {}\n  \
                    Check that the file is a readable SQLite database.",
                    path.display(),
                    source
                )
            }

            Self::Store(StoreError::Query { table, .. }) => {
                format!(
                    "{}\n  The settings store may predate the `{}` table.",
                    self, table
                )
            }

            _ => format!("{}", self),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 1,
            Self::Store(_) => 2,
            Self::Output(_) => 3,
        }
    }
}

/// Result type alias for inspector operations
pub type Result<T> = std::result::Result<T, InspectError>;
