//! Error types for the layer documentation publisher.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for publisher operations.
#[derive(Debug, Error)]
pub enum LayerDocsError {
    /// A required external input is absent or empty.
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    /// The configuration is present but inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The configuration file could not be read or parsed.
    #[error("Configuration file {}: {message}", path.display())]
    ConfigFile {
        /// The configuration file.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },

    /// Registry error passthrough.
    #[error("Registry error: {0}")]
    Registry(#[from] layerdocs_registry::RegistryError),

    /// Document synchronizer error passthrough.
    #[error("Document error: {0}")]
    Document(#[from] layerdocs_docsync::SyncError),
}
