//! Error types for the document synchronizer.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for synchronizer operations.
pub type Result<T> = std::result::Result<T, SyncError>;

/// Errors that can occur while locating anchors or rewriting a document.
///
/// Every variant is raised before the document is written, so a failed
/// synchronization never leaves a partially rewritten file behind.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A required marker does not occur in the document.
    #[error("Could not find marker '{marker}' in the document")]
    AnchorNotFound {
        /// The literal marker text that was searched for.
        marker: String,
    },

    /// The end marker only occurs before the start marker.
    #[error("Marker '{end}' appears before '{start}'")]
    AnchorsOutOfOrder {
        /// Start marker of the pair.
        start: String,
        /// End marker of the pair.
        end: String,
    },

    /// A splice was requested for offsets outside the document or not on a
    /// character boundary.
    #[error("Invalid span {start}..{end} for a document of {len} bytes")]
    InvalidSpan {
        /// Requested start offset.
        start: usize,
        /// Requested end offset.
        end: usize,
        /// Document length in bytes.
        len: usize,
    },

    /// Reading or writing the document file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// The document path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}
