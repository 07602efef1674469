//! Error types for designspace handling.

use std::{io, path::PathBuf};

/// Result type for designspace operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading or writing a designspace document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The document could not be read from disk.
    #[error("Failed to read designspace '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },

    /// The document is not well-formed XML.
    #[error("Failed to parse designspace '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: roxmltree::Error,
    },

    /// The root element has no `<instances>` collection.
    #[error("Designspace '{path}' has no <instances> element")]
    MissingInstances { path: PathBuf },

    /// The filtered document could not be written.
    #[error("Failed to write designspace '{path}': {source}")]
    Write { path: PathBuf, source: io::Error },
}
