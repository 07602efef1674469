//! Error types for UFO metadata operations.

use std::{io, path::PathBuf};

/// Result type for UFO metadata operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The path is not a UFO bundle (no `metainfo.plist`).
    #[error("Not a UFO bundle: '{path}'")]
    NotUfo { path: PathBuf },

    #[error("Failed to read '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to write '{path}': {source}")]
    Write { path: PathBuf, source: io::Error },

    /// A property list could not be read or written.
    #[error("Invalid property list '{path}': {source}")]
    Plist {
        path: PathBuf,
        source: plist::Error,
    },

    #[error("Invalid glyph file '{path}': {source}")]
    Glif {
        path: PathBuf,
        source: roxmltree::Error,
    },

    /// A property list parsed but does not have the expected shape.
    #[error("Unexpected structure in '{path}': {reason}")]
    Malformed { path: PathBuf, reason: String },
}
