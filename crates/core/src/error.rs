//! Error types for the instance pipeline.

use std::{io, path::PathBuf};

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Bad or missing command line arguments, or a missing design space file.
///
/// Carries every message collected while parsing, plus the `-log`
/// destination if one was seen, so the caller can report them in one place.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("invalid options: {}", .messages.join("; "))]
pub struct OptionsError {
    pub messages: Vec<String>,
    pub log_file: Option<PathBuf>,
}

/// A post-processing tool finished without printing its success marker.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{tool} did not complete for '{path}'")]
pub struct PostProcessError {
    pub tool: String,
    pub path: PathBuf,
}

/// Errors that stop a run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Options(#[from] OptionsError),

    /// The design space document could not be read, parsed or written.
    #[error(transparent)]
    Parse(#[from] designspace::Error),

    #[error(transparent)]
    PostProcess(#[from] PostProcessError),

    /// An external program could not be started.
    #[error("Failed to run '{program}': {source}")]
    Spawn {
        program: String,
        source: io::Error,
    },

    /// The interpolation engine reported failure.
    #[error("Failed to build instances from '{document}': {reason}")]
    Build { document: PathBuf, reason: String },

    /// The normalizer ran but reported failure.
    #[error("Failed to normalize '{path}': {reason}")]
    Normalize { path: PathBuf, reason: String },

    #[error(transparent)]
    Metadata(#[from] ufo_metadata::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
