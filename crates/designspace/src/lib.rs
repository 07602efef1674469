//! Designspace documents for instance generation.
//!
//! The document is held as an owned element tree rather than a typed model,
//! so that everything the interpolation engine reads (axes, rules, the
//! `info`/`kerning`/`glyphs` children of an instance, lib data) survives a
//! filter-and-rewrite round unchanged.

mod document;
mod error;
mod tree;

pub use document::{
    Candidate, DesignSpace, InstanceEntry, Selection, SkippedInstance, TEMP_SUFFIX,
};
pub use error::{Error, Result};
pub use tree::{Element, Node};
