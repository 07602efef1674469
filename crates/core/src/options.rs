//! Run configuration.

use std::{collections::BTreeSet, path::PathBuf};

use crate::config::DEFAULT_DESIGNSPACE;

/// Settings for one run, built once from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Design space document to build from.
    pub ds_path: PathBuf,
    pub do_autohint: bool,
    pub do_overlap_removal: bool,
    pub do_normalize: bool,
    /// Keep fractional coordinates instead of rounding to integers.
    pub allow_decimal_coords: bool,
    /// Zero-based instance positions to build. Empty means all.
    pub indices: BTreeSet<usize>,
    pub log_file: Option<PathBuf>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            ds_path: PathBuf::from(DEFAULT_DESIGNSPACE),
            do_autohint: true,
            do_overlap_removal: true,
            do_normalize: true,
            allow_decimal_coords: false,
            indices: BTreeSet::new(),
            log_file: None,
        }
    }
}

impl Options {
    /// Whether any external post-processing tool runs.
    pub fn post_processing(&self) -> bool {
        self.do_overlap_removal || self.do_autohint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert_eq!(options.ds_path, PathBuf::from("font.designspace"));
        assert!(options.do_autohint && options.do_overlap_removal && options.do_normalize);
        assert!(!options.allow_decimal_coords);
        assert!(options.indices.is_empty());
        assert!(options.post_processing());
    }

    #[test]
    fn test_post_processing_off_when_both_disabled() {
        let options =
            Options { do_autohint: false, do_overlap_removal: false, ..Options::default() };
        assert!(!options.post_processing());
    }
}
