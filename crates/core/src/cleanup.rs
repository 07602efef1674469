//! Bundle cleanup collaborators.

use std::path::Path;

use log::debug;

use crate::error::Result;

/// Metadata and layer maintenance on a built instance.
pub trait BundleCleaner {
    /// Drop custom font and glyph lib data.
    fn clear_custom_libs(&self, path: &Path) -> Result<()>;

    /// Drop glyphs in secondary layers that the default layer no longer has.
    fn validate_layers(&self, path: &Path) -> Result<()>;
}

/// [`BundleCleaner`] editing the UFO files in place.
#[derive(Debug, Clone, Copy, Default)]
pub struct UfoCleaner;

impl BundleCleaner for UfoCleaner {
    fn clear_custom_libs(&self, path: &Path) -> Result<()> {
        ufo_metadata::clear_custom_libs(path)?;
        Ok(())
    }

    fn validate_layers(&self, path: &Path) -> Result<()> {
        let report = ufo_metadata::validate_layers(path)?;
        for (layer, glyph) in &report.removed {
            debug!("{}: removed stale glyph '{glyph}' from layer '{layer}'", path.display());
        }
        Ok(())
    }
}
