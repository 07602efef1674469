//! Metadata cleanup for generated UFO instances.
//!
//! Interpolated instances inherit lib data from their masters, most of which
//! is meaningless for the instance. [`clear_custom_libs`] strips it, and
//! [`validate_layers`] drops glyphs left behind in secondary layers. Both edit
//! the affected files in place and leave the rest of the bundle untouched.

mod bundle;
mod error;
mod layers;
mod libs;

pub use bundle::DEFAULT_GLYPHS_DIR;
pub use error::{Error, Result};
pub use layers::{LayerReport, prune_contents, validate_layers};
pub use libs::{KEPT_LIB_KEYS, LibReport, clear_custom_libs, strip_font_lib, strip_glyph_lib};
