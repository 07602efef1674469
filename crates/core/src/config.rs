//! Configuration constants for instance generation.

pub use designspace::TEMP_SUFFIX;
pub use ufo_metadata::KEPT_LIB_KEYS;

/// Design space file used when `-d` is not given.
pub const DEFAULT_DESIGNSPACE: &str = "font.designspace";

/// UFO format version the interpolation engine writes.
pub const UFO_FORMAT_VERSION: u32 = 2;

/// Glyph directory of a UFO bundle's default layer.
pub const GLYPHS_DIR: &str = "glyphs";

/// Post-processing tools print this once a font has been handled.
pub const SUCCESS_MARKER: &str = "Done with font";

/// Overlap removal executable.
pub const CHECK_OUTLINES: &str =
    if cfg!(windows) { "checkOutlinesUFO.cmd" } else { "checkOutlinesUFO" };

/// Autohinting executable.
pub const AUTOHINT: &str = if cfg!(windows) { "autohint.cmd" } else { "autohint" };

/// UFO normalizer executable.
pub const UFONORMALIZER: &str = "ufonormalizer";

/// Python interpreter hosting the interpolation engine.
pub const PYTHON: &str = if cfg!(windows) { "python" } else { "python3" };
