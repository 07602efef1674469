//! Interpolation engine invocation.

use std::{path::Path, process::Command};

use log::debug;

use crate::{
    config::{PYTHON, UFO_FORMAT_VERSION},
    error::{Error, Result},
    options::Options,
};

/// Arguments handed to the interpolation engine besides the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildSettings {
    pub format_version: u32,
    /// Round outline coordinates to integers.
    pub round_geometry: bool,
}

impl BuildSettings {
    pub fn from_options(options: &Options) -> Self {
        Self { format_version: UFO_FORMAT_VERSION, round_geometry: !options.allow_decimal_coords }
    }
}

/// Materializes the instance UFOs described by a design space document.
pub trait InstanceBuilder {
    fn build(&self, document: &Path, settings: &BuildSettings) -> Result<()>;
}

const MUTATOR_MATH_SCRIPT: &str = "\
import sys
from mutatorMath.ufo import build
build(
    documentPath=sys.argv[1],
    outputUFOFormatVersion=int(sys.argv[2]),
    roundGeometry=sys.argv[3] == '1',
)
";

/// [`InstanceBuilder`] running MutatorMath's UFO builder in a Python
/// subprocess.
#[derive(Debug, Clone)]
pub struct MutatorMathBuilder {
    python: String,
}

impl Default for MutatorMathBuilder {
    fn default() -> Self {
        Self::new(PYTHON)
    }
}

impl MutatorMathBuilder {
    pub fn new(python: impl Into<String>) -> Self {
        Self { python: python.into() }
    }
}

impl InstanceBuilder for MutatorMathBuilder {
    fn build(&self, document: &Path, settings: &BuildSettings) -> Result<()> {
        let mut command = Command::new(&self.python);
        command
            .arg("-c")
            .arg(MUTATOR_MATH_SCRIPT)
            .arg(document)
            .arg(settings.format_version.to_string())
            .arg(if settings.round_geometry { "1" } else { "0" });
        if let Some(dir) = document.parent()
            && !dir.as_os_str().is_empty()
        {
            command.current_dir(dir);
        }
        debug!("Running {command:?}");

        let status = command
            .status()
            .map_err(|source| Error::Spawn { program: self.python.clone(), source })?;
        if !status.success() {
            return Err(Error::Build {
                document: document.to_path_buf(),
                reason: format!("interpolation engine exited with {status}"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_round_unless_decimals_allowed() {
        let options = Options::default();
        assert_eq!(
            BuildSettings::from_options(&options),
            BuildSettings { format_version: 2, round_geometry: true }
        );
        let options = Options { allow_decimal_coords: true, ..Options::default() };
        assert!(!BuildSettings::from_options(&options).round_geometry);
    }

    #[test]
    fn test_missing_interpreter() {
        let builder = MutatorMathBuilder::new("no-such-python-3c1d");
        let settings = BuildSettings { format_version: 2, round_geometry: true };
        let err = builder.build(Path::new("font.designspace.temp"), &settings).unwrap_err();
        assert!(matches!(err, Error::Spawn { .. }));
    }
}
