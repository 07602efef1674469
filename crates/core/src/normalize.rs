//! UFO normalization.

use std::{
    path::Path,
    process::{Command, Stdio},
};

use log::debug;

use crate::{
    config::UFONORMALIZER,
    error::{Error, Result},
};

/// Rewrites a UFO bundle into canonical form, in place.
pub trait Normalizer {
    /// With `only_modified`, only files changed since the previous
    /// normalization are rewritten.
    fn normalize(&self, path: &Path, only_modified: bool) -> Result<()>;
}

/// [`Normalizer`] backed by the `ufonormalizer` executable.
#[derive(Debug, Clone)]
pub struct UfoNormalizer {
    program: String,
}

impl UfoNormalizer {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }

    /// Returns the normalizer if it can be launched from `PATH`.
    ///
    /// An absent normalizer is an expected environment condition, so this
    /// returns `None` rather than an error.
    pub fn detect() -> Option<Self> {
        Self::new(UFONORMALIZER).if_launchable()
    }

    fn if_launchable(self) -> Option<Self> {
        match Command::new(&self.program)
            .arg("--help")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
        {
            Ok(_) => Some(self),
            Err(e) => {
                debug!("{} unavailable, normalization disabled: {e}", self.program);
                None
            }
        }
    }
}

impl Normalizer for UfoNormalizer {
    fn normalize(&self, path: &Path, only_modified: bool) -> Result<()> {
        let mut command = Command::new(&self.program);
        if !only_modified {
            command.arg("--all");
        }
        command.arg(path);
        debug!("Running {command:?}");

        let output = command
            .output()
            .map_err(|source| Error::Spawn { program: self.program.clone(), source })?;
        if !output.status.success() {
            return Err(Error::Normalize {
                path: path.to_path_buf(),
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program_not_detected() {
        assert!(UfoNormalizer::new("no-such-normalizer-91ab").if_launchable().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_present_program_detected() {
        // `true` ignores its arguments and exits cleanly.
        assert!(UfoNormalizer::new("true").if_launchable().is_some());
    }

    #[cfg(unix)]
    #[test]
    fn test_failure_reported() {
        let err = UfoNormalizer::new("false").normalize(Path::new("A.ufo"), true).unwrap_err();
        assert!(matches!(err, Error::Normalize { .. }));
    }
}
