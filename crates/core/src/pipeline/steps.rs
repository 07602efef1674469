//! Individual pipeline steps.

use std::{
    fs::{remove_dir_all, remove_file},
    path::{Path, PathBuf},
};

use designspace::{Candidate, DesignSpace};
use log::{debug, warn};

use super::PipelineContext;
use crate::{
    builder::BuildSettings,
    config::GLYPHS_DIR,
    error::Result,
    log_sink::LogSink,
    options::Options,
    postprocess::PostProcessor,
};

/// The filtered design space copy handed to the interpolation engine.
///
/// Removed when dropped, so the file disappears whether or not the build
/// succeeded.
#[derive(Debug)]
pub struct TempDocument {
    path: PathBuf,
    original: PathBuf,
}

impl TempDocument {
    /// Write `ds` next to its source under the temporary name.
    pub fn write(ds: &DesignSpace) -> Result<Self> {
        let path = ds.temp_path();
        ds.save(&path)?;
        Ok(Self { path, original: ds.path().to_path_buf() })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDocument {
    fn drop(&mut self) {
        if self.path != self.original
            && self.path.exists()
            && let Err(e) = remove_file(&self.path)
        {
            warn!("Failed to remove {}: {e}", self.path.display());
        }
    }
}

/// Output of the design space filter: what to build and from which document.
#[derive(Debug)]
pub struct PreparedBuild {
    pub document: TempDocument,
    pub instances: Vec<PathBuf>,
}

/// Read the design space, keep the selected instances, and write the
/// filtered copy.
///
/// Returns `None` when no selected instance can be built; that is reported
/// but is not an error.
pub fn prepare_document(options: &Options, sink: &mut LogSink) -> Result<Option<PreparedBuild>> {
    sink.print(format!("Reading design space file: {} ...", options.ds_path.display()));
    let mut ds = DesignSpace::load(&options.ds_path)?;
    ds.retain_instances(&options.indices);
    ds.resolve_paths();

    let selection = ds.selection();
    for candidate in &selection.candidates {
        match candidate {
            Candidate::Build(entry) => {
                sink.print(format!("adding {} to build list.", entry.postscript_name));
                purge_glyphs(&entry.path);
            }
            Candidate::Skip(skipped) => sink.print(format!(
                "Skipping instance that does not have postscriptname attribute: {}",
                skipped.xml
            )),
        }
    }

    if selection.is_empty() {
        sink.print(format!(
            "Failed to find any instances in the ds file '{}' that have the postscriptfilename attribute",
            options.ds_path.display()
        ));
        return Ok(None);
    }

    let document = TempDocument::write(&ds)?;
    debug!("Wrote filtered design space to {}", document.path().display());
    Ok(Some(PreparedBuild { document, instances: selection.paths() }))
}

/// Delete an instance's glyph directory so the build starts from an empty
/// glyph set. Best effort.
fn purge_glyphs(instance: &Path) {
    let glyphs = instance.join(GLYPHS_DIR);
    if glyphs.exists()
        && let Err(e) = remove_dir_all(&glyphs)
    {
        debug!("Could not remove {}: {e}", glyphs.display());
    }
}

/// Build from the filtered document, which is deleted as soon as the engine
/// returns.
pub(super) fn step_build(ctx: &mut PipelineContext<'_>, document: TempDocument) -> Result<()> {
    let count = ctx.instances.len();
    if count == 1 {
        ctx.sink.log("Building 1 instance...");
    } else {
        ctx.sink.log(format!("Building {count} instances..."));
    }

    let settings = BuildSettings::from_options(ctx.options);
    let built = ctx.tools.builder.build(document.path(), &settings);
    drop(document);
    built?;

    ctx.sink.log(format!("Built {count} instances."));
    Ok(())
}

pub(super) fn step_clear_libs(ctx: &mut PipelineContext<'_>) -> Result<()> {
    for path in &ctx.instances {
        ctx.tools.cleaner.clear_custom_libs(path)?;
    }
    Ok(())
}

pub(super) fn step_normalize_modified(ctx: &mut PipelineContext<'_>) -> Result<()> {
    if !ctx.options.do_normalize {
        return Ok(());
    }
    ctx.sink.log("Applying UFO normalization...");
    normalize_all(ctx, true)
}

pub(super) fn step_post_process(ctx: &mut PipelineContext<'_>) -> Result<()> {
    if !ctx.options.post_processing() {
        return Ok(());
    }
    ctx.sink.log("Applying post-processing...");
    let processor = PostProcessor::new(ctx.tools.runner, ctx.options);
    for path in &ctx.instances {
        processor.process(path, ctx.sink)?;
    }
    ctx.summary.post_processed = true;
    Ok(())
}

/// Overlap removal validates layers itself; without it, do so explicitly.
pub(super) fn step_validate_layers(ctx: &mut PipelineContext<'_>) -> Result<()> {
    if ctx.options.do_overlap_removal {
        return Ok(());
    }
    for path in &ctx.instances {
        ctx.tools.cleaner.validate_layers(path)?;
    }
    Ok(())
}

/// Post-processing tools rename glyph files, so normalize everything again.
pub(super) fn step_normalize_full(ctx: &mut PipelineContext<'_>) -> Result<()> {
    if !ctx.options.post_processing() || !ctx.options.do_normalize {
        return Ok(());
    }
    normalize_all(ctx, false)
}

fn normalize_all(ctx: &mut PipelineContext<'_>, only_modified: bool) -> Result<()> {
    let Some(normalizer) = ctx.tools.normalizer else {
        return Ok(());
    };
    for path in &ctx.instances {
        normalizer.normalize(path, only_modified)?;
    }
    ctx.summary.normalize_passes += 1;
    Ok(())
}
