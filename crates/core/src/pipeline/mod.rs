//! Instance generation pipeline.
//!
//! Filter → build → clear libs → normalize (modified only) → post-process →
//! validate layers (when overlap removal is off) → normalize (all files).
//! Everything runs sequentially; the first error ends the run.

mod steps;

use std::{path::PathBuf, time::Instant};

use log::debug;

pub use steps::{PreparedBuild, TempDocument, prepare_document};
use steps::{
    step_build, step_clear_libs, step_normalize_full, step_normalize_modified, step_post_process,
    step_validate_layers,
};

use crate::{
    builder::{InstanceBuilder, MutatorMathBuilder},
    cleanup::{BundleCleaner, UfoCleaner},
    error::Result,
    log_sink::LogSink,
    normalize::{Normalizer, UfoNormalizer},
    options::Options,
    tools::{ProcessRunner, ToolRunner},
};

/// The external collaborators a run delegates to.
#[derive(Clone, Copy)]
pub struct Toolchain<'a> {
    pub builder: &'a dyn InstanceBuilder,
    pub runner: &'a dyn ToolRunner,
    pub cleaner: &'a dyn BundleCleaner,
    /// `None` when no normalizer is installed; normalization is then skipped.
    pub normalizer: Option<&'a dyn Normalizer>,
}

/// Process-backed collaborators used by the command line tool.
#[derive(Debug, Default)]
pub struct SystemTools {
    pub builder: MutatorMathBuilder,
    pub runner: ProcessRunner,
    pub cleaner: UfoCleaner,
    pub normalizer: Option<UfoNormalizer>,
}

impl SystemTools {
    /// Collaborators from `PATH`, checking whether the normalizer is installed.
    pub fn detect() -> Self {
        Self { normalizer: UfoNormalizer::detect(), ..Self::default() }
    }

    pub fn toolchain(&self) -> Toolchain<'_> {
        Toolchain {
            builder: &self.builder,
            runner: &self.runner,
            cleaner: &self.cleaner,
            normalizer: self.normalizer.as_ref().map(|n| n as &dyn Normalizer),
        }
    }
}

/// What a completed run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Instance UFO paths, in build order.
    pub instances: Vec<PathBuf>,
    pub normalize_passes: usize,
    pub post_processed: bool,
}

/// Pipeline execution state shared by the steps.
pub struct PipelineContext<'a> {
    pub options: &'a Options,
    pub tools: Toolchain<'a>,
    pub sink: &'a mut LogSink,
    pub instances: Vec<PathBuf>,
    pub summary: RunSummary,
}

type PipelineStep = (&'static str, fn(&mut PipelineContext<'_>) -> Result<()>);

/// Steps after the build, in order.
const STEPS: &[PipelineStep] = &[
    ("clear-custom-libs", step_clear_libs),
    ("normalize-modified", step_normalize_modified),
    ("post-process", step_post_process),
    ("validate-layers", step_validate_layers),
    ("normalize-all", step_normalize_full),
];

fn run_step(
    name: &str,
    ctx: &mut PipelineContext<'_>,
    step: impl FnOnce(&mut PipelineContext<'_>) -> Result<()>,
) -> Result<()> {
    let start = Instant::now();
    step(ctx)?;
    debug!("{name} finished in {:.2}s", start.elapsed().as_secs_f64());
    Ok(())
}

/// Build and post-process the instances selected by `options`.
///
/// Returns `Ok(None)` when the design space has no buildable instance in the
/// selection.
pub fn run(
    options: &Options,
    tools: Toolchain<'_>,
    sink: &mut LogSink,
) -> Result<Option<RunSummary>> {
    let start = Instant::now();
    let Some(PreparedBuild { document, instances }) = prepare_document(options, sink)? else {
        return Ok(None);
    };

    let mut ctx = PipelineContext {
        options,
        tools,
        sink,
        summary: RunSummary { instances: instances.clone(), ..RunSummary::default() },
        instances,
    };
    run_step("build-instances", &mut ctx, |ctx| step_build(ctx, document))?;
    for (name, step) in STEPS {
        run_step(name, &mut ctx, *step)?;
    }

    debug!("Pipeline finished in {:.2}s", start.elapsed().as_secs_f64());
    Ok(Some(ctx.summary))
}
