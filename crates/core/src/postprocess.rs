//! Overlap removal and autohinting of built instances.

use std::{ffi::OsString, path::Path};

use crate::{
    config::{AUTOHINT, CHECK_OUTLINES},
    error::{PostProcessError, Result},
    log_sink::LogSink,
    options::Options,
    tools::ToolRunner,
};

/// One external post-processing step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    OverlapRemoval,
    Autohint,
}

impl Stage {
    pub fn program(self) -> &'static str {
        match self {
            Stage::OverlapRemoval => CHECK_OUTLINES,
            Stage::Autohint => AUTOHINT,
        }
    }

    /// Command line: `[-dec] <flags...> <path>`.
    pub fn args(self, path: &Path, allow_decimal_coords: bool) -> Vec<OsString> {
        let flags: &[&str] = match self {
            Stage::OverlapRemoval => &["-e"],
            Stage::Autohint => &["-q", "-nb"],
        };
        let mut args = Vec::with_capacity(flags.len() + 2);
        if allow_decimal_coords {
            args.push(OsString::from("-dec"));
        }
        args.extend(flags.iter().map(OsString::from));
        args.push(path.as_os_str().to_owned());
        args
    }

    fn announcement(self, path: &Path) -> String {
        match self {
            Stage::OverlapRemoval => format!(
                "\tdoing overlap removal with {CHECK_OUTLINES} {} ...",
                path.display()
            ),
            Stage::Autohint => format!("\tautohinting {} ...", path.display()),
        }
    }

    fn failure(self, path: &Path) -> String {
        match self {
            Stage::OverlapRemoval => format!("Error in {CHECK_OUTLINES} {}", path.display()),
            Stage::Autohint => format!("Error in autohinting {}", path.display()),
        }
    }
}

/// Runs the enabled stages over one instance at a time.
///
/// Each stage must print the success marker; the first one that does not
/// aborts with [`PostProcessError`]. Stages are never retried.
pub struct PostProcessor<'a> {
    runner: &'a dyn ToolRunner,
    stages: Vec<Stage>,
    allow_decimal_coords: bool,
}

impl<'a> PostProcessor<'a> {
    pub fn new(runner: &'a dyn ToolRunner, options: &Options) -> Self {
        let mut stages = Vec::new();
        if options.do_overlap_removal {
            stages.push(Stage::OverlapRemoval);
        }
        if options.do_autohint {
            stages.push(Stage::Autohint);
        }
        Self { runner, stages, allow_decimal_coords: options.allow_decimal_coords }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn process(&self, path: &Path, sink: &mut LogSink) -> Result<()> {
        for &stage in &self.stages {
            self.run_stage(stage, path, sink)?;
        }
        Ok(())
    }

    fn run_stage(&self, stage: Stage, path: &Path, sink: &mut LogSink) -> Result<()> {
        sink.log(stage.announcement(path));
        let args = stage.args(path, self.allow_decimal_coords);
        // Overlap removal is chatty, so it only gets a progress dot per line.
        let output = self.runner.run(stage.program(), &args, &mut |line| match stage {
            Stage::OverlapRemoval => sink.progress("."),
            Stage::Autohint => sink.print(line),
        })?;
        sink.progress("\n");

        if output.succeeded() {
            return Ok(());
        }
        sink.log(output.text.trim_end());
        sink.log(stage.failure(path));
        Err(PostProcessError { tool: stage.program().to_string(), path: path.to_path_buf() }.into())
    }
}
