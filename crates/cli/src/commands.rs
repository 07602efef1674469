//! Top-level command flow.

use anyhow::{Context, Result};
use log::{debug, warn};
use ufo_instances_core::{
    Error, LogSink, Options, OptionsError, RunSummary, SystemTools, Toolchain, pipeline,
};

use crate::cli::{Invocation, USAGE, help, parse_args};

/// Parse `args`, then build and post-process the selected instances with the
/// tools found on `PATH`.
///
/// Everything the user needs to see has been written to `sink` by the time
/// this returns; the caller only adds the closing line on error.
pub fn make_instances(args: &[String], sink: &mut LogSink) -> Result<()> {
    let options = match parse_args(args) {
        Ok(Invocation::Run(options)) => options,
        Ok(Invocation::Help) => {
            sink.log(help());
            return Ok(());
        }
        Ok(Invocation::Usage) => {
            sink.log(USAGE);
            return Ok(());
        }
        Err(e) => {
            report_options_error(&e, sink);
            return Err(e.into());
        }
    };

    if let Some(path) = &options.log_file {
        sink.send_to(path)
            .with_context(|| format!("Failed to open log file: {}", path.display()))?;
    }

    let tools = SystemTools::detect();
    if tools.normalizer.is_none() {
        debug!("No UFO normalizer found; normalization will be skipped");
    }
    run_pipeline(&options, tools.toolchain(), sink)?;
    Ok(())
}

/// Run the pipeline, logging failures the pipeline has not already reported.
pub fn run_pipeline(
    options: &Options,
    tools: Toolchain<'_>,
    sink: &mut LogSink,
) -> Result<Option<RunSummary>> {
    let summary = match pipeline::run(options, tools, sink) {
        Ok(summary) => summary,
        // The failing tool's output and an error line are already in the log.
        Err(Error::PostProcess(e)) => return Err(e).context("Post-processing failed"),
        Err(e) => {
            sink.log(format!("Error: {e}"));
            return Err(e).with_context(|| {
                format!("Failed to make instances from {}", options.ds_path.display())
            });
        }
    };

    if let Some(summary) = &summary {
        debug!(
            "Finished {} instances ({} normalization passes, post-processing {})",
            summary.instances.len(),
            summary.normalize_passes,
            if summary.post_processed { "applied" } else { "skipped" }
        );
    }
    Ok(summary)
}

fn report_options_error(error: &OptionsError, sink: &mut LogSink) {
    if let Some(path) = &error.log_file
        && let Err(e) = sink.send_to(path)
    {
        warn!("Failed to open log file {}: {e}", path.display());
    }
    for message in &error.messages {
        sink.log(message);
    }
}
