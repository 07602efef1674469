//! Instance selection, building, and post-processing for UFO design spaces.

pub mod builder;
pub mod cleanup;
pub mod config;
pub mod error;
pub mod log_sink;
pub mod normalize;
pub mod options;
pub mod pipeline;
pub mod postprocess;
pub mod tools;

pub use builder::{BuildSettings, InstanceBuilder, MutatorMathBuilder};
pub use cleanup::{BundleCleaner, UfoCleaner};
pub use error::{Error, OptionsError, PostProcessError, Result};
pub use log_sink::LogSink;
pub use normalize::{Normalizer, UfoNormalizer};
pub use options::Options;
pub use pipeline::{RunSummary, SystemTools, Toolchain, run};
pub use postprocess::{PostProcessor, Stage};
pub use tools::{ProcessRunner, ToolOutput, ToolRunner};
