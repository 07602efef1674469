//! make-instances-ufo command line library.

pub mod cli;
pub mod commands;

pub use cli::{Invocation, parse_args};
pub use commands::{make_instances, run_pipeline};
