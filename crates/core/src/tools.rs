//! External tool invocation.

use std::{
    ffi::OsString,
    io::{self, BufRead, BufReader, Read},
    process::{Command, Stdio},
};

use log::debug;

use crate::{
    config::SUCCESS_MARKER,
    error::{Error, Result},
};

/// Everything a tool wrote to standard output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub text: String,
}

impl ToolOutput {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Tools signal success only through [`SUCCESS_MARKER`]; exit codes are
    /// not consulted.
    pub fn succeeded(&self) -> bool {
        self.text.contains(SUCCESS_MARKER)
    }
}

/// Runs an external program to completion and captures its output.
pub trait ToolRunner {
    /// Run `program` with `args`, calling `on_line` with each line of
    /// standard output (line ending stripped) as it arrives.
    fn run(
        &self,
        program: &str,
        args: &[OsString],
        on_line: &mut dyn FnMut(&str),
    ) -> Result<ToolOutput>;
}

/// [`ToolRunner`] backed by a child process with piped stdout.
///
/// Blocks until the child closes its stdout and exits. There is no timeout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ToolRunner for ProcessRunner {
    fn run(
        &self,
        program: &str,
        args: &[OsString],
        on_line: &mut dyn FnMut(&str),
    ) -> Result<ToolOutput> {
        debug!("Running {program} {args:?}");
        let spawn_error = |source| Error::Spawn { program: program.to_string(), source };
        let mut child =
            Command::new(program).args(args).stdout(Stdio::piped()).spawn().map_err(spawn_error)?;

        let mut text = String::new();
        let read = match child.stdout.take() {
            Some(stdout) => stream_lines(stdout, on_line, &mut text),
            None => Ok(()),
        };

        // Reap the child even when reading failed; the pipe is closed by now.
        let status = child.wait()?;
        debug!("{program} exited with {status}");
        read?;
        Ok(ToolOutput { text })
    }
}

/// Feed `source` to `on_line` line by line, appending everything to `text`.
fn stream_lines(
    source: impl Read,
    on_line: &mut dyn FnMut(&str),
    text: &mut String,
) -> io::Result<()> {
    let mut reader = BufReader::new(source);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(());
        }
        let line = String::from_utf8_lossy(&buf);
        on_line(line.trim_end_matches(['\r', '\n']));
        text.push_str(&line);
    }
}
