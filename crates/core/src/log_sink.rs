//! User-facing run log.
//!
//! Everything the run reports goes through a [`LogSink`] created once in
//! `main` and passed down by reference. Diagnostics meant for developers use
//! the `log` macros instead.

use std::{
    fs::File,
    io::{self, Write},
    path::Path,
};

use log::warn;

/// Console writer with an optional mirror file, flushed after every entry.
pub struct LogSink {
    console: Box<dyn Write>,
    file: Option<File>,
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new(io::stdout())
    }
}

impl LogSink {
    pub fn new(console: impl Write + 'static) -> Self {
        Self { console: Box::new(console), file: None }
    }

    /// Mirror subsequent [`log`](Self::log) entries to `path`, truncating it.
    pub fn send_to(&mut self, path: &Path) -> io::Result<()> {
        self.file = Some(File::create(path)?);
        Ok(())
    }

    pub fn has_file(&self) -> bool {
        self.file.is_some()
    }

    /// Write a line to the console and the log file.
    pub fn log(&mut self, message: impl AsRef<str>) {
        let message = message.as_ref();
        self.print(message);
        if let Some(file) = &mut self.file
            && let Err(e) = writeln!(file, "{message}").and_then(|()| file.flush())
        {
            warn!("Failed to write log file: {e}");
        }
    }

    /// Write a line to the console only.
    pub fn print(&mut self, message: impl AsRef<str>) {
        let _ = writeln!(self.console, "{}", message.as_ref());
        let _ = self.console.flush();
    }

    /// Write console-only progress output without a trailing newline.
    pub fn progress(&mut self, text: &str) {
        let _ = self.console.write_all(text.as_bytes());
        let _ = self.console.flush();
    }
}
