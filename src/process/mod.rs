//! External command execution
//!
//! Split into a plain [`Executor`] capability that spawns a command and
//! streams its output, and a [`LoggingExecutor`] decorator that logs every
//! invocation and turns a nonzero exit into an error. The cache layer only
//! sees `dyn Executor`, so tests substitute a fake.

mod executor;
mod logging;

#[cfg(test)]
pub(crate) mod fake;

pub use executor::{Executor, SystemExecutor};
pub use logging::LoggingExecutor;

use std::fmt;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

/// Max number of stderr lines kept in process error messages.
pub const STDERR_TAIL_LINES: usize = 20;

/// A command to run: program, arguments and optional working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    /// Executable name or path
    pub program: String,
    /// Arguments, not shell-interpreted
    pub args: Vec<String>,
    /// Working directory (inherits the caller's when `None`)
    pub cwd: Option<PathBuf>,
}

impl CommandLine {
    /// Create a command line without a working directory
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: None,
        }
    }

    /// Run in `dir`
    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.cwd = Some(dir.to_path_buf());
        self
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// One line of child output, tagged with its stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// Outcome of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessResult {
    /// Exit code, -1 when terminated by a signal
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Last `STDERR_TAIL_LINES` lines of stderr for error diagnostics.
pub(crate) fn stderr_tail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.lines().collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}

/// Strip the line terminator and decode, replacing invalid UTF-8.
fn take_line(buf: &mut Vec<u8>) -> String {
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    let line = String::from_utf8_lossy(buf).into_owned();
    buf.clear();
    line
}

/// Stream stdout+stderr from a child process, calling `on_line` for each line.
///
/// Both pipes are drained concurrently until EOF so a chatty stderr cannot
/// block a child that is also writing stdout. Lines are read as bytes; a
/// line that is not valid UTF-8 is decoded lossily and reading continues.
/// Returns the collected (stdout, stderr).
pub(crate) async fn stream_child_output(
    child: &mut tokio::process::Child,
    on_line: &(dyn Fn(OutputLine) + Send + Sync),
) -> (Vec<String>, Vec<String>) {
    let mut stdout_lines = Vec::new();
    let mut stderr_lines = Vec::new();

    let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
        return (stdout_lines, stderr_lines);
    };

    let mut stdout_reader = BufReader::new(stdout);
    let mut stderr_reader = BufReader::new(stderr);
    // Partial lines survive a lost select race; read_until appends to them
    let mut stdout_buf = Vec::new();
    let mut stderr_buf = Vec::new();

    let mut stdout_done = false;
    let mut stderr_done = false;

    while !stdout_done || !stderr_done {
        tokio::select! {
            read = stdout_reader.read_until(b'\n', &mut stdout_buf), if !stdout_done => {
                match read {
                    Ok(0) => stdout_done = true,
                    Ok(_) => {
                        let line = take_line(&mut stdout_buf);
                        on_line(OutputLine::Stdout(line.clone()));
                        stdout_lines.push(line);
                    }
                    Err(e) => {
                        warn!("Stopped reading stdout: {}", e);
                        stdout_done = true;
                    }
                }
            }
            read = stderr_reader.read_until(b'\n', &mut stderr_buf), if !stderr_done => {
                match read {
                    Ok(0) => stderr_done = true,
                    Ok(_) => {
                        let line = take_line(&mut stderr_buf);
                        on_line(OutputLine::Stderr(line.clone()));
                        stderr_lines.push(line);
                    }
                    Err(e) => {
                        warn!("Stopped reading stderr: {}", e);
                        stderr_done = true;
                    }
                }
            }
        }
    }

    (stdout_lines, stderr_lines)
}
