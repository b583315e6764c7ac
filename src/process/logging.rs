//! Logging executor decorator

use super::{stderr_tail, CommandLine, Executor, OutputLine, ProcessResult};
use crate::error::{LazydepError, LazydepResult};
use async_trait::async_trait;
use tracing::{error, info};

/// Wraps any [`Executor`] to log invocations and stream output lines.
///
/// The literal command line is logged before execution. Stdout lines go to
/// `info`, stderr lines to `error`, as they arrive. A nonzero exit becomes
/// [`LazydepError::Process`] carrying the stderr tail.
pub struct LoggingExecutor<E> {
    inner: E,
}

impl<E: Executor> LoggingExecutor<E> {
    pub fn new(inner: E) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<E: Executor> Executor for LoggingExecutor<E> {
    async fn run(
        &self,
        command: &CommandLine,
        on_line: &(dyn Fn(OutputLine) + Send + Sync),
    ) -> LazydepResult<ProcessResult> {
        info!("$ {}", command);

        let forward = |line: OutputLine| {
            match &line {
                OutputLine::Stdout(text) => info!("{}", text),
                OutputLine::Stderr(text) => error!("{}", text),
            }
            on_line(line);
        };

        let result = self.inner.run(command, &forward).await?;

        if result.success() {
            Ok(result)
        } else {
            Err(LazydepError::Process {
                command: command.to_string(),
                exit_code: result.exit_code,
                stderr_tail: stderr_tail(&result.stderr),
            })
        }
    }
}
