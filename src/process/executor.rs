//! Command executor capability

use super::{stream_child_output, CommandLine, OutputLine, ProcessResult};
use crate::error::{LazydepError, LazydepResult};
use async_trait::async_trait;
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;
use tracing::debug;

/// Runs external commands
///
/// Implementations report the exit code in [`ProcessResult`] and fail only
/// when the command could not be started. Interpreting the exit code is left
/// to decorators such as [`LoggingExecutor`](super::LoggingExecutor).
#[async_trait]
pub trait Executor: Send + Sync {
    /// Run `command`, calling `on_line` for each output line as it arrives
    async fn run(
        &self,
        command: &CommandLine,
        on_line: &(dyn Fn(OutputLine) + Send + Sync),
    ) -> LazydepResult<ProcessResult>;
}

#[async_trait]
impl<E: Executor + ?Sized> Executor for Arc<E> {
    async fn run(
        &self,
        command: &CommandLine,
        on_line: &(dyn Fn(OutputLine) + Send + Sync),
    ) -> LazydepResult<ProcessResult> {
        (**self).run(command, on_line).await
    }
}

/// Executor backed by `tokio::process`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor;

impl SystemExecutor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Executor for SystemExecutor {
    async fn run(
        &self,
        command: &CommandLine,
        on_line: &(dyn Fn(OutputLine) + Send + Sync),
    ) -> LazydepResult<ProcessResult> {
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(ref dir) = command.cwd {
            cmd.current_dir(dir);
        }

        let mut child = cmd
            .spawn()
            .map_err(|e| LazydepError::spawn(command.to_string(), e))?;

        let (stdout, stderr) = stream_child_output(&mut child, on_line).await;

        let status = child
            .wait()
            .await
            .map_err(|e| LazydepError::io(format!("waiting for {}", command), e))?;

        debug!("{} exited with {}", command.program, status);

        Ok(ProcessResult {
            exit_code: status.code().unwrap_or(-1),
            stdout: stdout.join("\n"),
            stderr: stderr.join("\n"),
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::process::LoggingExecutor;
    use std::sync::Mutex;
    use std::time::Duration;
    use tempfile::TempDir;

    fn sh(script: &str) -> CommandLine {
        CommandLine::new("sh", ["-c", script])
    }

    #[tokio::test]
    async fn captures_both_streams() {
        let seen = Mutex::new(Vec::new());
        let result = SystemExecutor::new()
            .run(&sh("echo out; echo err >&2; exit 3"), &|line: OutputLine| {
                seen.lock().unwrap().push(line)
            })
            .await
            .unwrap();

        assert_eq!(result.exit_code, 3);
        assert!(!result.success());
        assert_eq!(result.stdout, "out");
        assert_eq!(result.stderr, "err");

        let seen = seen.into_inner().unwrap();
        assert!(seen.contains(&OutputLine::Stdout("out".to_string())));
        assert!(seen.contains(&OutputLine::Stderr("err".to_string())));
    }

    #[tokio::test]
    async fn runs_in_working_directory() {
        let dir = TempDir::new().unwrap();
        let result = SystemExecutor::new()
            .run(&sh("touch marker && echo ok").current_dir(dir.path()), &|_| {})
            .await
            .unwrap();

        assert!(result.success());
        assert!(dir.path().join("marker").exists());
    }

    #[tokio::test]
    async fn invalid_utf8_does_not_stop_draining() {
        // A non-UTF-8 line followed by more output than a pipe buffer holds
        let script = "printf '\\377\\n'; head -c 200000 /dev/zero | tr '\\0' a; echo; echo done >&2";
        let result = tokio::time::timeout(
            Duration::from_secs(30),
            SystemExecutor::new().run(&sh(script), &|_| {}),
        )
        .await
        .expect("reader stalled on invalid UTF-8")
        .unwrap();

        assert!(result.success());
        assert!(result.stdout.starts_with('\u{FFFD}'));
        assert!(result.stdout.len() > 200_000);
        assert_eq!(result.stderr, "done");
    }

    #[tokio::test]
    async fn stderr_after_invalid_line_reaches_error() {
        let script = "printf 'ok\\n\\377\\nnpm ERR! 404 real cause\\n' >&2; exit 1";
        let err = LoggingExecutor::new(SystemExecutor::new())
            .run(&sh(script), &|_| {})
            .await
            .unwrap_err();

        match err {
            LazydepError::Process { stderr_tail, .. } => {
                assert!(stderr_tail.contains("real cause"), "tail was {stderr_tail:?}");
            }
            other => panic!("expected Process error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_program_is_spawn_error() {
        let cmd = CommandLine::new("lazydep-definitely-not-a-real-program", ["x"]);
        let err = SystemExecutor::new().run(&cmd, &|_| {}).await.unwrap_err();
        assert!(matches!(err, LazydepError::Spawn { .. }));
    }
}
