//! Scriptable executor for tests

use super::{CommandLine, Executor, OutputLine, ProcessResult};
use crate::error::{LazydepError, LazydepResult};
use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

type Responder = Box<dyn Fn(&CommandLine) -> ProcessResult + Send + Sync>;

/// Records every command and answers with a scripted result
pub(crate) struct FakeExecutor {
    calls: Mutex<Vec<CommandLine>>,
    responder: Responder,
    fail_spawn: bool,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeExecutor {
    /// Succeeds with empty output for every command
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            responder: Box::new(|_| ProcessResult::default()),
            fail_spawn: false,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Behaves like a package manager: answers registry queries with
    /// `registry` and materializes `add` targets into the slot at `version`.
    pub fn package_manager(registry: &'static str, version: &'static str) -> Self {
        Self::new().respond(move |cmd| {
            match cmd.args.first().map(String::as_str) {
                Some("config") => ProcessResult {
                    exit_code: 0,
                    stdout: registry.to_string(),
                    stderr: String::new(),
                },
                Some("add") => {
                    let target = &cmd.args[1];
                    let offset = usize::from(target.starts_with('@'));
                    let identifier = match target[offset..].rfind('@') {
                        Some(pos) => &target[..pos + offset],
                        None => target.as_str(),
                    };
                    let slot = cmd.cwd.as_deref().expect("add runs inside a slot");
                    write_installed_package(slot, identifier, version);
                    ProcessResult {
                        exit_code: 0,
                        stdout: format!("added 1 package: {}", target),
                        stderr: String::new(),
                    }
                }
                _ => ProcessResult::default(),
            }
        })
    }

    /// Answer with `responder`
    pub fn respond(
        mut self,
        responder: impl Fn(&CommandLine) -> ProcessResult + Send + Sync + 'static,
    ) -> Self {
        self.responder = Box::new(responder);
        self
    }

    /// Fail every command as if the program did not exist
    pub fn fail_spawn(mut self) -> Self {
        self.fail_spawn = true;
        self
    }

    /// Commands seen so far, in order
    pub fn calls(&self) -> Vec<CommandLine> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of commands whose first argument is `verb`
    pub fn count(&self, verb: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.args.first().map(String::as_str) == Some(verb))
            .count()
    }

    /// Highest number of commands that ran at the same time
    pub fn max_concurrency(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Executor for FakeExecutor {
    async fn run(
        &self,
        command: &CommandLine,
        on_line: &(dyn Fn(OutputLine) + Send + Sync),
    ) -> LazydepResult<ProcessResult> {
        self.calls.lock().unwrap().push(command.clone());

        if self.fail_spawn {
            return Err(LazydepError::spawn(
                command.to_string(),
                std::io::Error::new(std::io::ErrorKind::NotFound, "program not found"),
            ));
        }

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        // Give concurrent callers a chance to overlap
        tokio::task::yield_now().await;

        let result = (self.responder)(command);
        for line in result.stdout.lines() {
            on_line(OutputLine::Stdout(line.to_string()));
        }
        for line in result.stderr.lines() {
            on_line(OutputLine::Stderr(line.to_string()));
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(result)
    }
}

/// Write a minimal installed package under `slot/node_modules/<identifier>`
pub(crate) fn write_installed_package(slot: &Path, identifier: &str, version: &str) {
    let dir = slot.join("node_modules").join(identifier);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("package.json"),
        format!(
            r#"{{"name": "{}", "version": "{}", "main": "index.js"}}"#,
            identifier, version
        ),
    )
    .unwrap();
    std::fs::write(dir.join("index.js"), "module.exports = {};\n").unwrap();
}
