//! Asynchronous subprocess execution with captured output.
//!
//! Render and mux both shell out to external tools. Invocations are
//! described by a [`CommandSpec`] and executed by [`run`], which captures
//! both streams, enforces an optional wall-clock timeout and turns every
//! failure mode into a typed error.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use melies_error::{MeliesResult, ProcessError, ProcessErrorKind};
use tokio::process::Command;
use tracing::{debug, instrument, warn};

/// Description of one external command invocation.
///
/// The program may be a multi-token string such as `manim render`; the
/// first whitespace-separated token is the executable and the remaining
/// tokens become leading arguments.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
    cwd: Option<PathBuf>,
    timeout: Option<Duration>,
}

impl CommandSpec {
    /// Start a spec for `program`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            timeout: None,
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run the child in `dir` instead of the parent's working directory.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Kill the child if it runs longer than `limit`.
    pub fn timeout(mut self, limit: Option<Duration>) -> Self {
        self.timeout = limit;
        self
    }

    /// Split the program string into executable and leading arguments.
    fn resolved(&self) -> MeliesResult<(String, Vec<String>)> {
        let mut tokens = self.program.split_whitespace();
        let Some(program) = tokens.next() else {
            return Err(ProcessError::new(ProcessErrorKind::EmptyCommand).into());
        };
        let mut args: Vec<String> = tokens.map(str::to_string).collect();
        args.extend(self.args.iter().cloned());
        Ok((program.to_string(), args))
    }
}

/// Captured result of a successful invocation.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// Exit code, absent when the platform reports none
    pub status_code: Option<i32>,
    /// Captured standard output, lossily decoded
    pub stdout: String,
    /// Captured standard error, lossily decoded
    pub stderr: String,
}

/// Run `spec` to completion and capture its output.
///
/// A non-zero exit is an error carrying both captured streams. When a
/// timeout is configured and expires the child is killed and a timeout
/// error is returned instead of partial output.
#[instrument(skip(spec), fields(program = %spec.program))]
pub async fn run(spec: &CommandSpec) -> MeliesResult<ProcessOutput> {
    let (program, args) = spec.resolved()?;
    debug!(program = %program, args = ?args, cwd = ?spec.cwd, "spawning subprocess");

    let mut command = Command::new(&program);
    command
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = &spec.cwd {
        command.current_dir(dir);
    }

    let child = command.spawn().map_err(|err| {
        ProcessError::new(ProcessErrorKind::Spawn {
            program: program.clone(),
            message: err.to_string(),
        })
    })?;

    // Dropping the wait future on timeout drops the child handle, which
    // kills the process because of kill_on_drop above.
    let waited = match spec.timeout {
        Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
            Ok(result) => result,
            Err(_) => {
                warn!(program = %program, seconds = limit.as_secs(), "subprocess timed out, killing it");
                return Err(ProcessError::new(ProcessErrorKind::TimedOut {
                    program,
                    seconds: limit.as_secs(),
                })
                .into());
            }
        },
        None => child.wait_with_output().await,
    };
    let output = waited.map_err(|err| {
        ProcessError::new(ProcessErrorKind::OutputCapture {
            program: program.clone(),
            message: err.to_string(),
        })
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    if !output.status.success() {
        warn!(program = %program, code = ?output.status.code(), "subprocess exited with failure");
        return Err(ProcessError::new(ProcessErrorKind::NonZeroExit {
            program,
            code: output.status.code(),
            stdout,
            stderr,
        })
        .into());
    }

    Ok(ProcessOutput {
        status_code: output.status.code(),
        stdout,
        stderr,
    })
}
