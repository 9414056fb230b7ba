//! Process runner
//!
//! Command lines are split on whitespace: the first token is the program and
//! the rest are its arguments. There is no quoting, so arguments cannot
//! contain spaces.

use crate::error::RunError;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

/// Where the child's stdout/stderr go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StdioMode {
    /// Pipe and capture both streams.
    #[default]
    Captured,
    /// Pass the parent's console through; successful runs return an empty string.
    Inherited,
}

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub cwd: Option<PathBuf>,
    pub stdio: StdioMode,
}

impl RunOptions {
    pub fn captured() -> Self {
        Self::default()
    }

    pub fn inherited() -> Self {
        Self {
            stdio: StdioMode::Inherited,
            ..Self::default()
        }
    }

    pub fn in_dir(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }
}

fn split_command_line(command_line: &str) -> Result<(&str, Vec<&str>), RunError> {
    let mut tokens = command_line.split_whitespace();
    let program = tokens.next().ok_or(RunError::Empty)?;
    Ok((program, tokens.collect()))
}

/// stdin, stdout and stderr for the child.
fn stdio_for(mode: StdioMode) -> (Stdio, Stdio, Stdio) {
    match mode {
        StdioMode::Captured => (Stdio::null(), Stdio::piped(), Stdio::piped()),
        StdioMode::Inherited => (Stdio::inherit(), Stdio::inherit(), Stdio::inherit()),
    }
}

/// Run a command to completion, blocking the caller.
pub fn run_sync(command_line: &str, options: &RunOptions) -> Result<String, RunError> {
    let (program, args) = split_command_line(command_line)?;
    tracing::debug!("Running {}", command_line);

    let (stdin, stdout, stderr) = stdio_for(options.stdio);
    let mut command = Command::new(program);
    command.args(&args).stdin(stdin).stdout(stdout).stderr(stderr);
    if let Some(cwd) = &options.cwd {
        command.current_dir(cwd);
    }

    let output = command
        .spawn()
        .and_then(|child| child.wait_with_output())
        .map_err(|source| {
            tracing::error!("Could not start {}: {}", program, source);
            RunError::Spawn {
                program: program.to_string(),
                source,
            }
        })?;

    finish(program, output)
}

fn finish(program: &str, output: Output) -> Result<String, RunError> {
    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    conclude(program, output.status.code(), output.status.success(), stdout, stderr)
}

fn conclude(
    program: &str,
    code: Option<i32>,
    success: bool,
    stdout: String,
    stderr: String,
) -> Result<String, RunError> {
    if !stdout.is_empty() {
        tracing::debug!("{} stdout:\n{}", program, stdout);
    }

    if success {
        if !stderr.is_empty() {
            tracing::debug!("{} stderr:\n{}", program, stderr);
        }
        return Ok(stdout);
    }

    if !stderr.is_empty() {
        tracing::error!("{} stderr:\n{}", program, stderr);
    }
    Err(RunError::Exit {
        program: program.to_string(),
        code,
        stdout,
        stderr,
    })
}

/// Run a command without blocking the thread.
///
/// Output is read line by line while the child runs. Await the future to get
/// the result, or hand it to `tokio::spawn` to run it in the background.
pub async fn run_async(command_line: &str, options: RunOptions) -> Result<String, RunError> {
    let (program, args) = split_command_line(command_line)?;
    tracing::debug!("Starting {}", command_line);

    let (stdin, stdout, stderr) = stdio_for(options.stdio);
    let mut command = tokio::process::Command::new(program);
    command.kill_on_drop(true);
    command.args(&args).stdin(stdin).stdout(stdout).stderr(stderr);
    if let Some(cwd) = &options.cwd {
        command.current_dir(cwd);
    }

    let mut child = command.spawn().map_err(|source| {
        tracing::error!("Could not start {}: {}", program, source);
        RunError::Spawn {
            program: program.to_string(),
            source,
        }
    })?;

    let stdout_pipe = child.stdout.take();
    let stderr_pipe = child.stderr.take();

    let (status, stdout, stderr) = tokio::join!(
        child.wait(),
        collect_lines(program, "stdout", stdout_pipe),
        collect_lines(program, "stderr", stderr_pipe),
    );

    let status = status.map_err(|source| RunError::Spawn {
        program: program.to_string(),
        source,
    })?;

    conclude(
        program,
        status.code(),
        status.success(),
        stdout.trim().to_string(),
        stderr.trim().to_string(),
    )
}

async fn collect_lines<R>(program: &str, stream: &str, pipe: Option<R>) -> String
where
    R: AsyncRead + Unpin,
{
    let Some(pipe) = pipe else {
        return String::new();
    };

    // Bytes, not `lines()`, so invalid UTF-8 is replaced instead of ending the
    // read and leaving the child writing to a closed pipe.
    let mut collected = String::new();
    let mut reader = BufReader::new(pipe);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim_end_matches(['\n', '\r']);
                tracing::trace!("{} {}: {}", program, stream, line);
                collected.push_str(line);
                collected.push('\n');
            }
            Err(err) => {
                tracing::warn!("Failed reading {} of {}: {}", stream, program, err);
                break;
            }
        }
    }
    collected
}
