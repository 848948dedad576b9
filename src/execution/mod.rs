//! Compile-and-run of extracted C code under wall-clock timeouts.

use std::{
    io::{self, Write},
    path::{Path, PathBuf},
    process::Stdio,
    time::Duration,
};

use tempfile::TempPath;
use thiserror::Error;
use tokio::{io::AsyncWriteExt, process::Command, time::timeout};
use tracing::debug;

use crate::config::{unescape, Config};

#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub compiler: String,
    pub compiler_args: Vec<String>,
    pub compile_timeout: Duration,
    pub run_timeout: Duration,
    /// Fed to the program when the question carries no input of its own.
    pub default_stdin: String,
    pub work_dir: PathBuf,
}

impl RunnerConfig {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            compiler: cfg.get("C_COMPILER").unwrap_or_else(|| "gcc".into()),
            compiler_args: cfg
                .get("COMPILER_ARGS")
                .map(|a| a.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default(),
            compile_timeout: cfg
                .get_secs("COMPILE_TIMEOUT")
                .unwrap_or(Duration::from_secs(10)),
            run_timeout: cfg.get_secs("RUN_TIMEOUT").unwrap_or(Duration::from_secs(3)),
            default_stdin: cfg
                .get("DEFAULT_STDIN")
                .map(|s| unescape(&s))
                .unwrap_or_else(|| "42\n".into()),
            work_dir: std::env::temp_dir(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("Compilation failed:\n{diagnostics}")]
    CompileFailed { diagnostics: String },
    #[error("Compilation timed out after {}s.", .0.as_secs_f32())]
    CompileTimeout(Duration),
    #[error("Execution timed out after {}s.", .0.as_secs_f32())]
    RunTimeout(Duration),
    #[error("Error during execution: {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: io::Error,
    },
}

impl RunError {
    fn io(context: &'static str, source: io::Error) -> Self {
        Self::Io { context, source }
    }
}

/// Source file and binary for one invocation; both are removed on drop.
struct Scratch {
    source: TempPath,
    binary: PathBuf,
}

impl Scratch {
    fn create(dir: &Path, code: &str) -> Result<Self, RunError> {
        let mut file = tempfile::Builder::new()
            .prefix("solution_")
            .suffix(".c")
            .tempfile_in(dir)
            .map_err(|e| RunError::io("failed to create source file", e))?;
        file.write_all(code.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|e| RunError::io("failed to write source file", e))?;

        let source = file.into_temp_path();
        let binary = source.with_extension(std::env::consts::EXE_EXTENSION);
        Ok(Self { source, binary })
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        if self.binary.exists() {
            let _ = std::fs::remove_file(&self.binary);
        }
    }
}

/// Compile `code`, then run the binary with `stdin` (or the configured default).
///
/// Success carries stdout, with stderr appended under a `Runtime Errors:` line.
pub async fn compile_and_run(
    cfg: &RunnerConfig,
    code: &str,
    stdin: Option<&str>,
) -> Result<String, RunError> {
    let scratch = Scratch::create(&cfg.work_dir, code)?;
    compile(cfg, &scratch).await?;
    run(cfg, &scratch, stdin.unwrap_or(&cfg.default_stdin)).await
}

async fn compile(cfg: &RunnerConfig, scratch: &Scratch) -> Result<(), RunError> {
    let mut cmd = Command::new(&cfg.compiler);
    cmd.arg(&*scratch.source)
        .arg("-o")
        .arg(&scratch.binary)
        .args(&cfg.compiler_args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    debug!(compiler = %cfg.compiler, source = %scratch.source.display(), "compiling");
    let child = cmd
        .spawn()
        .map_err(|e| RunError::io("failed to start compiler", e))?;

    let out = timeout(cfg.compile_timeout, child.wait_with_output())
        .await
        .map_err(|_| RunError::CompileTimeout(cfg.compile_timeout))?
        .map_err(|e| RunError::io("compiler did not complete", e))?;

    if out.status.success() {
        return Ok(());
    }

    let mut diagnostics = String::from_utf8_lossy(&out.stderr).into_owned();
    if !out.stdout.is_empty() {
        if !diagnostics.is_empty() {
            diagnostics.push('\n');
        }
        diagnostics.push_str(&String::from_utf8_lossy(&out.stdout));
    }
    Err(RunError::CompileFailed { diagnostics })
}

async fn run(cfg: &RunnerConfig, scratch: &Scratch, input: &str) -> Result<String, RunError> {
    let mut cmd = Command::new(&scratch.binary);
    cmd.current_dir(&cfg.work_dir)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    debug!(binary = %scratch.binary.display(), "running");
    let mut child = cmd
        .spawn()
        .map_err(|e| RunError::io("failed to start program", e))?;

    let payload = input.as_bytes().to_vec();
    let pipe = child.stdin.take();
    let feed = async move {
        if let Some(mut pipe) = pipe {
            // programs that never read stdin close the pipe early
            pipe.write_all(&payload).await.ok();
        }
    };
    // stdout/stderr are drained while stdin is still being written
    let finished = async move {
        let ((), out) = tokio::join!(feed, child.wait_with_output());
        out
    };

    let out = timeout(cfg.run_timeout, finished)
        .await
        .map_err(|_| RunError::RunTimeout(cfg.run_timeout))?
        .map_err(|e| RunError::io("program did not complete", e))?;

    let mut body = String::from_utf8_lossy(&out.stdout).into_owned();
    if !out.stderr.is_empty() {
        body.push_str("\nRuntime Errors:\n");
        body.push_str(&String::from_utf8_lossy(&out.stderr));
    }
    Ok(body.trim().to_string())
}
