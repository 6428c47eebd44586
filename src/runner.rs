//! Runs the script that regenerates an example's seismograms.

use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::time::{Duration, Instant};

use crate::env::EnvConfig;
use crate::error::{Error, Result};

/// Lines of captured stderr kept in a failure message.
const STDERR_TAIL_LINES: usize = 20;

/// Configuration for the example runner.
#[derive(Debug, Clone, Default)]
pub struct RunnerConfig {
    /// Replaces the inherited environment when set.
    pub env: Option<EnvConfig>,
    /// Accept a non-zero exit status (only log it).
    pub ignore_status: bool,
}

/// Result of a finished run.
#[derive(Debug)]
pub struct RunOutcome {
    /// Exit code, `None` when killed by a signal.
    pub code: Option<i32>,
    pub duration: Duration,
    pub stdout: String,
    pub stderr: String,
}

impl RunOutcome {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

#[derive(Debug, Clone)]
pub struct ExampleRunner {
    script: PathBuf,
    config: RunnerConfig,
}

impl ExampleRunner {
    pub fn new(script: impl Into<PathBuf>, config: RunnerConfig) -> Self {
        Self {
            script: script.into(),
            config,
        }
    }

    pub fn script(&self) -> &Path {
        &self.script
    }

    /// Run the script with no arguments inside its own directory and wait for
    /// it to finish.
    pub fn run(&self) -> Result<RunOutcome> {
        if !self.script.is_file() {
            return Err(Error::MissingFile {
                path: self.script.clone(),
            });
        }
        let program = std::fs::canonicalize(&self.script).map_err(|e| Error::io(&self.script, e))?;
        let work_dir = program.parent().unwrap_or(Path::new("/"));

        let mut cmd = Command::new(&program);
        cmd.current_dir(work_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(env) = &self.config.env {
            cmd.env_clear();
            for (key, value) in env.vars() {
                cmd.env(key, value);
            }
            log::debug!("Runner environment: {} variable(s)", env.len());
        }

        log::info!("Running {}", self.script.display());
        let start = Instant::now();
        let output = cmd.output().map_err(|e| Error::RunnerFailure {
            script: self.script.clone(),
            reason: format!("failed to spawn: {e}"),
        })?;
        let outcome = outcome_from(output, start.elapsed());

        log::info!(
            "{} finished in {:.1}s with status {}",
            self.script.display(),
            outcome.duration.as_secs_f64(),
            status_label(outcome.code)
        );
        log::trace!("stdout:\n{}", outcome.stdout);
        if !outcome.stderr.is_empty() {
            log::debug!("stderr:\n{}", outcome.stderr);
        }

        if !outcome.success() {
            if self.config.ignore_status {
                log::warn!(
                    "Ignoring exit status {} of {}",
                    status_label(outcome.code),
                    self.script.display()
                );
            } else {
                return Err(Error::RunnerFailure {
                    script: self.script.clone(),
                    reason: format!(
                        "exited with status {}\n{}",
                        status_label(outcome.code),
                        tail(&outcome.stderr, STDERR_TAIL_LINES)
                    ),
                });
            }
        }

        Ok(outcome)
    }
}

fn outcome_from(output: Output, duration: Duration) -> RunOutcome {
    RunOutcome {
        code: output.status.code(),
        duration,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}

fn status_label(code: Option<i32>) -> String {
    code.map_or_else(|| "<signal>".to_string(), |c| c.to_string())
}

/// Last `n` lines of `text`.
fn tail(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    lines[lines.len().saturating_sub(n)..].join("\n")
}
