//! CPG generation through the Joern command-line tools
//!
//! ```text
//! query_code.c ──parse──▶ cpg.bin ──export──▶ out/*.json ──▶ Value
//! ```
//!
//! Everything lives in a temporary directory that is removed on drop.

use serde_json::Value;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tracing::{debug, warn};

use crate::config::CpgConfig;
use crate::features::retrieval::ports::{CpgGenerationError, CpgGenerator};

const JAVA_OPTIONS: &str = "-Xms512m -Xmx1g";
const POLL_INTERVAL: Duration = Duration::from_millis(50);
/// Bytes of stderr kept for `CommandFailed`
const STDERR_TAIL: usize = 8 * 1024;

/// Runs `joern-parse` then `joern-export --repr=all --format=graphson`
#[derive(Debug, Clone)]
pub struct JoernCpgGenerator {
    parse_command: String,
    export_command: String,
}

impl JoernCpgGenerator {
    pub fn new(parse_command: impl Into<String>, export_command: impl Into<String>) -> Self {
        Self {
            parse_command: parse_command.into(),
            export_command: export_command.into(),
        }
    }

    pub fn from_config(config: &CpgConfig) -> Self {
        Self::new(&config.parse_command, &config.export_command)
    }

    fn run(&self, program: &str, args: &[&str], timeout: Duration) -> Result<(), CpgGenerationError> {
        debug!(program, ?args, "running cpg command");
        let child = Command::new(program)
            .args(args)
            .env("JAVA_OPTIONS", JAVA_OPTIONS)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| CpgGenerationError::Spawn {
                command: program.to_string(),
                source,
            })?;

        let (status, stderr) = wait_with_timeout(child, timeout)?;
        let status = status.ok_or_else(|| CpgGenerationError::Timeout {
            command: program.to_string(),
            secs: timeout.as_secs(),
        })?;

        if !status.success() {
            return Err(CpgGenerationError::CommandFailed {
                command: program.to_string(),
                status: status.code(),
                stderr: stderr_tail(&stderr),
            });
        }
        Ok(())
    }
}

impl CpgGenerator for JoernCpgGenerator {
    fn generate(&self, code: &str, timeout: Duration) -> Result<Value, CpgGenerationError> {
        let workdir = TempDir::new()?;
        let source = workdir.path().join("query_code.c");
        let cpg = workdir.path().join("cpg.bin");
        let out = workdir.path().join("graphson");
        fs::write(&source, code)?;

        let deadline = Instant::now() + timeout;
        self.run(
            &self.parse_command,
            &["--output", &path_arg(&cpg), &path_arg(&source)],
            timeout,
        )?;

        // export shares what is left of the budget
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(CpgGenerationError::Timeout {
                command: self.export_command.clone(),
                secs: timeout.as_secs(),
            });
        }
        let out_arg = format!("--out={}", path_arg(&out));
        self.run(
            &self.export_command,
            &[&path_arg(&cpg), "--repr=all", "--format=graphson", &out_arg],
            remaining,
        )?;

        let document = first_graph_document(&out)?;
        let text = fs::read_to_string(&document)?;
        Ok(serde_json::from_str(&text)?)
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// First `*.json` / `*.graphson` file (by name) under `dir`
fn first_graph_document(dir: &Path) -> Result<PathBuf, CpgGenerationError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "export produced no output directory");
            return Err(CpgGenerationError::NoOutput(dir.to_path_buf()));
        }
    };

    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && matches!(
                    path.extension().and_then(|e| e.to_str()),
                    Some("json") | Some("graphson")
                )
        })
        .collect();
    candidates.sort();
    candidates
        .into_iter()
        .next()
        .ok_or_else(|| CpgGenerationError::NoOutput(dir.to_path_buf()))
}

/// Wait for `child`, killing it once `timeout` elapses.
///
/// Stderr is drained on a separate thread while polling; a JVM child that
/// fills the pipe would otherwise block until it is killed. Returns the exit
/// status (`None` on timeout) and everything written to stderr.
fn wait_with_timeout(
    mut child: Child,
    timeout: Duration,
) -> std::io::Result<(Option<ExitStatus>, Vec<u8>)> {
    let drain = child.stderr.take().map(drain_stderr);

    let start = Instant::now();
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break Some(status);
        }
        if start.elapsed() >= timeout {
            let _ = child.kill();
            let _ = child.wait();
            break None;
        }
        thread::sleep(POLL_INTERVAL);
    };

    // a killed wrapper script can leave grandchildren holding the pipe, so
    // the drain thread is only joined after a normal exit
    let stderr = match (status, drain) {
        (Some(_), Some(handle)) => handle.join().unwrap_or_default(),
        _ => Vec::new(),
    };
    Ok((status, stderr))
}

fn drain_stderr(mut pipe: std::process::ChildStderr) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Err(e) = pipe.read_to_end(&mut buf) {
            debug!(error = %e, "stderr drain stopped early");
        }
        buf
    })
}

/// Last [`STDERR_TAIL`] bytes of stderr as trimmed text
fn stderr_tail(stderr: &[u8]) -> String {
    let start = stderr.len().saturating_sub(STDERR_TAIL);
    String::from_utf8_lossy(&stderr[start..]).trim().to_string()
}
