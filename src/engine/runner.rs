//! Engine process invocation.

use crate::error::{Error, Result};
use std::path::PathBuf;
use std::process::Command;

/// Captured output of one engine run.
#[derive(Debug)]
pub struct EngineOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Seam between the gateway and the engine process, so tests can script
/// responses without spawning anything.
pub trait EngineRunner: Send + Sync {
    fn run(&self, args: &[String]) -> Result<EngineOutput>;
}

/// Runs a real engine binary and captures its output.
pub struct CliEngineRunner {
    program: PathBuf,
}

impl CliEngineRunner {
    pub fn new(program: PathBuf) -> Self {
        Self { program }
    }
}

impl EngineRunner for CliEngineRunner {
    fn run(&self, args: &[String]) -> Result<EngineOutput> {
        let output = Command::new(&self.program).args(args).output().map_err(|e| {
            Error::EngineUnavailable(format!(
                "failed to run {}: {}",
                self.program.display(),
                e
            ))
        })?;
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !output.status.success() {
            let exit = output.status.code().unwrap_or(-1);
            let msg = if stderr.trim().is_empty() {
                format!("exit code {} (no stderr)", exit)
            } else {
                format!("exit code {}: {}", exit, stderr.trim())
            };
            return Err(Error::EngineError(msg));
        }
        Ok(EngineOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr,
        })
    }
}

/// Locate an engine binary: next to the current executable first (with the
/// platform-suffixed name as fallback on Windows), then the bare name so a
/// PATH install still works. Existence of the PATH fallback is not checked
/// here; a missing binary surfaces as `EngineUnavailable` at run time.
pub fn resolve_engine_program(name: &str) -> PathBuf {
    if let Some(dir) = std::env::current_exe().ok().and_then(|p| p.parent().map(|d| d.to_path_buf())) {
        let exe = dir.join(exe_name(name));
        if exe.exists() {
            return exe;
        }
        #[cfg(windows)]
        {
            let exe = dir.join(format!("{}-x86_64-pc-windows-msvc.exe", name));
            if exe.exists() {
                return exe;
            }
        }
    }
    PathBuf::from(exe_name(name))
}

#[cfg(windows)]
fn exe_name(name: &str) -> String {
    format!("{}.exe", name)
}

#[cfg(not(windows))]
fn exe_name(name: &str) -> String {
    name.to_string()
}
