//! Locating and running external executables under a timeout

use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tracing::debug;

use crate::smoke::error::ProbeError;

/// Captured result of a finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// First line of stdout, falling back to trimmed stderr when stdout is empty
    pub fn summary_line(&self) -> String {
        match self.stdout.lines().map(str::trim).find(|l| !l.is_empty()) {
            Some(line) => line.to_string(),
            None => self.stderr.trim().to_string(),
        }
    }
}

impl From<std::process::Output> for CommandOutput {
    fn from(output: std::process::Output) -> Self {
        Self {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// Finds and runs executables
pub trait CommandRunner {
    /// Full path of `program` if it is on `PATH`
    fn locate(&self, program: &str) -> Option<PathBuf>;

    /// Runs `program` to completion, killing it once `timeout` elapses
    fn run(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<CommandOutput, ProbeError>;
}

/// Runs real processes on a throwaway current-thread tokio runtime
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn locate(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }

    fn run(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<CommandOutput, ProbeError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ProbeError::Runtime)?;

        debug!(program, ?args, ?timeout, "spawning");
        runtime.block_on(run_with_timeout(program, args, timeout))
    }
}

async fn run_with_timeout(
    program: &str,
    args: &[&str],
    timeout: Duration,
) -> Result<CommandOutput, ProbeError> {
    let child = tokio::process::Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| match source.kind() {
            ErrorKind::NotFound => ProbeError::NotFound(program.to_string()),
            _ => ProbeError::Spawn {
                program: program.to_string(),
                source,
            },
        })?;

    // Dropping the child on timeout kills it
    match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(output) => Ok(CommandOutput::from(output?)),
        Err(_) => Err(ProbeError::Timeout {
            program: program.to_string(),
            timeout,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_prefers_stdout() {
        let out = CommandOutput {
            success: true,
            code: Some(0),
            stdout: "\nARTIQ v8.0\nextra\n".into(),
            stderr: "warning".into(),
        };
        assert_eq!(out.summary_line(), "ARTIQ v8.0");
    }

    #[test]
    fn summary_falls_back_to_stderr() {
        let out = CommandOutput {
            success: false,
            code: Some(2),
            stdout: String::new(),
            stderr: "  usage: tool\n".into(),
        };
        assert_eq!(out.summary_line(), "usage: tool");
    }

    #[test]
    fn missing_program_is_not_found() {
        let err = SystemCommandRunner
            .run(
                "devenv-smoke-definitely-not-installed",
                &[],
                Duration::from_secs(1),
            )
            .unwrap_err();
        assert!(matches!(err, ProbeError::NotFound(_)), "{err:?}");
    }

    #[cfg(unix)]
    #[test]
    fn slow_program_times_out() {
        let err = SystemCommandRunner
            .run("sleep", &["5"], Duration::from_millis(100))
            .unwrap_err();
        assert!(matches!(err, ProbeError::Timeout { .. }), "{err:?}");
    }

    #[cfg(unix)]
    #[test]
    fn captures_stdout() {
        let out = SystemCommandRunner
            .run("echo", &["hello"], Duration::from_secs(5))
            .unwrap();
        assert!(out.success);
        assert_eq!(out.summary_line(), "hello");
    }
}
