//! Command-line tool presence and version check

use std::time::Duration;

use crate::config::SmokeConfig;
use crate::smoke::check::{Check, Report};
use crate::smoke::error::ProbeError;
use crate::smoke::probe::{CommandRunner, SystemCommandRunner};

/// Locates a tool on PATH, then asks it for `--version`
///
/// Always records two results, `cli:<tool>` and `cli:<tool>_version`, so a
/// missing tool shows up as two failures rather than silently skipping one.
pub struct CliCheck<R = SystemCommandRunner> {
    tool: String,
    timeout: Duration,
    runner: R,
}

impl CliCheck {
    pub fn new(config: &SmokeConfig) -> Self {
        Self::with_runner(config, SystemCommandRunner)
    }
}

impl<R: CommandRunner> CliCheck<R> {
    pub fn with_runner(config: &SmokeConfig, runner: R) -> Self {
        Self {
            tool: config.cli_tool.clone(),
            timeout: config.command_timeout(),
            runner,
        }
    }
}

impl<R: CommandRunner> Check for CliCheck<R> {
    fn name(&self) -> &'static str {
        "cli"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Locates the control CLI and queries its version")
    }

    fn run(&self, report: &mut Report) -> Result<(), ProbeError> {
        let located = format!("cli:{}", self.tool);
        match self.runner.locate(&self.tool) {
            Some(path) => report.record(located, true, path.display().to_string()),
            None => report.record(located, false, "missing"),
        }

        let version = format!("cli:{}_version", self.tool);
        match self.runner.run(&self.tool, &["--version"], self.timeout) {
            Ok(output) => report.record(version, output.success, output.summary_line()),
            Err(e) => report.record(version, false, e.to_string()),
        }
        Ok(())
    }
}
