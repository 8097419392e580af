//! Helper script presence check

use crate::config::SmokeConfig;
use crate::smoke::check::{Check, Report};
use crate::smoke::error::ProbeError;
use crate::smoke::probe::{CommandRunner, SystemCommandRunner};

/// Checks that each wrapper script is on PATH
pub struct WrapperCheck<R = SystemCommandRunner> {
    wrappers: Vec<String>,
    runner: R,
}

impl WrapperCheck {
    pub fn new(config: &SmokeConfig) -> Self {
        Self::with_runner(config, SystemCommandRunner)
    }
}

impl<R: CommandRunner> WrapperCheck<R> {
    pub fn with_runner(config: &SmokeConfig, runner: R) -> Self {
        Self {
            wrappers: config.wrappers.clone(),
            runner,
        }
    }
}

impl<R: CommandRunner> Check for WrapperCheck<R> {
    fn name(&self) -> &'static str {
        "wrappers"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Checks that package-manager wrapper scripts are on PATH")
    }

    fn run(&self, report: &mut Report) -> Result<(), ProbeError> {
        for wrapper in &self.wrappers {
            let name = format!("cli:{}", wrapper);
            match self.runner.locate(wrapper) {
                Some(path) => report.record(name, true, path.display().to_string()),
                None => report.record(name, false, "missing"),
            }
        }
        Ok(())
    }
}
