//! NVIDIA driver check

use std::time::Duration;

use crate::config::SmokeConfig;
use crate::smoke::check::{Check, Report};
use crate::smoke::error::ProbeError;
use crate::smoke::probe::{CommandRunner, SystemCommandRunner};

const NVIDIA_SMI: &str = "nvidia-smi";
const RESULT_NAME: &str = "driver:nvidia-smi";

/// Checks that `nvidia-smi` can talk to the driver
pub struct NvidiaDriverCheck<R = SystemCommandRunner> {
    timeout: Duration,
    runner: R,
}

impl NvidiaDriverCheck {
    pub fn new(config: &SmokeConfig) -> Self {
        Self::with_runner(config, SystemCommandRunner)
    }
}

impl<R: CommandRunner> NvidiaDriverCheck<R> {
    pub fn with_runner(config: &SmokeConfig, runner: R) -> Self {
        Self {
            timeout: config.command_timeout(),
            runner,
        }
    }
}

impl<R: CommandRunner> Check for NvidiaDriverCheck<R> {
    fn name(&self) -> &'static str {
        "nvidia-driver"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Queries GPU name and driver version through nvidia-smi")
    }

    fn run(&self, report: &mut Report) -> Result<(), ProbeError> {
        if self.runner.locate(NVIDIA_SMI).is_none() {
            report.record(RESULT_NAME, false, "missing");
            return Ok(());
        }

        let args = ["--query-gpu=name,driver_version", "--format=csv,noheader"];
        match self.runner.run(NVIDIA_SMI, &args, self.timeout) {
            Ok(output) => report.record(RESULT_NAME, output.success, output.summary_line()),
            Err(e) => report.record(RESULT_NAME, false, e.to_string()),
        }
        Ok(())
    }
}
