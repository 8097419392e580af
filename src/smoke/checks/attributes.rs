//! Module attribute presence check

use std::time::Duration;

use serde::Deserialize;

use crate::config::SmokeConfig;
use crate::smoke::check::{Check, Report};
use crate::smoke::error::ProbeError;
use crate::smoke::probe::python::ATTRIBUTE_SCRIPT;
use crate::smoke::probe::{CommandRunner, PythonProbe, SystemCommandRunner};

#[derive(Debug, Deserialize)]
struct AttributeOutcome {
    ok: bool,
    #[serde(default)]
    found: Vec<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Sanity heuristic: the module exposes at least one expected attribute
pub struct AttributeCheck<R = SystemCommandRunner> {
    module: String,
    attributes: Vec<String>,
    python: String,
    timeout: Duration,
    runner: R,
}

impl AttributeCheck {
    pub fn new(config: &SmokeConfig) -> Self {
        Self::with_runner(config, SystemCommandRunner)
    }
}

impl<R: CommandRunner> AttributeCheck<R> {
    pub fn with_runner(config: &SmokeConfig, runner: R) -> Self {
        Self {
            module: config.attribute_module.clone(),
            attributes: config.attribute_names.clone(),
            python: config.python.clone(),
            timeout: config.command_timeout(),
            runner,
        }
    }
}

impl<R: CommandRunner> Check for AttributeCheck<R> {
    fn name(&self) -> &'static str {
        "attributes"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Checks that a module exposes any of its expected attributes")
    }

    fn run(&self, report: &mut Report) -> Result<(), ProbeError> {
        let name = format!("{}:attr", self.module);
        let python = PythonProbe::new(&self.runner, &self.python, self.timeout);

        let mut args = vec![self.module.as_str()];
        args.extend(self.attributes.iter().map(String::as_str));

        match python.eval::<AttributeOutcome>(ATTRIBUTE_SCRIPT, &args) {
            Ok(outcome) if !outcome.ok => report.record(
                name,
                false,
                outcome.error.unwrap_or_else(|| "import failed".into()),
            ),
            Ok(outcome) if outcome.found.is_empty() => report.record(
                name,
                false,
                format!("none of {}", self.attributes.join(", ")),
            ),
            Ok(outcome) => report.record(name, true, format!("has {}", outcome.found.join(", "))),
            Err(e) => report.record(name, false, e.to_string()),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smoke::checks::fakes::FakeRunner;

    fn run(stdout: &str) -> Report {
        let mut report = Report::new();
        let runner = FakeRunner::default().with_stdout("python3", true, stdout);
        AttributeCheck::with_runner(&SmokeConfig::default(), runner)
            .run(&mut report)
            .unwrap();
        report
    }

    #[test]
    fn any_attribute_passes() {
        let report = run(r#"{"ok": true, "found": ["scan"]}"#);
        assert!(report.is_healthy());
        assert_eq!(report.results()[0].name(), "ndscan:attr");
        assert_eq!(report.results()[0].detail(), "has scan");
    }

    #[test]
    fn no_attribute_fails() {
        let report = run(r#"{"ok": true, "found": []}"#);
        assert_eq!(report.results()[0].detail(), "none of __version__, scan");
        assert!(!report.is_healthy());
    }

    #[test]
    fn import_error_fails() {
        let report = run(r#"{"ok": false, "error": "ImportError('x')"}"#);
        assert_eq!(report.results()[0].detail(), "ImportError('x')");
    }
}
