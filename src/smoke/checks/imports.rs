//! Package import and version check

use std::time::Duration;

use serde::Deserialize;

use crate::config::{PackageSpec, SmokeConfig};
use crate::smoke::check::{Check, Report};
use crate::smoke::error::ProbeError;
use crate::smoke::probe::python::IMPORT_SCRIPT;
use crate::smoke::probe::{CommandRunner, PythonProbe, SystemCommandRunner};

#[derive(Debug, Deserialize)]
struct ImportOutcome {
    ok: bool,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Imports each configured package and records its version
///
/// Records one `import:<module>` entry per package.
pub struct ImportCheck<R = SystemCommandRunner> {
    packages: Vec<PackageSpec>,
    python: String,
    timeout: Duration,
    runner: R,
}

impl ImportCheck {
    pub fn new(config: &SmokeConfig) -> Self {
        Self::with_runner(config, SystemCommandRunner)
    }
}

impl<R: CommandRunner> ImportCheck<R> {
    pub fn with_runner(config: &SmokeConfig, runner: R) -> Self {
        Self {
            packages: config.packages.clone(),
            python: config.python.clone(),
            timeout: config.command_timeout(),
            runner,
        }
    }
}

impl<R: CommandRunner> Check for ImportCheck<R> {
    fn name(&self) -> &'static str {
        "imports"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Imports core Python packages and reports their versions")
    }

    fn run(&self, report: &mut Report) -> Result<(), ProbeError> {
        let python = PythonProbe::new(&self.runner, &self.python, self.timeout);

        for package in &self.packages {
            let name = format!("import:{}", package.module);
            let attr = package.version_attr.as_deref().unwrap_or("");

            match python.eval::<ImportOutcome>(IMPORT_SCRIPT, &[package.module.as_str(), attr]) {
                Ok(outcome) if outcome.ok => {
                    report.record(name, true, outcome.version.unwrap_or_else(|| "ok".into()))
                }
                Ok(outcome) => report.record(
                    name,
                    false,
                    outcome.error.unwrap_or_else(|| "import failed".into()),
                ),
                Err(e) => report.record(name, false, e.to_string()),
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::smoke::probe::CommandOutput;

    /// Answers the import script per module name (argv[2])
    struct PerModule;

    impl CommandRunner for PerModule {
        fn locate(&self, _program: &str) -> Option<PathBuf> {
            None
        }

        fn run(
            &self,
            _program: &str,
            args: &[&str],
            _timeout: Duration,
        ) -> Result<CommandOutput, ProbeError> {
            let stdout = match args[2] {
                "torch" => r#"{"ok": true, "version": "2.4.0+cu121"}"#,
                "oitg" => r#"{"ok": true, "version": null}"#,
                _ => r#"{"ok": false, "error": "ModuleNotFoundError(\"No module named 'artiq'\")"}"#,
            };
            Ok(CommandOutput {
                success: true,
                code: Some(0),
                stdout: stdout.to_string(),
                stderr: String::new(),
            })
        }
    }

    fn config() -> SmokeConfig {
        SmokeConfig {
            packages: vec![
                PackageSpec::new("artiq", Some("__version__")),
                PackageSpec::new("torch", Some("__version__")),
                PackageSpec::new("oitg", None),
            ],
            ..SmokeConfig::default()
        }
    }

    #[test]
    fn records_one_entry_per_package() {
        let mut report = Report::new();
        ImportCheck::with_runner(&config(), PerModule)
            .run(&mut report)
            .unwrap();

        let rows: Vec<_> = report
            .results()
            .iter()
            .map(|r| (r.name(), r.passed(), r.detail()))
            .collect();
        assert_eq!(
            rows,
            [
                (
                    "import:artiq",
                    false,
                    "ModuleNotFoundError(\"No module named 'artiq'\")"
                ),
                ("import:torch", true, "2.4.0+cu121"),
                ("import:oitg", true, "ok"),
            ]
        );
    }

    #[test]
    fn missing_interpreter_fails_every_package() {
        let mut report = Report::new();
        let runner = crate::smoke::checks::fakes::FakeRunner::default();
        ImportCheck::with_runner(&config(), runner)
            .run(&mut report)
            .unwrap();

        assert_eq!(report.len(), 3);
        assert_eq!(report.failures(), 3);
        assert_eq!(report.results()[0].detail(), "`python3` not found");
    }
}
