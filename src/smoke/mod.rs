//! Environment smoke checks
//!
//! A flat checklist of independent probes (package imports, accelerator,
//! event loop, environment variables, CLI tools, lockfile, shared libraries).
//! Each check records its results into a [`Report`]; the runner reduces the
//! report into an aggregate status and exit code.
//!
//! # Example
//!
//! ```no_run
//! use devenv_smoke::config::SmokeConfig;
//! use devenv_smoke::smoke::{self, ReportStyle};
//!
//! let config = SmokeConfig::default();
//! let report = smoke::default_runner(&config, &smoke::CheckFilter::default()).run_all();
//! smoke::print_report(&report, &ReportStyle::default()).unwrap();
//! std::process::exit(report.exit_code());
//! ```

pub mod check;
pub mod checks;
pub mod error;
pub mod hint;
pub mod probe;
pub mod reporter;
pub mod runner;

pub use check::{AggregateStatus, Check, CheckResult, Report};
pub use error::ProbeError;
pub use hint::venv_hint;
pub use reporter::{
    OutputFormat, ReportStyle, Summary, format_json, format_report, format_table, print_report,
    render, summarize,
};
pub use runner::ChecklistRunner;

use thiserror::Error;

use crate::config::SmokeConfig;

/// A `--only`/`--skip` name that matches no check
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown check `{name}` (available: {})", .available.join(", "))]
pub struct UnknownCheck {
    pub name: String,
    pub available: Vec<&'static str>,
}

/// Selects checks by name
#[derive(Debug, Clone, Default)]
pub struct CheckFilter {
    /// If non-empty, only these checks run
    pub only: Vec<String>,
    /// These checks never run
    pub skip: Vec<String>,
}

impl CheckFilter {
    /// Rejects the first name in `only` or `skip` that is not in `available`
    pub fn validate(&self, available: &[&'static str]) -> Result<(), UnknownCheck> {
        match self
            .only
            .iter()
            .chain(&self.skip)
            .find(|name| !available.iter().any(|a| *a == name.as_str()))
        {
            Some(name) => Err(UnknownCheck {
                name: name.clone(),
                available: available.to_vec(),
            }),
            None => Ok(()),
        }
    }

    /// Whether the check called `name` is selected
    pub fn allows(&self, name: &str) -> bool {
        (self.only.is_empty() || self.only.iter().any(|n| n == name))
            && !self.skip.iter().any(|n| n == name)
    }
}

/// The full checklist, in execution order
pub fn default_checks(config: &SmokeConfig) -> Vec<Box<dyn Check>> {
    vec![
        Box::new(checks::ImportCheck::new(config)),
        Box::new(checks::AcceleratorCheck::new(config)),
        Box::new(checks::NvidiaDriverCheck::new(config)),
        Box::new(checks::AttributeCheck::new(config)),
        Box::new(checks::EventLoopCheck::new(config)),
        Box::new(checks::EnvCheck::new(config)),
        Box::new(checks::CliCheck::new(config)),
        Box::new(checks::WrapperCheck::new(config)),
        Box::new(checks::LockfileHashCheck::new(config)),
        Box::new(checks::SharedLibraryCheck::new(config)),
    ]
}

/// Names of the default checks, in execution order
pub fn check_names(config: &SmokeConfig) -> Vec<&'static str> {
    default_checks(config).iter().map(|check| check.name()).collect()
}

/// Runner loaded with the default checks that pass `filter`
pub fn default_runner(config: &SmokeConfig, filter: &CheckFilter) -> ChecklistRunner {
    default_checks(config)
        .into_iter()
        .filter(|check| filter.allows(check.name()))
        .fold(ChecklistRunner::new(), ChecklistRunner::add_boxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_only_and_skip() {
        let filter = CheckFilter {
            only: vec!["env".into(), "lockfile".into()],
            skip: vec!["lockfile".into()],
        };
        assert!(filter.allows("env"));
        assert!(!filter.allows("lockfile"));
        assert!(!filter.allows("imports"));
        assert!(CheckFilter::default().allows("imports"));
    }

    #[test]
    fn unknown_name_lists_available_checks() {
        let filter = CheckFilter {
            only: Vec::new(),
            skip: vec!["env".into(), "lokfile".into()],
        };
        let err = filter.validate(&["env", "lockfile"]).unwrap_err();
        assert_eq!(err.name, "lokfile");
        assert_eq!(
            err.to_string(),
            "unknown check `lokfile` (available: env, lockfile)"
        );
        assert!(CheckFilter::default().validate(&[]).is_ok());
    }

    #[test]
    fn default_checklist_order() {
        let names = check_names(&SmokeConfig::default());
        assert_eq!(
            names,
            [
                "imports",
                "accelerator",
                "nvidia-driver",
                "attributes",
                "event-loop",
                "env",
                "cli",
                "wrappers",
                "lockfile",
                "shared-libraries",
            ]
        );
    }
}
