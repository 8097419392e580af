//! Runner for executing the checklist and collecting results

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use tracing::{debug, info, warn};

use super::check::{Check, Report};

/// Runs registered checks in order and reduces them into a [`Report`]
pub struct ChecklistRunner {
    checks: Vec<Box<dyn Check>>,
}

impl ChecklistRunner {
    /// Creates a new runner with no checks
    pub fn new() -> Self {
        Self {
            checks: Vec::new(),
        }
    }

    /// Adds a check to the end of the checklist
    pub fn add_check<C: Check + 'static>(mut self, check: C) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    /// Adds an already boxed check
    pub fn add_boxed(mut self, check: Box<dyn Check>) -> Self {
        self.checks.push(check);
        self
    }

    /// Number of registered checks
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// True when no checks are registered
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Names and descriptions of the registered checks, in order
    pub fn describe(&self) -> Vec<(&'static str, Option<&'static str>)> {
        self.checks
            .iter()
            .map(|c| (c.name(), c.description()))
            .collect()
    }

    /// Runs every registered check once, in registration order
    ///
    /// Never fails: an error or panic inside a check becomes a failed result
    /// under the check's name and the remaining checks still run.
    pub fn run_all(self) -> Report {
        let mut report = Report::new();

        for check in &self.checks {
            let name = check.name();
            let before = report.len();
            let start = Instant::now();
            debug!(check = name, "running check");

            let outcome = panic::catch_unwind(AssertUnwindSafe(|| check.run(&mut report)));

            match outcome {
                Ok(Ok(())) => {
                    if report.len() == before {
                        warn!(check = name, "check recorded no result");
                        report.record(name, false, "no result recorded");
                    }
                }
                Ok(Err(e)) => {
                    warn!(check = name, error = %e, "check failed with an error");
                    report.record(name, false, e.to_string());
                }
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    warn!(check = name, panic = %message, "check panicked");
                    report.record(name, false, format!("panicked: {}", message));
                }
            }

            debug!(
                check = name,
                elapsed = ?start.elapsed(),
                recorded = report.len() - before,
                "check finished"
            );
        }

        report.mark_completed();
        info!(
            total = report.len(),
            failed = report.failures(),
            "checklist completed"
        );
        report
    }
}

impl Default for ChecklistRunner {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smoke::error::ProbeError;

    struct Fixed(&'static str, bool);

    impl Check for Fixed {
        fn name(&self) -> &'static str {
            self.0
        }

        fn run(&self, report: &mut Report) -> Result<(), ProbeError> {
            report.record(self.0, self.1, "");
            Ok(())
        }
    }

    struct Silent;

    impl Check for Silent {
        fn name(&self) -> &'static str {
            "silent"
        }

        fn run(&self, _report: &mut Report) -> Result<(), ProbeError> {
            Ok(())
        }
    }

    struct PartialThenError;

    impl Check for PartialThenError {
        fn name(&self) -> &'static str {
            "partial"
        }

        fn run(&self, report: &mut Report) -> Result<(), ProbeError> {
            report.record("partial:first", true, "ok");
            Err(ProbeError::NotFound("second".into()))
        }
    }

    #[test]
    fn runner_counts_registered_checks() {
        let runner = ChecklistRunner::new().add_check(Fixed("a", true));
        assert_eq!(runner.len(), 1);
        assert!(!runner.is_empty());
        assert_eq!(runner.describe(), [("a", None)]);
    }

    #[test]
    fn empty_checklist_succeeds() {
        let report = ChecklistRunner::new().run_all();
        assert!(report.is_empty());
        assert!(report.is_completed());
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn silent_check_is_recorded_as_failure() {
        let report = ChecklistRunner::new().add_check(Silent).run_all();
        assert_eq!(report.len(), 1);
        assert!(!report.results()[0].passed());
        assert_eq!(report.results()[0].detail(), "no result recorded");
    }

    #[test]
    fn error_keeps_earlier_results() {
        let report = ChecklistRunner::new()
            .add_check(PartialThenError)
            .add_check(Fixed("after", true))
            .run_all();
        let names: Vec<_> = report.results().iter().map(|r| r.name()).collect();
        assert_eq!(names, ["partial:first", "partial", "after"]);
        assert_eq!(report.results()[1].detail(), "`second` not found");
    }

    #[test]
    fn panic_message_handles_both_payload_kinds() {
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        let borrowed: Box<dyn Any + Send> = Box::new("borrowed");
        let other: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(owned.as_ref()), "owned");
        assert_eq!(panic_message(borrowed.as_ref()), "borrowed");
        assert_eq!(panic_message(other.as_ref()), "unknown panic");
    }
}
