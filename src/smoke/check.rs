//! Core check trait and result types

use serde::Serialize;

use super::error::ProbeError;

/// Overall outcome of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateStatus {
    /// Every recorded result passed (or nothing was recorded)
    Success,
    /// At least one recorded result failed
    Failure,
}

impl AggregateStatus {
    /// Returns true for `Success`
    pub fn is_success(&self) -> bool {
        matches!(self, AggregateStatus::Success)
    }

    /// Process exit code for this status: 0 on success, 1 on failure
    pub fn exit_code(&self) -> i32 {
        match self {
            AggregateStatus::Success => 0,
            AggregateStatus::Failure => 1,
        }
    }

    /// Upper-case label used in the rendered report
    pub fn label(&self) -> &'static str {
        match self {
            AggregateStatus::Success => "SUCCESS",
            AggregateStatus::Failure => "FAILURE",
        }
    }
}

/// Outcome of one diagnostic probe
///
/// Immutable once built; fields are only reachable through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    name: String,
    passed: bool,
    detail: String,
}

impl CheckResult {
    /// Creates a result with an explicit pass flag
    pub fn new(name: impl Into<String>, passed: bool, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed,
            detail: detail.into(),
        }
    }

    /// Creates a passing result
    pub fn pass(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(name, true, detail)
    }

    /// Creates a failing result
    pub fn fail(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(name, false, detail)
    }

    /// Name the result is reported under
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the probe passed
    pub fn passed(&self) -> bool {
        self.passed
    }

    /// Free-form evidence, possibly empty
    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// `PASS` or `FAIL`
    pub fn status_label(&self) -> &'static str {
        if self.passed { "PASS" } else { "FAIL" }
    }
}

/// Ordered collection of every result recorded during one run
#[derive(Debug, Default, Clone, Serialize)]
pub struct Report {
    results: Vec<CheckResult>,
    #[serde(skip)]
    completed: bool,
}

impl Report {
    /// Creates an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one result. Repeated names are kept as separate entries.
    pub fn record(&mut self, name: impl Into<String>, passed: bool, detail: impl Into<String>) {
        self.results.push(CheckResult::new(name, passed, detail));
    }

    /// Appends a prebuilt result
    pub fn push(&mut self, result: CheckResult) {
        self.results.push(result);
    }

    /// Results in the order they were recorded
    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    /// Number of recorded results
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// True when nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Number of failed results
    pub fn failures(&self) -> usize {
        self.results.iter().filter(|r| !r.passed()).count()
    }

    /// Number of passed results
    pub fn passed(&self) -> usize {
        self.results.len() - self.failures()
    }

    /// Success when every result passed, including the empty report
    pub fn status(&self) -> AggregateStatus {
        if self.results.iter().all(CheckResult::passed) {
            AggregateStatus::Success
        } else {
            AggregateStatus::Failure
        }
    }

    /// Returns true if no result failed
    pub fn is_healthy(&self) -> bool {
        self.status().is_success()
    }

    /// Returns the process exit code for this report (0 = all pass, 1 = any fail)
    pub fn exit_code(&self) -> i32 {
        self.status().exit_code()
    }

    /// True once the runner has executed its whole checklist into this report
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub(crate) fn mark_completed(&mut self) {
        self.completed = true;
    }
}

/// A single diagnostic procedure
///
/// A check records its own outcome into the report, usually once, sometimes
/// a small fixed number of times (one entry per package, per wrapper, ...).
/// Returning an error or panicking is treated as a crash by the runner and
/// recorded as a failure under [`Check::name`].
pub trait Check {
    /// Short identifier, also used by `--only` / `--skip`
    fn name(&self) -> &'static str;

    /// Perform the probe and record its results
    fn run(&self, report: &mut Report) -> Result<(), ProbeError>;

    /// Optional description of what this check validates
    fn description(&self) -> Option<&'static str> {
        None
    }
}
