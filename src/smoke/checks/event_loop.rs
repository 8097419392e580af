//! Qt event loop round-trip check

use std::time::Duration;

use serde::Deserialize;

use crate::config::SmokeConfig;
use crate::smoke::check::{Check, Report};
use crate::smoke::error::ProbeError;
use crate::smoke::probe::python::{EVENT_LOOP_VALUE, QASYNC_SCRIPT};
use crate::smoke::probe::{CommandRunner, PythonProbe, SystemCommandRunner};

const RESULT_NAME: &str = "qasync:eventloop";

#[derive(Debug, Deserialize)]
struct LoopOutcome {
    ok: bool,
    #[serde(default)]
    value: Option<i64>,
    #[serde(default)]
    error: Option<String>,
}

/// Runs a delayed coroutine on a qasync loop inside the project interpreter
///
/// The coroutine is bounded by the event loop timeout; the interpreter as a
/// whole gets that bound on top of the regular command timeout, since
/// importing PyQt6 dominates start-up.
pub struct EventLoopCheck<R = SystemCommandRunner> {
    python: String,
    delay: Duration,
    bound: Duration,
    timeout: Duration,
    runner: R,
}

impl EventLoopCheck {
    pub fn new(config: &SmokeConfig) -> Self {
        Self::with_runner(config, SystemCommandRunner)
    }
}

impl<R: CommandRunner> EventLoopCheck<R> {
    pub fn with_runner(config: &SmokeConfig, runner: R) -> Self {
        Self {
            python: config.python.clone(),
            delay: config.event_loop_delay(),
            bound: config.event_loop_timeout(),
            timeout: config.command_timeout() + config.event_loop_timeout(),
            runner,
        }
    }
}

impl<R: CommandRunner> Check for EventLoopCheck<R> {
    fn name(&self) -> &'static str {
        "event-loop"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Runs a coroutine to completion on a qasync/PyQt6 event loop (offscreen)")
    }

    fn run(&self, report: &mut Report) -> Result<(), ProbeError> {
        let python = PythonProbe::new(&self.runner, &self.python, self.timeout);
        let delay = self.delay.as_secs_f64().to_string();
        let bound = self.bound.as_secs_f64().to_string();

        match python.eval::<LoopOutcome>(QASYNC_SCRIPT, &[delay.as_str(), bound.as_str()]) {
            Ok(LoopOutcome {
                ok: true,
                value: Some(value),
                ..
            }) => report.record(
                RESULT_NAME,
                value == EVENT_LOOP_VALUE,
                format!("result={}", value),
            ),
            Ok(outcome) => report.record(
                RESULT_NAME,
                false,
                outcome.error.unwrap_or_else(|| "no result".into()),
            ),
            Err(e) => report.record(RESULT_NAME, false, e.to_string()),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smoke::checks::fakes::FakeRunner;

    fn run(runner: FakeRunner) -> Report {
        let mut report = Report::new();
        EventLoopCheck::with_runner(&SmokeConfig::default(), runner)
            .run(&mut report)
            .unwrap();
        report
    }

    #[test]
    fn round_trip_passes() {
        let report = run(FakeRunner::default().with_stdout(
            "python3",
            true,
            r#"{"ok": true, "value": 42}"#,
        ));
        assert_eq!(report.len(), 1);
        assert_eq!(report.results()[0].name(), "qasync:eventloop");
        assert!(report.is_healthy());
        assert_eq!(report.results()[0].detail(), "result=42");
    }

    #[test]
    fn wrong_value_fails() {
        let report = run(FakeRunner::default().with_stdout(
            "python3",
            true,
            r#"{"ok": true, "value": 7}"#,
        ));
        assert!(!report.is_healthy());
        assert_eq!(report.results()[0].detail(), "result=7");
    }

    #[test]
    fn missing_qasync_records_python_error() {
        let report = run(FakeRunner::default().with_stdout(
            "python3",
            true,
            r#"{"ok": false, "error": "ModuleNotFoundError(\"No module named 'qasync'\")"}"#,
        ));
        assert!(!report.is_healthy());
        assert_eq!(
            report.results()[0].detail(),
            "ModuleNotFoundError(\"No module named 'qasync'\")"
        );
    }

    #[test]
    fn hung_interpreter_is_recorded_as_timeout() {
        let report = run(FakeRunner::default().with_timeout("python3"));
        assert_eq!(report.len(), 1);
        assert!(!report.is_healthy());
        assert!(report.results()[0].detail().contains("timed out"));
    }

    #[test]
    fn interpreter_gets_loop_bound_on_top_of_command_timeout() {
        let check = EventLoopCheck::with_runner(&SmokeConfig::default(), FakeRunner::default());
        assert_eq!(check.timeout, Duration::from_millis(7_000));
        assert_eq!(check.bound, Duration::from_secs(2));
    }
}
