//! CUDA availability and tensor operation check

use crate::config::SmokeConfig;
use crate::smoke::check::{Check, Report};
use crate::smoke::error::ProbeError;
use crate::smoke::probe::{Accelerator, TorchAccelerator};

const EXPECTED_SUM: f64 = 55.0;

/// Checks that an accelerator is visible and can run a trivial op
///
/// Records `cuda:available` (only when unavailable), otherwise `cuda:op`,
/// `cuda:device` and `cuda:count`. A probe that cannot run at all is
/// recorded as a failed `cuda:op`.
pub struct AcceleratorCheck<A = TorchAccelerator> {
    accelerator: A,
}

impl AcceleratorCheck {
    pub fn new(config: &SmokeConfig) -> Self {
        Self::with_accelerator(TorchAccelerator::new(
            config.python.clone(),
            config.command_timeout(),
        ))
    }
}

impl<A: Accelerator> AcceleratorCheck<A> {
    pub fn with_accelerator(accelerator: A) -> Self {
        Self { accelerator }
    }
}

impl<A: Accelerator> Check for AcceleratorCheck<A> {
    fn name(&self) -> &'static str {
        "accelerator"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Probes CUDA availability and runs an elementwise op on device 0")
    }

    fn run(&self, report: &mut Report) -> Result<(), ProbeError> {
        let snapshot = match self.accelerator.snapshot() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                report.record("cuda:op", false, e.to_string());
                return Ok(());
            }
        };

        if !snapshot.available {
            report.record("cuda:available", false, "cuda.is_available()==False");
            return Ok(());
        }

        match (snapshot.sum, snapshot.op_error) {
            (_, Some(error)) => report.record("cuda:op", false, error),
            (Some(sum), None) => report.record(
                "cuda:op",
                (sum - EXPECTED_SUM).abs() < 1e-6,
                format!(
                    "sum={:.1} ms={:.1}",
                    sum,
                    snapshot.elapsed_ms.unwrap_or_default()
                ),
            ),
            (None, None) => report.record("cuda:op", false, "no result"),
        }

        match (snapshot.device_name, snapshot.device_error) {
            (Some(name), _) => report.record("cuda:device", true, name),
            (None, error) => report.record(
                "cuda:device",
                false,
                error.unwrap_or_else(|| "unknown device".into()),
            ),
        }

        report.record(
            "cuda:count",
            snapshot.device_count > 0,
            format!("devices={}", snapshot.device_count),
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smoke::probe::AcceleratorSnapshot;

    struct Fixed(Result<AcceleratorSnapshot, &'static str>);

    impl Accelerator for Fixed {
        fn snapshot(&self) -> Result<AcceleratorSnapshot, ProbeError> {
            self.0.clone().map_err(|e| ProbeError::Python(e.to_string()))
        }
    }

    fn run(accelerator: Fixed) -> Report {
        let mut report = Report::new();
        AcceleratorCheck::with_accelerator(accelerator)
            .run(&mut report)
            .unwrap();
        report
    }

    #[test]
    fn unavailable_records_single_failure() {
        let report = run(Fixed(Ok(AcceleratorSnapshot::default())));
        assert_eq!(report.len(), 1);
        assert_eq!(report.results()[0].name(), "cuda:available");
        assert_eq!(report.results()[0].detail(), "cuda.is_available()==False");
    }

    #[test]
    fn working_device_records_op_device_and_count() {
        let report = run(Fixed(Ok(AcceleratorSnapshot {
            available: true,
            device_count: 2,
            sum: Some(55.0),
            elapsed_ms: Some(1.23),
            device_name: Some("NVIDIA RTX A4000".into()),
            ..Default::default()
        })));
        assert!(report.is_healthy());
        let details: Vec<_> = report.results().iter().map(|r| r.detail()).collect();
        assert_eq!(details, ["sum=55.0 ms=1.2", "NVIDIA RTX A4000", "devices=2"]);
    }

    #[test]
    fn wrong_sum_fails_op() {
        let report = run(Fixed(Ok(AcceleratorSnapshot {
            available: true,
            device_count: 1,
            sum: Some(54.0),
            device_name: Some("gpu".into()),
            ..Default::default()
        })));
        assert_eq!(report.failures(), 1);
        assert!(!report.results()[0].passed());
    }

    #[test]
    fn probe_error_is_recorded_as_op_failure() {
        let report = run(Fixed(Err("ModuleNotFoundError('torch')")));
        assert_eq!(report.len(), 1);
        assert_eq!(report.results()[0].name(), "cuda:op");
        assert!(report.results()[0].detail().contains("torch"));
    }
}
