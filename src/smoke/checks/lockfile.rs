//! Lockfile integrity check

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use tracing::debug;

use crate::config::SmokeConfig;
use crate::smoke::check::{Check, Report};
use crate::smoke::error::ProbeError;

/// Counts wheel entries under `marker` that carry no hash
///
/// A line matches when it contains both `marker` and `.whl`; it is missing a
/// hash when it does not contain `hash`. Bytes that are not valid UTF-8 are
/// decoded lossily.
pub fn count_missing_hashes<R: BufRead>(mut reader: R, marker: &str) -> io::Result<usize> {
    let mut missing = 0;
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        if line.contains(marker) && line.contains(".whl") && !line.contains("hash") {
            missing += 1;
        }
    }

    Ok(missing)
}

/// Scans the lockfile for wheel URLs without an integrity hash
///
/// Records `lock:present` when the file is absent, otherwise
/// `lock:pytorch_hashes` with `missing=<n>`.
pub struct LockfileHashCheck {
    path: PathBuf,
    marker: String,
}

impl LockfileHashCheck {
    pub fn new(config: &SmokeConfig) -> Self {
        Self {
            path: config.lockfile.clone(),
            marker: config.lock_url_marker.clone(),
        }
    }
}

impl Check for LockfileHashCheck {
    fn name(&self) -> &'static str {
        "lockfile"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Scans the lockfile for wheel entries without hashes")
    }

    fn run(&self, report: &mut Report) -> Result<(), ProbeError> {
        if !self.path.is_file() {
            report.record(
                "lock:present",
                false,
                format!("{} missing", self.path.display()),
            );
            return Ok(());
        }

        let file = File::open(&self.path)?;
        let missing = count_missing_hashes(BufReader::new(file), &self.marker)?;
        debug!(path = %self.path.display(), missing, "lockfile scanned");

        report.record(
            "lock:pytorch_hashes",
            missing == 0,
            format!("missing={}", missing),
        );
        Ok(())
    }
}
