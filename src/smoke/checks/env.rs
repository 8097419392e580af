//! Environment variable hygiene check

use std::path::{Path, PathBuf};

use crate::config::SmokeConfig;
use crate::smoke::check::{Check, Report};
use crate::smoke::error::ProbeError;
use crate::smoke::probe::{EnvSource, ProcessEnv};

/// Inspects the virtualenv, search path and accelerator variables
///
/// `VIRTUAL_ENV` and `PYTHONPATH` are always recorded. The Qt, QML and CUDA
/// variables are only recorded when set to a non-empty value; leaving them
/// unset or empty is not an error.
pub struct EnvCheck<E = ProcessEnv> {
    env: E,
    max_pythonpath_segments: usize,
}

impl EnvCheck {
    pub fn new(config: &SmokeConfig) -> Self {
        Self::with_env(config, ProcessEnv)
    }
}

impl<E: EnvSource> EnvCheck<E> {
    pub fn with_env(config: &SmokeConfig, env: E) -> Self {
        Self {
            env,
            max_pythonpath_segments: config.pythonpath_max_segments,
        }
    }

    /// Value of an optional variable, with empty treated as unset
    fn optional_var(&self, key: &str) -> Option<String> {
        self.env.var(key).filter(|v| !v.is_empty())
    }

    fn check_virtual_env(&self, report: &mut Report) {
        let value = self.env.var("VIRTUAL_ENV").unwrap_or_default();
        if value.is_empty() {
            report.record("env:VIRTUAL_ENV", false, "missing");
        } else {
            report.record("env:VIRTUAL_ENV", true, value);
        }
    }

    fn check_pythonpath(&self, report: &mut Report) {
        let value = self.env.var("PYTHONPATH").unwrap_or_default();
        let segments = std::env::split_paths(&value).count();
        report.record(
            "env:PYTHONPATH",
            segments <= self.max_pythonpath_segments,
            format!("segments={}", segments),
        );
    }

    /// Every listed plugin directory must exist
    fn check_qt_plugin_path(&self, report: &mut Report) {
        let Some(value) = self.optional_var("QT_PLUGIN_PATH") else {
            return;
        };
        let listing = DirListing::parse(&value);
        report.record(
            "env:QT_PLUGIN_PATH",
            listing.missing.is_empty() && !listing.dirs.is_empty(),
            listing.detail("dirs", listing.dirs.len()),
        );
    }

    /// At least one listed import directory must exist
    fn check_qml_import_path(&self, report: &mut Report) {
        let Some(value) = self.optional_var("QML2_IMPORT_PATH") else {
            return;
        };
        let listing = DirListing::parse(&value);
        let existing = listing.dirs.len() - listing.missing.len();
        report.record(
            "env:QML2_IMPORT_PATH",
            existing > 0,
            listing.detail("existing", existing),
        );
    }

    fn check_cuda_home(&self, report: &mut Report) {
        let Some(value) = self.optional_var("CUDA_HOME") else {
            return;
        };
        if Path::new(&value).is_dir() {
            report.record("env:CUDA_HOME", true, value);
        } else {
            report.record("env:CUDA_HOME", false, format!("{} is not a directory", value));
        }
    }

    fn check_visible_devices(&self, report: &mut Report) {
        let Some(value) = self.optional_var("CUDA_VISIBLE_DEVICES") else {
            return;
        };
        let (passed, detail) = visible_devices(&value);
        report.record("env:CUDA_VISIBLE_DEVICES", passed, detail);
    }
}

impl<E: EnvSource> Check for EnvCheck<E> {
    fn name(&self) -> &'static str {
        "env"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Validates virtualenv, search path, Qt/QML and CUDA variables")
    }

    fn run(&self, report: &mut Report) -> Result<(), ProbeError> {
        self.check_virtual_env(report);
        self.check_pythonpath(report);
        self.check_qt_plugin_path(report);
        self.check_qml_import_path(report);
        self.check_cuda_home(report);
        self.check_visible_devices(report);
        Ok(())
    }
}

/// Non-empty entries of a search-path variable and those that are not directories
struct DirListing {
    dirs: Vec<PathBuf>,
    missing: Vec<PathBuf>,
}

impl DirListing {
    fn parse(value: &str) -> Self {
        let dirs: Vec<PathBuf> = std::env::split_paths(value)
            .filter(|p| !p.as_os_str().is_empty())
            .collect();
        let missing = dirs.iter().filter(|p| !p.is_dir()).cloned().collect();
        Self { dirs, missing }
    }

    fn detail(&self, label: &str, count: usize) -> String {
        let mut detail = format!("{}={} missing={}", label, count, self.missing.len());
        if let Some(first) = self.missing.first() {
            detail.push_str(&format!(" first_missing={}", first.display()));
        }
        detail
    }
}

/// Accepts device ordinals (`0,1`) and `GPU-`/`MIG-` UUIDs
///
/// A list with no devices in it (e.g. `,`) hides every device, which is
/// reported as a failure.
fn visible_devices(value: &str) -> (bool, String) {
    let tokens: Vec<&str> = value
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.is_empty() {
        return (false, "devices=0 (all devices hidden)".to_string());
    }

    let invalid = tokens.iter().find(|t| {
        t.parse::<u32>().is_err() && !t.starts_with("GPU-") && !t.starts_with("MIG-")
    });
    match invalid {
        Some(token) => (false, format!("invalid device '{}'", token)),
        None => (true, format!("devices={}", tokens.len())),
    }
}
