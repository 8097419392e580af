//! Smoke test configuration
//!
//! Every field has a default matching the dev shell this tool was written
//! for, so running without any config file is the normal case.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// File looked up in the current directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "smoke.toml";

/// A Python package to import, with the attribute holding its version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSpec {
    /// Importable module name
    pub module: String,
    /// Attribute to report as the version, e.g. `__version__`
    #[serde(default)]
    pub version_attr: Option<String>,
}

impl PackageSpec {
    pub fn new(module: &str, version_attr: Option<&str>) -> Self {
        Self {
            module: module.to_string(),
            version_attr: version_attr.map(str::to_string),
        }
    }
}

/// Smoke test configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmokeConfig {
    /// Interpreter used for Python-side probes
    pub python: String,
    /// Packages imported by the import check, in order
    pub packages: Vec<PackageSpec>,
    /// Module inspected by the attribute check
    pub attribute_module: String,
    /// The attribute check passes if any of these exist on the module
    pub attribute_names: Vec<String>,
    /// Executable located and version-queried by the CLI check
    pub cli_tool: String,
    /// Helper scripts that must be on PATH
    pub wrappers: Vec<String>,
    /// Lockfile scanned for wheel entries without hashes
    pub lockfile: PathBuf,
    /// Lines containing this marker (and `.whl`) must carry a hash
    pub lock_url_marker: String,
    /// Shared libraries that must be loadable, with the result name for each
    pub libraries: Vec<LibrarySpec>,
    /// Upper bound for any external command
    pub command_timeout_secs: u64,
    /// Upper bound for the event loop round trip
    pub event_loop_timeout_ms: u64,
    /// Delay of the task scheduled on the event loop
    pub event_loop_delay_ms: u64,
    /// More PYTHONPATH segments than this is flagged as pollution
    pub pythonpath_max_segments: usize,
    /// Store directory searched for a prebuilt dev environment
    pub nix_store: PathBuf,
    /// Suffix of the dev environment directory inside the store
    pub dev_env_suffix: String,
}

/// A shared library to load
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibrarySpec {
    /// Name the result is recorded under, e.g. `opengl:libGL`
    pub label: String,
    /// Soname passed to the loader
    pub soname: String,
}

impl Default for SmokeConfig {
    fn default() -> Self {
        Self {
            python: "python3".to_string(),
            packages: vec![
                PackageSpec::new("artiq", Some("__version__")),
                PackageSpec::new("torch", Some("__version__")),
                PackageSpec::new("ndscan", Some("__version__")),
                PackageSpec::new("oitg", None),
                PackageSpec::new("qasync", None),
                PackageSpec::new("sipyco", Some("__version__")),
            ],
            attribute_module: "ndscan".to_string(),
            attribute_names: vec!["__version__".to_string(), "scan".to_string()],
            cli_tool: "artiq_master".to_string(),
            wrappers: vec!["uv-add".to_string(), "uv-remove".to_string()],
            lockfile: PathBuf::from("uv.lock"),
            lock_url_marker: "https://download.pytorch.org/".to_string(),
            libraries: vec![LibrarySpec {
                label: "opengl:libGL".to_string(),
                soname: "libGL.so.1".to_string(),
            }],
            command_timeout_secs: 5,
            event_loop_timeout_ms: 2000,
            event_loop_delay_ms: 10,
            pythonpath_max_segments: 25,
            nix_store: PathBuf::from("/nix/store"),
            dev_env_suffix: "-artiq-fork-dev-env".to_string(),
        }
    }
}

impl SmokeConfig {
    /// Loads configuration
    ///
    /// Sources, later ones overriding earlier ones:
    /// 1. Built-in defaults
    /// 2. `path` if given (must exist), else `./smoke.toml` if present
    /// 3. Environment variables with prefix SMOKE_ (e.g., SMOKE_PYTHON=python3.12,
    ///    SMOKE_COMMAND_TIMEOUT_SECS=10)
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        // Use __ as separator for nested fields
        builder = builder.add_source(
            Environment::with_prefix("SMOKE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Loads configuration from the file named by SMOKE_CONFIG, if set
    pub fn load_from_env() -> Result<Self, ConfigError> {
        match std::env::var_os("SMOKE_CONFIG") {
            Some(path) => Self::load(Some(Path::new(&path))),
            None => Self::load(None),
        }
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    pub fn event_loop_timeout(&self) -> Duration {
        Duration::from_millis(self.event_loop_timeout_ms)
    }

    pub fn event_loop_delay(&self) -> Duration {
        Duration::from_millis(self.event_loop_delay_ms)
    }
}
