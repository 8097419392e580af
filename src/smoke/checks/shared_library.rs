//! Shared library loadability check

use crate::config::{LibrarySpec, SmokeConfig};
use crate::smoke::check::{Check, Report};
use crate::smoke::error::ProbeError;
use crate::smoke::probe::{DlopenLoader, LibraryLoader};

/// Loads each configured shared library by soname
pub struct SharedLibraryCheck<L = DlopenLoader> {
    libraries: Vec<LibrarySpec>,
    loader: L,
}

impl SharedLibraryCheck {
    pub fn new(config: &SmokeConfig) -> Self {
        Self::with_loader(config, DlopenLoader)
    }
}

impl<L: LibraryLoader> SharedLibraryCheck<L> {
    pub fn with_loader(config: &SmokeConfig, loader: L) -> Self {
        Self {
            libraries: config.libraries.clone(),
            loader,
        }
    }
}

impl<L: LibraryLoader> Check for SharedLibraryCheck<L> {
    fn name(&self) -> &'static str {
        "shared-libraries"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Loads optional shared libraries such as libGL")
    }

    fn run(&self, report: &mut Report) -> Result<(), ProbeError> {
        for library in &self.libraries {
            match self.loader.load(&library.soname) {
                Ok(()) => report.record(library.label.as_str(), true, "loaded"),
                Err(e) => report.record(library.label.as_str(), false, e.to_string()),
            }
        }
        Ok(())
    }
}
