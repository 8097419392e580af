//! Capabilities the checks probe through
//!
//! Each probe is a narrow interface with one system-backed implementation,
//! so tests can substitute a fake without touching the checks or the runner.

pub mod accelerator;
pub mod command;
pub mod dylib;
pub mod env;
pub mod python;

pub use accelerator::{Accelerator, AcceleratorSnapshot, TorchAccelerator};
pub use command::{CommandOutput, CommandRunner, SystemCommandRunner};
pub use dylib::{DlopenLoader, LibraryLoader};
pub use env::{EnvSource, MapEnv, ProcessEnv};
pub use python::PythonProbe;
