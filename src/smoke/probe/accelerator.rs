//! Accelerator (CUDA) capability probe

use std::time::Duration;

use serde::Deserialize;

use super::command::{CommandRunner, SystemCommandRunner};
use super::python::PythonProbe;
use crate::smoke::error::ProbeError;

/// Everything the accelerator checks need, gathered in one probe
///
/// `sum` is the result of `(arange(10) + ones(10)).sum()` on device 0 and
/// is expected to be 55.0.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AcceleratorSnapshot {
    pub available: bool,
    #[serde(default)]
    pub device_count: u32,
    #[serde(default)]
    pub sum: Option<f64>,
    #[serde(default)]
    pub elapsed_ms: Option<f64>,
    #[serde(default)]
    pub op_error: Option<String>,
    #[serde(default)]
    pub device_name: Option<String>,
    #[serde(default)]
    pub device_error: Option<String>,
}

/// Source of accelerator information
pub trait Accelerator {
    fn snapshot(&self) -> Result<AcceleratorSnapshot, ProbeError>;
}

const TORCH_SCRIPT: &str = r#"
import json, time
try:
    import torch
except Exception as e:
    print(json.dumps({"import_error": repr(e)}))
    raise SystemExit(0)
out = {"available": bool(torch.cuda.is_available()), "device_count": int(torch.cuda.device_count())}
if out["available"]:
    try:
        start = time.time()
        d = torch.device("cuda:0")
        a = torch.arange(10, device=d, dtype=torch.float32)
        b = torch.ones(10, device=d)
        out["sum"] = float((a + b).sum().item())
        out["elapsed_ms"] = (time.time() - start) * 1000
    except Exception as e:
        out["op_error"] = repr(e)
    try:
        out["device_name"] = torch.cuda.get_device_name(0)
    except Exception as e:
        out["device_error"] = repr(e)
print(json.dumps(out))
"#;

#[derive(Deserialize)]
#[serde(untagged)]
enum TorchOutput {
    ImportFailed { import_error: String },
    Snapshot(AcceleratorSnapshot),
}

/// Asks PyTorch, through the project interpreter
pub struct TorchAccelerator<R = SystemCommandRunner> {
    runner: R,
    interpreter: String,
    timeout: Duration,
}

impl TorchAccelerator {
    pub fn new(interpreter: impl Into<String>, timeout: Duration) -> Self {
        Self::with_runner(SystemCommandRunner, interpreter, timeout)
    }
}

impl<R: CommandRunner> TorchAccelerator<R> {
    pub fn with_runner(runner: R, interpreter: impl Into<String>, timeout: Duration) -> Self {
        Self {
            runner,
            interpreter: interpreter.into(),
            timeout,
        }
    }
}

impl<R: CommandRunner> Accelerator for TorchAccelerator<R> {
    fn snapshot(&self) -> Result<AcceleratorSnapshot, ProbeError> {
        let python = PythonProbe::new(&self.runner, &self.interpreter, self.timeout);
        match python.eval::<TorchOutput>(TORCH_SCRIPT, &[])? {
            TorchOutput::ImportFailed { import_error } => Err(ProbeError::Python(import_error)),
            TorchOutput::Snapshot(snapshot) => Ok(snapshot),
        }
    }
}
