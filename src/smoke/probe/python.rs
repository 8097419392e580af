//! Running inline Python snippets through the project interpreter

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;

use super::command::CommandRunner;
use crate::smoke::error::ProbeError;

/// Imports a module and prints its version attribute (argv: module, attr)
pub const IMPORT_SCRIPT: &str = r#"
import importlib, json, sys
try:
    m = importlib.import_module(sys.argv[1])
except Exception as e:
    print(json.dumps({"ok": False, "error": repr(e)}))
else:
    attr = sys.argv[2] if len(sys.argv) > 2 else ""
    v = getattr(m, attr, None) if attr else None
    print(json.dumps({"ok": True, "version": None if v is None else str(v)}))
"#;

/// Imports a module and lists which of the given attributes exist (argv: module, attrs...)
pub const ATTRIBUTE_SCRIPT: &str = r#"
import importlib, json, sys
try:
    m = importlib.import_module(sys.argv[1])
except Exception as e:
    print(json.dumps({"ok": False, "error": repr(e)}))
else:
    print(json.dumps({"ok": True, "found": [a for a in sys.argv[2:] if hasattr(m, a)]}))
"#;

/// Value the event loop task resolves to
pub const EVENT_LOOP_VALUE: i64 = 42;

/// Drives a delayed coroutine on a qasync loop over an offscreen
/// `QApplication` (argv: delay secs, bound secs)
pub const QASYNC_SCRIPT: &str = r#"
import asyncio, json, os, sys
os.environ.setdefault("QT_QPA_PLATFORM", "offscreen")
delay, bound = float(sys.argv[1]), float(sys.argv[2])
try:
    import qasync
    from PyQt6.QtWidgets import QApplication
    app = QApplication.instance() or QApplication([])
    async def tiny():
        await asyncio.sleep(delay)
        return 42
    loop = qasync.QEventLoop(app)
    asyncio.set_event_loop(loop)
    with loop:
        value = loop.run_until_complete(asyncio.wait_for(tiny(), bound))
except Exception as e:
    print(json.dumps({"ok": False, "error": repr(e)}))
else:
    print(json.dumps({"ok": True, "value": value}))
"#;

/// Python interpreter used to evaluate probe scripts
///
/// Scripts print exactly one JSON line as their last stdout line; anything
/// printed before it (import-time banners, warnings) is ignored.
pub struct PythonProbe<'a> {
    runner: &'a dyn CommandRunner,
    interpreter: &'a str,
    timeout: Duration,
}

impl<'a> PythonProbe<'a> {
    pub fn new(runner: &'a dyn CommandRunner, interpreter: &'a str, timeout: Duration) -> Self {
        Self {
            runner,
            interpreter,
            timeout,
        }
    }

    /// Runs `script` with `args` as `sys.argv[1:]` and decodes its JSON line
    pub fn eval<T: DeserializeOwned>(&self, script: &str, args: &[&str]) -> Result<T, ProbeError> {
        let mut argv = vec!["-c", script];
        argv.extend_from_slice(args);

        let output = self.runner.run(self.interpreter, &argv, self.timeout)?;
        if !output.success {
            let reason = output
                .stderr
                .lines()
                .rev()
                .map(str::trim)
                .find(|l| !l.is_empty())
                .unwrap_or("interpreter exited with an error");
            return Err(ProbeError::Python(reason.to_string()));
        }

        let line = output
            .stdout
            .lines()
            .rev()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .ok_or_else(|| ProbeError::Parse("empty output".to_string()))?;
        debug!(interpreter = self.interpreter, line, "python probe output");

        serde_json::from_str(line).map_err(|e| ProbeError::Parse(format!("{}: {}", e, line)))
    }
}
