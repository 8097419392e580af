//! Errors raised by probes

use std::time::Duration;

use thiserror::Error;

/// Why a probe could not produce its evidence
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("`{program}` timed out after {timeout:?}")]
    Timeout { program: String, timeout: Duration },

    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{0}` not found")]
    NotFound(String),

    #[error("python error: {0}")]
    Python(String),

    #[error("unexpected probe output: {0}")]
    Parse(String),

    #[error("{0}")]
    Load(String),

    #[error("not supported on this platform: {0}")]
    Unsupported(&'static str),

    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_message_names_program() {
        let err = ProbeError::Timeout {
            program: "artiq_master".into(),
            timeout: Duration::from_secs(5),
        };
        assert_eq!(err.to_string(), "`artiq_master` timed out after 5s");
    }
}
