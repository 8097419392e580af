//! Guidance printed when the dev shell is not active

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::probe::EnvSource;

/// Returns a warning block when neither `VIRTUAL_ENV` nor `UV_PYTHON` is set
///
/// If a prebuilt environment whose directory name ends in `suffix` exists in
/// `store`, the hint also names its interpreter. Failure to read the store
/// is ignored.
pub fn venv_hint(env: &dyn EnvSource, store: &Path, suffix: &str) -> Option<String> {
    let uv_python = env.var("UV_PYTHON").unwrap_or_default();
    if env.var("VIRTUAL_ENV").is_some() || !uv_python.is_empty() {
        return None;
    }

    let mut lines = vec![
        "[smoke] Warning: Not inside 'nix develop' shell (VIRTUAL_ENV unset).".to_string(),
        "         Run either:".to_string(),
        "           nix develop --impure".to_string(),
        "           devenv-smoke".to_string(),
    ];
    if let Some(env_dir) = find_dev_env(store, suffix) {
        lines.push(format!(
            "         Or point the probes at its python: SMOKE_PYTHON={}/bin/python devenv-smoke",
            env_dir.display()
        ));
    }
    Some(lines.join("\n"))
}

/// First (by name) store entry ending in `suffix`
fn find_dev_env(store: &Path, suffix: &str) -> Option<PathBuf> {
    let entries = match fs::read_dir(store) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(store = %store.display(), error = %e, "store not readable");
            return None;
        }
    };

    entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(suffix))
        .map(|entry| entry.path())
        .min()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smoke::probe::MapEnv;

    const SUFFIX: &str = "-artiq-fork-dev-env";

    #[test]
    fn silent_inside_virtualenv() {
        let env = MapEnv::new().with("VIRTUAL_ENV", "/venv");
        assert_eq!(venv_hint(&env, Path::new("/nonexistent"), SUFFIX), None);
    }

    #[test]
    fn silent_with_uv_python() {
        let env = MapEnv::new().with("UV_PYTHON", "3.12");
        assert_eq!(venv_hint(&env, Path::new("/nonexistent"), SUFFIX), None);
    }

    #[test]
    fn names_dev_env_from_store() {
        let store = tempfile::tempdir().unwrap();
        fs::create_dir(store.path().join("zzz-artiq-fork-dev-env")).unwrap();
        fs::create_dir(store.path().join("abc-artiq-fork-dev-env")).unwrap();
        fs::create_dir(store.path().join("abc-python3")).unwrap();

        let hint = venv_hint(&MapEnv::new(), store.path(), SUFFIX).unwrap();
        assert!(hint.contains("nix develop --impure"));
        let expected = store.path().join("abc-artiq-fork-dev-env");
        assert!(hint.contains(&format!("SMOKE_PYTHON={}/bin/python", expected.display())));
    }

    #[test]
    fn unreadable_store_still_warns() {
        let hint = venv_hint(&MapEnv::new(), Path::new("/definitely/not/here"), SUFFIX).unwrap();
        assert!(!hint.contains("SMOKE_PYTHON"));
    }
}
