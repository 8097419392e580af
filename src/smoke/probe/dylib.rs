//! Shared-library loadability

use crate::smoke::error::ProbeError;

/// Loads shared libraries by soname
pub trait LibraryLoader {
    /// Loads and immediately unloads `name`
    fn load(&self, name: &str) -> Result<(), ProbeError>;
}

/// Uses the platform dynamic loader (`dlopen`)
#[derive(Debug, Default, Clone, Copy)]
pub struct DlopenLoader;

#[cfg(unix)]
impl LibraryLoader for DlopenLoader {
    fn load(&self, name: &str) -> Result<(), ProbeError> {
        use std::ffi::{CStr, CString};

        let c_name = CString::new(name)
            .map_err(|_| ProbeError::Load(format!("invalid library name: {:?}", name)))?;

        // SAFETY: `c_name` is NUL-terminated and outlives the call; the handle
        // is closed before returning and no symbol from it is ever used.
        unsafe {
            let handle = libc::dlopen(c_name.as_ptr(), libc::RTLD_LAZY | libc::RTLD_LOCAL);
            if handle.is_null() {
                let err = libc::dlerror();
                let message = if err.is_null() {
                    format!("{}: cannot open shared object", name)
                } else {
                    CStr::from_ptr(err).to_string_lossy().into_owned()
                };
                return Err(ProbeError::Load(message));
            }
            libc::dlclose(handle);
        }
        Ok(())
    }
}

#[cfg(not(unix))]
impl LibraryLoader for DlopenLoader {
    fn load(&self, _name: &str) -> Result<(), ProbeError> {
        Err(ProbeError::Unsupported("dlopen"))
    }
}
