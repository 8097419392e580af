//! Build-time information
//!
//! Metadata captured by `build.rs` when the binary was compiled. Shown by
//! `devenv-smoke --version` so a smoke report can be tied to the exact build
//! that produced it.

/// Target triple (e.g., x86_64-unknown-linux-gnu, x86_64-apple-darwin)
pub const CARGO_TARGET_TRIPLE: &str = env!("VERGEN_CARGO_TARGET_TRIPLE");

/// Package version from Cargo.toml
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Multi-line version text used by `--version`
///
/// The first line is the bare package version, so scripts that only read
/// one line still get something parseable. `concat!` needs literals, hence
/// the repeated `env!` calls.
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\nbuilt:  ",
    env!("VERGEN_BUILD_TIMESTAMP"),
    "\ntarget: ",
    env!("VERGEN_CARGO_TARGET_TRIPLE"),
    "-opt",
    env!("VERGEN_CARGO_OPT_LEVEL"),
    "\nrustc:  ",
    env!("VERGEN_RUSTC_SEMVER"),
    " (",
    env!("VERGEN_RUSTC_CHANNEL"),
    ")"
);
