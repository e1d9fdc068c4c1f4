//! Shared test utilities for the deepzoom workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Scenario fixtures with known pyramid shapes
//! - Deterministic raster generators
//! - Temporary output roots and tile listing helpers
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{create_test_raster, list_tiles, scenario};
//! ```

pub mod fixtures;
pub mod generators;
pub mod paths;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;
pub use paths::*;

/// Macro to skip a test if the `vips` command line tool is not installed.
///
/// # Usage
///
/// ```ignore
/// use test_utils::require_vips;
///
/// #[test]
/// fn test_dzsave_layout() {
///     require_vips!();
///     // Test code invoking vips...
/// }
/// ```
#[macro_export]
macro_rules! require_vips {
    () => {{
        if !$crate::vips_on_path() {
            eprintln!("SKIPPED: vips not found on PATH.");
            return;
        }
    }};
}

/// Whether `vips --version` runs successfully.
pub fn vips_on_path() -> bool {
    std::process::Command::new("vips")
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}
