//! Fixtures shared by the git-vendor test suites (dev-dependency only).
//!
//! - [`config`]: [`VendorYaml`] builder for `vendor.yml` content
//! - [`project`]: [`TestProject`] temporary project with file helpers

pub mod config;
pub mod project;

pub use config::VendorYaml;
pub use project::TestProject;

/// `n` numbered lines (`line1` .. `line<n>`), each newline-terminated.
pub fn numbered_lines(n: usize) -> String {
    (1..=n).map(|i| format!("line{i}\n")).collect()
}
