//! Command implementations for the git-vendor CLI

mod compliance;
mod position;
mod sync;
mod validate;

pub use compliance::{run_check, run_propagate};
pub use position::{run_extract, run_place};
pub use sync::run_sync;
pub use validate::run_validate;
