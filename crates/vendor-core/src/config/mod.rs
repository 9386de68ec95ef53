//! Vendor configuration model
//!
//! The configuration lives in `.git-vendor/vendor.yml` and lists vendors,
//! each with one or more refs and the path mappings vendored from them.
//! Internal vendors (`source: internal`) map paths within this project and
//! are subject to compliance checking and cycle detection.

mod manifest;
mod policy;

pub use manifest::{
    BranchSpec, INTERNAL_SOURCE, LOCAL_REF, MappingRef, PathMapping, VendorConfig, VendorSpec,
};
pub use policy::{ComplianceMode, Policy};
