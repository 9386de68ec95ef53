//! Configuration validation
//!
//! Field rules for every vendor, then cycle detection over internal
//! mappings. [`problems`] collects everything it finds; [`validate_config`]
//! fails on the first problem.

use std::collections::HashSet;
use std::path::Path;

use tracing::debug;
use vendor_fs::FileSystem;

use crate::config::{LOCAL_REF, Policy, VendorConfig, VendorSpec};
use crate::graph::MappingGraph;
use crate::{Error, Result, resolve_project_path};

/// Validate `config` against `policy` and the files under `root`.
pub fn validate_config(
    config: &VendorConfig,
    fs: &dyn FileSystem,
    root: &Path,
    policy: &Policy,
) -> Result<()> {
    match problems(config, fs, root, policy).into_iter().next() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Every validation problem in `config`, in vendor order with the cycle
/// check last.
pub fn problems(
    config: &VendorConfig,
    fs: &dyn FileSystem,
    root: &Path,
    policy: &Policy,
) -> Vec<Error> {
    let mut found = Vec::new();
    let mut seen = HashSet::new();

    for vendor in &config.vendors {
        if !seen.insert(vendor.name.as_str()) {
            found.push(Error::DuplicateVendor {
                name: vendor.name.clone(),
            });
        }

        if vendor.is_internal() {
            check_internal(vendor, fs, root, policy, &mut found);
        } else if vendor.url.as_deref().is_none_or(str::is_empty) {
            found.push(Error::ExternalVendorUrl {
                vendor: vendor.name.clone(),
            });
        }

        for (_, mapping) in vendor.mappings() {
            for address in [&mapping.from, &mapping.to] {
                if let Err(err) = crate::position::PathSpec::parse(address) {
                    found.push(err);
                }
            }
        }
    }

    // Parse errors were already collected above.
    if let Ok(graph) = MappingGraph::from_config(config)
        && let Err(err) = graph.ensure_acyclic()
    {
        found.push(err);
    }

    debug!(vendors = config.vendors.len(), problems = found.len(), "Validated configuration");
    found
}

fn check_internal(
    vendor: &VendorSpec,
    fs: &dyn FileSystem,
    root: &Path,
    policy: &Policy,
    found: &mut Vec<Error>,
) {
    if let Some(url) = vendor.url.as_deref().filter(|u| !u.is_empty()) {
        found.push(Error::InternalVendorUrl {
            vendor: vendor.name.clone(),
            url: url.to_string(),
        });
    }

    for branch in &vendor.specs {
        if branch.reference != LOCAL_REF {
            found.push(Error::InternalVendorRef {
                vendor: vendor.name.clone(),
                reference: branch.reference.clone(),
            });
        }
    }

    if let Err(err) = vendor.compliance_mode(policy) {
        found.push(err);
    }

    for (_, mapping) in vendor.mappings() {
        let Ok(from) = mapping.from_spec() else {
            continue;
        };
        if !fs.is_file(&resolve_project_path(root, &from.path)) {
            found.push(Error::MissingSourceFile {
                vendor: vendor.name.clone(),
                path: from.path,
            });
        }
    }
}
