//! [`VendorYaml`] builder for configuration fixtures.
//!
//! Produces `vendor.yml` text without depending on the crates under test.

/// Builder for `vendor.yml` content.
///
/// # Example
///
/// ```rust
/// use vendor_test_utils::VendorYaml;
///
/// let yaml = VendorYaml::new()
///     .internal("utils", Some("bidirectional"), &[("lib/a.go:L1-L5", "pkg/a.go")])
///     .build();
/// assert!(yaml.contains("source: internal"));
/// ```
#[derive(Debug, Default, Clone)]
pub struct VendorYaml {
    vendors: Vec<String>,
}

impl VendorYaml {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an internal vendor with `ref: local`.
    pub fn internal(self, name: &str, compliance: Option<&str>, mappings: &[(&str, &str)]) -> Self {
        self.internal_with_ref(name, "local", compliance, mappings)
    }

    /// Add an internal vendor with an arbitrary ref (for validation tests).
    pub fn internal_with_ref(
        mut self,
        name: &str,
        reference: &str,
        compliance: Option<&str>,
        mappings: &[(&str, &str)],
    ) -> Self {
        let mut vendor = format!("  - name: {name}\n    source: internal\n");
        if let Some(mode) = compliance {
            vendor.push_str(&format!("    compliance: {mode}\n"));
        }
        vendor.push_str(&specs(reference, mappings));
        self.vendors.push(vendor);
        self
    }

    /// Add an external vendor.
    pub fn external(mut self, name: &str, url: &str, mappings: &[(&str, &str)]) -> Self {
        let mut vendor = format!("  - name: {name}\n    url: {url}\n    license: MIT\n");
        vendor.push_str(&specs("main", mappings));
        self.vendors.push(vendor);
        self
    }

    pub fn build(&self) -> String {
        format!("vendors:\n{}", self.vendors.concat())
    }
}

fn specs(reference: &str, mappings: &[(&str, &str)]) -> String {
    let mut out = format!("    specs:\n      - ref: {reference}\n        mapping:\n");
    for (from, to) in mappings {
        out.push_str(&format!(
            "          - from: \"{from}\"\n            to: \"{to}\"\n"
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_multiple_vendors() {
        let yaml = VendorYaml::new()
            .internal("a", None, &[("x.txt", "y.txt")])
            .external("b", "https://example.com/b.git", &[("src", "vendor/b")])
            .build();
        assert!(yaml.starts_with("vendors:\n  - name: a\n"));
        assert!(yaml.contains("url: https://example.com/b.git"));
        assert!(yaml.contains("from: \"x.txt\""));
        assert!(!yaml.contains("compliance"));
    }
}
