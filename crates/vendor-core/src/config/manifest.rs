//! Parsed form of `vendor.yml`

use serde::{Deserialize, Serialize};

use super::policy::{ComplianceMode, Policy};
use crate::position::PathSpec;
use crate::{Error, Result};

/// `source` value marking a vendor whose mappings stay inside this project.
pub const INTERNAL_SOURCE: &str = "internal";

/// The only ref an internal vendor may use.
pub const LOCAL_REF: &str = "local";

/// Top-level vendor configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VendorConfig {
    #[serde(default)]
    pub vendors: Vec<VendorSpec>,
}

impl VendorConfig {
    /// Parse configuration from YAML text.
    pub fn parse(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    pub fn vendor(&self, name: &str) -> Option<&VendorSpec> {
        self.vendors.iter().find(|v| v.name == name)
    }

    pub fn vendor_mut(&mut self, name: &str) -> Option<&mut VendorSpec> {
        self.vendors.iter_mut().find(|v| v.name == name)
    }

    /// Indices of the vendors selected by an optional name filter.
    pub fn select(&self, name: Option<&str>) -> Result<Vec<usize>> {
        match name {
            None => Ok((0..self.vendors.len()).collect()),
            Some(name) => self
                .vendors
                .iter()
                .position(|v| v.name == name)
                .map(|idx| vec![idx])
                .ok_or_else(|| Error::VendorNotFound {
                    name: name.to_string(),
                }),
        }
    }
}

/// One vendored dependency.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VendorSpec {
    pub name: String,

    /// Remote repository URL; absent for internal vendors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,

    /// `internal` for same-project vendors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Compliance mode; defaults to source-canonical
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,

    #[serde(default)]
    pub specs: Vec<BranchSpec>,
}

impl VendorSpec {
    pub fn is_internal(&self) -> bool {
        self.source.as_deref() == Some(INTERNAL_SOURCE)
    }

    /// Resolve the declared compliance mode against `policy`.
    pub fn compliance_mode(&self, policy: &Policy) -> Result<ComplianceMode> {
        let mode = match self.compliance.as_deref() {
            None | Some("") => ComplianceMode::default(),
            Some(raw) => raw
                .parse::<ComplianceMode>()
                .map_err(|mode| Error::InvalidComplianceMode {
                    vendor: self.name.clone(),
                    mode,
                })?,
        };

        if !policy.allows(mode) {
            return Err(Error::InvalidComplianceMode {
                vendor: self.name.clone(),
                mode: mode.to_string(),
            });
        }
        Ok(mode)
    }

    /// Every mapping with its location, in declaration order.
    pub fn mappings(&self) -> impl Iterator<Item = (MappingRef, &PathMapping)> {
        self.specs.iter().enumerate().flat_map(|(spec, branch)| {
            branch
                .mapping
                .iter()
                .enumerate()
                .map(move |(mapping, m)| (MappingRef { spec, mapping }, m))
        })
    }

    pub fn mapping(&self, at: MappingRef) -> Option<&PathMapping> {
        self.specs.get(at.spec)?.mapping.get(at.mapping)
    }

    pub fn mapping_mut(&mut self, at: MappingRef) -> Option<&mut PathMapping> {
        self.specs.get_mut(at.spec)?.mapping.get_mut(at.mapping)
    }
}

/// Location of a mapping inside a [`VendorSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MappingRef {
    pub spec: usize,
    pub mapping: usize,
}

/// A ref of a vendor and the files mapped from it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BranchSpec {
    #[serde(rename = "ref")]
    pub reference: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_target: Option<String>,

    #[serde(default)]
    pub mapping: Vec<PathMapping>,
}

/// `from` and `to` are `path[:position]` strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathMapping {
    pub from: String,
    pub to: String,
}

impl PathMapping {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn from_spec(&self) -> Result<PathSpec> {
        PathSpec::parse(&self.from)
    }

    pub fn to_spec(&self) -> Result<PathSpec> {
        PathSpec::parse(&self.to)
    }

    /// Identifier used in reports and errors.
    pub fn id(&self) -> String {
        format!("{} -> {}", self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"
vendors:
  - name: shared-utils
    source: internal
    compliance: bidirectional
    specs:
      - ref: local
        mapping:
          - from: lib/strings.go:L5-L20
            to: pkg/strings.go:L1-L16
          - from: lib/LICENSE
            to: pkg/LICENSE
  - name: upstream
    url: https://example.com/upstream.git
    license: MIT
    specs:
      - ref: main
        mapping:
          - from: src/a.rs
            to: vendor/a.rs
"#;

    #[test]
    fn parses_internal_and_external_vendors() {
        let config = VendorConfig::parse(SAMPLE).unwrap();
        assert_eq!(config.vendors.len(), 2);

        let internal = config.vendor("shared-utils").unwrap();
        assert!(internal.is_internal());
        assert_eq!(internal.specs[0].reference, "local");
        assert_eq!(
            internal.compliance_mode(&Policy::default()).unwrap(),
            ComplianceMode::Bidirectional
        );

        let external = config.vendor("upstream").unwrap();
        assert!(!external.is_internal());
        assert_eq!(
            external.compliance_mode(&Policy::default()).unwrap(),
            ComplianceMode::SourceCanonical
        );
    }

    #[test]
    fn mappings_iterate_in_declaration_order() {
        let config = VendorConfig::parse(SAMPLE).unwrap();
        let ids: Vec<String> = config.vendors[0].mappings().map(|(_, m)| m.id()).collect();
        assert_eq!(
            ids,
            vec![
                "lib/strings.go:L5-L20 -> pkg/strings.go:L1-L16".to_string(),
                "lib/LICENSE -> pkg/LICENSE".to_string(),
            ]
        );
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let vendor = VendorSpec {
            name: "v".into(),
            compliance: Some("two-way".into()),
            ..VendorSpec::default()
        };
        let err = vendor.compliance_mode(&Policy::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidComplianceMode { .. }));
    }

    #[test]
    fn policy_can_forbid_a_mode() {
        let vendor = VendorSpec {
            name: "v".into(),
            compliance: Some("bidirectional".into()),
            ..VendorSpec::default()
        };
        let policy = Policy {
            allowed_compliance: vec![ComplianceMode::SourceCanonical],
        };
        assert!(vendor.compliance_mode(&policy).is_err());
    }

    #[test]
    fn select_unknown_vendor_fails() {
        let config = VendorConfig::parse(SAMPLE).unwrap();
        assert_eq!(config.select(None).unwrap(), vec![0, 1]);
        assert_eq!(config.select(Some("upstream")).unwrap(), vec![1]);
        assert!(matches!(
            config.select(Some("nope")),
            Err(Error::VendorNotFound { .. })
        ));
    }

    #[test]
    fn serialization_omits_empty_optional_fields() {
        let config = VendorConfig {
            vendors: vec![VendorSpec {
                name: "v".into(),
                source: Some(INTERNAL_SOURCE.into()),
                specs: vec![BranchSpec {
                    reference: LOCAL_REF.into(),
                    default_target: None,
                    mapping: vec![PathMapping::new("a.txt", "b.txt")],
                }],
                ..VendorSpec::default()
            }],
        };
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(!yaml.contains("url"));
        assert!(yaml.contains("ref: local"));
        assert_eq!(VendorConfig::parse(&yaml).unwrap(), config);
    }
}
