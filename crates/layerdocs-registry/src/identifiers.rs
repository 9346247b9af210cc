//! # Identifier Registry
//!
//! The identifier registry records every layer ARN ever published, nested as
//!
//! ```text
//! component version -> interpreter version -> architecture -> region -> ARN
//! ```
//!
//! Each nesting level is its own type with a typed accessor. Reads return
//! `Option` and never create anything; writes go through
//! [`IdentifierRegistry::record_identifiers`], which creates intermediate
//! levels on demand.
//!
//! ## Merge Semantics
//!
//! Recording is a partial update. Only the cartesian product of the supplied
//! interpreter versions, architectures and regions is written; every other
//! entry, including other regions or interpreters of the same component
//! version, survives untouched.

use crate::arn::ArnTemplate;
use crate::models::{Architecture, RegistryError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Region name -> ARN for one (component, interpreter, architecture).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionMap {
    arns: BTreeMap<String, String>,
}

impl RegionMap {
    /// ARN recorded for `region`, if any.
    pub fn get(&self, region: &str) -> Option<&str> {
        self.arns.get(region).map(String::as_str)
    }

    /// Number of regions recorded.
    pub fn len(&self) -> usize {
        self.arns.len()
    }

    /// Returns true if no region is recorded.
    pub fn is_empty(&self) -> bool {
        self.arns.is_empty()
    }
}

/// Architecture -> regions for one (component, interpreter).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterpreterEntry {
    architectures: BTreeMap<Architecture, RegionMap>,
}

impl InterpreterEntry {
    /// Regions recorded for `arch`, if any.
    pub fn architecture(&self, arch: Architecture) -> Option<&RegionMap> {
        self.architectures.get(&arch)
    }

    /// Architectures with at least one recorded entry, sorted by name.
    pub fn architectures(&self) -> impl Iterator<Item = Architecture> + '_ {
        self.architectures.keys().copied()
    }
}

/// Interpreter version -> architectures for one component version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentEntry {
    interpreters: BTreeMap<String, InterpreterEntry>,
}

impl ComponentEntry {
    /// Entry for `interpreter_version`, if any.
    pub fn interpreter(&self, interpreter_version: &str) -> Option<&InterpreterEntry> {
        self.interpreters.get(interpreter_version)
    }

    /// Interpreter versions recorded for this component, in key order.
    pub fn interpreter_versions(&self) -> impl Iterator<Item = &str> {
        self.interpreters.keys().map(String::as_str)
    }

    /// Union of architectures across all interpreter versions.
    pub fn architectures(&self) -> BTreeSet<Architecture> {
        self.interpreters
            .values()
            .flat_map(|entry| entry.architectures())
            .collect()
    }
}

/// The full component version -> ... -> ARN mapping.
///
/// # Example
///
/// ```rust
/// use layerdocs_registry::{ArnTemplate, Architecture, IdentifierRegistry};
/// use std::collections::BTreeSet;
///
/// let mut registry = IdentifierRegistry::default();
/// let template = ArnTemplate::new("111111111111", "duckdb");
///
/// registry
///     .record_identifiers(
///         "1.2.0",
///         &BTreeSet::from(["3.11".to_string()]),
///         &BTreeSet::from([Architecture::X86_64]),
///         &["us-east-1".to_string()],
///         &template,
///         5,
///     )
///     .unwrap();
///
/// assert_eq!(
///     registry.arn("1.2.0", "3.11", Architecture::X86_64, "us-east-1"),
///     Some("arn:aws:lambda:us-east-1:111111111111:layer:duckdb-python311-x86_64:5")
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentifierRegistry {
    components: BTreeMap<String, ComponentEntry>,
}

impl IdentifierRegistry {
    /// On-disk indentation of the identifier registry file.
    pub const INDENT: usize = 4;

    /// Entry for `component_version`, if any.
    pub fn component(&self, component_version: &str) -> Option<&ComponentEntry> {
        self.components.get(component_version)
    }

    /// Iterates `(component_version, entry)` pairs in key order.
    pub fn components(&self) -> impl Iterator<Item = (&str, &ComponentEntry)> {
        self.components.iter().map(|(v, e)| (v.as_str(), e))
    }

    /// Looks up a single ARN.
    pub fn arn(
        &self,
        component_version: &str,
        interpreter_version: &str,
        arch: Architecture,
        region: &str,
    ) -> Option<&str> {
        self.component(component_version)?
            .interpreter(interpreter_version)?
            .architecture(arch)?
            .get(region)
    }

    /// Number of component versions recorded.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns true if no component version is recorded.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Records the ARN of every interpreter × architecture × region combination.
    ///
    /// Existing ARNs for the same combination are overwritten; everything
    /// else in the registry is preserved. No I/O happens here.
    ///
    /// # Arguments
    ///
    /// * `component_version` - Version of the packaged component
    /// * `interpreter_versions` - Interpreter versions the layer was built for
    /// * `architectures` - Architectures the layer was built for
    /// * `regions` - Regions the layer was published to
    /// * `template` - Account and layer naming inputs
    /// * `generation` - Layer version assigned by the deployment
    ///
    /// # Returns
    ///
    /// The number of ARNs written.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::InvalidInput` if the component version is
    /// empty, any of the interpreter, architecture or region lists is empty,
    /// or an interpreter version is blank. Nothing is written in that case.
    pub fn record_identifiers(
        &mut self,
        component_version: &str,
        interpreter_versions: &BTreeSet<String>,
        architectures: &BTreeSet<Architecture>,
        regions: &[String],
        template: &ArnTemplate,
        generation: u64,
    ) -> Result<usize> {
        if component_version.trim().is_empty() {
            return Err(RegistryError::InvalidInput(
                "component version must not be empty".to_string(),
            ));
        }
        if interpreter_versions.is_empty() {
            return Err(RegistryError::InvalidInput(
                "at least one interpreter version is required".to_string(),
            ));
        }
        if interpreter_versions.iter().any(|v| v.trim().is_empty()) {
            return Err(RegistryError::InvalidInput(
                "interpreter versions must not be empty".to_string(),
            ));
        }
        if architectures.is_empty() || regions.is_empty() {
            return Err(RegistryError::InvalidInput(
                "at least one architecture and one region are required".to_string(),
            ));
        }

        let component = self
            .components
            .entry(component_version.to_string())
            .or_default();

        let mut written = 0;
        for interpreter_version in interpreter_versions {
            let interpreter = component
                .interpreters
                .entry(interpreter_version.clone())
                .or_default();

            for &arch in architectures {
                let region_map = interpreter.architectures.entry(arch).or_default();
                for region in regions {
                    let arn =
                        template.interpreter_layer(region, interpreter_version, arch, generation);
                    region_map.arns.insert(region.clone(), arn);
                    written += 1;
                }
            }
        }

        debug!(
            "Recorded {} identifiers for component version {}",
            written, component_version
        );
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn regions(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_record_writes_cartesian_product() {
        let mut registry = IdentifierRegistry::default();
        let template = ArnTemplate::new("111111111111", "duckdb");

        let written = registry
            .record_identifiers(
                "1.2.0",
                &set(&["3.11", "3.12"]),
                &BTreeSet::from(Architecture::ALL),
                &regions(&["us-east-1", "eu-west-1"]),
                &template,
                5,
            )
            .unwrap();

        assert_eq!(written, 8);
        assert_eq!(
            registry.arn("1.2.0", "3.12", Architecture::Arm64, "eu-west-1"),
            Some("arn:aws:lambda:eu-west-1:111111111111:layer:duckdb-python312-arm64:5")
        );
    }

    #[test]
    fn test_rejects_empty_interpreter_version() {
        let mut registry = IdentifierRegistry::default();
        let template = ArnTemplate::new("1", "duckdb");

        let err = registry
            .record_identifiers(
                "1.2.0",
                &set(&["3.11", ""]),
                &BTreeSet::from([Architecture::X86_64]),
                &regions(&["us-east-1"]),
                &template,
                1,
            )
            .unwrap_err();

        assert!(matches!(err, RegistryError::InvalidInput(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_rejects_missing_interpreter_versions() {
        let mut registry = IdentifierRegistry::default();
        let template = ArnTemplate::new("1", "duckdb");

        assert!(registry
            .record_identifiers(
                "1.2.0",
                &BTreeSet::new(),
                &BTreeSet::from([Architecture::X86_64]),
                &regions(&["us-east-1"]),
                &template,
                1,
            )
            .is_err());
    }

    #[test]
    fn test_rejects_empty_region_list() {
        let mut registry = IdentifierRegistry::default();
        let template = ArnTemplate::new("1", "duckdb");

        let err = registry
            .record_identifiers("1.2.0", &set(&["3.11"]), &BTreeSet::from(Architecture::ALL), &[], &template, 1)
            .unwrap_err();

        assert!(matches!(err, RegistryError::InvalidInput(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_component_architectures_union() {
        let mut registry = IdentifierRegistry::default();
        let template = ArnTemplate::new("1", "duckdb");
        let r = regions(&["us-east-1"]);

        registry
            .record_identifiers("1.0.0", &set(&["3.10"]), &BTreeSet::from([Architecture::X86_64]), &r, &template, 1)
            .unwrap();
        registry
            .record_identifiers("1.0.0", &set(&["3.11"]), &BTreeSet::from([Architecture::Arm64]), &r, &template, 1)
            .unwrap();

        let component = registry.component("1.0.0").unwrap();
        assert_eq!(
            component.architectures().into_iter().collect::<Vec<_>>(),
            vec![Architecture::Arm64, Architecture::X86_64]
        );
        assert_eq!(
            component.interpreter_versions().collect::<Vec<_>>(),
            vec!["3.10", "3.11"]
        );
    }

    #[test]
    fn test_deserialize_rejects_unknown_architecture() {
        let json = r#"{"1.0.0": {"3.11": {"sparc": {"us-east-1": "arn"}}}}"#;
        assert!(serde_json::from_str::<IdentifierRegistry>(json).is_err());
    }
}
