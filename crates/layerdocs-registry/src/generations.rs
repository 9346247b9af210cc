//! # Generation Registry
//!
//! Maps each component version to the layer version (generation) it was last
//! published as, plus when that happened. Re-registering a component version
//! overwrites its record: last write wins.
//!
//! Generations are per component version, not globally monotonic, so the
//! "latest" generation is a numeric maximum over all records.

use crate::models::{GenerationRecord, RegistryError, Result};
use crate::version::compare_versions;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Component version -> generation record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenerationRegistry {
    records: BTreeMap<String, GenerationRecord>,
}

impl GenerationRegistry {
    /// On-disk indentation of the generation registry file.
    pub const INDENT: usize = 2;

    /// Record for `component_version`, if any.
    pub fn get(&self, component_version: &str) -> Option<&GenerationRecord> {
        self.records.get(component_version)
    }

    /// Iterates `(component_version, record)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &GenerationRecord)> {
        self.records.iter().map(|(v, r)| (v.as_str(), r))
    }

    /// Number of component versions recorded.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no component version is recorded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records `generation` for `component_version`, stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::InvalidInput` if the component version is empty.
    pub fn record_generation(&mut self, component_version: &str, generation: u64) -> Result<()> {
        self.record_generation_at(component_version, generation, Utc::now())
    }

    /// Records `generation` for `component_version` with an explicit timestamp.
    ///
    /// Any previous record for the same component version is replaced.
    pub fn record_generation_at(
        &mut self,
        component_version: &str,
        generation: u64,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        if component_version.trim().is_empty() {
            return Err(RegistryError::InvalidInput(
                "component version must not be empty".to_string(),
            ));
        }

        let previous = self.records.insert(
            component_version.to_string(),
            GenerationRecord::new(generation, updated_at),
        );
        if let Some(previous) = previous {
            debug!(
                "Component version {} moved from generation {} to {}",
                component_version, previous.generation, generation
            );
        }
        Ok(())
    }

    /// Returns the record with the numerically largest generation.
    ///
    /// Two component versions sharing the largest generation resolve to the
    /// higher component version.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::EmptyRegistry` if nothing has been recorded.
    ///
    /// # Example
    ///
    /// ```rust
    /// use layerdocs_registry::GenerationRegistry;
    ///
    /// let mut registry = GenerationRegistry::default();
    /// registry.record_generation("1.0.0", 3).unwrap();
    /// registry.record_generation("1.1.0", 10).unwrap();
    /// registry.record_generation("1.2.0", 2).unwrap();
    ///
    /// let (version, record) = registry.latest_generation().unwrap();
    /// assert_eq!(version, "1.1.0");
    /// assert_eq!(record.generation, 10);
    /// ```
    pub fn latest_generation(&self) -> Result<(&str, &GenerationRecord)> {
        self.iter()
            .max_by(|(va, ra), (vb, rb)| {
                ra.generation
                    .cmp(&rb.generation)
                    .then_with(|| compare_versions(va, vb))
            })
            .ok_or(RegistryError::EmptyRegistry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_latest_generation_empty() {
        let registry = GenerationRegistry::default();
        assert!(matches!(
            registry.latest_generation(),
            Err(RegistryError::EmptyRegistry)
        ));
    }

    #[test]
    fn test_latest_generation_is_numeric() {
        let mut registry = GenerationRegistry::default();
        registry.record_generation("a", 3).unwrap();
        registry.record_generation("b", 10).unwrap();
        registry.record_generation("c", 2).unwrap();
        registry.record_generation("d", 9).unwrap();

        let (_, record) = registry.latest_generation().unwrap();
        assert_eq!(record.generation, 10);
    }

    #[test]
    fn test_latest_generation_tie_prefers_higher_version() {
        let mut registry = GenerationRegistry::default();
        registry.record_generation("1.10.0", 4).unwrap();
        registry.record_generation("1.9.0", 4).unwrap();

        let (version, _) = registry.latest_generation().unwrap();
        assert_eq!(version, "1.10.0");
    }

    #[test]
    fn test_rerecord_overwrites() {
        let mut registry = GenerationRegistry::default();
        let first = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

        registry.record_generation_at("1.0.0", 1, first).unwrap();
        registry.record_generation_at("1.0.0", 2, second).unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("1.0.0"), Some(&GenerationRecord::new(2, second)));
    }

    #[test]
    fn test_rejects_empty_component_version() {
        let mut registry = GenerationRegistry::default();
        assert!(registry.record_generation(" ", 1).is_err());
        assert!(registry.is_empty());
    }
}
