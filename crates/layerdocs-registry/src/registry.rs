//! # Layer Registry - Main Facade
//!
//! Ties the identifier registry and the generation registry to their files.
//!
//! ## Usage Flow
//!
//! 1. **Open**: load both registry files (missing files start empty)
//! 2. **Record**: merge a [`Release`] into both registries in memory
//! 3. **Save**: write both files back in canonical form, as one unit
//!
//! Nothing touches the disk between open and save, so a failure while
//! recording leaves the files exactly as they were.

use crate::arn::ArnTemplate;
use crate::canonicalize::to_canonical_json;
use crate::generations::GenerationRegistry;
use crate::identifiers::IdentifierRegistry;
use crate::models::{Architecture, GenerationRecord, Result};
use crate::storage;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::info;

/// One published build of the component: what was deployed, for what.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    /// Version of the packaged component, e.g. `1.2.0`.
    pub component_version: String,

    /// Layer version assigned by the deployment.
    pub generation: u64,

    /// Interpreter versions the layer was built for, e.g. `3.11`.
    pub interpreter_versions: BTreeSet<String>,

    /// Architectures the layer was built for.
    pub architectures: BTreeSet<Architecture>,
}

impl Release {
    /// Creates a release built for every supported architecture.
    pub fn new<I, S>(component_version: impl Into<String>, generation: u64, interpreter_versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            component_version: component_version.into(),
            generation,
            interpreter_versions: interpreter_versions.into_iter().map(Into::into).collect(),
            architectures: Architecture::ALL.into_iter().collect(),
        }
    }

    /// Restricts the release to `architectures`.
    pub fn with_architectures(mut self, architectures: impl IntoIterator<Item = Architecture>) -> Self {
        self.architectures = architectures.into_iter().collect();
        self
    }
}

/// The identifier and generation registries, bound to their files.
///
/// # Example
///
/// ```rust,no_run
/// use layerdocs_registry::{ArnTemplate, LayerRegistry, Release};
///
/// let mut registry = LayerRegistry::open("data/arns.json", "data/layer-versions.json").unwrap();
/// let template = ArnTemplate::new("111111111111", "duckdb");
/// let regions = vec!["us-east-1".to_string()];
///
/// registry
///     .record_release(&Release::new("1.2.0", 5, ["3.11"]), &template, &regions)
///     .unwrap();
/// registry.save().unwrap();
/// ```
#[derive(Debug)]
pub struct LayerRegistry {
    arns_path: PathBuf,
    generations_path: PathBuf,
    identifiers: IdentifierRegistry,
    generations: GenerationRegistry,
}

impl LayerRegistry {
    /// Loads both registries.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Parse` naming the file if either registry
    /// exists but is malformed, and `RegistryError::Io` if it can't be read.
    pub fn open<P: AsRef<Path>, Q: AsRef<Path>>(arns_path: P, generations_path: Q) -> Result<Self> {
        let arns_path = arns_path.as_ref().to_path_buf();
        let generations_path = generations_path.as_ref().to_path_buf();

        let identifiers: IdentifierRegistry = storage::load_or_default(&arns_path)?;
        let generations: GenerationRegistry = storage::load_or_default(&generations_path)?;

        info!(
            "Loaded registry: {} component versions with identifiers, {} with generations",
            identifiers.len(),
            generations.len()
        );

        Ok(LayerRegistry {
            arns_path,
            generations_path,
            identifiers,
            generations,
        })
    }

    /// The identifier registry.
    pub fn identifiers(&self) -> &IdentifierRegistry {
        &self.identifiers
    }

    /// The generation registry.
    pub fn generations(&self) -> &GenerationRegistry {
        &self.generations
    }

    /// Path of the identifier registry file.
    pub fn arns_path(&self) -> &Path {
        &self.arns_path
    }

    /// Path of the generation registry file.
    pub fn generations_path(&self) -> &Path {
        &self.generations_path
    }

    /// Merges `release` into both registries in memory.
    ///
    /// Identifiers are recorded first because that step validates every
    /// input; the generation record is only written once it succeeded.
    ///
    /// # Returns
    ///
    /// The number of identifiers written.
    pub fn record_release(
        &mut self,
        release: &Release,
        template: &ArnTemplate,
        regions: &[String],
    ) -> Result<usize> {
        let written = self.identifiers.record_identifiers(
            &release.component_version,
            &release.interpreter_versions,
            &release.architectures,
            regions,
            template,
            release.generation,
        )?;
        self.generations
            .record_generation(&release.component_version, release.generation)?;

        info!(
            "Recorded component version {} as generation {} ({} identifiers)",
            release.component_version, release.generation, written
        );
        Ok(written)
    }

    /// The latest generation across all component versions.
    pub fn latest_generation(&self) -> Result<(&str, &GenerationRecord)> {
        self.generations.latest_generation()
    }

    /// Writes both registries back to their files.
    ///
    /// Both files are replaced together: if either cannot be written, both
    /// keep their previous content.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Serialization` if a registry cannot be encoded
    /// and `RegistryError::Io` naming the file that could not be written.
    pub fn save(&self) -> Result<()> {
        let identifiers = to_canonical_json(&self.identifiers, IdentifierRegistry::INDENT)?;
        let generations = to_canonical_json(&self.generations, GenerationRegistry::INDENT)?;

        storage::write_all_atomic(&[
            (self.arns_path.as_path(), identifiers.as_bytes()),
            (self.generations_path.as_path(), generations.as_bytes()),
        ])?;
        info!(
            "Saved registry to {} and {}",
            self.arns_path.display(),
            self.generations_path.display()
        );
        Ok(())
    }
}
