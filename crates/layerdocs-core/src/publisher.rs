//! The publisher facade.
//!
//! [`Publisher`] is the orchestrator: it feeds a release into the registries,
//! projects them into tables, and splices the tables into the document.

use crate::{
    config::LayerDocsConfig,
    projections::{
        arn_table, compatibility_rows, compatibility_table, generation_rows, generation_table,
        latest_arn_rows,
    },
    Result,
};

use layerdocs_docsync::{DocumentSync, SyncReport};
use layerdocs_registry::{ArnTemplate, GenerationRecord, LayerRegistry, Release};

use tracing::{debug, info};

/// Outcome of [`Publisher::publish`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    /// Number of identifiers written into the identifier registry.
    pub identifiers_recorded: usize,

    /// What the document sync did.
    pub document: SyncReport,
}

/// Records releases and keeps the document's tables in step with the registries.
///
/// # Pipeline
///
/// 1. Preflight: every anchor pair must be present in the document
/// 2. Record: merge the release into both registries and save them
/// 3. Sync: render every table and splice it into the document
///
/// A failed preflight leaves both registries and the document untouched.
///
/// # Example
///
/// ```rust,ignore
/// let publisher = Publisher::new(config)?;
/// let release = publisher.release("1.2.0", 5, ["3.11", "3.12"]);
///
/// let report = publisher.publish(&release)?;
/// println!("{} identifiers recorded", report.identifiers_recorded);
/// ```
#[derive(Debug, Clone)]
pub struct Publisher {
    config: LayerDocsConfig,
}

impl Publisher {
    /// Creates a publisher after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns `LayerDocsError::InvalidConfiguration` if the configuration is
    /// inconsistent. Missing deployment inputs are only reported by the
    /// operations that need them.
    pub fn new(config: LayerDocsConfig) -> Result<Self> {
        config.validate()?;
        info!(
            "Publisher initialized for '{}' layers ({} architectures)",
            config.layer.name_prefix,
            config.layer.architectures.len()
        );
        Ok(Self { config })
    }

    /// The configuration in use.
    pub fn config(&self) -> &LayerDocsConfig {
        &self.config
    }

    /// A release of `component_version` built for the configured architectures.
    pub fn release<I, S>(&self, component_version: &str, generation: u64, interpreter_versions: I) -> Release
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Release::new(component_version, generation, interpreter_versions)
            .with_architectures(self.config.layer.architectures.iter().copied())
    }

    /// Opens both registries at their configured paths.
    pub fn open_registry(&self) -> Result<LayerRegistry> {
        Ok(LayerRegistry::open(
            &self.config.paths.arns_file,
            &self.config.paths.generations_file,
        )?)
    }

    /// Merges `release` into the registries and saves them. The document is
    /// not touched.
    ///
    /// # Returns
    ///
    /// The number of identifiers written.
    ///
    /// # Errors
    ///
    /// Returns `LayerDocsError::MissingConfiguration` if the account id or the
    /// region list is absent, or a registry error.
    pub fn record(&self, release: &Release) -> Result<usize> {
        let template = self.template()?;
        let regions = self.config.regions()?;

        let mut registry = self.open_registry()?;
        let recorded = registry.record_release(release, &template, regions)?;
        registry.save()?;

        info!(
            "Recorded {} identifiers for {} (layer version {})",
            recorded, release.component_version, release.generation
        );
        Ok(recorded)
    }

    /// Re-renders every managed section of the document from the registries
    /// on disk.
    ///
    /// # Errors
    ///
    /// Returns `LayerDocsError::MissingConfiguration` if the account id or the
    /// region list is absent, a registry error (including `EmptyRegistry`
    /// when no generation was ever recorded), or a document error. The
    /// document is left untouched on any error.
    pub fn sync_document(&self) -> Result<SyncReport> {
        let registry = self.open_registry()?;
        let plan = self.document_plan(&registry)?;
        Ok(plan.sync_file(&self.config.paths.document)?)
    }

    /// Builds the ordered section plan for `registry`: generation mapping,
    /// compatibility, then one latest-ARN table per configured architecture.
    pub fn document_plan(&self, registry: &LayerRegistry) -> Result<DocumentSync> {
        let template = self.template()?;
        let regions = self.config.regions()?;
        let display_name = &self.config.layer.display_name;
        let anchors = &self.config.anchors;

        let mut plan = DocumentSync::new();
        plan.add_table(
            "mappings",
            anchors.mappings.clone(),
            &generation_table(&generation_rows(registry.generations()), display_name),
        );
        plan.add_table(
            "compatibility",
            anchors.compatibility.clone(),
            &compatibility_table(&compatibility_rows(registry.identifiers()), display_name),
        );

        for arch in &self.config.layer.architectures {
            let Some(pair) = anchors.latest.get(arch) else {
                continue;
            };
            let rows = latest_arn_rows(registry.generations(), &template, *arch, regions)?;
            plan.add_table(format!("latest-{arch}"), pair.clone(), &arn_table(&rows));
        }

        debug!("Document plan has {} sections", plan.sections().len());
        Ok(plan)
    }

    /// Verifies that the document exists and carries every anchor pair.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Io` if the document can't be read, or the first
    /// missing or misordered anchor, in section order.
    pub fn check_document(&self) -> Result<()> {
        let mut plan = DocumentSync::new();
        for (name, pair) in self.config.anchor_pairs() {
            plan.add_section(name, pair.clone(), "");
        }
        Ok(plan.check_file(&self.config.paths.document)?)
    }

    /// Records `release` and re-renders the document.
    ///
    /// The document's anchors are checked before anything is written, so a
    /// document missing a marker leaves the registries untouched too.
    ///
    /// # Errors
    ///
    /// Any error from [`check_document`](Self::check_document),
    /// [`record`](Self::record), or [`sync_document`](Self::sync_document).
    pub fn publish(&self, release: &Release) -> Result<PublishReport> {
        // Fail on deployment inputs before touching anything
        self.template()?;
        self.config.regions()?;
        self.check_document()?;

        let identifiers_recorded = self.record(release)?;
        let document = self.sync_document()?;

        info!(
            "Published {} (layer version {}); {} sections changed",
            release.component_version,
            release.generation,
            document.changed_sections().count()
        );
        Ok(PublishReport {
            identifiers_recorded,
            document,
        })
    }

    /// The component version with the highest recorded generation.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::EmptyRegistry` if nothing was recorded yet.
    pub fn latest(&self) -> Result<(String, GenerationRecord)> {
        let registry = self.open_registry()?;
        let (version, record) = registry.latest_generation()?;
        Ok((version.to_string(), record.clone()))
    }

    fn template(&self) -> Result<ArnTemplate> {
        Ok(ArnTemplate::new(
            self.config.account_id()?,
            self.config.layer.name_prefix.as_str(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LayerDocsError;

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = LayerDocsConfig::default();
        config.layer.architectures.clear();
        assert!(matches!(
            Publisher::new(config),
            Err(LayerDocsError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_release_uses_configured_architectures() {
        let mut config = LayerDocsConfig::default();
        config.layer.architectures = vec![layerdocs_registry::Architecture::Arm64];
        let publisher = Publisher::new(config).unwrap();

        let release = publisher.release("1.2.0", 5, ["3.11"]);
        assert_eq!(release.architectures.len(), 1);
        assert!(release
            .architectures
            .contains(&layerdocs_registry::Architecture::Arm64));
    }

    #[test]
    fn test_record_requires_account_id() {
        let publisher = Publisher::new(LayerDocsConfig::default()).unwrap();
        let release = publisher.release("1.2.0", 5, ["3.11"]);
        assert!(matches!(
            publisher.record(&release),
            Err(LayerDocsError::MissingConfiguration(_))
        ));
    }
}
