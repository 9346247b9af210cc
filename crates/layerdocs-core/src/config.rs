//! Configuration types for the layer documentation publisher.

use crate::error::LayerDocsError;
use crate::Result;
use layerdocs_docsync::AnchorPair;
use layerdocs_registry::Architecture;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Configuration for the publisher.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerDocsConfig {
    /// Where the registries and the document live.
    pub paths: PathsConfig,

    /// Layer naming and the architectures it is built for.
    pub layer: LayerConfig,

    /// Anchor markers of each document section.
    pub anchors: AnchorsConfig,

    /// Account and regions the layers are published to.
    pub deployment: DeploymentConfig,
}

/// File locations, relative to the working directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Identifier registry (component -> interpreter -> arch -> region -> ARN).
    pub arns_file: PathBuf,

    /// Generation registry (component -> layer version).
    pub generations_file: PathBuf,

    /// Document carrying the anchored tables.
    pub document: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            arns_file: PathBuf::from("data/arns.json"),
            generations_file: PathBuf::from("data/layer-versions.json"),
            document: PathBuf::from("README.md"),
        }
    }
}

/// Layer naming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerConfig {
    /// Prefix of every layer name, e.g. `duckdb` in `duckdb-python311-x86_64`.
    pub name_prefix: String,

    /// Component name used in table headers, e.g. `DuckDB version`.
    pub display_name: String,

    /// Architectures layers are built for, in document order.
    pub architectures: Vec<Architecture>,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            name_prefix: "duckdb".to_string(),
            display_name: "DuckDB".to_string(),
            architectures: Architecture::ALL.to_vec(),
        }
    }
}

/// Anchor markers for each managed document section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorsConfig {
    /// Generation-to-version table.
    pub mappings: AnchorPair,

    /// Compatibility table.
    pub compatibility: AnchorPair,

    /// Latest-ARN table, one per architecture.
    pub latest: BTreeMap<Architecture, AnchorPair>,
}

impl Default for AnchorsConfig {
    fn default() -> Self {
        Self {
            mappings: AnchorPair::named("MAPPINGS-LIST"),
            compatibility: AnchorPair::named("COMPATIBILITY-LIST"),
            latest: Architecture::ALL
                .into_iter()
                .map(|arch| (arch, AnchorPair::named(&format!("LATEST-{arch}"))))
                .collect(),
        }
    }
}

/// Deployment target. Usually supplied per run from flags or environment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploymentConfig {
    /// Account that owns the published layers.
    pub account_id: Option<String>,

    /// Regions the layers are published to, in document order.
    pub regions: Vec<String>,
}

impl LayerDocsConfig {
    /// Loads a configuration from a TOML file. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns `LayerDocsError::ConfigFile` if the file can't be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let config_err = |message: String| LayerDocsError::ConfigFile {
            path: path.to_path_buf(),
            message,
        };

        let text = std::fs::read_to_string(path).map_err(|e| config_err(e.to_string()))?;
        toml::from_str(&text).map_err(|e| config_err(e.to_string()))
    }

    /// Checks the static parts of the configuration.
    ///
    /// # Errors
    ///
    /// Returns `LayerDocsError::InvalidConfiguration` if the layer prefix is
    /// empty, no architecture is configured, an architecture has no anchor
    /// pair, or any two markers are empty, equal, or nested in each other.
    pub fn validate(&self) -> Result<()> {
        if self.layer.name_prefix.trim().is_empty() {
            return Err(LayerDocsError::InvalidConfiguration(
                "layer name prefix must not be empty".to_string(),
            ));
        }
        if self.layer.architectures.is_empty() {
            return Err(LayerDocsError::InvalidConfiguration(
                "at least one architecture is required".to_string(),
            ));
        }
        for arch in &self.layer.architectures {
            if !self.anchors.latest.contains_key(arch) {
                return Err(LayerDocsError::InvalidConfiguration(format!(
                    "no latest-table anchors configured for {arch}"
                )));
            }
        }

        let markers: Vec<&str> = self
            .anchor_pairs()
            .into_iter()
            .flat_map(|(_, pair)| pair.markers())
            .collect();
        for (i, marker) in markers.iter().enumerate() {
            if marker.is_empty() {
                return Err(LayerDocsError::InvalidConfiguration(
                    "anchor markers must not be empty".to_string(),
                ));
            }
            for other in &markers[i + 1..] {
                if marker.contains(other) || other.contains(marker) {
                    return Err(LayerDocsError::InvalidConfiguration(format!(
                        "anchor markers '{marker}' and '{other}' collide"
                    )));
                }
            }
        }
        Ok(())
    }

    /// The account id, or `MissingConfiguration` if absent or blank.
    pub fn account_id(&self) -> Result<&str> {
        self.deployment
            .account_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| LayerDocsError::MissingConfiguration("AWS account id".to_string()))
    }

    /// The region list, or `MissingConfiguration` if empty.
    pub fn regions(&self) -> Result<&[String]> {
        if self.deployment.regions.is_empty() {
            return Err(LayerDocsError::MissingConfiguration(
                "AWS regions".to_string(),
            ));
        }
        Ok(&self.deployment.regions)
    }

    /// Every managed section's name and anchors, in the order they are applied.
    ///
    /// Architectures without an anchor pair are skipped here; `validate`
    /// reports them.
    pub fn anchor_pairs(&self) -> Vec<(String, &AnchorPair)> {
        let mut pairs = vec![
            ("mappings".to_string(), &self.anchors.mappings),
            ("compatibility".to_string(), &self.anchors.compatibility),
        ];
        for arch in &self.layer.architectures {
            if let Some(pair) = self.anchors.latest.get(arch) {
                pairs.push((format!("latest-{arch}"), pair));
            }
        }
        pairs
    }
}

/// Splits a comma-separated list, trimming whitespace and dropping empty items.
///
/// # Example
///
/// ```rust
/// use layerdocs_core::config::split_list;
///
/// assert_eq!(split_list(" us-east-1, eu-west-1,,"), vec!["us-east-1", "eu-west-1"]);
/// ```
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LayerDocsConfig::default();
        assert_eq!(config.paths.arns_file, PathBuf::from("data/arns.json"));
        assert_eq!(config.layer.name_prefix, "duckdb");
        assert_eq!(
            config.layer.architectures,
            vec![Architecture::X86_64, Architecture::Arm64]
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_section_order() {
        let config = LayerDocsConfig::default();
        let names: Vec<_> = config.anchor_pairs().into_iter().map(|(n, _)| n).collect();
        assert_eq!(
            names,
            vec!["mappings", "compatibility", "latest-x86_64", "latest-arm64"]
        );
    }

    #[test]
    fn test_config_serialization() {
        let config = LayerDocsConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: LayerDocsConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_toml_takes_defaults() {
        let config: LayerDocsConfig = toml::from_str(
            r#"
            [layer]
            name_prefix = "polars"

            [deployment]
            regions = ["us-east-1"]

            [anchors.latest.arm64]
            start = "<!-- ARM:START -->"
            end = "<!-- ARM:END -->"
            "#,
        )
        .unwrap();

        assert_eq!(config.layer.name_prefix, "polars");
        assert_eq!(config.layer.display_name, "DuckDB");
        assert_eq!(config.deployment.regions, vec!["us-east-1"]);
        assert_eq!(config.anchors.latest[&Architecture::Arm64].start, "<!-- ARM:START -->");
        // Replacing the map drops the default x86_64 entry
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_colliding_markers_rejected() {
        let mut config = LayerDocsConfig::default();
        config.anchors.compatibility = config.anchors.mappings.clone();
        assert!(matches!(
            config.validate(),
            Err(LayerDocsError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_nested_markers_rejected() {
        let mut config = LayerDocsConfig::default();
        config.anchors.compatibility = AnchorPair::new("<!-- MAPPINGS-LIST", "<!-- C:END -->");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_deployment_inputs() {
        let mut config = LayerDocsConfig::default();
        assert!(matches!(
            config.account_id(),
            Err(LayerDocsError::MissingConfiguration(_))
        ));
        assert!(matches!(
            config.regions(),
            Err(LayerDocsError::MissingConfiguration(_))
        ));

        config.deployment.account_id = Some("   ".to_string());
        assert!(config.account_id().is_err());

        config.deployment.account_id = Some("111111111111".to_string());
        config.deployment.regions = vec!["us-east-1".to_string()];
        assert_eq!(config.account_id().unwrap(), "111111111111");
        assert_eq!(config.regions().unwrap(), ["us-east-1".to_string()]);
    }
}
