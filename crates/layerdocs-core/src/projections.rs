//! # Table Projections
//!
//! Read-only views over the registries, each producing rows in display
//! order. Nothing here touches the disk; the [`Publisher`](crate::Publisher)
//! turns the rows into [`Table`]s and hands them to the document sync.
//!
//! | Table | Source | Order |
//! |-------|--------|-------|
//! | Generation mapping | generation registry | generation, ascending |
//! | Compatibility | identifier registry | component version, semantic |
//! | Latest ARNs | latest generation | regions as configured |

use crate::Result;
use layerdocs_docsync::Table;
use layerdocs_registry::version::{compare_versions, display_version, sort_versions};
use layerdocs_registry::{Architecture, ArnTemplate, GenerationRegistry, IdentifierRegistry};

/// One row of the generation-to-version table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRow {
    /// Layer version.
    pub generation: u64,

    /// Component version with a single leading `v`.
    pub display_version: String,
}

/// One row of the compatibility table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompatibilityRow {
    /// Component version as recorded.
    pub component_version: String,

    /// Interpreter versions, version-ordered.
    pub interpreter_versions: Vec<String>,

    /// Architectures, ordered by name.
    pub architectures: Vec<Architecture>,
}

/// One row of a latest-ARN table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArnRow {
    /// Deployment region.
    pub region: String,

    /// Identifier of the latest layer in that region.
    pub arn: String,
}

/// Generation rows for every recorded component version, ascending by
/// generation. Equal generations fall back to version order.
pub fn generation_rows(generations: &GenerationRegistry) -> Vec<GenerationRow> {
    let mut entries: Vec<_> = generations.iter().collect();
    entries.sort_by(|(va, ra), (vb, rb)| {
        ra.generation
            .cmp(&rb.generation)
            .then_with(|| compare_versions(va, vb))
    });

    entries
        .into_iter()
        .map(|(version, record)| GenerationRow {
            generation: record.generation,
            display_version: display_version(version),
        })
        .collect()
}

/// Compatibility rows for every component version in the identifier
/// registry, in semantic version order (`1.9.0` before `1.10.0`).
pub fn compatibility_rows(identifiers: &IdentifierRegistry) -> Vec<CompatibilityRow> {
    let mut rows: Vec<CompatibilityRow> = identifiers
        .components()
        .map(|(version, entry)| {
            let mut interpreter_versions: Vec<String> =
                entry.interpreter_versions().map(str::to_string).collect();
            sort_versions(&mut interpreter_versions);

            // BTreeSet order is name order
            let architectures: Vec<Architecture> = entry.architectures().into_iter().collect();

            CompatibilityRow {
                component_version: version.to_string(),
                interpreter_versions,
                architectures,
            }
        })
        .collect();

    rows.sort_by(|a, b| compare_versions(&a.component_version, &b.component_version));
    rows
}

/// Latest-generation ARN rows for one architecture.
///
/// # Arguments
///
/// * `generations` - Source of the latest generation
/// * `template` - Account and layer naming
/// * `arch` - Architecture the table is for
/// * `regions` - Regions to list, kept in the given order
///
/// # Errors
///
/// Returns `RegistryError::EmptyRegistry` if no generation was ever recorded.
pub fn latest_arn_rows(
    generations: &GenerationRegistry,
    template: &ArnTemplate,
    arch: Architecture,
    regions: &[String],
) -> Result<Vec<ArnRow>> {
    let (_, latest) = generations.latest_generation()?;

    Ok(regions
        .iter()
        .map(|region| ArnRow {
            region: region.clone(),
            arn: template.latest_layer(region, arch, latest.generation),
        })
        .collect())
}

/// `| Layer version | <Name> version |` table.
pub fn generation_table(rows: &[GenerationRow], display_name: &str) -> Table {
    let mut table = Table::new(["Layer version".to_string(), format!("{display_name} version")]);
    for row in rows {
        table.push_row([row.generation.to_string(), row.display_version.clone()]);
    }
    table
}

/// `| <Name> version | Python versions | Architectures |` table.
pub fn compatibility_table(rows: &[CompatibilityRow], display_name: &str) -> Table {
    let mut table = Table::new([
        format!("{display_name} version"),
        "Python versions".to_string(),
        "Architectures".to_string(),
    ]);
    for row in rows {
        let architectures: Vec<&str> = row.architectures.iter().map(|a| a.as_str()).collect();
        table.push_row([
            row.component_version.clone(),
            row.interpreter_versions.join(", "),
            architectures.join(", "),
        ]);
    }
    table
}

/// `| Region | Layer ARN |` table.
pub fn arn_table(rows: &[ArnRow]) -> Table {
    let mut table = Table::new(["Region", "Layer ARN"]);
    for row in rows {
        table.push_row([row.region.as_str(), row.arn.as_str()]);
    }
    table
}
