//! # Document Synchronization
//!
//! A [`DocumentSync`] is an ordered list of sections, each an anchor pair
//! plus the freshly rendered content that belongs between its markers.
//! Sections are applied in the order they were added, never in the order
//! their markers happen to appear in the text.
//!
//! ## Guarantees
//!
//! - **Isolation**: bytes outside every anchor pair are never modified.
//! - **Idempotence**: applying the same sections twice yields the same
//!   document as applying them once.
//! - **All or nothing**: every section is located and spliced in memory
//!   before the file is touched. A missing marker aborts the whole sync and
//!   leaves the file as it was.

use crate::anchor::{find_anchor_span, splice_region, AnchorPair};
use crate::error::{Result, SyncError};
use crate::table::Table;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Renders `table` and splices it between `anchors` in `document`.
///
/// # Errors
///
/// Returns `SyncError::AnchorNotFound` if either marker is missing.
///
/// # Example
///
/// ```rust
/// use layerdocs_docsync::{update_table, AnchorPair, Table};
///
/// let mut table = Table::new(["Region", "Layer ARN"]);
/// table.push_row(["us-east-1", "arn:aws:lambda:us-east-1:1:layer:x:1"]);
///
/// let doc = "# Layers\n<!--S-->\n<!--E-->\nfooter\n";
/// let updated = update_table(doc, &AnchorPair::new("<!--S-->", "<!--E-->"), &table).unwrap();
///
/// assert!(updated.starts_with("# Layers\n<!--S-->\n| Region | Layer ARN |\n"));
/// assert!(updated.ends_with("<!--E-->\nfooter\n"));
/// assert_eq!(update_table(&updated, &AnchorPair::new("<!--S-->", "<!--E-->"), &table).unwrap(), updated);
/// ```
pub fn update_table(document: &str, anchors: &AnchorPair, table: &Table) -> Result<String> {
    update_section(document, anchors, &table.render())
}

/// Splices already-rendered `content` between `anchors` in `document`.
pub fn update_section(document: &str, anchors: &AnchorPair, content: &str) -> Result<String> {
    let span = find_anchor_span(document, anchors)?;
    splice_region(document, span, content)
}

/// One named, machine-owned region of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Name used in logs and reports.
    pub name: String,

    /// Markers delimiting the region.
    pub anchors: AnchorPair,

    /// Rendered content for the region.
    pub content: String,
}

/// Whether applying a section changed the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionOutcome {
    /// Section name.
    pub name: String,

    /// True if the region's content differed from the rendered content.
    pub changed: bool,
}

/// Result of synchronizing a document file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// The document that was synchronized.
    pub path: PathBuf,

    /// Per-section outcome, in application order.
    pub sections: Vec<SectionOutcome>,

    /// True if the file was rewritten.
    pub written: bool,
}

impl SyncReport {
    /// Names of the sections whose content changed.
    pub fn changed_sections(&self) -> impl Iterator<Item = &str> {
        self.sections
            .iter()
            .filter(|s| s.changed)
            .map(|s| s.name.as_str())
    }
}

/// An ordered set of sections to write into one document.
#[derive(Debug, Clone, Default)]
pub struct DocumentSync {
    sections: Vec<Section>,
}

impl DocumentSync {
    /// Creates an empty sync plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a section with pre-rendered content.
    pub fn add_section(
        &mut self,
        name: impl Into<String>,
        anchors: AnchorPair,
        content: impl Into<String>,
    ) -> &mut Self {
        self.sections.push(Section {
            name: name.into(),
            anchors,
            content: content.into(),
        });
        self
    }

    /// Adds a section rendered from `table`.
    pub fn add_table(&mut self, name: impl Into<String>, anchors: AnchorPair, table: &Table) -> &mut Self {
        self.add_section(name, anchors, table.render())
    }

    /// Sections in application order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Verifies that every section's markers are present and ordered.
    ///
    /// # Errors
    ///
    /// The first `SyncError::AnchorNotFound` or
    /// `SyncError::AnchorsOutOfOrder` encountered, in section order.
    pub fn check(&self, document: &str) -> Result<()> {
        for section in &self.sections {
            find_anchor_span(document, &section.anchors)?;
            debug!("Anchors for '{}' present", section.name);
        }
        Ok(())
    }

    /// Reads the document at `path` and runs [`check`](Self::check) on it.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Io` naming the file if it can't be read, or the
    /// first anchor error.
    pub fn check_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.check(&read_document(path.as_ref())?)
    }

    /// Applies every section to `document` in order.
    ///
    /// # Returns
    ///
    /// The rewritten document and the per-section outcome.
    pub fn apply(&self, document: &str) -> Result<(String, Vec<SectionOutcome>)> {
        let mut current = document.to_string();
        let mut outcomes = Vec::with_capacity(self.sections.len());

        for section in &self.sections {
            let next = update_section(&current, &section.anchors, &section.content)?;
            let changed = next != current;
            debug!(
                "Section '{}' {}",
                section.name,
                if changed { "updated" } else { "unchanged" }
            );
            outcomes.push(SectionOutcome {
                name: section.name.clone(),
                changed,
            });
            current = next;
        }

        Ok((current, outcomes))
    }

    /// Reads the document at `path`, applies every section, and writes it
    /// back if anything changed.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Io` naming the file if it can't be read or
    /// written, or the first anchor error. On any error the file is left
    /// untouched.
    pub fn sync_file<P: AsRef<Path>>(&self, path: P) -> Result<SyncReport> {
        let path = path.as_ref();
        let document = read_document(path)?;

        let (updated, sections) = self.apply(&document)?;
        let written = updated != document;
        if written {
            write_document(path, &updated)?;
            info!(
                "Updated {} ({} of {} sections changed)",
                path.display(),
                sections.iter().filter(|s| s.changed).count(),
                sections.len()
            );
        } else {
            info!("{} already up to date", path.display());
        }

        Ok(SyncReport {
            path: path.to_path_buf(),
            sections,
            written,
        })
    }
}

fn read_document(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| SyncError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write_document(path: &Path, contents: &str) -> Result<()> {
    let io_err = |source| SyncError::Io {
        path: path.to_path_buf(),
        source,
    };
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    let temp_path = path.with_file_name(format!(".{name}.tmp"));

    fs::write(&temp_path, contents).map_err(io_err)?;
    fs::rename(&temp_path, path).map_err(io_err)?;
    Ok(())
}
