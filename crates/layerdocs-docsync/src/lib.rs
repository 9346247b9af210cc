//! # Document Synchronizer
//!
//! Keeps machine-generated tables inside a hand-written markdown document up
//! to date. Each table lives between a pair of literal anchor markers; the
//! synchronizer owns the text strictly between them and never touches
//! anything else.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   render    ┌──────────────┐   splice   ┌──────────────┐
//! │    Table     │ ──────────▶ │   markdown   │ ─────────▶ │   Document   │
//! │ header, rows │             │    string    │            │  (anchors)   │
//! └──────────────┘             └──────────────┘            └──────────────┘
//!                                                                 ▲
//!                               find_anchor_span ─────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use layerdocs_docsync::{AnchorPair, DocumentSync, Table};
//!
//! let mut mappings = Table::new(["Layer version", "DuckDB version"]);
//! mappings.push_row(["5", "v1.2.0"]);
//!
//! let mut sync = DocumentSync::new();
//! sync.add_table("mappings", AnchorPair::named("MAPPINGS-LIST"), &mappings);
//!
//! let doc = "## Versions\n<!-- MAPPINGS-LIST:START -->\n<!-- MAPPINGS-LIST:END -->\n";
//! let (updated, _) = sync.apply(doc).unwrap();
//! assert!(updated.contains("| 5 | v1.2.0 |"));
//! ```

pub mod anchor;
pub mod error;
pub mod sync;
pub mod table;

pub use anchor::{duplicate_markers, find_anchor_span, splice_region, AnchorPair, AnchorSpan};
pub use error::{Result, SyncError};
pub use sync::{update_section, update_table, DocumentSync, Section, SectionOutcome, SyncReport};
pub use table::{render_table, Row, Table};
