//! # Layer Registry - Published Layer Identifiers
//!
//! The layer registry keeps a canonical, version-controlled record of every
//! layer ARN published for every release of a packaged runtime component.
//! It never talks to a cloud provider: identifiers are computed from the
//! deployment inputs by fixed templates and recorded.
//!
//! ## Purpose
//!
//! This crate implements four capabilities:
//!
//! 1. **Identifier Registry** - component version → interpreter version →
//!    architecture → region → ARN, merged non-destructively.
//!
//! 2. **Generation Registry** - component version → layer version and
//!    timestamp, with a numeric "latest generation" query.
//!
//! 3. **Canonical JSON** - sorted keys at every level and fixed indentation,
//!    so unchanged registries produce byte-identical files.
//!
//! 4. **File Storage** - load-or-initialize reads and temp-file-and-rename
//!    writes.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        LAYER REGISTRY                           │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │   ┌──────────────┐     record      ┌────────────────────────┐   │
//! │   │   Release    │ ──────────────▶ │   IdentifierRegistry   │   │
//! │   │              │        │        │  ver → py → arch → rgn │   │
//! │   └──────────────┘        │        └────────────────────────┘   │
//! │          │                │        ┌────────────────────────┐   │
//! │          │ ArnTemplate    └──────▶ │   GenerationRegistry   │   │
//! │          ▼                         │  ver → {gen, time}     │   │
//! │   ┌──────────────┐                 └────────────────────────┘   │
//! │   │  arn:aws:... │                             │                │
//! │   └──────────────┘                             ▼                │
//! │                                    ┌────────────────────────┐   │
//! │                                    │  Canonical JSON files  │   │
//! │                                    └────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use layerdocs_registry::{ArnTemplate, Architecture, GenerationRegistry, IdentifierRegistry};
//! use std::collections::BTreeSet;
//!
//! let template = ArnTemplate::new("111111111111", "duckdb");
//!
//! let mut generations = GenerationRegistry::default();
//! generations.record_generation("1.2.0", 5).unwrap();
//!
//! let mut identifiers = IdentifierRegistry::default();
//! identifiers
//!     .record_identifiers(
//!         "1.2.0",
//!         &BTreeSet::from(["3.11".to_string()]),
//!         &BTreeSet::from(Architecture::ALL),
//!         &["us-east-1".to_string()],
//!         &template,
//!         5,
//!     )
//!     .unwrap();
//!
//! let (version, latest) = generations.latest_generation().unwrap();
//! assert_eq!((version, latest.generation), ("1.2.0", 5));
//! ```

pub mod arn;
pub mod canonicalize;
pub mod generations;
pub mod identifiers;
pub mod models;
pub mod registry;
pub mod storage;
pub mod version;

pub use arn::ArnTemplate;
pub use generations::GenerationRegistry;
pub use identifiers::{ComponentEntry, IdentifierRegistry, InterpreterEntry, RegionMap};
pub use models::{Architecture, GenerationRecord, RegistryError, Result};
pub use registry::{LayerRegistry, Release};
