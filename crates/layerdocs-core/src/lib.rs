//! # Layerdocs Core
//!
//! Publishes layer releases: records their ARNs in the registries and keeps
//! the tables of a hand-written README in step with them.
//! Orchestrates the layer registry and the document synchronizer.
//!
//! ## Managed Tables
//!
//! | Section | Anchors | Rows |
//! |---------|---------|------|
//! | mappings | `MAPPINGS-LIST` | layer version -> component version |
//! | compatibility | `COMPATIBILITY-LIST` | component version -> interpreters, architectures |
//! | latest-x86_64 | `LATEST-x86_64` | region -> latest x86_64 ARN |
//! | latest-arm64 | `LATEST-arm64` | region -> latest arm64 ARN |
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        LAYERDOCS CORE                           │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │                    ┌─────────────────┐                          │
//! │                    │    Publisher    │  ← Facade                │
//! │                    └────────┬────────┘                          │
//! │                             │                                   │
//! │         ┌───────────────────┼───────────────────┐               │
//! │         ▼                   ▼                   ▼               │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐          │
//! │  │   Layer     │───▶│ Projections │───▶│  Document   │          │
//! │  │  Registry   │    │  (tables)   │    │    Sync     │          │
//! │  └─────────────┘    └─────────────┘    └─────────────┘          │
//! │                                                                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use layerdocs_core::{LayerDocsConfig, Publisher};
//!
//! let mut config = LayerDocsConfig::default();
//! config.deployment.account_id = Some("123456789012".into());
//! config.deployment.regions = vec!["us-east-1".into(), "eu-west-1".into()];
//!
//! let publisher = Publisher::new(config)?;
//! publisher.publish(&publisher.release("1.2.0", 5, ["3.11", "3.12"]))?;
//! ```
//!
//! ## Notes
//!
//! - Registries are saved only after the document's anchors were verified
//! - The document is written only when a section's content changed
//! - Region order in the ARN tables is the configured order

pub mod config;
mod error;
pub mod projections;
mod publisher;

pub use config::LayerDocsConfig;
pub use error::LayerDocsError;
pub use publisher::{PublishReport, Publisher};

// Re-export component types for convenience
pub use layerdocs_docsync::{AnchorPair, SyncReport};
pub use layerdocs_registry::{Architecture, GenerationRecord, Release};

/// Core result type for publisher operations.
pub type Result<T> = std::result::Result<T, LayerDocsError>;
