//! # Core Data Models for the Layer Registry
//!
//! This module defines the fundamental types shared by the identifier and
//! generation registries: the supported CPU architectures, the per-version
//! generation record, and the registry error type.
//!
//! ## Invariants
//!
//! - **Closed architecture set**: identifiers only exist for the architectures
//!   enumerated in [`Architecture`]. Anything else is rejected at parse time.
//! - **Integer generations**: generation numbers are `u64` everywhere, so they
//!   always compare numerically (`10 > 9`), never as strings.
//! - **Errors name their file**: every I/O or parse failure carries the path
//!   it happened on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// CPU architecture a layer is built for.
///
/// Variants are declared in lexicographic order of their wire names so that
/// the derived `Ord` matches the sorted order used in rendered tables.
///
/// # Example
///
/// ```rust
/// use layerdocs_registry::Architecture;
///
/// let arch: Architecture = "arm64".parse().unwrap();
/// assert_eq!(arch, Architecture::Arm64);
/// assert_eq!(Architecture::X86_64.as_str(), "x86_64");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Architecture {
    /// 64-bit ARM (Graviton). The secondary architecture.
    Arm64,

    /// 64-bit x86. The primary architecture.
    X86_64,
}

impl Architecture {
    /// Every supported architecture, primary first.
    pub const ALL: [Architecture; 2] = [Architecture::X86_64, Architecture::Arm64];

    /// Returns the wire name used in identifiers, registry keys and tables.
    pub fn as_str(&self) -> &'static str {
        match self {
            Architecture::Arm64 => "arm64",
            Architecture::X86_64 => "x86_64",
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Architecture {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "arm64" => Ok(Architecture::Arm64),
            "x86_64" => Ok(Architecture::X86_64),
            other => Err(RegistryError::UnknownArchitecture(other.to_string())),
        }
    }
}

// Hand-written so architectures also work as JSON object keys.
impl Serialize for Architecture {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Architecture {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// The deployment generation recorded for one component version.
///
/// On disk this is the `{"layer_version": .., "updated_at": ..}` object found
/// under each component version in the generation registry. Older files
/// stored `layer_version` as a string; both forms are accepted on read and
/// the number form is always written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRecord {
    /// Layer version number published for this component version.
    #[serde(rename = "layer_version", with = "generation_number")]
    pub generation: u64,

    /// When this record was last written.
    pub updated_at: DateTime<Utc>,
}

impl GenerationRecord {
    /// Creates a record for `generation` stamped with `updated_at`.
    pub fn new(generation: u64, updated_at: DateTime<Utc>) -> Self {
        Self {
            generation,
            updated_at,
        }
    }
}

/// Serde adapter accepting a generation as either a JSON number or a string
/// of digits.
mod generation_number {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(*value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(n),
            Raw::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| D::Error::custom(format!("invalid layer version {s:?}"))),
        }
    }
}

/// Errors that can occur during registry operations.
///
/// A registry file that does not exist is not an error: loading it yields
/// an empty registry. Everything below is fatal for the current run.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Reading or writing a registry file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File the operation targeted.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A registry file exists but is not a valid registry.
    #[error("Failed to parse registry file {}: {source}", path.display())]
    Parse {
        /// File that failed to parse.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Failed to serialize a registry.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A latest-generation query ran against a registry with no records.
    #[error("No layer versions found in the generation registry")]
    EmptyRegistry,

    /// An architecture name outside the supported set.
    #[error("Unknown architecture: {0}")]
    UnknownArchitecture(String),

    /// Caller-supplied input violated a registry invariant.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
