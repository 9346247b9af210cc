//! # Layer ARN Templates
//!
//! Identifiers are never looked up from a cloud provider. They are computed
//! from the deployment inputs by two fixed textual templates:
//!
//! | Template | Shape |
//! |----------|-------|
//! | Per interpreter | `arn:aws:lambda:<region>:<account>:layer:<prefix>-python<digits>-<arch>:<generation>` |
//! | Latest | `arn:aws:lambda:<region>:<account>:layer:<prefix>-python-<arch>:<generation>` |
//!
//! `<digits>` is the interpreter version with its `.` separators removed
//! (`3.11` becomes `311`). Both functions are pure: identical inputs always
//! produce byte-identical strings.

use crate::models::Architecture;

/// Account and naming inputs shared by every identifier of one deployment.
///
/// # Example
///
/// ```rust
/// use layerdocs_registry::{ArnTemplate, Architecture};
///
/// let template = ArnTemplate::new("111111111111", "duckdb");
/// assert_eq!(
///     template.interpreter_layer("us-east-1", "3.11", Architecture::X86_64, 5),
///     "arn:aws:lambda:us-east-1:111111111111:layer:duckdb-python311-x86_64:5"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArnTemplate {
    account_id: String,
    name_prefix: String,
}

impl ArnTemplate {
    /// Creates a template for `account_id` with layer names starting with `name_prefix`.
    pub fn new(account_id: impl Into<String>, name_prefix: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            name_prefix: name_prefix.into(),
        }
    }

    /// Layer name for a specific interpreter version, e.g. `duckdb-python311-arm64`.
    pub fn interpreter_layer_name(&self, interpreter_version: &str, arch: Architecture) -> String {
        format!(
            "{}-python{}-{}",
            self.name_prefix,
            interpreter_digits(interpreter_version),
            arch
        )
    }

    /// Layer name of the interpreter-agnostic "latest" layer, e.g. `duckdb-python-x86_64`.
    pub fn latest_layer_name(&self, arch: Architecture) -> String {
        format!("{}-python-{}", self.name_prefix, arch)
    }

    /// ARN of the layer built for one interpreter version.
    pub fn interpreter_layer(
        &self,
        region: &str,
        interpreter_version: &str,
        arch: Architecture,
        generation: u64,
    ) -> String {
        self.layer_arn(region, &self.interpreter_layer_name(interpreter_version, arch), generation)
    }

    /// ARN of the "latest" layer for an architecture.
    pub fn latest_layer(&self, region: &str, arch: Architecture, generation: u64) -> String {
        self.layer_arn(region, &self.latest_layer_name(arch), generation)
    }

    fn layer_arn(&self, region: &str, layer_name: &str, generation: u64) -> String {
        format!(
            "arn:aws:lambda:{}:{}:layer:{}:{}",
            region, self.account_id, layer_name, generation
        )
    }
}

/// Strips version separators: `3.11` -> `311`.
pub fn interpreter_digits(interpreter_version: &str) -> String {
    interpreter_version.replace('.', "")
}
