//! Version string ordering and display.
//!
//! Component and interpreter versions are stored as the caller wrote them
//! (`1.2.0`, `v1.10`, `3.11`). Ordering is semantic: each string is read as a
//! [`semver::Version`] after dropping a leading `v` and padding missing
//! minor/patch components with zeros, so `1.10` sorts after `1.9`. Strings
//! that still don't parse sort after every parseable version, by plain
//! string comparison.

use semver::Version;
use std::cmp::Ordering;

/// Reads a loosely written version string as a semantic version.
///
/// # Example
///
/// ```rust
/// use layerdocs_registry::version::parse_version;
///
/// assert_eq!(parse_version("v1.10").unwrap().to_string(), "1.10.0");
/// assert_eq!(parse_version("3.11").unwrap().to_string(), "3.11.0");
/// assert!(parse_version("nightly").is_none());
/// ```
pub fn parse_version(raw: &str) -> Option<Version> {
    let trimmed = raw.trim();
    let stripped = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);

    if let Ok(version) = Version::parse(stripped) {
        return Some(version);
    }

    let split = stripped.find(['-', '+']).unwrap_or(stripped.len());
    let (core, suffix) = stripped.split_at(split);
    let parts: Vec<&str> = core.split('.').collect();
    if parts.len() > 3
        || parts
            .iter()
            .any(|p| p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()))
    {
        return None;
    }

    let mut padded = parts.join(".");
    for _ in parts.len()..3 {
        padded.push_str(".0");
    }
    padded.push_str(suffix);
    Version::parse(&padded).ok()
}

/// Total order over version strings.
///
/// Parseable versions compare semantically, with the raw string as a
/// tie-break so `1.2` and `1.2.0` still have a stable order. Unparseable
/// strings come last.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    match (parse_version(a), parse_version(b)) {
        (Some(va), Some(vb)) => va.cmp(&vb).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Sorts version strings in place, ascending.
pub fn sort_versions<S: AsRef<str>>(versions: &mut [S]) {
    versions.sort_by(|a, b| compare_versions(a.as_ref(), b.as_ref()));
}

/// Normalizes a version for display so it carries exactly one leading `v`.
pub fn display_version(raw: &str) -> String {
    format!("v{}", raw.trim_start_matches('v'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_digit_components_sort_numerically() {
        let mut versions = vec!["1.9.0", "1.10.0", "1.2.0"];
        sort_versions(&mut versions);
        assert_eq!(versions, vec!["1.2.0", "1.9.0", "1.10.0"]);
    }

    #[test]
    fn test_v_prefix_is_ignored_for_ordering() {
        assert_eq!(compare_versions("v1.10", "v1.9"), Ordering::Greater);
        assert_eq!(compare_versions("v1.9.0", "1.10.0"), Ordering::Less);
    }

    #[test]
    fn test_interpreter_versions_sort_numerically() {
        let mut versions = vec!["3.12", "3.9", "3.10"];
        sort_versions(&mut versions);
        assert_eq!(versions, vec!["3.9", "3.10", "3.12"]);
    }

    #[test]
    fn test_prerelease_sorts_before_release() {
        assert_eq!(compare_versions("1.2.0-rc1", "1.2.0"), Ordering::Less);
        assert_eq!(compare_versions("1.2-rc1", "1.2"), Ordering::Less);
    }

    #[test]
    fn test_unparseable_versions_sort_last() {
        let mut versions = vec!["main", "0.9.0", "dev", "10.0"];
        sort_versions(&mut versions);
        assert_eq!(versions, vec!["0.9.0", "10.0", "dev", "main"]);
    }

    #[test]
    fn test_display_version() {
        assert_eq!(display_version("1.2.0"), "v1.2.0");
        assert_eq!(display_version("v1.2.0"), "v1.2.0");
        assert_eq!(display_version("vv1.2.0"), "v1.2.0");
    }
}
