//! # Anchor Markers
//!
//! An anchor pair is two literal strings, typically HTML comments, that
//! delimit a machine-owned region inside a hand-written document:
//!
//! ```text
//! Hand-written prose ...
//! <!-- MAPPINGS-LIST:START -->
//! (owned by the synchronizer, replaced wholesale)
//! <!-- MAPPINGS-LIST:END -->
//! ... more hand-written prose
//! ```
//!
//! Markers are matched literally. The first occurrence of the start marker
//! wins, and the end marker is the first occurrence after it. Documents are
//! expected to carry each marker once; a repeated marker is reported with a
//! warning rather than guessed around.

use crate::error::{Result, SyncError};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A start/end marker pair delimiting one owned region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorPair {
    /// Marker that opens the region.
    pub start: String,

    /// Marker that closes the region.
    pub end: String,
}

impl AnchorPair {
    /// Creates a pair from literal marker strings.
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Creates the conventional `<!-- NAME:START -->` / `<!-- NAME:END -->` pair.
    ///
    /// # Example
    ///
    /// ```rust
    /// use layerdocs_docsync::AnchorPair;
    ///
    /// let pair = AnchorPair::named("MAPPINGS-LIST");
    /// assert_eq!(pair.start, "<!-- MAPPINGS-LIST:START -->");
    /// assert_eq!(pair.end, "<!-- MAPPINGS-LIST:END -->");
    /// ```
    pub fn named(name: &str) -> Self {
        Self::new(
            format!("<!-- {name}:START -->"),
            format!("<!-- {name}:END -->"),
        )
    }

    /// Both markers, start first.
    pub fn markers(&self) -> [&str; 2] {
        [&self.start, &self.end]
    }
}

/// Byte offsets of the region strictly between a pair of markers.
///
/// `start` is the offset right after the start marker, `end` the offset of
/// the first byte of the end marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorSpan {
    /// First byte of the owned region.
    pub start: usize,

    /// One past the last byte of the owned region.
    pub end: usize,
}

/// Locates the owned region for `anchors` in `document`.
///
/// # Errors
///
/// Returns `SyncError::AnchorNotFound` naming the missing marker, or
/// `SyncError::AnchorsOutOfOrder` if the end marker only occurs before the
/// start marker.
///
/// # Example
///
/// ```rust
/// use layerdocs_docsync::{find_anchor_span, AnchorPair};
///
/// let doc = "A<!--S-->OLD<!--E-->B";
/// let span = find_anchor_span(doc, &AnchorPair::new("<!--S-->", "<!--E-->")).unwrap();
/// assert_eq!(&doc[span.start..span.end], "OLD");
/// ```
pub fn find_anchor_span(document: &str, anchors: &AnchorPair) -> Result<AnchorSpan> {
    let start_at = document
        .find(&anchors.start)
        .ok_or_else(|| SyncError::AnchorNotFound {
            marker: anchors.start.clone(),
        })?;
    let content_start = start_at + anchors.start.len();

    let end_at = match document[content_start..].find(&anchors.end) {
        Some(offset) => content_start + offset,
        None if document[..start_at].contains(&anchors.end) => {
            return Err(SyncError::AnchorsOutOfOrder {
                start: anchors.start.clone(),
                end: anchors.end.clone(),
            })
        }
        None => {
            return Err(SyncError::AnchorNotFound {
                marker: anchors.end.clone(),
            })
        }
    };

    for (marker, count) in duplicate_markers(document, anchors) {
        warn!(
            "Marker '{}' appears {} times in the document; using the first occurrence",
            marker, count
        );
    }

    Ok(AnchorSpan {
        start: content_start,
        end: end_at,
    })
}

/// Markers of `anchors` that occur more than once in `document`, with their
/// occurrence counts.
///
/// # Example
///
/// ```rust
/// use layerdocs_docsync::{duplicate_markers, AnchorPair};
///
/// let pair = AnchorPair::new("<!--S-->", "<!--E-->");
/// assert_eq!(duplicate_markers("<!--S--><!--E--><!--S-->", &pair), vec![("<!--S-->", 2)]);
/// ```
pub fn duplicate_markers<'a>(document: &str, anchors: &'a AnchorPair) -> Vec<(&'a str, usize)> {
    anchors
        .markers()
        .into_iter()
        .map(|marker| (marker, document.matches(marker).count()))
        .filter(|(_, count)| *count > 1)
        .collect()
}

/// Replaces the bytes in `span` with `new_content`.
///
/// The new content is always framed by exactly one line break on each side
/// (any line breaks it already starts or ends with are dropped), so the
/// markers stay on their own lines. Line breaks follow the document: if it
/// uses `\r\n` anywhere, the inserted text does too. Every byte outside
/// `span` is preserved.
///
/// # Errors
///
/// Returns `SyncError::InvalidSpan` if `span` is reversed, out of bounds, or
/// splits a UTF-8 character.
pub fn splice_region(document: &str, span: AnchorSpan, new_content: &str) -> Result<String> {
    let invalid = || SyncError::InvalidSpan {
        start: span.start,
        end: span.end,
        len: document.len(),
    };
    if span.start > span.end {
        return Err(invalid());
    }
    let before = document.get(..span.start).ok_or_else(invalid)?;
    let after = document.get(span.end..).ok_or_else(invalid)?;

    let newline = if document.contains("\r\n") { "\r\n" } else { "\n" };
    let body = new_content
        .trim_matches(|c| c == '\n' || c == '\r')
        .replace("\r\n", "\n");
    let body = if newline == "\n" {
        body
    } else {
        body.replace('\n', newline)
    };

    let mut out = String::with_capacity(before.len() + body.len() + after.len() + 4);
    out.push_str(before);
    out.push_str(newline);
    out.push_str(&body);
    out.push_str(newline);
    out.push_str(after);
    Ok(out)
}
