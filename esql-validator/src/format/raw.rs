//! Raw ES|QL input: the whole text is the query.

use crate::format::Extraction;

/// Take the whole input as the query. Raw text never skips or fails.
#[must_use]
pub fn extract(content: &str) -> Extraction {
    Extraction::Extracted(content.to_owned())
}
