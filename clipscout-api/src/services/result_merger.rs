//! Merge of video-search and metadata results
//!
//! The first list is kept whole and in order. Entries from the second list
//! are appended in order unless their normalized title (trimmed, lowercased)
//! has already been seen; the first occurrence wins. Both lists get the same
//! thumbnail normalization.

use std::collections::HashSet;

use crate::models::CandidateResult;

/// Thumbnail substituted for missing or malformed values
pub const PLACEHOLDER_THUMBNAIL: &str =
    "https://via.placeholder.com/500x750/cccccc/000000?text=No+Image";

/// Title key used for deduplication
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Missing, blank, or an unset upstream field rendered as text ("...None")
fn is_invalid_thumbnail(thumbnail: Option<&str>) -> bool {
    match thumbnail {
        None => true,
        Some(url) => url.trim().is_empty() || url.ends_with("None"),
    }
}

/// Replace an invalid thumbnail with the placeholder
pub fn normalize_thumbnail(candidate: &mut CandidateResult) {
    if is_invalid_thumbnail(candidate.thumbnail_url.as_deref()) {
        candidate.thumbnail_url = Some(PLACEHOLDER_THUMBNAIL.to_string());
    }
}

/// Combine two candidate lists into one deduplicated sequence
pub fn merge_results(
    primary: Vec<CandidateResult>,
    secondary: Vec<CandidateResult>,
) -> Vec<CandidateResult> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut merged = Vec::with_capacity(primary.len() + secondary.len());

    for mut candidate in primary {
        normalize_thumbnail(&mut candidate);
        if !candidate.title.is_empty() {
            seen.insert(normalize_title(&candidate.title));
        }
        merged.push(candidate);
    }

    for mut candidate in secondary {
        if candidate.title.is_empty() {
            continue;
        }
        if !seen.insert(normalize_title(&candidate.title)) {
            tracing::debug!(title = %candidate.title, "Dropping duplicate title");
            continue;
        }
        normalize_thumbnail(&mut candidate);
        merged.push(candidate);
    }

    merged
}
