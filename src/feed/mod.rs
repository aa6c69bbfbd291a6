//! Mock post feed reshaper.
//!
//! Reads the annotated CSV source, drops rows with unparseable timestamps,
//! sorts the rest most-recent-first, caps the slice, and synthesizes the
//! bracketed entity-tag string for each surviving row. Nothing here is
//! persisted; every request recomputes the whole transformation.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fallback tag string when a row has no populated attributes.
pub const NO_ENTITIES: &str = "No entities found";

const DISPLAY_FORMAT: &str = "%d %b %Y, %I:%M %p";

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed source not found: {0}")]
    SourceMissing(PathBuf),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// One row of the annotated source file. The five attribute columns may each
/// hold a comma-separated multi-value string.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedRow {
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "Text", default)]
    pub text: String,
    #[serde(rename = "Location", default)]
    pub location: String,
    #[serde(rename = "People", default)]
    pub people: String,
    #[serde(rename = "Organizations", default)]
    pub organizations: String,
    #[serde(rename = "Emergency Terms", default)]
    pub emergency_terms: String,
    #[serde(rename = "Resource Needs", default)]
    pub resource_needs: String,
}

/// Shape consumed by the client feed view.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MockPost {
    pub timestamp: String,
    #[serde(rename = "extractedPost")]
    pub extracted_post: String,
    #[serde(rename = "namedEntities")]
    pub named_entities: String,
}

/// Parse a source timestamp. The export pipeline has produced several formats
/// over time, so a few are accepted; anything else drops the row.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%m/%d/%Y %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    None
}

/// Build the concatenated "[Label: value]" tag string for one row.
///
/// Location is emitted whole since place names carry their own commas
/// ("Austin, TX"); the other attributes are split on commas into sub-values.
/// Sub-values are trimmed and empty ones skipped.
pub fn entity_tags(row: &FeedRow) -> String {
    let mut tags = String::new();

    let location = row.location.trim();
    if !location.is_empty() {
        tags.push_str(&format!("[Location: {}]", location));
    }

    let split_categories = [
        ("People", row.people.as_str()),
        ("Organization", row.organizations.as_str()),
        ("Emergency", row.emergency_terms.as_str()),
        ("Resource", row.resource_needs.as_str()),
    ];
    for (label, raw) in split_categories {
        for value in raw.split(',').map(str::trim).filter(|v| !v.is_empty()) {
            tags.push_str(&format!("[{}: {}]", label, value));
        }
    }

    tags
}

/// Load the source file and reshape it into at most `max_posts` entries,
/// most recent first.
pub fn load_posts(path: &Path, max_posts: usize) -> Result<Vec<MockPost>, FeedError> {
    if !path.exists() {
        return Err(FeedError::SourceMissing(path.to_path_buf()));
    }

    let mut reader = csv::Reader::from_path(path)?;
    let mut rows: Vec<(NaiveDateTime, FeedRow)> = Vec::new();
    for record in reader.deserialize::<FeedRow>() {
        let row = record?;
        // Rows whose timestamp fails to parse are excluded, not fatal
        if let Some(parsed) = parse_timestamp(&row.timestamp) {
            rows.push((parsed, row));
        }
    }

    rows.sort_by(|a, b| b.0.cmp(&a.0));
    rows.truncate(max_posts);

    Ok(rows
        .into_iter()
        .map(|(parsed, row)| {
            let tags = entity_tags(&row);
            MockPost {
                timestamp: parsed.format(DISPLAY_FORMAT).to_string(),
                extracted_post: row.text,
                named_entities: if tags.is_empty() {
                    NO_ENTITIES.to_string()
                } else {
                    tags
                },
            }
        })
        .collect())
}
