use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::table::{Candidate, ColumnKind, ColumnMetadata};
use crate::Extra;

// ---------------------------------------------------------------------------
// Service descriptors
// ---------------------------------------------------------------------------

/// Entry of `GET reconciliators/list`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliatorInfo {
    pub id: String,
    /// Knowledge-graph base URI, joined with local entity ids.
    #[serde(default)]
    pub uri: String,
    /// Short prefix used in entity ids (`wd` in `wd:Q42`) and context keys.
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub name: String,
    pub relative_url: String,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Entry of `GET extenders/list`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtenderInfo {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub relative_url: String,
    #[serde(flatten)]
    pub extra: Extra,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// One item of a reconciliation response: candidates for a cell
/// (`<row>$<column>`) or for the column header (`column$index`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub id: String,
    #[serde(default)]
    pub metadata: Vec<Candidate>,
}

/// Extension response: new columns keyed by the extender's column key, and
/// `meta` mapping each key back to the source column it was derived from.
///
/// `columns` keeps the order the service sent; callers pair the i-th
/// column with the i-th requested name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionResponse {
    #[serde(default)]
    pub columns: IndexMap<String, ExtendedColumn>,
    #[serde(default)]
    pub meta: IndexMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExtendedColumn {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ColumnKind>,
    #[serde(default)]
    pub metadata: Vec<ColumnMetadata>,
    /// Row id → new cell content.
    #[serde(default)]
    pub cells: IndexMap<String, ExtendedCell>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExtendedCell {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub metadata: Vec<Candidate>,
    #[serde(flatten)]
    pub extra: Extra,
}
