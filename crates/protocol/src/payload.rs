//! Outbound request bodies.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::ids::ResourceId;
use crate::table::{Column, Row};

/// Body of `PUT dataset/<id>/table/<id>`.
///
/// Borrows columns and rows from the document it was built from.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePayload<'a> {
    pub table_instance: TableInstance,
    pub columns: IdIndex<'a, Column>,
    pub rows: IdIndex<'a, Row>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableInstance {
    pub id: ResourceId,
    pub id_dataset: ResourceId,
    pub name: String,
    pub n_cols: u64,
    pub n_rows: u64,
    pub n_cells: u64,
    pub n_cells_reconciliated: u64,
    pub last_modified_date: String,
}

/// Normalized collection: ordered ids plus the records keyed by id.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdIndex<'a, T> {
    pub all_ids: Vec<&'a str>,
    pub by_id: &'a IndexMap<String, T>,
}

impl<'a, T> IdIndex<'a, T> {
    pub fn new(by_id: &'a IndexMap<String, T>) -> Self {
        Self {
            all_ids: by_id.keys().map(String::as_str).collect(),
            by_id,
        }
    }
}

/// Body of `POST reconciliators/<relativeUrl>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationPayload {
    pub service_id: String,
    pub items: Vec<ReconciliationItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationItem {
    pub id: String,
    pub label: String,
}

/// Body of `POST extenders/<relativeUrl>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionPayload {
    pub service_id: String,
    /// Reconciled column name → row id → matched entity id.
    pub items: IndexMap<String, IndexMap<String, String>>,
    pub property: Vec<String>,
}
