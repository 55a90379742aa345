use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::ids::{cell_id, ResourceId};
use crate::lenient;
use crate::Extra;

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// A table as served by `GET dataset/<id>/table/<id>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDocument {
    pub table: TableMeta,
    #[serde(default)]
    pub columns: IndexMap<String, Column>,
    #[serde(default)]
    pub rows: IndexMap<String, Row>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Scalar table metadata (the `table` section).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableMeta {
    pub id: ResourceId,
    pub id_dataset: ResourceId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub n_cols: u64,
    #[serde(default)]
    pub n_rows: u64,
    #[serde(default)]
    pub n_cells: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub n_cells_reconciliated: u64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub min_meta_score: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub max_meta_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_date: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Header + label rows, the plain view of a table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelGrid {
    pub header: Vec<String>,
    pub rows: Vec<(String, Vec<String>)>,
}

impl TableDocument {
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.get_mut(name)
    }

    pub fn cell(&self, row: &str, column: &str) -> Option<&Cell> {
        self.rows.get(row)?.cells.get(column)
    }

    pub fn cell_mut(&mut self, row: &str, column: &str) -> Option<&mut Cell> {
        self.rows.get_mut(row)?.cells.get_mut(column)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Cells of one column in row order. Rows without the cell are skipped.
    pub fn column_cells<'a>(&'a self, column: &'a str) -> impl Iterator<Item = (&'a str, &'a Cell)> + 'a {
        self.rows
            .iter()
            .filter_map(move |(row_id, row)| row.cells.get(column).map(|c| (row_id.as_str(), c)))
    }

    /// Recompute `nRows`, `nCols` and `nCells` from the document.
    pub fn refresh_shape(&mut self) {
        self.table.n_rows = self.rows.len() as u64;
        self.table.n_cols = self.columns.len() as u64;
        self.table.n_cells = self.rows.values().map(|r| r.cells.len() as u64).sum();
    }

    /// Labels of every cell, one row per row id. Missing cells are empty.
    pub fn label_grid(&self) -> LabelGrid {
        let header: Vec<String> = self.columns.keys().cloned().collect();
        let rows = self
            .rows
            .iter()
            .map(|(key, row)| {
                let id = if row.id.is_empty() { key.clone() } else { row.id.clone() };
                let labels = header
                    .iter()
                    .map(|col| row.cells.get(col).map(|c| c.label.clone()).unwrap_or_default())
                    .collect();
                (id, labels)
            })
            .collect();
        LabelGrid { header, rows }
    }
}

// ---------------------------------------------------------------------------
// Columns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub status: ColumnStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ColumnKind>,
    #[serde(default)]
    pub metadata: Vec<ColumnMetadata>,
    #[serde(default, deserialize_with = "lenient::annotation_meta")]
    pub annotation_meta: AnnotationMeta,
    /// Reconciliator prefix → reconciliation counts.
    #[serde(default)]
    pub context: IndexMap<String, ContextEntry>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Column {
    /// A fresh column with no annotations.
    pub fn new(name: &str, status: ColumnStatus) -> Self {
        Self {
            id: name.to_string(),
            label: name.to_string(),
            status,
            kind: None,
            metadata: Vec::new(),
            annotation_meta: AnnotationMeta::default(),
            context: IndexMap::new(),
            extra: Extra::new(),
        }
    }

    /// Prefix of the reconciliator that annotated this column, if any.
    pub fn reconciliator_prefix(&self) -> Option<&str> {
        self.context.keys().next().map(String::as_str)
    }
}

/// Column lifecycle tag. Unknown tags are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColumnStatus {
    #[default]
    Empty,
    Pending,
    Reconciliated,
    Extended,
    Other(String),
}

impl ColumnStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Empty => "empty",
            Self::Pending => "pending",
            Self::Reconciliated => "reconciliated",
            Self::Extended => "extended",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for ColumnStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "empty" => Self::Empty,
            "pending" => Self::Pending,
            "reconciliated" => Self::Reconciliated,
            "extended" => Self::Extended,
            _ => Self::Other(s),
        }
    }
}

impl From<ColumnStatus> for String {
    fn from(status: ColumnStatus) -> Self {
        match status {
            ColumnStatus::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for ColumnStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a column holds knowledge-graph entities or plain literals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColumnKind {
    Entity,
    Literal,
    Other(String),
}

impl ColumnKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Entity => "entity",
            Self::Literal => "literal",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for ColumnKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "entity" => Self::Entity,
            "literal" => Self::Literal,
            _ => Self::Other(s),
        }
    }
}

impl From<ColumnKind> for String {
    fn from(kind: ColumnKind) -> Self {
        match kind {
            ColumnKind::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column-level summary entry (the single element of `column.metadata`
/// after reconciliation, or the extender's column metadata).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ColumnMetadata {
    #[serde(default)]
    pub id: String,
    #[serde(default, rename = "match", deserialize_with = "lenient::bool_or_false")]
    pub match_: bool,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub score: f64,
    #[serde(default)]
    pub name: EntityName,
    #[serde(default)]
    pub entity: Vec<Candidate>,
    #[serde(default)]
    pub property: Vec<Candidate>,
    #[serde(default, rename = "type")]
    pub types: Vec<TypeRef>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Per-reconciliator counts in `column.context`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContextEntry {
    #[serde(default)]
    pub uri: String,
    #[serde(default, deserialize_with = "lenient::count")]
    pub total: u64,
    #[serde(default, deserialize_with = "lenient::count")]
    pub reconciliated: u64,
    #[serde(flatten)]
    pub extra: Extra,
}

// ---------------------------------------------------------------------------
// Rows + cells
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub cells: IndexMap<String, Cell>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub metadata: Vec<Candidate>,
    #[serde(default, deserialize_with = "lenient::annotation_meta")]
    pub annotation_meta: AnnotationMeta,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Cell {
    /// A cell with a label and nothing else, id derived from its position.
    pub fn new(row: &str, column: &str, label: impl Into<String>) -> Self {
        Self {
            id: cell_id(row, column),
            label: label.into(),
            metadata: Vec::new(),
            annotation_meta: AnnotationMeta::default(),
            extra: Extra::new(),
        }
    }

    /// First candidate flagged as a match.
    pub fn matched_candidate(&self) -> Option<&Candidate> {
        self.metadata.iter().find(|c| c.is_match())
    }
}

// ---------------------------------------------------------------------------
// Annotations
// ---------------------------------------------------------------------------

/// Match status and score bounds of a cell, column or table.
///
/// Every field is optional: literal columns carry an empty `{}` block and
/// backends are not consistent about which fields they fill in.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationMeta {
    #[serde(default, deserialize_with = "lenient::opt_bool", skip_serializing_if = "Option::is_none")]
    pub annotated: Option<bool>,
    #[serde(default, rename = "match", deserialize_with = "lenient::match_flag", skip_serializing_if = "Option::is_none")]
    pub match_: Option<MatchFlag>,
    #[serde(default, deserialize_with = "lenient::opt_f64", skip_serializing_if = "Option::is_none")]
    pub lowest_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64", skip_serializing_if = "Option::is_none")]
    pub highest_score: Option<f64>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl AnnotationMeta {
    pub fn scored(annotated: bool, matched: bool, lowest: f64, highest: f64) -> Self {
        Self {
            annotated: Some(annotated),
            match_: Some(MatchFlag::new(matched)),
            lowest_score: Some(lowest),
            highest_score: Some(highest),
            extra: Extra::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.annotated.is_none()
            && self.match_.is_none()
            && self.lowest_score.is_none()
            && self.highest_score.is_none()
            && self.extra.is_empty()
    }

    pub fn is_annotated(&self) -> bool {
        self.annotated == Some(true)
    }

    pub fn match_value(&self) -> Option<bool> {
        self.match_.as_ref().and_then(|m| m.value)
    }

    /// `(lowestScore, highestScore)` when both are present.
    pub fn score_bounds(&self) -> Option<(f64, f64)> {
        Some((self.lowest_score?, self.highest_score?))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MatchFlag {
    #[serde(default, deserialize_with = "lenient::opt_bool", skip_serializing_if = "Option::is_none")]
    pub value: Option<bool>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl MatchFlag {
    pub fn new(value: bool) -> Self {
        Self { value: Some(value), extra: Extra::new() }
    }
}

// ---------------------------------------------------------------------------
// Candidates
// ---------------------------------------------------------------------------

/// A knowledge-graph entity proposed for a cell.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: EntityName,
    #[serde(default, deserialize_with = "lenient::opt_f64", skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, rename = "match", deserialize_with = "lenient::opt_bool", skip_serializing_if = "Option::is_none")]
    pub match_: Option<bool>,
    /// `None` when the service sent no `type` key; an empty list is kept.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<TypeRef>>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Candidate {
    pub fn is_match(&self) -> bool {
        self.match_ == Some(true)
    }

    pub fn types(&self) -> &[TypeRef] {
        self.types.as_deref().unwrap_or_default()
    }
}

/// Entity type attached to a candidate.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TypeRef {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: EntityName,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Display name of an entity: raw from a service, linked once formatted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityName {
    Linked { value: String, uri: String },
    Plain(String),
}

impl Default for EntityName {
    fn default() -> Self {
        Self::Plain(String::new())
    }
}

impl EntityName {
    pub fn linked(value: impl Into<String>, uri: impl Into<String>) -> Self {
        Self::Linked { value: value.into(), uri: uri.into() }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::Linked { value, .. } => value,
            Self::Plain(value) => value,
        }
    }

    pub fn uri(&self) -> Option<&str> {
        match self {
            Self::Linked { uri, .. } => Some(uri),
            Self::Plain(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> serde_json::Value {
        json!({
            "table": {
                "id": 253, "idDataset": 29, "name": "cities",
                "nCols": 2, "nRows": 2, "nCells": 4, "nCellsReconciliated": 0,
                "minMetaScore": 0, "maxMetaScore": 0,
                "lastModifiedDate": "2023/01/01T00:00:00Z",
                "owner": "alice"
            },
            "columns": {
                "citta": {
                    "id": "citta", "label": "citta", "status": "empty",
                    "context": {}, "metadata": [], "annotationMeta": {},
                    "width": 120
                },
                "pop": { "id": "pop", "label": "pop", "status": "archived" }
            },
            "rows": {
                "r1": { "id": "r1", "cells": {
                    "citta": { "id": "r1$citta", "label": "Milano", "metadata": [], "annotationMeta": {}, "editable": true },
                    "pop": { "id": "r1$pop", "label": "1352000" }
                }},
                "r0": { "id": "r0", "cells": {
                    "citta": { "id": "r0$citta", "label": "Roma" }
                }}
            }
        })
    }

    #[test]
    fn unknown_fields_survive_round_trip() {
        let doc: TableDocument = serde_json::from_value(sample()).unwrap();
        assert_eq!(doc.table.extra["owner"], "alice");
        assert_eq!(doc.columns["citta"].extra["width"], 120);
        assert_eq!(doc.rows["r1"].cells["citta"].extra["editable"], true);

        let back = serde_json::to_value(&doc).unwrap();
        assert_eq!(back["table"]["owner"], "alice");
        assert_eq!(back["columns"]["citta"]["width"], 120);
        assert_eq!(back["columns"]["pop"]["status"], "archived");
        assert_eq!(back["rows"]["r1"]["cells"]["citta"]["editable"], true);
    }

    #[test]
    fn row_order_is_backend_order() {
        let doc: TableDocument = serde_json::from_value(sample()).unwrap();
        let ids: Vec<&str> = doc.rows.keys().map(String::as_str).collect();
        assert_eq!(ids, ["r1", "r0"]);
    }

    #[test]
    fn unknown_status_kept_verbatim() {
        let doc: TableDocument = serde_json::from_value(sample()).unwrap();
        assert_eq!(doc.columns["pop"].status, ColumnStatus::Other("archived".into()));
        assert_eq!(doc.columns["citta"].status, ColumnStatus::Empty);
    }

    #[test]
    fn empty_annotation_meta_serializes_as_empty_object() {
        let doc: TableDocument = serde_json::from_value(sample()).unwrap();
        let cell = &doc.rows["r0"].cells["citta"];
        assert!(cell.annotation_meta.is_empty());
        let json = serde_json::to_value(cell).unwrap();
        assert_eq!(json["annotationMeta"], json!({}));
    }

    #[test]
    fn annotation_meta_accessors() {
        let meta = AnnotationMeta::scored(true, false, 0.2, 0.8);
        assert!(meta.is_annotated());
        assert_eq!(meta.match_value(), Some(false));
        assert_eq!(meta.score_bounds(), Some((0.2, 0.8)));
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(
            json,
            json!({"annotated": true, "match": {"value": false}, "lowestScore": 0.2, "highestScore": 0.8})
        );
    }

    #[test]
    fn entity_name_plain_or_linked() {
        let plain: EntityName = serde_json::from_value(json!("Paris")).unwrap();
        let linked: EntityName =
            serde_json::from_value(json!({"value": "Paris", "uri": "http://kg.example/Q90"})).unwrap();
        assert_eq!(plain.value(), "Paris");
        assert_eq!(plain.uri(), None);
        assert_eq!(linked.value(), "Paris");
        assert_eq!(linked.uri(), Some("http://kg.example/Q90"));
    }

    #[test]
    fn candidate_type_field_renamed() {
        let c: Candidate = serde_json::from_value(json!({
            "id": "wd:Q490", "name": "Milan", "score": 0.97, "match": true,
            "type": [{"id": "wd:Q515", "name": "city"}]
        }))
        .unwrap();
        assert!(c.is_match());
        assert_eq!(c.types()[0].id, "wd:Q515");
        assert_eq!(c.types()[0].name.value(), "city");
    }

    #[test]
    fn empty_type_list_survives_round_trip() {
        let c: Candidate = serde_json::from_value(json!({"id": "wd:Q490", "name": "Milan", "type": []})).unwrap();
        assert!(c.types().is_empty());
        let back = serde_json::to_value(&c).unwrap();
        assert_eq!(back["type"], json!([]));

        let bare: Candidate = serde_json::from_value(json!({"id": "wd:Q490", "name": "Milan"})).unwrap();
        let back = serde_json::to_value(&bare).unwrap();
        assert!(back.get("type").is_none());
    }

    #[test]
    fn malformed_annotation_fields_do_not_reject_the_document() {
        let mut raw = sample();
        raw["columns"]["citta"]["context"] = json!({
            "wd": {"uri": "https://www.wikidata.org/wiki/", "total": "3", "reconciliated": "1"},
            "geo": {"uri": "http://www.geonames.org/", "total": 2, "reconciliated": "lots"}
        });
        raw["columns"]["citta"]["annotationMeta"] = json!(null);
        raw["columns"]["citta"]["metadata"] = json!([{"id": "wd:Q1", "match": "yes", "score": "0.4"}]);
        raw["rows"]["r1"]["cells"]["citta"]["annotationMeta"] =
            json!({"annotated": true, "match": true, "lowestScore": "0.1", "highestScore": [0.9]});
        raw["rows"]["r1"]["cells"]["pop"]["annotationMeta"] = json!(null);
        raw["rows"]["r0"]["cells"]["citta"]["annotationMeta"] = json!("annotated");
        raw["rows"]["r0"]["cells"]["citta"]["metadata"] = json!([{"id": "wd:Q220", "score": "high", "match": true}]);

        let doc: TableDocument = serde_json::from_value(raw).unwrap();

        let col = &doc.columns["citta"];
        assert!(col.annotation_meta.is_empty());
        assert_eq!(col.context["wd"].total, 3);
        assert_eq!(col.context["wd"].reconciliated, 1);
        assert_eq!(col.context["geo"].reconciliated, 0);
        assert!(!col.metadata[0].match_);
        assert_eq!(col.metadata[0].score, 0.4);

        let milano = &doc.rows["r1"].cells["citta"].annotation_meta;
        assert!(milano.is_annotated());
        assert_eq!(milano.match_value(), Some(true));
        assert_eq!(milano.lowest_score, Some(0.1));
        assert_eq!(milano.highest_score, None);
        assert_eq!(milano.score_bounds(), None);

        assert!(doc.rows["r1"].cells["pop"].annotation_meta.is_empty());
        let roma = &doc.rows["r0"].cells["citta"];
        assert!(roma.annotation_meta.is_empty());
        assert_eq!(roma.metadata[0].score, None);
        assert!(roma.metadata[0].is_match());
    }

    #[test]
    fn match_block_accepts_object_or_bool() {
        let object: AnnotationMeta = serde_json::from_value(json!({"match": {"value": false}})).unwrap();
        let bare: AnnotationMeta = serde_json::from_value(json!({"match": "true"})).unwrap();
        let junk: AnnotationMeta = serde_json::from_value(json!({"match": {"value": 7}})).unwrap();
        assert_eq!(object.match_value(), Some(false));
        assert_eq!(bare.match_value(), Some(true));
        assert_eq!(junk.match_value(), None);
    }

    #[test]
    fn label_grid_fills_missing_cells() {
        let doc: TableDocument = serde_json::from_value(sample()).unwrap();
        let grid = doc.label_grid();
        assert_eq!(grid.header, ["citta", "pop"]);
        assert_eq!(grid.rows[0], ("r1".to_string(), vec!["Milano".to_string(), "1352000".to_string()]));
        assert_eq!(grid.rows[1], ("r0".to_string(), vec!["Roma".to_string(), String::new()]));
    }

    #[test]
    fn refresh_shape_counts_cells() {
        let mut doc: TableDocument = serde_json::from_value(sample()).unwrap();
        doc.table.n_cells = 99;
        doc.refresh_shape();
        assert_eq!(doc.table.n_rows, 2);
        assert_eq!(doc.table.n_cols, 2);
        assert_eq!(doc.table.n_cells, 3);
    }

    #[test]
    fn matched_candidate_first_wins() {
        let cell: Cell = serde_json::from_value(json!({
            "id": "r1$c1", "label": "x",
            "metadata": [
                {"id": "wd:Q1", "match": false},
                {"id": "wd:Q2", "match": true},
                {"id": "wd:Q3", "match": true}
            ]
        }))
        .unwrap();
        assert_eq!(cell.matched_candidate().map(|c| c.id.as_str()), Some("wd:Q2"));
    }
}
