//! SemTUI wire format.
//!
//! This crate defines the JSON shapes exchanged with a SemTUI backend:
//! the table document (`table` / `columns` / `rows`), reconciliator and
//! extender descriptors, reconciliation and extension responses, and the
//! three outbound request payloads.
//!
//! # Round trip
//!
//! The table document is fetched, mutated and sent back. Every record keeps
//! a flattened `extra` map so fields this crate does not model survive the
//! trip unchanged. Maps use [`IndexMap`] so column and row order is the
//! order the backend sent.
//!
//! # Usage
//!
//! ```ignore
//! use semtui_protocol::TableDocument;
//!
//! let doc: TableDocument = serde_json::from_str(&body)?;
//! for (row_id, cell) in doc.column_cells("citta") {
//!     println!("{row_id}: {}", cell.label);
//! }
//! ```

mod dataset;
mod ids;
mod lenient;
mod payload;
mod service;
mod table;

pub use dataset::{Collection, DatasetInfo, TableInfo};
pub use ids::{cell_id, split_cell_id, ResourceId, COLUMN_HEADER_ID};
pub use payload::{
    ExtensionPayload, IdIndex, ReconciliationItem, ReconciliationPayload, TableInstance,
    UpdatePayload,
};
pub use service::{
    ExtendedCell, ExtendedColumn, ExtenderInfo, ExtensionResponse, MatchResult, ReconciliatorInfo,
};
pub use table::{
    AnnotationMeta, Candidate, Cell, Column, ColumnKind, ColumnMetadata, ColumnStatus,
    ContextEntry, EntityName, LabelGrid, MatchFlag, Row, TableDocument, TableMeta, TypeRef,
};

pub use indexmap::IndexMap;

/// Catch-all for fields a record does not model explicitly.
pub type Extra = serde_json::Map<String, serde_json::Value>;
