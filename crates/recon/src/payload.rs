//! Request bodies built from a table document.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use semtui_protocol::{
    cell_id, ExtensionPayload, IdIndex, ReconciliationItem, ReconciliationPayload, TableDocument, TableInstance, UpdatePayload,
    COLUMN_HEADER_ID,
};

use crate::error::ReconError;

/// Timestamp layout the backend stores in `lastModifiedDate`.
pub const LAST_MODIFIED_FORMAT: &str = "%Y/%m/%dT%H:%M:%SZ";

pub fn format_last_modified(now: DateTime<Utc>) -> String {
    now.format(LAST_MODIFIED_FORMAT).to_string()
}

/// Full table update, stamped with `now`.
pub fn update_payload(table: &TableDocument, now: DateTime<Utc>) -> UpdatePayload<'_> {
    let meta = &table.table;
    UpdatePayload {
        table_instance: TableInstance {
            id: meta.id.clone(),
            id_dataset: meta.id_dataset.clone(),
            name: meta.name.clone(),
            n_cols: meta.n_cols,
            n_rows: meta.n_rows,
            n_cells: meta.n_cells,
            n_cells_reconciliated: meta.n_cells_reconciliated,
            last_modified_date: format_last_modified(now),
        },
        columns: IdIndex::new(&table.columns),
        rows: IdIndex::new(&table.rows),
    }
}

/// Header item followed by one item per row holding a cell in `column`.
pub fn reconciliation_payload(
    table: &TableDocument,
    column: &str,
    service_id: &str,
) -> Result<ReconciliationPayload, ReconError> {
    if table.column(column).is_none() {
        return Err(ReconError::UnknownColumn(column.to_string()));
    }
    let mut items = vec![ReconciliationItem {
        id: COLUMN_HEADER_ID.to_string(),
        label: column.to_string(),
    }];
    for (row_id, row) in &table.rows {
        match row.cells.get(column) {
            Some(cell) => items.push(ReconciliationItem {
                id: cell_id(row_id, column),
                label: cell.label.clone(),
            }),
            None => log::warn!("row '{}' has no cell in column '{}', not sent", row_id, column),
        }
    }
    Ok(ReconciliationPayload { service_id: service_id.to_string(), items })
}

/// Matched entity ids of `column`, keyed by row, plus the properties to fetch.
///
/// Only cells whose annotation says `match: true` and that hold a matched
/// candidate are included; the first matched candidate wins.
pub fn extension_payload(
    table: &TableDocument,
    column: &str,
    extender_id: &str,
    properties: &[String],
) -> Result<ExtensionPayload, ReconError> {
    if table.column(column).is_none() {
        return Err(ReconError::UnknownColumn(column.to_string()));
    }
    let mut matched = IndexMap::new();
    for (row_id, cell) in table.column_cells(column) {
        if cell.annotation_meta.match_value() != Some(true) {
            continue;
        }
        if let Some(candidate) = cell.matched_candidate() {
            matched.insert(row_id.to_string(), candidate.id.clone());
        }
    }
    if matched.is_empty() {
        log::warn!("column '{}' has no matched cells to extend", column);
    }
    Ok(ExtensionPayload {
        service_id: extender_id.to_string(),
        items: IndexMap::from([(column.to_string(), matched)]),
        property: properties.to_vec(),
    })
}
