use chrono::{DateTime, Utc};
use semtui_protocol::TableDocument;
use serde::Serialize;

use crate::cell::update_metadata_cells;
use crate::column::{add_extended_columns, update_metadata_column};
use crate::error::ReconError;
use crate::naming::format_match_results;
use crate::payload::{extension_payload, reconciliation_payload, update_payload};
use crate::services::{find_extender, find_reconciliator};
use crate::table::update_metadata_table;
use crate::transport::Transport;

/// Outcome of [`reconcile`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    pub column: String,
    pub reconciliator: String,
    pub cells_merged: usize,
    /// Cells of the column now annotated.
    pub reconciliated: u64,
    pub total: u64,
}

/// Outcome of [`extend_column`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendReport {
    pub columns: Vec<String>,
    pub n_cells_reconciliated: u64,
}

fn require_column(table: &TableDocument, column: &str) -> Result<(), ReconError> {
    match table.column(column) {
        Some(_) => Ok(()),
        None => Err(ReconError::UnknownColumn(column.to_string())),
    }
}

/// Reconcile `column` against the service `reconciliator_id`.
///
/// The merge runs on a copy of the document; `table` is only replaced once
/// every stage succeeded.
pub fn reconcile<T: Transport + ?Sized>(
    transport: &T,
    table: &mut TableDocument,
    column: &str,
    reconciliator_id: &str,
) -> Result<ReconcileReport, ReconError> {
    require_column(table, column)?;
    let reconciliators = transport.fetch_reconciliator_list()?;
    let reconciliator = find_reconciliator(&reconciliators, reconciliator_id)?;

    let payload = reconciliation_payload(table, column, &reconciliator.id)?;
    log::debug!("reconciling {} item(s) of '{}' with '{}'", payload.items.len(), column, reconciliator.id);
    let mut results = transport.post_reconciliation(&reconciliator.relative_url, &payload)?;
    let skipped = format_match_results(&mut results, &reconciliator.uri);
    if skipped > 0 {
        log::warn!("{} candidate(s) with malformed ids left unformatted", skipped);
    }

    let mut working = table.clone();
    let cells_merged = update_metadata_cells(&mut working, &results);
    update_metadata_column(&mut working, column, reconciliator, &results)?;
    update_metadata_table(&mut working);

    let (reconciliated, total) = working
        .column(column)
        .and_then(|c| c.context.get(&reconciliator.prefix))
        .map(|ctx| (ctx.reconciliated, ctx.total))
        .unwrap_or_default();
    *table = working;

    log::info!("column '{}' reconciled with '{}': {}/{} cells", column, reconciliator.id, reconciliated, total);
    Ok(ReconcileReport {
        column: column.to_string(),
        reconciliator: reconciliator.id.clone(),
        cells_merged,
        reconciliated,
        total,
    })
}

/// Extend the reconciled `column` with `properties` from `extender_id`,
/// storing the i-th returned column under the i-th of `new_columns`.
pub fn extend_column<T: Transport + ?Sized>(
    transport: &T,
    table: &mut TableDocument,
    column: &str,
    extender_id: &str,
    properties: &[String],
    new_columns: &[String],
) -> Result<ExtendReport, ReconError> {
    require_column(table, column)?;
    let extenders = transport.fetch_extender_list()?;
    let extender = find_extender(&extenders, extender_id)?;
    let reconciliators = transport.fetch_reconciliator_list()?;

    let payload = extension_payload(table, column, &extender.id, properties)?;
    let response = transport.post_extension(&extender.relative_url, &payload)?;

    let mut working = table.clone();
    let columns = add_extended_columns(&mut working, &response, new_columns, &reconciliators)?;
    update_metadata_table(&mut working);
    let n_cells_reconciliated = working.table.n_cells_reconciliated;
    *table = working;

    log::info!("column '{}' extended with '{}': {} new column(s)", column, extender.id, columns.len());
    Ok(ExtendReport { columns, n_cells_reconciliated })
}

/// Send the whole document back to the backend, stamped with `now`.
pub fn push_update<T: Transport + ?Sized>(
    transport: &T,
    table: &TableDocument,
    now: DateTime<Utc>,
) -> Result<serde_json::Value, ReconError> {
    let payload = update_payload(table, now);
    let body = transport.put_table_update(&table.table.id_dataset, &table.table.id, &payload)?;
    log::info!("table {} of dataset {} updated", table.table.id, table.table.id_dataset);
    Ok(body)
}
