//! Column-level merges: context counts, the summary metadata entry and the
//! aggregated annotation of a column.

use indexmap::IndexMap;
use semtui_protocol::{
    AnnotationMeta, Column, ColumnKind, ColumnMetadata, ColumnStatus, ContextEntry, EntityName, ExtendedColumn,
    ExtensionResponse, MatchResult, ReconciliatorInfo, TableDocument, TypeRef, COLUMN_HEADER_ID,
};

use crate::cell::{add_extended_cell, infer_kind};
use crate::error::ReconError;
use crate::naming::format_column_metadata;
use crate::score::score_bounds;
use crate::services::find_reconciliator_by_prefix;

/// `{prefix: {uri, total, reconciliated}}` for one column.
///
/// `total` is the table's row count, `reconciliated` the number of cells of
/// the column whose annotation says `annotated: true`.
pub fn build_context(
    table: &TableDocument,
    column: &str,
    reconciliator: &ReconciliatorInfo,
) -> IndexMap<String, ContextEntry> {
    let reconciliated = table
        .column_cells(column)
        .filter(|(_, cell)| cell.annotation_meta.is_annotated())
        .count();
    let entry = ContextEntry {
        uri: reconciliator.uri.clone(),
        total: table.row_count() as u64,
        reconciliated: reconciliated as u64,
        ..Default::default()
    };
    IndexMap::from([(reconciliator.prefix.clone(), entry)])
}

/// The single column-level metadata entry written after reconciliation.
///
/// `entity` comes from the `column$index` result; `type` collects the first
/// type of every matched candidate of the cell results, first occurrence wins.
pub fn column_metadata_summary(results: &[MatchResult]) -> ColumnMetadata {
    let entity = results
        .iter()
        .find(|r| r.id == COLUMN_HEADER_ID)
        .map(|r| r.metadata.clone())
        .unwrap_or_default();
    let matched = !entity.iter().any(|c| c.match_ == Some(false));

    let mut types: Vec<TypeRef> = Vec::new();
    for result in results.iter().filter(|r| r.id != COLUMN_HEADER_ID) {
        for candidate in result.metadata.iter().filter(|c| c.is_match()) {
            if let Some(first) = candidate.types().first() {
                if !types.iter().any(|t| t.id == first.id) {
                    types.push(first.clone());
                }
            }
        }
    }

    ColumnMetadata {
        id: String::new(),
        match_: matched,
        score: 0.0,
        name: EntityName::linked("", ""),
        entity,
        property: Vec::new(),
        types,
        ..Default::default()
    }
}

/// Aggregate the annotations of every cell in `column`.
pub fn column_annotation_meta(table: &TableDocument, column: &str) -> AnnotationMeta {
    let mut scores = Vec::new();
    let mut all_match = true;
    for (_, cell) in table.column_cells(column) {
        let meta = &cell.annotation_meta;
        let Some(annotated) = meta.annotated else {
            log::warn!("cell '{}' has no 'annotated' flag, skipped in column aggregate", cell.id);
            continue;
        };
        let Some(matched) = meta.match_value() else {
            log::warn!("cell '{}' has no match value, skipped in column aggregate", cell.id);
            continue;
        };
        if annotated {
            let Some((lowest, highest)) = meta.score_bounds() else {
                log::warn!("cell '{}' is annotated without score bounds, skipped", cell.id);
                continue;
            };
            scores.push(Some(lowest));
            scores.push(Some(highest));
        }
        if !matched {
            all_match = false;
        }
    }

    if scores.is_empty() {
        return AnnotationMeta::scored(true, false, 0.0, 0.0);
    }
    let bounds = score_bounds(scores);
    AnnotationMeta::scored(true, all_match, bounds.lowest, bounds.highest)
}

/// Overwrite the reconciliation fields of `column` from freshly merged cells.
///
/// Expects [`update_metadata_cells`](crate::update_metadata_cells) to have
/// run with the same results.
pub fn update_metadata_column(
    table: &mut TableDocument,
    column: &str,
    reconciliator: &ReconciliatorInfo,
    results: &[MatchResult],
) -> Result<(), ReconError> {
    if table.column(column).is_none() {
        return Err(ReconError::UnknownColumn(column.to_string()));
    }
    let context = build_context(table, column, reconciliator);
    let summary = column_metadata_summary(results);
    let annotation = column_annotation_meta(table, column);

    let col = table
        .column_mut(column)
        .ok_or_else(|| ReconError::UnknownColumn(column.to_string()))?;
    col.status = ColumnStatus::Pending;
    col.kind = Some(ColumnKind::Entity);
    col.context = context;
    col.metadata = vec![summary];
    col.annotation_meta = annotation;
    Ok(())
}

/// Create (or replace) the column `name` after its cells were written.
///
/// Only entity columns get a context and an aggregated annotation. Table
/// shape counters are refreshed afterwards.
pub fn add_extended_column(
    table: &mut TableDocument,
    data: &ExtendedColumn,
    name: &str,
    kind: &ColumnKind,
    reconciliator: &ReconciliatorInfo,
) {
    let mut column = Column::new(name, ColumnStatus::Extended);
    column.kind = Some(kind.clone());
    column.metadata = data.metadata.clone();
    format_column_metadata(&mut column.metadata, &reconciliator.uri);
    column.extra = data.extra.clone();
    if *kind == ColumnKind::Entity {
        column.context = build_context(table, name, reconciliator);
        column.annotation_meta = column_annotation_meta(table, name);
    }
    table.columns.insert(name.to_string(), column);
    table.refresh_shape();
}

/// Merge every column of an extension response.
///
/// The i-th response column is stored under the i-th name. Every pairing
/// and origin lookup is checked before the table is touched. Returns the
/// names of the columns added, in response order.
pub fn add_extended_columns(
    table: &mut TableDocument,
    response: &ExtensionResponse,
    names: &[String],
    reconciliators: &[ReconciliatorInfo],
) -> Result<Vec<String>, ReconError> {
    let returned = response.columns.len();
    if names.len() < returned {
        return Err(ReconError::ColumnNameMismatch { returned, named: names.len() });
    }
    if names.len() > returned {
        log::warn!(
            "{} column name(s) given for {} extension column(s), extra names ignored",
            names.len(),
            returned
        );
    }

    let mut plan = Vec::with_capacity(returned);
    for ((key, data), name) in response.columns.iter().zip(names) {
        let source = response
            .meta
            .get(key)
            .ok_or_else(|| ReconError::MissingOrigin(key.clone()))?;
        let prefix = table
            .column(source)
            .ok_or_else(|| ReconError::UnknownColumn(source.clone()))?
            .reconciliator_prefix()
            .ok_or_else(|| ReconError::NotReconciled(source.clone()))?;
        let reconciliator = find_reconciliator_by_prefix(reconciliators, prefix)?;
        plan.push((name.as_str(), data, reconciliator));
    }

    let mut added = Vec::with_capacity(plan.len());
    for (name, data, reconciliator) in plan {
        let kind = infer_kind(data);
        let written = add_extended_cell(table, data, name, &kind, &reconciliator.uri);
        add_extended_column(table, data, name, &kind, reconciliator);
        log::debug!("extension column '{}' ({}) added with {} cell(s)", name, kind, written);
        added.push(name.to_string());
    }
    Ok(added)
}
