//! Cell-level merges: reconciliation candidates and extension cells.

use semtui_protocol::{
    split_cell_id, AnnotationMeta, Cell, ColumnKind, ExtendedColumn, MatchResult, TableDocument, COLUMN_HEADER_ID,
};

use crate::naming::format_candidates;
use crate::score::cell_annotation;

/// Replace the candidate list of every cell named by a match result and
/// recompute its annotation.
///
/// Results that do not resolve to an existing cell (the `column$index`
/// header result among them) are skipped. Returns the number of cells merged.
pub fn update_metadata_cells(table: &mut TableDocument, results: &[MatchResult]) -> usize {
    let mut merged = 0;
    for result in results {
        let Some((row, column)) = split_cell_id(&result.id) else {
            log::warn!("match result id '{}' is not a cell id, skipped", result.id);
            continue;
        };
        let Some(cell) = table.cell_mut(row, column) else {
            if result.id != COLUMN_HEADER_ID {
                log::warn!("match result '{}' has no cell in table, skipped", result.id);
            }
            continue;
        };
        cell.metadata = result.metadata.clone();
        cell.annotation_meta = cell_annotation(&cell.metadata);
        merged += 1;
    }
    log::debug!("merged {} of {} match results into cells", merged, results.len());
    merged
}

/// Kind of an extension column: the declared one, else `entity` when any
/// cell came back with candidates.
pub fn infer_kind(data: &ExtendedColumn) -> ColumnKind {
    if let Some(kind) = &data.kind {
        return kind.clone();
    }
    if data.cells.values().any(|c| !c.metadata.is_empty()) {
        ColumnKind::Entity
    } else {
        ColumnKind::Literal
    }
}

/// Write the cells of one extension column under `new_column`.
///
/// Rows missing from the table are skipped. Returns the number of cells
/// written.
pub fn add_extended_cell(
    table: &mut TableDocument,
    data: &ExtendedColumn,
    new_column: &str,
    kind: &ColumnKind,
    base_uri: &str,
) -> usize {
    let mut written = 0;
    for (row_id, ext) in &data.cells {
        let Some(row) = table.rows.get_mut(row_id) else {
            log::warn!("extension row '{}' not in table, skipped", row_id);
            continue;
        };
        let mut cell = Cell::new(row_id, new_column, ext.label.clone());
        cell.metadata = ext.metadata.clone();
        format_candidates(&mut cell.metadata, base_uri);
        cell.annotation_meta = match kind {
            ColumnKind::Entity => cell_annotation(&cell.metadata),
            _ => AnnotationMeta::default(),
        };
        cell.extra = ext.extra.clone();
        row.cells.insert(new_column.to_string(), cell);
        written += 1;
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table() -> TableDocument {
        serde_json::from_value(json!({
            "table": {"id": 1, "idDataset": 2, "name": "t"},
            "columns": {"c1": {"id": "c1", "label": "c1", "status": "empty"}},
            "rows": {
                "r1": {"id": "r1", "cells": {"c1": {"id": "r1$c1", "label": "Milano"}}},
                "r2": {"id": "r2", "cells": {"c1": {"id": "r2$c1", "label": "Roma"}}}
            }
        }))
        .unwrap()
    }

    fn results(value: serde_json::Value) -> Vec<MatchResult> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn single_matched_candidate() {
        let mut t = table();
        let n = update_metadata_cells(
            &mut t,
            &results(json!([{"id": "r1$c1", "metadata": [{"id": "wd:Q490", "score": 0.9, "match": true}]}])),
        );
        assert_eq!(n, 1);
        let meta = &t.cell("r1", "c1").unwrap().annotation_meta;
        assert_eq!(meta, &AnnotationMeta::scored(true, true, 0.9, 0.9));
        assert!(t.cell("r2", "c1").unwrap().annotation_meta.is_empty());
    }

    #[test]
    fn header_and_unknown_results_skipped() {
        let mut t = table();
        let before = t.clone();
        let n = update_metadata_cells(
            &mut t,
            &results(json!([
                {"id": "column$index", "metadata": [{"id": "wd:Q515", "match": true}]},
                {"id": "r9$c1", "metadata": []},
                {"id": "nodollar", "metadata": []}
            ])),
        );
        assert_eq!(n, 0);
        assert_eq!(t, before);
    }

    #[test]
    fn empty_metadata_not_annotated() {
        let mut t = table();
        update_metadata_cells(&mut t, &results(json!([{"id": "r2$c1", "metadata": []}])));
        let meta = &t.cell("r2", "c1").unwrap().annotation_meta;
        assert_eq!(meta, &AnnotationMeta::scored(false, false, 0.0, 0.0));
    }

    #[test]
    fn kind_inference() {
        let declared: ExtendedColumn = serde_json::from_value(json!({"kind": "literal", "cells": {
            "r1": {"label": "x", "metadata": [{"id": "wd:Q1"}]}
        }}))
        .unwrap();
        assert_eq!(infer_kind(&declared), ColumnKind::Literal);

        let with_meta: ExtendedColumn = serde_json::from_value(json!({"cells": {
            "r1": {"label": "x", "metadata": []},
            "r2": {"label": "y", "metadata": [{"id": "wd:Q1"}]}
        }}))
        .unwrap();
        assert_eq!(infer_kind(&with_meta), ColumnKind::Entity);

        let plain: ExtendedColumn = serde_json::from_value(json!({"cells": {"r1": {"label": "x"}}})).unwrap();
        assert_eq!(infer_kind(&plain), ColumnKind::Literal);
    }

    #[test]
    fn extended_entity_cells() {
        let mut t = table();
        let data: ExtendedColumn = serde_json::from_value(json!({"cells": {
            "r1": {"label": "Central European Time", "metadata": [
                {"id": "wd:Q25989", "name": "Central European Time", "score": 1.0, "match": true}
            ]},
            "r7": {"label": "ghost", "metadata": []}
        }}))
        .unwrap();
        let n = add_extended_cell(&mut t, &data, "time_zone", &ColumnKind::Entity, "https://www.wikidata.org/wiki/");
        assert_eq!(n, 1);
        let cell = t.cell("r1", "time_zone").unwrap();
        assert_eq!(cell.id, "r1$time_zone");
        assert_eq!(cell.metadata[0].name.uri(), Some("https://www.wikidata.org/wiki/Q25989"));
        assert_eq!(cell.annotation_meta, AnnotationMeta::scored(true, true, 1.0, 1.0));
        assert!(!t.rows.contains_key("r7"));
    }

    #[test]
    fn extended_literal_cells_have_empty_annotation() {
        let mut t = table();
        let data: ExtendedColumn = serde_json::from_value(json!({"cells": {
            "r2": {"label": "41.9,12.5"}
        }}))
        .unwrap();
        add_extended_cell(&mut t, &data, "geo", &ColumnKind::Literal, "");
        let cell = t.cell("r2", "geo").unwrap();
        assert_eq!(cell.label, "41.9,12.5");
        assert!(cell.annotation_meta.is_empty());
    }
}
