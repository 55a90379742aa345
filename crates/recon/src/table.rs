use semtui_protocol::{ColumnStatus, TableDocument};

use crate::score::score_bounds;

/// Recompute the table-level score range and reconciled-cell count.
///
/// Scores come from every non-empty column annotated as such;
/// `nCellsReconciliated` is the sum of every context count of every column.
pub fn update_metadata_table(table: &mut TableDocument) {
    let mut scores = Vec::new();
    for (name, column) in &table.columns {
        if column.status == ColumnStatus::Empty || !column.annotation_meta.is_annotated() {
            continue;
        }
        match column.annotation_meta.score_bounds() {
            Some((lowest, highest)) => {
                scores.push(Some(lowest));
                scores.push(Some(highest));
            }
            None => log::warn!("column '{}' is annotated without score bounds, skipped", name),
        }
    }
    let bounds = score_bounds(scores);

    let reconciliated: u64 = table
        .columns
        .values()
        .flat_map(|c| c.context.values())
        .map(|ctx| ctx.reconciliated)
        .sum();

    table.table.min_meta_score = bounds.lowest;
    table.table.max_meta_score = bounds.highest;
    table.table.n_cells_reconciliated = reconciliated;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bounds_and_count_across_columns() {
        let mut t: TableDocument = serde_json::from_value(json!({
            "table": {"id": 1, "idDataset": 2, "name": "t", "nCellsReconciliated": 99},
            "columns": {
                "a": {"id": "a", "status": "pending",
                      "annotationMeta": {"annotated": true, "match": {"value": true}, "lowestScore": 0.4, "highestScore": 0.8},
                      "context": {"wd": {"uri": "u", "total": 3, "reconciliated": 2}}},
                "b": {"id": "b", "status": "extended",
                      "annotationMeta": {"annotated": true, "match": {"value": false}, "lowestScore": 0.2, "highestScore": 0.6},
                      "context": {"wd": {"uri": "u", "total": 3, "reconciliated": 1}, "geo": {"uri": "g", "total": 3, "reconciliated": 3}}},
                "c": {"id": "c", "status": "empty",
                      "annotationMeta": {"annotated": true, "lowestScore": 0.0, "highestScore": 1.0}},
                "d": {"id": "d", "status": "extended", "annotationMeta": {}},
                "e": {"id": "e", "status": "pending", "annotationMeta": {"annotated": true}}
            },
            "rows": {}
        }))
        .unwrap();
        update_metadata_table(&mut t);
        assert_eq!(t.table.min_meta_score, 0.2);
        assert_eq!(t.table.max_meta_score, 0.8);
        assert_eq!(t.table.n_cells_reconciliated, 6);
    }

    #[test]
    fn no_annotated_columns() {
        let mut t: TableDocument = serde_json::from_value(json!({
            "table": {"id": 1, "idDataset": 2, "minMetaScore": 0.5, "maxMetaScore": 0.9},
            "columns": {"a": {"id": "a", "status": "empty"}}
        }))
        .unwrap();
        update_metadata_table(&mut t);
        assert_eq!((t.table.min_meta_score, t.table.max_meta_score), (0.0, 0.0));
        assert_eq!(t.table.n_cells_reconciliated, 0);
    }

    #[test]
    fn loose_context_counts() {
        let mut t: TableDocument = serde_json::from_value(json!({
            "table": {"id": 1, "idDataset": 2, "name": "t", "nCellsReconciliated": "x"},
            "columns": {
                "a": {"id": "a", "status": "pending",
                      "annotationMeta": null,
                      "context": {"wd": {"uri": "u", "total": "3", "reconciliated": "2"},
                                  "geo": {"uri": "g", "total": 3, "reconciliated": "some"}}},
                "b": {"id": "b", "status": "pending",
                      "annotationMeta": {"annotated": true, "match": true, "lowestScore": "0.3", "highestScore": 0.7},
                      "context": {"wd": {"uri": "u", "total": 3, "reconciliated": null}}}
            },
            "rows": {}
        }))
        .unwrap();
        update_metadata_table(&mut t);
        assert_eq!(t.table.n_cells_reconciliated, 2);
        assert_eq!((t.table.min_meta_score, t.table.max_meta_score), (0.3, 0.7));
    }
}
