//! `semtui-recon`: merge engine for SemTUI table documents.
//!
//! Folds reconciliation and extension responses into a table document,
//! keeping cell, column and table annotations consistent. Network access goes
//! through the [`Transport`] trait; this crate does no IO of its own.

pub mod cell;
pub mod column;
pub mod engine;
pub mod error;
pub mod naming;
pub mod payload;
pub mod score;
pub mod services;
pub mod table;
pub mod transport;

pub use cell::{add_extended_cell, infer_kind, update_metadata_cells};
pub use column::{
    add_extended_column, add_extended_columns, build_context, column_annotation_meta, column_metadata_summary,
    update_metadata_column,
};
pub use engine::{extend_column, push_update, reconcile, ExtendReport, ReconcileReport};
pub use error::{ReconError, ServiceKind, TransportError};
pub use naming::{format_candidates, format_column_metadata, format_match_results, local_id, parse_name_field};
pub use payload::{extension_payload, format_last_modified, reconciliation_payload, update_payload};
pub use score::{candidate_bounds, cell_annotation, score_bounds, value_match, ScoreBounds, Scored};
pub use services::{find_extender, find_reconciliator, find_reconciliator_by_prefix};
pub use table::update_metadata_table;
pub use transport::Transport;
