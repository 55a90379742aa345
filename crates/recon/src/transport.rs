use semtui_protocol::{
    ExtenderInfo, ExtensionPayload, ExtensionResponse, MatchResult, ReconciliationPayload, ReconciliatorInfo,
    ResourceId, TableDocument, UpdatePayload,
};

use crate::error::TransportError;

/// Backend round-trips needed by the merge operations.
///
/// Implemented over HTTP by `semtui-hub-client`; tests use in-memory fakes.
pub trait Transport {
    fn fetch_table(&self, dataset_id: &ResourceId, table_id: &ResourceId) -> Result<TableDocument, TransportError>;

    fn fetch_reconciliator_list(&self) -> Result<Vec<ReconciliatorInfo>, TransportError>;

    fn fetch_extender_list(&self) -> Result<Vec<ExtenderInfo>, TransportError>;

    fn post_reconciliation(
        &self,
        relative_url: &str,
        payload: &ReconciliationPayload,
    ) -> Result<Vec<MatchResult>, TransportError>;

    fn post_extension(
        &self,
        relative_url: &str,
        payload: &ExtensionPayload,
    ) -> Result<ExtensionResponse, TransportError>;

    /// Returns the backend's response body as-is.
    fn put_table_update(
        &self,
        dataset_id: &ResourceId,
        table_id: &ResourceId,
        payload: &UpdatePayload<'_>,
    ) -> Result<serde_json::Value, TransportError>;
}
