use semtui_protocol::{
    ExtenderInfo, ExtensionPayload, ExtensionResponse, MatchResult, ReconciliationPayload, ReconciliatorInfo,
    ResourceId, TableDocument, UpdatePayload,
};
use semtui_recon::{Transport, TransportError};

use crate::client::{ClientError, SemTuiClient};

impl From<ClientError> for TransportError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Http(status, body) => TransportError::new(Some(status), body),
            other => TransportError::new(None, other.to_string()),
        }
    }
}

impl Transport for SemTuiClient {
    fn fetch_table(&self, dataset_id: &ResourceId, table_id: &ResourceId) -> Result<TableDocument, TransportError> {
        Ok(self.get_table(dataset_id, table_id)?)
    }

    fn fetch_reconciliator_list(&self) -> Result<Vec<ReconciliatorInfo>, TransportError> {
        Ok(self.reconciliator_list()?)
    }

    fn fetch_extender_list(&self) -> Result<Vec<ExtenderInfo>, TransportError> {
        Ok(self.extender_list()?)
    }

    fn post_reconciliation(
        &self,
        relative_url: &str,
        payload: &ReconciliationPayload,
    ) -> Result<Vec<MatchResult>, TransportError> {
        Ok(SemTuiClient::post_reconciliation(self, relative_url, payload)?)
    }

    fn post_extension(
        &self,
        relative_url: &str,
        payload: &ExtensionPayload,
    ) -> Result<ExtensionResponse, TransportError> {
        Ok(SemTuiClient::post_extension(self, relative_url, payload)?)
    }

    fn put_table_update(
        &self,
        dataset_id: &ResourceId,
        table_id: &ResourceId,
        payload: &UpdatePayload<'_>,
    ) -> Result<serde_json::Value, TransportError> {
        Ok(self.update_table(dataset_id, table_id, payload)?)
    }
}
