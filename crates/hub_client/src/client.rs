//! SemTUI HTTP client.
//!
//! Blocking reqwest client (no Tokio runtime required). One instance per
//! configured backend; immutable once built.

use std::path::Path;

use semtui_config::Settings;
use semtui_protocol::{
    Collection, DatasetInfo, ExtenderInfo, ExtensionPayload, ExtensionResponse, MatchResult, ReconciliationPayload,
    ReconciliatorInfo, ResourceId, TableDocument, TableInfo, UpdatePayload,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::endpoint::join_url;

/// Error type for backend operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Connection, DNS, TLS or timeout failure
    #[error("Network error: {0}")]
    Network(String),
    /// Non-2xx response: status code and body
    #[error("HTTP {0}: {1}")]
    Http(u16, String),
    /// Response body is not the expected JSON
    #[error("Parse error: {0}")]
    Parse(String),
    /// Local file could not be read
    #[error("I/O error: {0}")]
    Io(String),
    /// HTTP client could not be constructed
    #[error("Client setup failed: {0}")]
    Build(String),
}

/// SemTUI backend client (blocking).
#[derive(Debug, Clone)]
pub struct SemTuiClient {
    http: reqwest::blocking::Client,
    api_base: String,
}

/// `GET dataset/<id>` answers with either the record or a one-item collection.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Collection<T>),
    One(T),
}

impl SemTuiClient {
    /// Create a client for the backend described by `settings`.
    pub fn new(settings: &Settings) -> Result<Self, ClientError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("semtui/{}", env!("CARGO_PKG_VERSION")))
            .timeout(settings.timeout())
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;

        Ok(Self {
            http,
            api_base: settings.api_base.clone(),
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn url(&self, segments: &[&str]) -> String {
        join_url(&self.api_base, segments)
    }

    // ── Datasets ────────────────────────────────────────────────────

    /// List every dataset on the backend.
    pub fn list_datasets(&self) -> Result<Vec<DatasetInfo>, ClientError> {
        // The list route is registered with its trailing slash.
        let url = format!("{}/", self.url(&["dataset"]));
        let list: Collection<DatasetInfo> = decode(self.get(&url)?)?;
        Ok(list.collection)
    }

    pub fn get_dataset(&self, dataset_id: &ResourceId) -> Result<DatasetInfo, ClientError> {
        let url = self.url(&["dataset", &dataset_id.to_string()]);
        match decode::<OneOrMany<DatasetInfo>>(self.get(&url)?)? {
            OneOrMany::One(info) => Ok(info),
            OneOrMany::Many(list) => list
                .collection
                .into_iter()
                .next()
                .ok_or_else(|| ClientError::Parse(format!("dataset {dataset_id}: empty collection"))),
        }
    }

    pub fn list_tables(&self, dataset_id: &ResourceId) -> Result<Vec<TableInfo>, ClientError> {
        let url = self.url(&["dataset", &dataset_id.to_string(), "table"]);
        let list: Collection<TableInfo> = decode(self.get(&url)?)?;
        Ok(list.collection)
    }

    // ── Tables ──────────────────────────────────────────────────────

    pub fn get_table(&self, dataset_id: &ResourceId, table_id: &ResourceId) -> Result<TableDocument, ClientError> {
        decode(self.get(&self.table_url(dataset_id, table_id))?)
    }

    /// Upload a CSV file as a new table of `dataset_id`. Returns the HTTP status.
    pub fn add_table(&self, dataset_id: &ResourceId, csv_path: &Path, name: &str) -> Result<u16, ClientError> {
        let url = self.url(&["dataset", &dataset_id.to_string(), "table"]);
        let form = reqwest::blocking::multipart::Form::new()
            .text("name", name.to_string())
            .file("file", csv_path)
            .map_err(|e| ClientError::Io(format!("{}: {}", csv_path.display(), e)))?;

        log::debug!("POST {} (multipart, {})", url, csv_path.display());
        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Ok(check(response)?.status().as_u16())
    }

    /// Replace a table with `payload`. Returns the response body; a non-JSON
    /// body comes back as a JSON string, an empty one as `null`.
    pub fn update_table(
        &self,
        dataset_id: &ResourceId,
        table_id: &ResourceId,
        payload: &UpdatePayload<'_>,
    ) -> Result<serde_json::Value, ClientError> {
        let url = self.table_url(dataset_id, table_id);
        log::debug!("PUT {}", url);
        let response = self
            .http
            .put(&url)
            .json(payload)
            .send()
            .map_err(|e| ClientError::Network(e.to_string()))?;
        let text = check(response)?
            .text()
            .map_err(|e| ClientError::Network(e.to_string()))?;
        if text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        Ok(serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text)))
    }

    fn table_url(&self, dataset_id: &ResourceId, table_id: &ResourceId) -> String {
        self.url(&["dataset", &dataset_id.to_string(), "table", &table_id.to_string()])
    }

    // ── Services ────────────────────────────────────────────────────

    pub fn reconciliator_list(&self) -> Result<Vec<ReconciliatorInfo>, ClientError> {
        decode(self.get(&self.url(&["reconciliators", "list"]))?)
    }

    pub fn extender_list(&self) -> Result<Vec<ExtenderInfo>, ClientError> {
        decode(self.get(&self.url(&["extenders", "list"]))?)
    }

    pub fn post_reconciliation(
        &self,
        relative_url: &str,
        payload: &ReconciliationPayload,
    ) -> Result<Vec<MatchResult>, ClientError> {
        decode(self.post_json(&self.url(&["reconciliators", relative_url]), payload)?)
    }

    pub fn post_extension(
        &self,
        relative_url: &str,
        payload: &ExtensionPayload,
    ) -> Result<ExtensionResponse, ClientError> {
        decode(self.post_json(&self.url(&["extenders", relative_url]), payload)?)
    }

    // ── Internal HTTP helpers ───────────────────────────────────────

    fn get(&self, url: &str) -> Result<reqwest::blocking::Response, ClientError> {
        log::debug!("GET {}", url);
        let response = self
            .http
            .get(url)
            .send()
            .map_err(|e| ClientError::Network(e.to_string()))?;
        check(response)
    }

    fn post_json<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<reqwest::blocking::Response, ClientError> {
        log::debug!("POST {}", url);
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .map_err(|e| ClientError::Network(e.to_string()))?;
        check(response)
    }
}

fn check(response: reqwest::blocking::Response) -> Result<reqwest::blocking::Response, ClientError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(ClientError::Http(status.as_u16(), body));
    }
    Ok(response)
}

fn decode<T: DeserializeOwned>(response: reqwest::blocking::Response) -> Result<T, ClientError> {
    response.json::<T>().map_err(|e| ClientError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(ClientError::Http(404, "no such table".into()).to_string(), "HTTP 404: no such table");
        assert_eq!(ClientError::Network("refused".into()).to_string(), "Network error: refused");
    }

    #[test]
    fn client_keeps_configured_base() {
        let settings = Settings { api_base: "http://semtui.local/api/".into(), timeout_secs: 5 };
        let client = SemTuiClient::new(&settings).unwrap();
        assert_eq!(client.api_base(), "http://semtui.local/api/");
        assert_eq!(client.url(&["dataset", "7", "table"]), "http://semtui.local/api/dataset/7/table");
    }
}
