use serde::{Deserialize, Serialize};

use crate::ids::ResourceId;
use crate::Extra;

/// List envelope used by the dataset endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection<T> {
    #[serde(alias = "data")]
    pub collection: Vec<T>,
}

/// Entry of `GET dataset/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetInfo {
    pub id: ResourceId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub n_tables: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_date: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Entry of `GET dataset/<id>/table`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableInfo {
    pub id: ResourceId,
    pub id_dataset: ResourceId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub n_cols: u64,
    #[serde(default)]
    pub n_rows: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_date: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dataset_collection() {
        let list: Collection<DatasetInfo> = serde_json::from_value(json!({
            "collection": [
                {"id": 29, "name": "cities", "nTables": 3, "lastModifiedDate": "2023/05/02T10:00:00Z"},
                {"id": "30", "name": "museums", "nTables": 1}
            ]
        }))
        .unwrap();
        assert_eq!(list.collection.len(), 2);
        assert_eq!(list.collection[0].id, ResourceId::Number(29));
        assert_eq!(list.collection[1].id, ResourceId::Text("30".into()));
        assert_eq!(list.collection[1].last_modified_date, None);
    }

    #[test]
    fn data_envelope_alias() {
        let list: Collection<TableInfo> = serde_json::from_value(json!({
            "data": [{"id": 253, "idDataset": 29, "name": "t", "nCols": 4, "nRows": 10}]
        }))
        .unwrap();
        assert_eq!(list.collection[0].n_cols, 4);
    }
}
