use serde::{Deserialize, Serialize};

/// Synthetic item id carrying the column header in a reconciliation request.
pub const COLUMN_HEADER_ID: &str = "column$index";

/// Dataset / table identifier. The backend sends numbers for some
/// deployments and strings for others; the original form is kept.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    Number(u64),
    Text(String),
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<u64> for ResourceId {
    fn from(n: u64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for ResourceId {
    fn from(s: &str) -> Self {
        match s.parse::<u64>() {
            Ok(n) => Self::Number(n),
            Err(_) => Self::Text(s.to_string()),
        }
    }
}

impl From<String> for ResourceId {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

/// Composite cell id: `<row>$<column>`.
pub fn cell_id(row: &str, column: &str) -> String {
    format!("{row}${column}")
}

/// Split a composite cell id at the first `$`.
pub fn split_cell_id(id: &str) -> Option<(&str, &str)> {
    id.split_once('$')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_id_joins_with_dollar() {
        assert_eq!(cell_id("r1", "citta"), "r1$citta");
    }

    #[test]
    fn split_cell_id_first_dollar() {
        assert_eq!(split_cell_id("r1$citta"), Some(("r1", "citta")));
        assert_eq!(split_cell_id(COLUMN_HEADER_ID), Some(("column", "index")));
        assert_eq!(split_cell_id("r1$a$b"), Some(("r1", "a$b")));
        assert_eq!(split_cell_id("nodollar"), None);
    }

    #[test]
    fn resource_id_keeps_wire_form() {
        let n: ResourceId = serde_json::from_str("29").unwrap();
        let s: ResourceId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(n, ResourceId::Number(29));
        assert_eq!(s, ResourceId::Text("abc".into()));
        assert_eq!(serde_json::to_string(&n).unwrap(), "29");
        assert_eq!(serde_json::to_string(&s).unwrap(), "\"abc\"");
    }

    #[test]
    fn resource_id_from_cli_argument() {
        assert_eq!(ResourceId::from("253"), ResourceId::Number(253));
        assert_eq!(ResourceId::from("t-1"), ResourceId::Text("t-1".into()));
        assert_eq!(ResourceId::from("253").to_string(), "253");
    }
}
