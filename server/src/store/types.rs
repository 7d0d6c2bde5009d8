//! Remote store wire types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// One namespace in a listing
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NamespaceSummary {
    pub id: String,
}

/// A single page of namespaces
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct NamespaceList {
    #[serde(default)]
    pub namespaces: Vec<NamespaceSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// Namespace metadata document, including the raw schema
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NamespaceMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approx_row_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approx_logical_bytes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
}

/// One result row: an id plus arbitrary attribute columns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Row {
    pub id: Value,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// The store's query response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub rows: Vec<Row>,
}

/// Parameters for a namespace listing call
#[derive(Debug, Clone, Default)]
pub struct ListNamespacesParams {
    pub prefix: Option<String>,
    pub cursor: Option<String>,
    pub page_size: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn namespace_list_parses_with_and_without_cursor() {
        let list: NamespaceList = serde_json::from_value(json!({
            "namespaces": [{"id": "products"}, {"id": "reviews"}],
            "next_cursor": "abc",
        }))
        .unwrap();
        assert_eq!(list.namespaces.len(), 2);
        assert_eq!(list.next_cursor.as_deref(), Some("abc"));

        let list: NamespaceList = serde_json::from_value(json!({"namespaces": []})).unwrap();
        assert!(list.namespaces.is_empty());
        assert!(list.next_cursor.is_none());
    }

    #[test]
    fn metadata_fields_are_all_optional() {
        let meta: NamespaceMetadata = serde_json::from_value(json!({})).unwrap();
        assert!(meta.schema.is_none());
        assert!(meta.created_at.is_none());

        let meta: NamespaceMetadata = serde_json::from_value(json!({
            "created_at": "2026-01-15T10:30:00Z",
            "approx_row_count": 120000,
            "approx_logical_bytes": 734003200u64,
            "schema": {"name": {"type": "string"}},
        }))
        .unwrap();
        assert_eq!(meta.approx_row_count, Some(120000));
        assert!(meta.schema.is_some());
    }

    #[test]
    fn rows_keep_arbitrary_attributes() {
        let response: QueryResponse = serde_json::from_value(json!({
            "rows": [
                {"id": 1, "name": "ada", "age": 36},
                {"id": "doc-2", "name": "grace"},
            ],
        }))
        .unwrap();
        assert_eq!(response.rows.len(), 2);
        assert_eq!(response.rows[0].attributes["age"], json!(36));
        assert_eq!(response.rows[1].id, json!("doc-2"));
    }
}
