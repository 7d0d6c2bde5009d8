//! Namespace API request/response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use crate::core::constants::{DEFAULT_NAMESPACE_PAGE_SIZE, MAX_NAMESPACE_PAGE_SIZE};
use crate::query::filters::FilterCondition;
use crate::query::schema::{NamespaceSchema, ResolvedField};
use crate::query::{FullTextSearchSpec, OrderSpec};
use crate::store::NamespaceMetadata;
use crate::utils::json::lenient;

fn default_page_size() -> u32 {
    DEFAULT_NAMESPACE_PAGE_SIZE
}

/// Validator function for the page_size parameter
pub fn validate_page_size(page_size: u32) -> Result<(), validator::ValidationError> {
    if page_size == 0 || page_size > MAX_NAMESPACE_PAGE_SIZE {
        return Err(validator::ValidationError::new("page_size_range").with_message(
            format!(
                "page_size must be between 1 and {}",
                MAX_NAMESPACE_PAGE_SIZE
            )
            .into(),
        ));
    }
    Ok(())
}

/// Query parameters for the namespace listing
#[derive(Debug, Deserialize, Validate)]
pub struct ListNamespacesQuery {
    /// Only list namespaces whose id starts with this prefix
    #[validate(length(max = 128, message = "prefix must be at most 128 characters"))]
    pub prefix: Option<String>,
    /// Opaque cursor from a previous page
    pub cursor: Option<String>,
    #[serde(default = "default_page_size")]
    #[validate(custom(function = "validate_page_size"))]
    pub page_size: u32,
}

/// One schema field with its derived capabilities
#[derive(Debug, Serialize, ToSchema)]
pub struct FieldCapabilityDto {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub filterable: bool,
    pub full_text_search: bool,
}

impl From<&ResolvedField> for FieldCapabilityDto {
    fn from(field: &ResolvedField) -> Self {
        Self {
            name: field.name.clone(),
            field_type: field.field_type.to_string(),
            filterable: field.filterable,
            full_text_search: field.full_text_search,
        }
    }
}

/// Namespace detail: metadata, the raw schema, and the derived capabilities
#[derive(Debug, Serialize, ToSchema)]
pub struct NamespaceDetailDto {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approx_row_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approx_logical_bytes: Option<u64>,
    /// Raw schema document as returned by the store
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub schema: Option<Value>,
    /// Per-field capabilities derived from the schema
    pub fields: Vec<FieldCapabilityDto>,
    /// Attributes a query would display (vector fields excluded)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_attributes: Option<Vec<String>>,
}

impl NamespaceDetailDto {
    pub fn from_metadata(id: String, metadata: NamespaceMetadata) -> Self {
        let resolved = metadata.schema.as_ref().and_then(NamespaceSchema::from_value);
        let fields = resolved
            .as_ref()
            .map(|s| s.fields().iter().map(FieldCapabilityDto::from).collect())
            .unwrap_or_default();
        let include_attributes = resolved.as_ref().map(NamespaceSchema::include_attributes);

        Self {
            id,
            created_at: metadata.created_at,
            approx_row_count: metadata.approx_row_count,
            approx_logical_bytes: metadata.approx_logical_bytes,
            schema: metadata.schema,
            fields,
            include_attributes,
        }
    }
}

/// Query submission body
///
/// Every field is parsed leniently: malformed values (including JSON-encoded
/// strings that fail to parse, the shape a hidden-form round-trip produces)
/// degrade to the empty default instead of rejecting the request.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct QueryNamespaceRequest {
    #[serde(default, deserialize_with = "lenient")]
    #[schema(value_type = Vec<Object>)]
    pub filters: Vec<FilterCondition>,
    #[serde(default, deserialize_with = "lenient")]
    #[schema(value_type = Option<Object>)]
    pub order_by: Option<OrderSpec>,
    #[serde(default, deserialize_with = "lenient")]
    pub top_k: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    #[schema(value_type = Option<Object>)]
    pub full_text_search: Option<FullTextSearchSpec>,
}
