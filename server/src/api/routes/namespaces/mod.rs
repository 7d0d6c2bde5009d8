//! Namespace API endpoints
//!
//! Listing, metadata/schema inspection, and query submission against the
//! remote store.

pub mod types;

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::extractors::{NamespacePath, ValidatedQuery};
use crate::api::types::ApiError;
use crate::query::filters::FilterModel;
use crate::query::schema::NamespaceSchema;
use crate::query::{ResultLimit, compile_query};
use crate::store::{ListNamespacesParams, NamespaceList, QueryResponse, StoreClient};

use types::{ListNamespacesQuery, NamespaceDetailDto, QueryNamespaceRequest};

/// Shared state for Namespace API endpoints
#[derive(Clone)]
pub struct NamespacesApiState {
    pub store: Arc<StoreClient>,
    /// Log compiled query requests before dispatch
    pub debug: bool,
}

/// Build Namespace API routes
pub fn routes(store: Arc<StoreClient>, debug: bool) -> Router<()> {
    let state = NamespacesApiState { store, debug };

    Router::new()
        .route("/", get(list_namespaces))
        .route("/{namespace_id}", get(get_namespace))
        .route("/{namespace_id}/query", post(query_namespace))
        .with_state(state)
}

/// List namespaces (single page; the cursor is surfaced, not followed)
#[utoipa::path(
    get,
    path = "/api/v1/namespaces",
    tag = "namespaces",
    params(
        ("prefix" = Option<String>, Query, description = "Only ids starting with this prefix"),
        ("cursor" = Option<String>, Query, description = "Opaque cursor from a previous page"),
        ("page_size" = Option<u32>, Query, description = "Page size (1-1000, default 100)")
    ),
    responses(
        (status = 200, description = "One page of namespaces", body = NamespaceList)
    )
)]
pub async fn list_namespaces(
    State(state): State<NamespacesApiState>,
    ValidatedQuery(query): ValidatedQuery<ListNamespacesQuery>,
) -> Result<Json<NamespaceList>, ApiError> {
    let params = ListNamespacesParams {
        prefix: query.prefix,
        cursor: query.cursor,
        page_size: Some(query.page_size),
    };

    let list = state
        .store
        .list_namespaces(&params)
        .await
        .map_err(ApiError::from_store)?;

    Ok(Json(list))
}

/// Get namespace metadata, raw schema, and derived field capabilities
#[utoipa::path(
    get,
    path = "/api/v1/namespaces/{namespace_id}",
    tag = "namespaces",
    params(
        ("namespace_id" = String, Path, description = "Namespace ID")
    ),
    responses(
        (status = 200, description = "Namespace details", body = NamespaceDetailDto),
        (status = 404, description = "Namespace not found")
    )
)]
pub async fn get_namespace(
    State(state): State<NamespacesApiState>,
    path: NamespacePath,
) -> Result<Json<NamespaceDetailDto>, ApiError> {
    let metadata = state
        .store
        .namespace_metadata(&path.namespace_id)
        .await
        .map_err(ApiError::from_store)?;

    Ok(Json(NamespaceDetailDto::from_metadata(
        path.namespace_id,
        metadata,
    )))
}

/// Compile and execute a query against a namespace
///
/// Fetches the namespace schema, compiles the submitted filter/order/limit
/// state into one store request, and returns the matching rows. Store
/// rejections surface as a plain-text message in the error envelope.
#[utoipa::path(
    post,
    path = "/api/v1/namespaces/{namespace_id}/query",
    tag = "namespaces",
    params(
        ("namespace_id" = String, Path, description = "Namespace ID")
    ),
    request_body = QueryNamespaceRequest,
    responses(
        (status = 200, description = "Rows matching the query"),
        (status = 404, description = "Namespace not found"),
        (status = 502, description = "Store rejected the query")
    )
)]
pub async fn query_namespace(
    State(state): State<NamespacesApiState>,
    path: NamespacePath,
    Json(body): Json<QueryNamespaceRequest>,
) -> Result<Json<QueryResponse>, ApiError> {
    let metadata = state
        .store
        .namespace_metadata(&path.namespace_id)
        .await
        .map_err(ApiError::from_store)?;
    let schema = metadata.schema.as_ref().and_then(NamespaceSchema::from_value);

    let model = FilterModel::from_conditions(body.filters);
    let top_k = body.top_k.map(ResultLimit::new).unwrap_or_default();

    let request = compile_query(
        &model,
        body.order_by.as_ref(),
        body.full_text_search.as_ref(),
        top_k,
        schema.as_ref(),
    );

    if state.debug {
        tracing::info!(
            namespace = %path.namespace_id,
            request = %serde_json::to_string(&request).unwrap_or_default(),
            "Compiled query request"
        );
    }

    let results = state
        .store
        .query(&path.namespace_id, &request)
        .await
        .map_err(ApiError::from_store)?;

    tracing::debug!(
        namespace = %path.namespace_id,
        rows = results.rows.len(),
        "Query completed"
    );

    Ok(Json(results))
}
