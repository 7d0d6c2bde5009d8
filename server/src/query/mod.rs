//! Query building core
//!
//! Pure, synchronous transforms between the browser's query-builder state and
//! the remote store's query API: filter conditions and their legality rules,
//! schema capability resolution, and compilation into the wire request.

pub mod compiler;
pub mod filters;
pub mod schema;

pub use compiler::{
    CompiledQueryRequest, FullTextSearchSpec, OrderDirection, OrderSpec, QueryFilters, RankBy,
    ResultLimit, compile_query,
};
pub use filters::{FilterCondition, FilterModel, FilterOperator, FilterValue, operators_for};
pub use schema::{FieldType, NamespaceSchema, ResolvedField};
