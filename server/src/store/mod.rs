//! Remote store access

mod client;
pub mod error;
pub mod types;

pub use client::StoreClient;
pub use error::StoreError;
pub use types::{ListNamespacesParams, NamespaceList, NamespaceMetadata, QueryResponse, Row};
