//! Remote contracts consumed by the list, scan and form components
//!
//! One implementation per entity kind. [`http::HttpResource`] speaks the
//! REST API; tests substitute in-memory fakes.

pub mod endpoints;
pub mod http;

use async_trait::async_trait;
use serde::Serialize;
use shared::{EntityId, ListQuery, Page, Region};

use crate::error::ConsoleResult;

pub use endpoints::{ApiResource, ScanEndpoint};
pub use http::{ApiClient, HttpResource, HttpRegions};

/// Paginated listing of one entity kind
#[async_trait]
pub trait ListSource<T>: Send + Sync {
    async fn list_page(&self, query: &ListQuery) -> ConsoleResult<Page<T>>;
}

/// Result of an exact-code lookup
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    One(T),
    /// Several records share the code; the user has to pick one
    Many(Vec<T>),
    NotFound,
}

impl<T> Lookup<T> {
    /// Classify a list response by how many rows matched
    pub fn from_rows(mut rows: Vec<T>) -> Self {
        match rows.len() {
            0 => Lookup::NotFound,
            1 => rows.pop().map_or(Lookup::NotFound, Lookup::One),
            _ => Lookup::Many(rows),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Lookup::NotFound)
    }
}

/// Exact lookup by scanned barcode or code
#[async_trait]
pub trait ExactLookup<T>: Send + Sync {
    /// Canonical form of a scanned code before it is sent
    fn normalize_code(&self, code: &str) -> String {
        code.trim().to_string()
    }

    async fn lookup_exact(&self, code: &str) -> ConsoleResult<Lookup<T>>;
}

/// Create, update and delete for one entity kind
#[async_trait]
pub trait Mutations<T>: Send + Sync {
    type Create: Serialize + Send + Sync;
    type Update: Serialize + Send + Sync;

    async fn create(&self, payload: &Self::Create) -> ConsoleResult<T>;

    async fn update(&self, id: EntityId, payload: &Self::Update) -> ConsoleResult<T>;

    async fn remove(&self, id: EntityId) -> ConsoleResult<()>;
}

/// Query snapshot for one option load
///
/// Built when the load is dispatched, so later typing cannot change what a
/// request in flight asks for.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OptionRequest {
    pub query: String,
    pub parent: Option<EntityId>,
}

impl OptionRequest {
    pub fn new(query: &str) -> Self {
        Self {
            query: query.trim().to_lowercase(),
            parent: None,
        }
    }

    pub fn within(parent: EntityId, query: &str) -> Self {
        Self {
            parent: Some(parent),
            ..Self::new(query)
        }
    }
}

/// Options for the country and province selects
#[async_trait]
pub trait RegionSource: Send + Sync {
    async fn countries(&self, request: &OptionRequest) -> ConsoleResult<Vec<Region>>;

    /// Provinces of `request.parent`; empty when no parent is given
    async fn provinces(&self, request: &OptionRequest) -> ConsoleResult<Vec<Region>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_from_rows() {
        assert_eq!(Lookup::<i32>::from_rows(vec![]), Lookup::NotFound);
        assert_eq!(Lookup::from_rows(vec![7]), Lookup::One(7));
        assert_eq!(Lookup::from_rows(vec![1, 2]), Lookup::Many(vec![1, 2]));
    }

    #[test]
    fn test_option_request_snapshots_normalized_query() {
        let request = OptionRequest::within(EntityId(3), "  Chiri ");
        assert_eq!(request.query, "chiri");
        assert_eq!(request.parent, Some(EntityId(3)));
    }
}
