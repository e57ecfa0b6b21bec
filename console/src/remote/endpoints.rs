//! Endpoint catalog of the REST API
//!
//! Each model names its collection path and the query parameters its list
//! endpoint understands. The API reads `offset` as a page index, not a row
//! offset.

use serde::{de::DeserializeOwned, Serialize};
use shared::{
    Apiary, BatchUpdateInput, Employee, EmployeeInput, Entity, ListQuery, Product, ProductBatch,
    ProductBatchInput, RawMaterial, RawMaterialBatch, RawMaterialBatchInput, SiteInput,
    TypeOfEmployee, TypeOfEmployeeInput, Warehouse,
};

/// Query string pairs for a list request
pub type Params = Vec<(&'static str, String)>;

/// A model served under `/{PATH}`
pub trait ApiResource: Entity + DeserializeOwned + Send + Sync + 'static {
    const PATH: &'static str;

    fn list_params(query: &ListQuery) -> Params {
        common_params(query)
    }
}

/// A model that can be created, updated and deleted
pub trait Writable: ApiResource {
    type Create: Serialize + Send + Sync;
    type Update: Serialize + Send + Sync;
}

/// A model that can be looked up by a scanned code
pub trait ScanEndpoint: ApiResource {
    /// Path segments in front of the code
    const LOOKUP: &'static [&'static str];

    /// The endpoint answers with a list instead of a single record
    const RETURNS_LIST: bool = false;

    fn normalize_code(code: &str) -> String {
        shared::normalize_scan_code(Self::KIND, code)
    }
}

/// `limit`, `offset` (page index) and `filter`
pub fn common_params(query: &ListQuery) -> Params {
    let mut params = vec![
        ("limit", query.limit.get().to_string()),
        ("offset", query.page.to_string()),
    ];
    if let Some(text) = query.effective_text() {
        params.push(("filter", text.to_string()));
    }
    params
}

/// Batch listings add ordering, the stock facet and the parent scope
pub fn batch_params(query: &ListQuery, parent_key: &'static str) -> Params {
    let mut params = common_params(query);
    params.push(("order", query.order.as_str().to_string()));
    params.push(("type", query.stock_filter.as_str().to_string()));
    if let Some(parent) = query.parent_id() {
        params.push((parent_key, parent.to_string()));
    }
    params
}

impl ApiResource for Employee {
    const PATH: &'static str = "employees";
}

impl Writable for Employee {
    type Create = EmployeeInput;
    type Update = EmployeeInput;
}

impl ApiResource for TypeOfEmployee {
    const PATH: &'static str = "type-of-employees";
}

impl Writable for TypeOfEmployee {
    type Create = TypeOfEmployeeInput;
    type Update = TypeOfEmployeeInput;
}

impl ApiResource for Warehouse {
    const PATH: &'static str = "warehouses";
}

impl Writable for Warehouse {
    type Create = SiteInput;
    type Update = SiteInput;
}

impl ApiResource for Apiary {
    const PATH: &'static str = "apiaries";
}

impl Writable for Apiary {
    type Create = SiteInput;
    type Update = SiteInput;
}

impl ApiResource for Product {
    const PATH: &'static str = "products";
}

impl ScanEndpoint for Product {
    const LOOKUP: &'static [&'static str] = &["products", "barcode"];
}

impl ApiResource for RawMaterial {
    const PATH: &'static str = "raw-materials";
}

impl ScanEndpoint for RawMaterial {
    const LOOKUP: &'static [&'static str] = &["raw-materials", "code"];
}

impl ApiResource for RawMaterialBatch {
    const PATH: &'static str = "raw-material-batches";

    fn list_params(query: &ListQuery) -> Params {
        batch_params(query, "rawMaterialId")
    }
}

impl Writable for RawMaterialBatch {
    type Create = RawMaterialBatchInput;
    type Update = BatchUpdateInput;
}

impl ApiResource for ProductBatch {
    const PATH: &'static str = "product-batches";

    fn list_params(query: &ListQuery) -> Params {
        batch_params(query, "productId")
    }
}

impl Writable for ProductBatch {
    type Create = ProductBatchInput;
    type Update = BatchUpdateInput;
}

impl ScanEndpoint for ProductBatch {
    const LOOKUP: &'static [&'static str] = &["product-batches", "barcode"];
    const RETURNS_LIST: bool = true;
}
