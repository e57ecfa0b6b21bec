//! Common types used across the console

use serde::{Deserialize, Serialize};

/// Opaque server-assigned record identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub i64);

impl EntityId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for EntityId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Supported languages
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    #[serde(alias = "es")]
    Spanish,
    #[serde(alias = "en")]
    English,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Spanish => "es",
            Language::English => "en",
        }
    }

    /// Pick between an English and a Spanish rendition
    pub fn pick<'a>(&self, en: &'a str, es: &'a str) -> &'a str {
        match self {
            Language::English => en,
            Language::Spanish => es,
        }
    }
}

/// Rows per page. Only these three sizes are offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum PageSize {
    #[default]
    Ten,
    TwentyFive,
    Fifty,
}

impl PageSize {
    pub const ALL: [PageSize; 3] = [PageSize::Ten, PageSize::TwentyFive, PageSize::Fifty];

    pub fn get(self) -> u32 {
        match self {
            PageSize::Ten => 10,
            PageSize::TwentyFive => 25,
            PageSize::Fifty => 50,
        }
    }
}

impl TryFrom<u32> for PageSize {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            10 => Ok(PageSize::Ten),
            25 => Ok(PageSize::TwentyFive),
            50 => Ok(PageSize::Fifty),
            other => Err(format!("page size must be 10, 25 or 50, got {}", other)),
        }
    }
}

impl From<PageSize> for u32 {
    fn from(size: PageSize) -> Self {
        size.get()
    }
}

/// Sort direction by entry date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OrderDirection {
    /// Oldest first
    #[default]
    #[serde(rename = "ASC", alias = "asc")]
    Asc,
    /// Newest first
    #[serde(rename = "DESC", alias = "desc")]
    Desc,
}

impl OrderDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        }
    }
}

/// Stock facet for batch listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StockFilter {
    /// Batches with remaining stock
    #[default]
    #[serde(rename = "inStock", alias = "in_stock")]
    InStock,
    /// Fully consumed batches
    #[serde(rename = "empty")]
    Empty,
}

impl StockFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockFilter::InStock => "inStock",
            StockFilter::Empty => "empty",
        }
    }
}

/// Reference to the material or product a batch listing is scoped to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentRef {
    pub id: EntityId,
    pub name: String,
}

impl ParentRef {
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Composite list query sent to a remote list fetcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub limit: PageSize,
    /// Zero-based page index
    pub page: u32,
    pub order: OrderDirection,
    pub stock_filter: StockFilter,
    /// Debounced, trimmed free text
    pub free_text: String,
    /// Parent scope; takes precedence over `free_text`
    pub parent: Option<ParentRef>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            limit: PageSize::default(),
            page: 0,
            order: OrderDirection::default(),
            stock_filter: StockFilter::default(),
            free_text: String::new(),
            parent: None,
        }
    }
}

impl ListQuery {
    /// Free text that actually applies, `None` when a parent scope overrides it
    pub fn effective_text(&self) -> Option<&str> {
        if self.parent.is_some() || self.free_text.is_empty() {
            None
        } else {
            Some(self.free_text.as_str())
        }
    }

    pub fn parent_id(&self) -> Option<EntityId> {
        self.parent.as_ref().map(|p| p.id)
    }
}

/// One page of results together with the server-side total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub rows: Vec<T>,
    /// Total matching rows, not `rows.len()`
    pub count: u64,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            count: 0,
        }
    }
}

impl<T> Page<T> {
    pub fn new(rows: Vec<T>, count: u64) -> Self {
        Self { rows, count }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total_pages(&self, limit: PageSize) -> u32 {
        crate::pagination::total_pages(self.count, limit.get())
    }
}
