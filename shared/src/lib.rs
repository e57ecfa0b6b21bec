//! Shared types and models for the Beereign management console
//!
//! This crate contains the data model, list query types, form schemas and
//! display helpers shared by the async console and the WASM bindings.

pub mod format;
pub mod models;
pub mod pagination;
pub mod scan;
pub mod types;
pub mod validation;

pub use format::*;
pub use models::*;
pub use pagination::*;
pub use scan::*;
pub use types::*;
pub use validation::*;
