//! Domain models for the honey-production console

mod batch;
mod catalog;
mod employee;
mod entity;
mod location;

pub use batch::*;
pub use catalog::*;
pub use employee::*;
pub use entity::*;
pub use location::*;
