//! Beereign management console
//!
//! Client-side coordination for listing, searching, scanning and editing
//! the records of a honey-production operation, with batches (inventory
//! lots) as the main concern.

pub mod config;
pub mod context;
pub mod coordinator;
pub mod debounce;
pub mod error;
pub mod events;
pub mod logging;
pub mod modal;
pub mod notify;
pub mod picker;
pub mod remote;
pub mod scan;
pub mod session;
pub mod table;

pub use config::Config;
pub use context::ConsoleContext;
pub use coordinator::{CoordinatorOptions, ListCoordinator, ListModel, ListSnapshot};
pub use error::{ConsoleError, ConsoleResult};
pub use events::{RefreshBus, RefreshToken};
