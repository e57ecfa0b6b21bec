//! Modals layered over the tables

pub mod cascade;
pub mod confirm;
pub mod crud;

pub use cascade::CascadingSelect;
pub use confirm::ConfirmationModal;
pub use crud::{CrudModal, Draft, Mode, SubmitOutcome};
