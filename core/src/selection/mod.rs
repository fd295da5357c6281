//! Selection state machine for the dashboard.

pub mod controller;
pub mod generation;

pub use controller::{DatasetSelectionController, DetailOutcome, Effect, UploadStatus};
pub use generation::{FetchTicket, Generation};
