//! Dataset selection and tabular core for the equipment dashboard.
//!
//! The controller decides which dataset is shown and which detail load is
//! current; the fetch layer talks to the remote service; the aggregate and
//! table modules turn the loaded items into chart views and sorted pages.

pub mod aggregate;
pub mod config;
pub mod fetch;
pub mod math;
pub mod model;
pub mod prelude;
pub mod present;
pub mod remote;
pub mod selection;
pub mod session;
pub mod table;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod testing;

pub use config::ClientConfig;
pub use prelude::{DashResult, DashboardError, DatasetId, DatasetService, ErrorKind, UploadRequest};
pub use remote::HttpDatasetService;
pub use selection::{DatasetSelectionController, DetailOutcome, Effect};
pub use session::DashboardSession;
