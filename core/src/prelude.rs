use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::{ChartSeries, Dataset, Summary, UploadReceipt, UploadRejection};

/// Server-assigned dataset identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetId(pub i64);

impl From<i64> for DatasetId {
    fn from(value: i64) -> Self {
        DatasetId(value)
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Common error type for every remote and local dashboard operation.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DashboardError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("server responded with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("not authorized; sign in again")]
    Unauthorized,
    #[error("malformed response: {0}")]
    Decode(String),
    #[error("unrecognized equipment payload shape")]
    UnrecognizedShape,
    #[error("upload rejected: {0}")]
    UploadRejected(UploadRejection),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("io failure: {0}")]
    Io(String),
}

impl From<std::io::Error> for DashboardError {
    fn from(err: std::io::Error) -> Self {
        DashboardError::Io(err.to_string())
    }
}

pub type DashResult<T> = Result<T, DashboardError>;

/// Error categories surfaced to the operator. Each category is cleared by the
/// next successful operation of the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ListLoad,
    DetailLoad,
    Delete,
    Upload,
}

/// A CSV file handed to the remote service. Parsing happens server-side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub filename: String,
    pub contents: Vec<u8>,
}

/// Remote collaborator that owns persistence and server-side aggregation.
///
/// Items are returned as raw JSON because the endpoint may answer with either
/// a flat array or a paginated envelope; shape handling belongs to the fetch
/// layer.
#[async_trait]
pub trait DatasetService: Send + Sync {
    async fn list_datasets(&self) -> DashResult<Vec<Dataset>>;
    async fn summary(&self, id: DatasetId) -> DashResult<Option<Summary>>;
    async fn chart(&self, id: DatasetId) -> DashResult<Option<ChartSeries>>;
    async fn items(&self, id: DatasetId) -> DashResult<serde_json::Value>;
    async fn delete_dataset(&self, id: DatasetId) -> DashResult<()>;
    async fn upload(&self, request: UploadRequest) -> DashResult<UploadReceipt>;
}
