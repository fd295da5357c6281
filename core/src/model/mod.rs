pub mod chart;
pub mod dataset;
pub mod equipment;
pub mod summary;
pub mod upload;

pub use chart::{ChartBar, ChartSeries, ChartSeriesWire};
pub use dataset::{Dataset, DatasetStats};
pub use equipment::EquipmentItem;
pub use summary::{Averages, Summary};
pub use upload::{UploadReceipt, UploadRejection};
