pub mod http;

pub use http::HttpDatasetService;
