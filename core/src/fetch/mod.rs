pub mod normalize;
pub mod orchestrator;

pub use normalize::{normalize_items, ItemsShape, NormalizedItems};
pub use orchestrator::{DetailBundle, DetailCompletion, FetchOrchestrator};
