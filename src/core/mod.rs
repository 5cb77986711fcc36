//! Configuration document model and the dataset operations applied to it.

pub mod config;
pub mod dataset;
pub mod types;

pub use config::ChartConfig;
pub use types::{Category, DataValue, DatasetIndexPolicy, LabeledPoint, SurfaceHandle};
