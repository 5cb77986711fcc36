use std::time::Duration;

use thiserror::Error;

pub type BridgeResult<T> = Result<T, BridgeError>;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("chart was not initialized")]
    NotInitialized,

    #[error("chart was already disposed")]
    ChartDisposed,

    #[error("invalid dataset index {index} (chart has {dataset_count} datasets)")]
    InvalidDatasetIndex { index: usize, dataset_count: usize },

    #[error("charting library '{binding}' did not become available after {waited:?}")]
    LibraryUnavailable { binding: String, waited: Duration },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("interop channel closed")]
    ChannelClosed,

    #[error("unexpected interop reply for {method}")]
    UnexpectedReply { method: &'static str },
}
