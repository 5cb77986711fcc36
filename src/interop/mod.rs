//! Typed call surface between the host facade and the adapter service.
//!
//! The facade marshals every operation into an [`InteropCall`] paired with a
//! one-shot reply channel and queues it for the service. Wire method names
//! follow the browser adapter's call surface, and document-returning calls
//! reply with serialized JSON that the facade re-parses.

mod service;

pub use service::AdapterService;

use serde_json::Value;
use tokio::sync::oneshot;

use crate::core::{ChartConfig, LabeledPoint};
use crate::error::BridgeResult;

/// Queue depth of one component's interop channel.
pub const INTEROP_QUEUE_DEPTH: usize = 32;

/// One marshalled call from the host facade to the adapter.
#[derive(Debug, Clone)]
pub enum InteropCall {
    /// Replace a dataset's values and optionally the label sequence.
    ChangeData {
        dataset_index: usize,
        values: Vec<Value>,
        labels: Option<Vec<Value>>,
    },
    /// Replace a dataset's values with tuple points; labels stay untouched.
    ChangeDataRaw {
        dataset_index: usize,
        points: Vec<LabeledPoint>,
    },
    /// Append one value, with an optional label.
    PushData {
        dataset_index: usize,
        value: Value,
        label: Option<Value>,
    },
    /// Append one value then drop the oldest.
    PushDataAndShift { dataset_index: usize, value: Value },
    /// Append a batch of values to one dataset.
    PushMultipleData {
        dataset_index: usize,
        values: Vec<Value>,
    },
    /// Drop the oldest value; replies with the resulting dataset entry.
    ShiftData { dataset_index: usize },
    /// Remove a contiguous range; replies with the resulting dataset entry.
    RemoveData {
        dataset_index: usize,
        start: usize,
        count: usize,
    },
    /// Read the current options document.
    GetOptions,
    /// Replace the options document.
    ChangeOptions { options: Value },
    /// Destroy the chart and construct a fresh one from a new configuration.
    Rebuild { config: ChartConfig },
    /// Destroy the chart and stop the service.
    Dispose,
}

impl InteropCall {
    /// Wire method name of the call.
    #[must_use]
    pub fn method(&self) -> &'static str {
        match self {
            Self::ChangeData { .. } => "changeData",
            Self::ChangeDataRaw { .. } => "changeDataRaw",
            Self::PushData { .. } => "pushData",
            Self::PushDataAndShift { .. } => "pushDataAndShift",
            Self::PushMultipleData { .. } => "pushMultipleData",
            Self::ShiftData { .. } => "shiftData",
            Self::RemoveData { .. } => "removeData",
            Self::GetOptions => "getOptions",
            Self::ChangeOptions { .. } => "changeOptions",
            Self::Rebuild { .. } => "rebuild",
            Self::Dispose => "dispose",
        }
    }
}

/// Successful result of an interop call.
#[derive(Debug, Clone, PartialEq)]
pub enum InteropReply {
    /// Call completed with nothing to report.
    Ack,
    /// Serialized result document, re-parsed on the host side.
    ///
    /// `shiftData` and `removeData` reply with the resulting dataset entry;
    /// `getOptions` replies with the options document.
    Json(String),
}

/// Call paired with the channel its result travels back on.
pub struct InteropEnvelope {
    pub call: InteropCall,
    pub reply: oneshot::Sender<BridgeResult<InteropReply>>,
}
