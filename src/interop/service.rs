use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::adapter::ChartAdapter;
use crate::error::{BridgeError, BridgeResult};
use crate::interop::{InteropCall, InteropEnvelope, InteropReply};

/// Event loop that owns a [`ChartAdapter`] and serves interop calls.
///
/// Calls are applied one at a time in arrival order, and each reply is sent
/// before the next call is taken, so mutations never interleave on one
/// chart. A `dispose` call, or every caller hanging up, ends the loop and
/// destroys the chart.
pub struct AdapterService {
    adapter: ChartAdapter,
    calls: mpsc::Receiver<InteropEnvelope>,
}

impl AdapterService {
    #[must_use]
    pub fn new(adapter: ChartAdapter, calls: mpsc::Receiver<InteropEnvelope>) -> Self {
        Self { adapter, calls }
    }

    /// Serves calls until disposal or all callers hang up.
    pub async fn run(mut self) {
        debug!("adapter service started");
        while let Some(envelope) = self.calls.recv().await {
            let method = envelope.call.method();
            trace!(method, "interop call received");
            let disposing = matches!(envelope.call, InteropCall::Dispose);
            let result = self.apply(envelope.call);
            if let Err(err) = &result {
                debug!(method, error = %err, "interop call failed");
            }
            if envelope.reply.send(result).is_err() {
                trace!(method, "interop caller went away before the reply");
            }
            if disposing {
                break;
            }
        }
        // Covers callers that dropped their handle without an explicit dispose.
        self.adapter.dispose();
        debug!("adapter service stopped");
    }

    fn apply(&mut self, call: InteropCall) -> BridgeResult<InteropReply> {
        match call {
            InteropCall::ChangeData {
                dataset_index,
                values,
                labels,
            } => {
                self.adapter.change_data(dataset_index, values, labels)?;
                Ok(InteropReply::Ack)
            }
            InteropCall::ChangeDataRaw {
                dataset_index,
                points,
            } => {
                self.adapter.change_data_raw(dataset_index, points)?;
                Ok(InteropReply::Ack)
            }
            InteropCall::PushData {
                dataset_index,
                value,
                label,
            } => {
                self.adapter.push_data(dataset_index, value, label)?;
                Ok(InteropReply::Ack)
            }
            InteropCall::PushDataAndShift {
                dataset_index,
                value,
            } => {
                self.adapter.push_data_and_shift(dataset_index, value)?;
                Ok(InteropReply::Ack)
            }
            InteropCall::PushMultipleData {
                dataset_index,
                values,
            } => {
                self.adapter.push_multiple_data(dataset_index, values)?;
                Ok(InteropReply::Ack)
            }
            InteropCall::ShiftData { dataset_index } => {
                let entry = self.adapter.shift_data(dataset_index)?;
                Ok(InteropReply::Json(serialize_reply(&entry)?))
            }
            InteropCall::RemoveData {
                dataset_index,
                start,
                count,
            } => {
                let entry = self.adapter.remove_data(dataset_index, start, count)?;
                Ok(InteropReply::Json(serialize_reply(&entry)?))
            }
            InteropCall::GetOptions => {
                let options = self.adapter.get_options()?;
                Ok(InteropReply::Json(serialize_reply(&options)?))
            }
            InteropCall::ChangeOptions { options } => {
                self.adapter.change_options(options)?;
                Ok(InteropReply::Ack)
            }
            InteropCall::Rebuild { config } => {
                self.adapter.rebuild(config)?;
                Ok(InteropReply::Ack)
            }
            InteropCall::Dispose => {
                self.adapter.dispose();
                Ok(InteropReply::Ack)
            }
        }
    }
}

fn serialize_reply(document: &Value) -> BridgeResult<String> {
    serde_json::to_string(document)
        .map_err(|e| BridgeError::InvalidConfig(format!("failed to serialize reply document: {e}")))
}
