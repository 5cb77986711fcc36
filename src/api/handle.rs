use serde_json::Value;
use tokio::sync::{mpsc, oneshot};

use crate::core::{ChartConfig, DataValue, LabeledPoint};
use crate::error::{BridgeError, BridgeResult};
use crate::interop::{InteropCall, InteropEnvelope, InteropReply};

/// Clonable, typed operation surface over one mounted chart.
///
/// Every call suspends the caller until the adapter has applied the mutation
/// and replied. Once the chart is disposed the calls fail with
/// `ChartDisposed` (or `ChannelClosed` after the service has stopped).
#[derive(Clone)]
pub struct ChartHandle {
    calls: mpsc::Sender<InteropEnvelope>,
}

impl ChartHandle {
    pub(crate) fn new(calls: mpsc::Sender<InteropEnvelope>) -> Self {
        Self { calls }
    }

    /// Whether the adapter service is still accepting calls.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        !self.calls.is_closed()
    }

    /// Replaces a dataset's values and optionally the label sequence.
    pub async fn change_data<V>(
        &self,
        dataset_index: usize,
        values: impl IntoIterator<Item = V>,
        labels: Option<Vec<String>>,
    ) -> BridgeResult<()>
    where
        V: Into<DataValue>,
    {
        let values = values.into_iter().map(|v| v.into().to_value()).collect();
        let labels = labels.map(|labels| labels.into_iter().map(Value::String).collect());
        self.invoke_ack(InteropCall::ChangeData {
            dataset_index,
            values,
            labels,
        })
        .await
    }

    /// Replaces a dataset's values with tuple points; labels stay untouched.
    pub async fn change_data_points(
        &self,
        dataset_index: usize,
        points: Vec<LabeledPoint>,
    ) -> BridgeResult<()> {
        self.invoke_ack(InteropCall::ChangeDataRaw {
            dataset_index,
            points,
        })
        .await
    }

    /// Appends one value, with an optional label.
    pub async fn push_data(
        &self,
        dataset_index: usize,
        value: impl Into<DataValue>,
        label: Option<String>,
    ) -> BridgeResult<()> {
        self.invoke_ack(InteropCall::PushData {
            dataset_index,
            value: value.into().to_value(),
            label: label.map(Value::String),
        })
        .await
    }

    /// Appends a batch of values to one dataset.
    pub async fn push_multiple_data<V>(
        &self,
        dataset_index: usize,
        values: impl IntoIterator<Item = V>,
    ) -> BridgeResult<()>
    where
        V: Into<DataValue>,
    {
        let values = values.into_iter().map(|v| v.into().to_value()).collect();
        self.invoke_ack(InteropCall::PushMultipleData {
            dataset_index,
            values,
        })
        .await
    }

    /// Appends one value then drops the oldest (sliding window effect).
    pub async fn push_data_and_shift(
        &self,
        dataset_index: usize,
        value: impl Into<DataValue>,
    ) -> BridgeResult<()> {
        self.invoke_ack(InteropCall::PushDataAndShift {
            dataset_index,
            value: value.into().to_value(),
        })
        .await
    }

    /// Drops the oldest value; returns the resulting dataset entry.
    pub async fn shift_data(&self, dataset_index: usize) -> BridgeResult<Value> {
        self.invoke_json(InteropCall::ShiftData { dataset_index })
            .await
    }

    /// Removes a contiguous range; returns the resulting dataset entry.
    pub async fn remove_data(
        &self,
        dataset_index: usize,
        start: usize,
        count: usize,
    ) -> BridgeResult<Value> {
        self.invoke_json(InteropCall::RemoveData {
            dataset_index,
            start,
            count,
        })
        .await
    }

    /// Current options document of the chart.
    pub async fn get_options(&self) -> BridgeResult<Value> {
        self.invoke_json(InteropCall::GetOptions).await
    }

    /// Replaces the options document wholesale.
    pub async fn set_options(&self, options: Value) -> BridgeResult<()> {
        self.invoke_ack(InteropCall::ChangeOptions { options }).await
    }

    /// Destroys the chart and constructs a fresh one from `config`.
    pub async fn rebuild(&self, config: ChartConfig) -> BridgeResult<()> {
        self.invoke_ack(InteropCall::Rebuild { config }).await
    }

    /// Destroys the chart and stops the adapter service.
    pub async fn dispose(&self) -> BridgeResult<()> {
        self.invoke_ack(InteropCall::Dispose).await
    }

    async fn invoke(&self, call: InteropCall) -> BridgeResult<InteropReply> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.calls
            .send(InteropEnvelope {
                call,
                reply: reply_tx,
            })
            .await
            .map_err(|_| BridgeError::ChannelClosed)?;
        reply_rx.await.map_err(|_| BridgeError::ChannelClosed)?
    }

    async fn invoke_ack(&self, call: InteropCall) -> BridgeResult<()> {
        let method = call.method();
        match self.invoke(call).await? {
            InteropReply::Ack => Ok(()),
            _ => Err(BridgeError::UnexpectedReply { method }),
        }
    }

    /// Awaits a serialized reply document and re-parses it.
    async fn invoke_json(&self, call: InteropCall) -> BridgeResult<Value> {
        let method = call.method();
        match self.invoke(call).await? {
            InteropReply::Json(json) => serde_json::from_str(&json).map_err(|e| {
                BridgeError::InvalidConfig(format!("failed to parse reply document: {e}"))
            }),
            InteropReply::Ack => Err(BridgeError::UnexpectedReply { method }),
        }
    }
}
