use serde_json::Value;

use crate::core::config::ChartConfig;
use crate::core::types::DatasetIndexPolicy;
use crate::error::BridgeResult;

/// In-place dataset mutations.
///
/// Every operation resolves the target dataset through the configured
/// [`DatasetIndexPolicy`] and then edits the value array directly, matching
/// how a charting engine mutates its live data model between redraws.
impl ChartConfig {
    /// Replaces the value array of dataset `index` wholesale.
    pub fn replace_values(
        &mut self,
        index: usize,
        values: Vec<Value>,
        policy: DatasetIndexPolicy,
    ) -> BridgeResult<()> {
        let slot = self.dataset_values_mut(index, policy)?;
        *slot = values;
        Ok(())
    }

    /// Appends one value to dataset `index`.
    pub fn push_value(
        &mut self,
        index: usize,
        value: Value,
        policy: DatasetIndexPolicy,
    ) -> BridgeResult<()> {
        self.dataset_values_mut(index, policy)?.push(value);
        Ok(())
    }

    /// Appends a batch of values to dataset `index`, preserving order.
    pub fn push_values(
        &mut self,
        index: usize,
        values: Vec<Value>,
        policy: DatasetIndexPolicy,
    ) -> BridgeResult<()> {
        self.dataset_values_mut(index, policy)?.extend(values);
        Ok(())
    }

    /// Appends one value, then drops the oldest.
    ///
    /// On a non-empty dataset the length is unchanged (sliding window); on an
    /// empty dataset the new value is kept and the length grows to one.
    /// Returns the dropped head, if any.
    pub fn push_and_shift(
        &mut self,
        index: usize,
        value: Value,
        policy: DatasetIndexPolicy,
    ) -> BridgeResult<Option<Value>> {
        let slot = self.dataset_values_mut(index, policy)?;
        let had_values = !slot.is_empty();
        slot.push(value);
        if had_values {
            Ok(Some(slot.remove(0)))
        } else {
            Ok(None)
        }
    }

    /// Removes and returns the oldest value of dataset `index`, if any.
    pub fn shift_value(
        &mut self,
        index: usize,
        policy: DatasetIndexPolicy,
    ) -> BridgeResult<Option<Value>> {
        let slot = self.dataset_values_mut(index, policy)?;
        if slot.is_empty() {
            Ok(None)
        } else {
            Ok(Some(slot.remove(0)))
        }
    }

    /// Removes a contiguous range of values from dataset `index`.
    ///
    /// A `start` past the end removes nothing, and `count` is clamped to the
    /// tail length, so exactly `min(count, len - start)` values come out.
    /// Returns the removed values in order.
    pub fn splice_values(
        &mut self,
        index: usize,
        start: usize,
        count: usize,
        policy: DatasetIndexPolicy,
    ) -> BridgeResult<Vec<Value>> {
        let slot = self.dataset_values_mut(index, policy)?;
        let start = start.min(slot.len());
        let count = count.min(slot.len() - start);
        Ok(slot.drain(start..start + count).collect())
    }
}
