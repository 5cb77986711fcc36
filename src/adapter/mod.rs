//! Adapter owning one chart instance and applying mutations to it.
//!
//! Every operation resolves the live instance and edits its in-memory
//! configuration document before asking the instance to redraw. Failed
//! preconditions (disposed chart, rejected dataset index) surface as tagged
//! errors rather than being swallowed.

use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::core::{ChartConfig, DatasetIndexPolicy, LabeledPoint, SurfaceHandle};
use crate::error::{BridgeError, BridgeResult};
use crate::library::ChartInstance;
use crate::loader::SharedLibrary;

/// Mediates between interop calls and the charting library's instance.
///
/// Construction builds the chart immediately from the supplied configuration.
/// `Disposed` is terminal: after [`ChartAdapter::dispose`], every operation
/// (including rebuild) fails with `ChartDisposed`.
pub struct ChartAdapter {
    surface: SurfaceHandle,
    library: SharedLibrary,
    policy: DatasetIndexPolicy,
    chart: Option<Box<dyn ChartInstance>>,
}

impl ChartAdapter {
    pub fn new(
        surface: SurfaceHandle,
        library: SharedLibrary,
        config: ChartConfig,
        policy: DatasetIndexPolicy,
    ) -> BridgeResult<Self> {
        let chart = library.create(&surface, config)?;
        debug!(canvas_id = %surface.canvas_id, "chart instance constructed");
        Ok(Self {
            surface,
            library,
            policy,
            chart: Some(chart),
        })
    }

    #[must_use]
    pub fn surface(&self) -> &SurfaceHandle {
        &self.surface
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.chart.is_none()
    }

    /// Current configuration document of the live chart.
    pub fn config(&self) -> BridgeResult<&ChartConfig> {
        Ok(self.chart_ref()?.config())
    }

    /// Replaces a dataset's values and, when given, the label sequence.
    pub fn change_data(
        &mut self,
        index: usize,
        values: Vec<Value>,
        labels: Option<Vec<Value>>,
    ) -> BridgeResult<()> {
        trace!(dataset_index = index, values = values.len(), "changeData");
        let policy = self.policy;
        let chart = self.chart_mut()?;
        chart.config_mut().replace_values(index, values, policy)?;
        if let Some(labels) = labels {
            chart.config_mut().set_labels(labels)?;
        }
        chart.update()
    }

    /// Replaces a dataset's values with tuple points; labels stay untouched.
    pub fn change_data_raw(&mut self, index: usize, points: Vec<LabeledPoint>) -> BridgeResult<()> {
        trace!(dataset_index = index, points = points.len(), "changeDataRaw");
        let values = points.iter().map(LabeledPoint::to_value).collect();
        let policy = self.policy;
        let chart = self.chart_mut()?;
        chart.config_mut().replace_values(index, values, policy)?;
        chart.update()
    }

    /// Appends one value; the label is appended only when supplied.
    pub fn push_data(
        &mut self,
        index: usize,
        value: Value,
        label: Option<Value>,
    ) -> BridgeResult<()> {
        trace!(dataset_index = index, "pushData");
        let policy = self.policy;
        let chart = self.chart_mut()?;
        chart.config_mut().push_value(index, value, policy)?;
        if let Some(label) = label {
            chart.config_mut().push_label(label)?;
        }
        chart.update()
    }

    /// Appends a batch of values to one dataset.
    pub fn push_multiple_data(&mut self, index: usize, values: Vec<Value>) -> BridgeResult<()> {
        trace!(dataset_index = index, values = values.len(), "pushMultipleData");
        let policy = self.policy;
        let chart = self.chart_mut()?;
        chart.config_mut().push_values(index, values, policy)?;
        chart.update()
    }

    /// Appends one value then drops the oldest (sliding window).
    pub fn push_data_and_shift(&mut self, index: usize, value: Value) -> BridgeResult<()> {
        trace!(dataset_index = index, "pushDataAndShift");
        let policy = self.policy;
        let chart = self.chart_mut()?;
        chart.config_mut().push_and_shift(index, value, policy)?;
        chart.update()
    }

    /// Drops the oldest value; returns the resulting dataset entry.
    pub fn shift_data(&mut self, index: usize) -> BridgeResult<Value> {
        trace!(dataset_index = index, "shiftData");
        let policy = self.policy;
        let chart = self.chart_mut()?;
        chart.config_mut().shift_value(index, policy)?;
        let snapshot = Self::dataset_snapshot(chart.config(), index)?;
        chart.update()?;
        Ok(snapshot)
    }

    /// Removes a contiguous range; returns the resulting dataset entry.
    pub fn remove_data(&mut self, index: usize, start: usize, count: usize) -> BridgeResult<Value> {
        trace!(dataset_index = index, start, count, "removeData");
        let policy = self.policy;
        let chart = self.chart_mut()?;
        chart.config_mut().splice_values(index, start, count, policy)?;
        let snapshot = Self::dataset_snapshot(chart.config(), index)?;
        chart.update()?;
        Ok(snapshot)
    }

    /// Current options document; an empty object when the chart has none.
    pub fn get_options(&self) -> BridgeResult<Value> {
        trace!("getOptions");
        Ok(self.chart_ref()?.config().options())
    }

    /// Replaces the options document wholesale and redraws.
    pub fn change_options(&mut self, options: Value) -> BridgeResult<()> {
        trace!("changeOptions");
        let chart = self.chart_mut()?;
        chart.config_mut().set_options(options)?;
        chart.update()
    }

    /// Destroys the current instance and constructs a fresh one from
    /// `config`. If construction fails the adapter is left disposed, matching
    /// the destroy-then-construct order of the underlying library.
    pub fn rebuild(&mut self, config: ChartConfig) -> BridgeResult<()> {
        let mut old = self.chart.take().ok_or_else(|| {
            warn!("chart was destroyed; operation ignored");
            BridgeError::ChartDisposed
        })?;
        old.destroy();
        let chart = self.library.create(&self.surface, config)?;
        debug!(canvas_id = %self.surface.canvas_id, "chart instance rebuilt");
        self.chart = Some(chart);
        Ok(())
    }

    /// Destroys the instance and releases it. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        if let Some(mut chart) = self.chart.take() {
            chart.destroy();
            debug!(canvas_id = %self.surface.canvas_id, "chart instance destroyed");
        } else {
            trace!("dispose on already-disposed chart ignored");
        }
    }

    fn dataset_snapshot(config: &ChartConfig, index: usize) -> BridgeResult<Value> {
        let dataset_count = config.dataset_count();
        config
            .dataset_snapshot(index)
            .ok_or(BridgeError::InvalidDatasetIndex {
                index,
                dataset_count,
            })
    }

    fn chart_mut(&mut self) -> BridgeResult<&mut dyn ChartInstance> {
        match &mut self.chart {
            Some(chart) => Ok(chart.as_mut()),
            None => {
                warn!("chart was destroyed; operation ignored");
                Err(BridgeError::ChartDisposed)
            }
        }
    }

    fn chart_ref(&self) -> BridgeResult<&dyn ChartInstance> {
        match &self.chart {
            Some(chart) => Ok(chart.as_ref()),
            None => {
                warn!("chart was destroyed; operation ignored");
                Err(BridgeError::ChartDisposed)
            }
        }
    }
}
