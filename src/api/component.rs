use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::adapter::ChartAdapter;
use crate::core::{ChartConfig, DataValue, LabeledPoint};
use crate::error::{BridgeError, BridgeResult};
use crate::interop::AdapterService;
use crate::loader::{LibraryLoader, LibraryRegistry, ScriptHost};

use super::{ChartComponentConfig, ChartHandle, ComponentState};

type CreatedCallback = Box<dyn FnOnce(&ChartHandle) + Send>;

/// Embeddable chart component.
///
/// Owns the whole bridge for one chart: on `mount` it resolves the charting
/// library and constructs the adapter, then spawns the service task that
/// serves the interop channel. Operations before `mount` fail with
/// `NotInitialized`; operations after `dispose` fail with `ChartDisposed`.
pub struct ChartComponent {
    config: ChartComponentConfig,
    registry: Arc<LibraryRegistry>,
    script_host: Arc<dyn ScriptHost>,
    state: ComponentState,
    handle: Option<ChartHandle>,
    service: Option<JoinHandle<()>>,
    on_created: Option<CreatedCallback>,
}

impl ChartComponent {
    #[must_use]
    pub fn new(
        config: ChartComponentConfig,
        registry: Arc<LibraryRegistry>,
        script_host: Arc<dyn ScriptHost>,
    ) -> Self {
        Self {
            config,
            registry,
            script_host,
            state: ComponentState::default(),
            handle: None,
            service: None,
            on_created: None,
        }
    }

    /// Registers a one-time callback fired after the chart is constructed.
    #[must_use]
    pub fn with_on_created(
        mut self,
        on_created: impl FnOnce(&ChartHandle) + Send + 'static,
    ) -> Self {
        self.on_created = Some(Box::new(on_created));
        self
    }

    #[must_use]
    pub fn state(&self) -> ComponentState {
        self.state
    }

    #[must_use]
    pub fn config(&self) -> &ChartComponentConfig {
        &self.config
    }

    /// Clonable operation handle of the mounted chart.
    pub fn handle(&self) -> BridgeResult<ChartHandle> {
        Ok(self.require_handle()?.clone())
    }

    /// Brings the chart up: loads the library, then constructs the instance
    /// and starts serving operations.
    ///
    /// Mounting an already mounted component is a no-op, mirroring how the
    /// host framework re-renders without re-running first-render setup. A
    /// failed mount leaves the component unmounted and can be retried.
    pub async fn mount(&mut self) -> BridgeResult<()> {
        match self.state {
            ComponentState::Mounted => {
                trace!("mount on mounted component ignored");
                return Ok(());
            }
            ComponentState::Disposed => return Err(BridgeError::ChartDisposed),
            ComponentState::Unmounted => {}
        }

        let loader = LibraryLoader::new(
            Arc::clone(&self.registry),
            Arc::clone(&self.script_host),
        )
        .with_budget(self.config.load_budget);
        let library = loader
            .load(self.config.source, &self.config.binding)
            .await?;
        let adapter = ChartAdapter::new(
            self.config.surface.clone(),
            library,
            self.config.config.clone(),
            self.config.policy,
        )?;

        let (calls_tx, calls_rx) = mpsc::channel(self.config.queue_depth.max(1));
        let service = AdapterService::new(adapter, calls_rx);
        self.service = Some(tokio::spawn(service.run()));

        let handle = ChartHandle::new(calls_tx);
        self.handle = Some(handle.clone());
        self.state = ComponentState::Mounted;
        debug!(canvas_id = %self.config.surface.canvas_id, "chart component mounted");

        if let Some(on_created) = self.on_created.take() {
            on_created(&handle);
        }
        Ok(())
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
        self.require_handle()?
            .change_data(dataset_index, values, labels)
            .await
    }

    /// Replaces a dataset's values with tuple points; labels stay untouched.
    pub async fn change_data_points(
        &self,
        dataset_index: usize,
        points: Vec<LabeledPoint>,
    ) -> BridgeResult<()> {
        self.require_handle()?
            .change_data_points(dataset_index, points)
            .await
    }

    /// Appends one value, with an optional label.
    pub async fn push_data(
        &self,
        dataset_index: usize,
        value: impl Into<DataValue>,
        label: Option<String>,
    ) -> BridgeResult<()> {
        self.require_handle()?
            .push_data(dataset_index, value, label)
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
        self.require_handle()?
            .push_multiple_data(dataset_index, values)
            .await
    }

    /// Appends one value then drops the oldest (sliding window effect).
    pub async fn push_data_and_shift(
        &self,
        dataset_index: usize,
        value: impl Into<DataValue>,
    ) -> BridgeResult<()> {
        self.require_handle()?
            .push_data_and_shift(dataset_index, value)
            .await
    }

    /// Drops the oldest value; returns the resulting dataset entry.
    pub async fn shift_data(&self, dataset_index: usize) -> BridgeResult<Value> {
        self.require_handle()?.shift_data(dataset_index).await
    }

    /// Removes a contiguous range; returns the resulting dataset entry.
    pub async fn remove_data(
        &self,
        dataset_index: usize,
        start: usize,
        count: usize,
    ) -> BridgeResult<Value> {
        self.require_handle()?
            .remove_data(dataset_index, start, count)
            .await
    }

    /// Current options document of the chart.
    pub async fn get_options(&self) -> BridgeResult<Value> {
        self.require_handle()?.get_options().await
    }

    /// Replaces the options document wholesale.
    pub async fn set_options(&self, options: Value) -> BridgeResult<()> {
        self.require_handle()?.set_options(options).await
    }

    /// Destroys the chart and constructs a fresh one from `config`.
    pub async fn rebuild(&self, config: ChartConfig) -> BridgeResult<()> {
        self.require_handle()?.rebuild(config).await
    }

    /// Destroys the chart and stops the service, releasing the handle.
    ///
    /// Idempotent: disposing a never-mounted or already-disposed component
    /// succeeds without side effects.
    pub async fn dispose(&mut self) -> BridgeResult<()> {
        match self.state {
            ComponentState::Disposed => {
                trace!("dispose on disposed component ignored");
                return Ok(());
            }
            ComponentState::Unmounted => {
                self.state = ComponentState::Disposed;
                return Ok(());
            }
            ComponentState::Mounted => {}
        }

        self.state = ComponentState::Disposed;
        if let Some(handle) = self.handle.take() {
            match handle.dispose().await {
                Ok(()) => {}
                Err(BridgeError::ChannelClosed) => trace!("adapter service already stopped"),
                Err(err) => warn!(error = %err, "dispose call failed"),
            }
        }
        if let Some(service) = self.service.take() {
            if let Err(err) = service.await {
                warn!(error = %err, "adapter service task failed");
            }
        }
        debug!("chart component disposed");
        Ok(())
    }

    fn require_handle(&self) -> BridgeResult<&ChartHandle> {
        match self.state {
            ComponentState::Unmounted => Err(BridgeError::NotInitialized),
            ComponentState::Disposed => Err(BridgeError::ChartDisposed),
            ComponentState::Mounted => self.handle.as_ref().ok_or(BridgeError::NotInitialized),
        }
    }
}
