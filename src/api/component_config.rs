use crate::core::{ChartConfig, DatasetIndexPolicy, SurfaceHandle};
use crate::interop::INTEROP_QUEUE_DEPTH;
use crate::library::{DEFAULT_BINDING, LibrarySource};
use crate::loader::LoadBudget;

/// Construction parameters of a [`ChartComponent`](super::ChartComponent).
#[derive(Debug, Clone)]
pub struct ChartComponentConfig {
    /// Surface the chart mounts on.
    pub surface: SurfaceHandle,
    /// Initial configuration document, passed to the library verbatim.
    pub config: ChartConfig,
    /// Where the charting library's script is fetched from.
    pub source: LibrarySource,
    /// Binding name the loader waits for.
    pub binding: String,
    /// Resolution of dataset indices that do not exist yet.
    pub policy: DatasetIndexPolicy,
    /// Polling cadence and deadline for the library load.
    pub load_budget: LoadBudget,
    /// Interop queue depth.
    pub queue_depth: usize,
}

impl ChartComponentConfig {
    /// Creates a config with the default CDN source and load budget.
    #[must_use]
    pub fn new(surface: SurfaceHandle, config: ChartConfig) -> Self {
        Self {
            surface,
            config,
            source: LibrarySource::default(),
            binding: DEFAULT_BINDING.to_owned(),
            policy: DatasetIndexPolicy::default(),
            load_budget: LoadBudget::default(),
            queue_depth: INTEROP_QUEUE_DEPTH,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: LibrarySource) -> Self {
        self.source = source;
        self
    }

    /// Selects the bundled asset over the CDN build.
    #[must_use]
    pub fn with_local_library(mut self, use_local: bool) -> Self {
        self.source = LibrarySource::from_local_flag(use_local);
        self
    }

    #[must_use]
    pub fn with_binding(mut self, binding: impl Into<String>) -> Self {
        self.binding = binding.into();
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: DatasetIndexPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_load_budget(mut self, load_budget: LoadBudget) -> Self {
        self.load_budget = load_budget;
        self
    }

    #[must_use]
    pub fn with_queue_depth(mut self, queue_depth: usize) -> Self {
        self.queue_depth = queue_depth;
        self
    }
}
