mod headless;

pub use headless::{HeadlessLedger, HeadlessLibrary};

use crate::core::{ChartConfig, SurfaceHandle};
use crate::error::BridgeResult;

/// Global binding name charting libraries conventionally register under.
pub const DEFAULT_BINDING: &str = "Chart";

/// Where the charting library's script is fetched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LibrarySource {
    /// Asset shipped alongside the host application.
    BundledAsset,
    /// Public CDN build.
    #[default]
    Cdn,
}

impl LibrarySource {
    pub const BUNDLED_ASSET_PATH: &'static str = "./assets/chart.js";
    pub const CDN_URL: &'static str = "https://cdn.jsdelivr.net/npm/chart.js";

    /// Maps the component-level "use local assets" flag onto a source.
    #[must_use]
    pub fn from_local_flag(use_local: bool) -> Self {
        if use_local {
            Self::BundledAsset
        } else {
            Self::Cdn
        }
    }

    #[must_use]
    pub fn url(self) -> &'static str {
        match self {
            Self::BundledAsset => Self::BUNDLED_ASSET_PATH,
            Self::Cdn => Self::CDN_URL,
        }
    }
}

/// Contract implemented by a loaded charting library.
///
/// A library value is the factory end of the boundary: once the loader has
/// resolved it, the adapter asks it to construct chart instances bound to a
/// rendering surface. The configuration document moves into the instance and
/// becomes its live data model.
pub trait ChartLibrary: Send + Sync {
    /// Binding name the library registers itself under.
    fn binding(&self) -> &str;

    /// Constructs a chart on `surface` from a full configuration document.
    fn create(
        &self,
        surface: &SurfaceHandle,
        config: ChartConfig,
    ) -> BridgeResult<Box<dyn ChartInstance>>;
}

/// Contract implemented by one live chart instance.
pub trait ChartInstance: Send {
    /// Current configuration document (the instance's in-memory data model).
    fn config(&self) -> &ChartConfig;

    /// Mutable access to the data model, edited in place between redraws.
    fn config_mut(&mut self) -> &mut ChartConfig;

    /// Re-renders visuals from the current in-memory data and options.
    fn update(&mut self) -> BridgeResult<()>;

    /// Releases the instance's resources. Called at most once per instance.
    fn destroy(&mut self);
}
