//! Host-side facade consumed by embedding applications.
//!
//! [`ChartComponent`] follows the embedding framework's component lifecycle:
//! construct with a [`ChartComponentConfig`] and `mount` once the surface is
//! rendered; typed operations then marshal across the interop channel.
//! [`ChartHandle`] is the clonable operation surface handed out by `mount`'s
//! creation callback.

mod component;
mod component_config;
mod handle;

pub use component::ChartComponent;
pub use component_config::ChartComponentConfig;
pub use handle::ChartHandle;

/// Host-side lifecycle of one component instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComponentState {
    /// Constructed, surface not yet rendered.
    #[default]
    Unmounted,
    /// Chart constructed, operations flowing.
    Mounted,
    /// Disposed by the host. Terminal.
    Disposed,
}
