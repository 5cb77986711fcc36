//! chart-bridge: typed async bridge for embedding charting engines.
//!
//! This crate connects a component-based host UI to a lazily loaded,
//! Chart.js-style charting library: a strongly typed host facade marshals
//! data mutations over an interop channel to an adapter that edits the
//! chart's in-memory configuration and triggers redraws.

pub mod adapter;
pub mod api;
pub mod core;
pub mod error;
pub mod interop;
pub mod library;
pub mod loader;
pub mod telemetry;

pub use api::{ChartComponent, ChartComponentConfig, ChartHandle, ComponentState};
pub use error::{BridgeError, BridgeResult};
