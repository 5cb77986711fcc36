use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::core::{ChartConfig, SurfaceHandle};
use crate::error::{BridgeError, BridgeResult};
use crate::library::{ChartInstance, ChartLibrary, DEFAULT_BINDING};

/// Render-free charting library used by tests and headless embedding.
///
/// It still validates the surface and configuration document at construction
/// so tests can catch malformed input before a real engine is wired in, and
/// it records every redraw into a shared ledger.
pub struct HeadlessLibrary {
    binding: String,
    ledger: Arc<HeadlessLedger>,
}

impl HeadlessLibrary {
    #[must_use]
    pub fn new() -> Self {
        Self {
            binding: DEFAULT_BINDING.to_owned(),
            ledger: Arc::new(HeadlessLedger::default()),
        }
    }

    /// Overrides the binding name the library reports to the loader.
    #[must_use]
    pub fn with_binding(mut self, binding: impl Into<String>) -> Self {
        self.binding = binding.into();
        self
    }

    /// Shared ledger handle, kept by tests to observe engine activity.
    #[must_use]
    pub fn ledger(&self) -> Arc<HeadlessLedger> {
        Arc::clone(&self.ledger)
    }
}

impl Default for HeadlessLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartLibrary for HeadlessLibrary {
    fn binding(&self) -> &str {
        &self.binding
    }

    fn create(
        &self,
        surface: &SurfaceHandle,
        config: ChartConfig,
    ) -> BridgeResult<Box<dyn ChartInstance>> {
        if surface.canvas_id.is_empty() {
            return Err(BridgeError::InvalidConfig(
                "surface canvas id must not be empty".to_owned(),
            ));
        }
        config.validate_shape()?;
        self.ledger.charts_created.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(HeadlessChart {
            config,
            ledger: Arc::clone(&self.ledger),
            destroyed: false,
        }))
    }
}

/// Activity counters shared between a [`HeadlessLibrary`] and its charts.
#[derive(Debug, Default)]
pub struct HeadlessLedger {
    charts_created: AtomicUsize,
    updates: AtomicUsize,
    charts_destroyed: AtomicUsize,
    last_rendered: Mutex<Option<Value>>,
}

impl HeadlessLedger {
    #[must_use]
    pub fn charts_created(&self) -> usize {
        self.charts_created.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn charts_destroyed(&self) -> usize {
        self.charts_destroyed.load(Ordering::SeqCst)
    }

    /// Configuration document as of the most recent redraw.
    #[must_use]
    pub fn last_rendered(&self) -> Option<Value> {
        self.last_rendered
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

struct HeadlessChart {
    config: ChartConfig,
    ledger: Arc<HeadlessLedger>,
    destroyed: bool,
}

impl ChartInstance for HeadlessChart {
    fn config(&self) -> &ChartConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut ChartConfig {
        &mut self.config
    }

    fn update(&mut self) -> BridgeResult<()> {
        self.ledger.updates.fetch_add(1, Ordering::SeqCst);
        let mut last = self
            .ledger
            .last_rendered
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        *last = Some(self.config.as_value().clone());
        Ok(())
    }

    fn destroy(&mut self) {
        if !self.destroyed {
            self.destroyed = true;
            self.ledger.charts_destroyed.fetch_add(1, Ordering::SeqCst);
        }
    }
}
