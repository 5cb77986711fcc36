//! Lazy, awaitable loading of the charting library.
//!
//! Scripts register their library under a well-known binding name; the loader
//! injects the script for a requested source at most once, then polls the
//! registry until the binding appears or the load budget runs out. Both the
//! interval and the deadline are explicit, so a library that never arrives
//! surfaces as a `LibraryUnavailable` error instead of an unbounded wait.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use indexmap::{IndexMap, IndexSet};
use tokio::time::{Instant, sleep};
use tracing::{debug, trace, warn};

use crate::error::{BridgeError, BridgeResult};
use crate::library::{ChartLibrary, LibrarySource};

/// Shared handle to a loaded charting library.
pub type SharedLibrary = Arc<dyn ChartLibrary>;

/// Polling cadence and deadline for one load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadBudget {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl LoadBudget {
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    #[must_use]
    pub fn new(poll_interval: Duration, timeout: Duration) -> Self {
        Self {
            poll_interval,
            timeout,
        }
    }
}

impl Default for LoadBudget {
    fn default() -> Self {
        Self {
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }
}

/// Named bindings published by loaded library scripts.
///
/// The registry also remembers which script urls were already injected, so
/// repeated load requests for the same source stay idempotent.
#[derive(Default)]
pub struct LibraryRegistry {
    inner: Mutex<RegistryState>,
}

#[derive(Default)]
struct RegistryState {
    bindings: IndexMap<String, SharedLibrary>,
    injected: IndexSet<String>,
}

impl LibraryRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes `library` under its own binding name, replacing any
    /// previous registration.
    pub fn register(&self, library: SharedLibrary) {
        let binding = library.binding().to_owned();
        debug!(binding, "library binding registered");
        let mut state = self.lock_state();
        state.bindings.insert(binding, library);
    }

    #[must_use]
    pub fn get(&self, binding: &str) -> Option<SharedLibrary> {
        self.lock_state().bindings.get(binding).map(Arc::clone)
    }

    #[must_use]
    pub fn contains(&self, binding: &str) -> bool {
        self.lock_state().bindings.contains_key(binding)
    }

    /// Records that `url` was injected. Returns `false` when it already was.
    fn mark_injected(&self, url: &str) -> bool {
        self.lock_state().injected.insert(url.to_owned())
    }

    /// Forgets a failed injection, so the next load retries it.
    fn clear_injected(&self, url: &str) {
        self.lock_state().injected.shift_remove(url);
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, RegistryState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Host hook that fetches a library script for a source.
///
/// Injection is fire-and-forget: the script is expected to register its
/// binding with the [`LibraryRegistry`] once it has run, and the loader polls
/// for that to happen. In a browser embedding this is the script-tag append.
pub trait ScriptHost: Send + Sync {
    fn inject(&self, source: LibrarySource) -> BridgeResult<()>;
}

/// Script host whose library is already linked in-process.
///
/// Injection publishes the library to the registry immediately, which makes
/// the subsequent poll succeed on its first check.
pub struct PreloadedScriptHost {
    registry: Arc<LibraryRegistry>,
    library: SharedLibrary,
}

impl PreloadedScriptHost {
    #[must_use]
    pub fn new(registry: Arc<LibraryRegistry>, library: SharedLibrary) -> Self {
        Self { registry, library }
    }
}

impl ScriptHost for PreloadedScriptHost {
    fn inject(&self, source: LibrarySource) -> BridgeResult<()> {
        trace!(url = source.url(), "registering preloaded library");
        self.registry.register(Arc::clone(&self.library));
        Ok(())
    }
}

/// Script host that fetches nothing.
///
/// Loads only resolve if something else registers the binding; otherwise the
/// budget expires. Models a script that never executes.
#[derive(Debug, Default)]
pub struct InertScriptHost;

impl ScriptHost for InertScriptHost {
    fn inject(&self, source: LibrarySource) -> BridgeResult<()> {
        trace!(url = source.url(), "inert host ignoring injection");
        Ok(())
    }
}

/// Resolves library bindings with idempotent injection and a bounded wait.
pub struct LibraryLoader {
    registry: Arc<LibraryRegistry>,
    host: Arc<dyn ScriptHost>,
    budget: LoadBudget,
}

impl LibraryLoader {
    #[must_use]
    pub fn new(registry: Arc<LibraryRegistry>, host: Arc<dyn ScriptHost>) -> Self {
        Self {
            registry,
            host,
            budget: LoadBudget::default(),
        }
    }

    #[must_use]
    pub fn with_budget(mut self, budget: LoadBudget) -> Self {
        self.budget = budget;
        self
    }

    #[must_use]
    pub fn registry(&self) -> Arc<LibraryRegistry> {
        Arc::clone(&self.registry)
    }

    /// Resolves `binding`, injecting the script for `source` if needed.
    ///
    /// Returns as soon as the binding is registered; fails with
    /// `LibraryUnavailable` once the budget's timeout has elapsed. A failed
    /// injection fails this load right away and is retried by the next one.
    pub async fn load(
        &self,
        source: LibrarySource,
        binding: &str,
    ) -> BridgeResult<SharedLibrary> {
        if let Some(library) = self.registry.get(binding) {
            trace!(binding, "library binding already available");
            return Ok(library);
        }

        if self.registry.mark_injected(source.url()) {
            debug!(url = source.url(), binding, "injecting library script");
            if let Err(err) = self.host.inject(source) {
                warn!(url = source.url(), error = %err, "library script injection failed");
                self.registry.clear_injected(source.url());
                return Err(err);
            }
        }

        let started = Instant::now();
        loop {
            if let Some(library) = self.registry.get(binding) {
                debug!(binding, waited = ?started.elapsed(), "library binding became available");
                return Ok(library);
            }
            let waited = started.elapsed();
            if waited >= self.budget.timeout {
                warn!(binding, ?waited, "library binding never became available");
                return Err(BridgeError::LibraryUnavailable {
                    binding: binding.to_owned(),
                    waited,
                });
            }
            sleep(self.budget.poll_interval).await;
        }
    }
}
