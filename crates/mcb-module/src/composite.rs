//! Composite loader — ordered merge of registered module loaders.

use crate::loader::{CodeRef, ModuleLoader};
use parking_lot::RwLock;
use std::io::Read;
use std::sync::Arc;

/// One registered delegate.
type Delegate = (String, Arc<dyn ModuleLoader>);

/// Merges any number of module loaders into one virtual resolver.
///
/// # Ordering
///
/// Delegates are consulted in registration order; the first success wins.
/// Registering under an existing key replaces the loader in place, keeping
/// the key's original position, so resolution order never shifts under a
/// re-activation.
///
/// # Concurrency
///
/// The delegate list is a copy-on-write snapshot: readers clone an `Arc`
/// to the current vector, writers build a new vector and swap it in. A
/// module activating mid-request never mutates the view a resolution in
/// progress is iterating.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use mcb_module::{CompositeLoader, ModuleLoader};
/// use mcb_module::testing::MapLoader;
/// use mcb_types::ModuleId;
///
/// let composite = CompositeLoader::new();
/// assert!(composite.is_empty());
///
/// composite.add(
///     "reports",
///     Arc::new(MapLoader::new(ModuleId::host("reports")).with_code("api.Report")),
/// );
/// assert_eq!(composite.len(), 1);
/// assert!(composite.resolve("api.Report").is_some());
/// assert!(composite.resolve("api.Unknown").is_none());
/// ```
pub struct CompositeLoader {
    delegates: RwLock<Arc<Vec<Delegate>>>,
}

impl CompositeLoader {
    /// Creates a composite with no delegates.
    #[must_use]
    pub fn new() -> Self {
        Self {
            delegates: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// Registers or replaces the loader under `key`.
    ///
    /// A new key appends to the end (resolution order is registration
    /// order); an existing key keeps its position.
    pub fn add(&self, key: impl Into<String>, loader: Arc<dyn ModuleLoader>) {
        let key = key.into();
        let mut guard = self.delegates.write();
        let mut next: Vec<Delegate> = guard.as_ref().clone();
        match next.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = loader,
            None => next.push((key, loader)),
        }
        *guard = Arc::new(next);
    }

    /// Removes the loader registered under `key`.
    ///
    /// Returns `true` if a delegate was removed. The host calls this when
    /// a module deactivates.
    pub fn remove(&self, key: &str) -> bool {
        let mut guard = self.delegates.write();
        if !guard.iter().any(|(k, _)| k == key) {
            return false;
        }
        let next: Vec<Delegate> = guard
            .iter()
            .filter(|(k, _)| k != key)
            .cloned()
            .collect();
        *guard = Arc::new(next);
        true
    }

    /// Number of registered delegates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.delegates.read().len()
    }

    /// `true` when no delegates are registered.
    ///
    /// The orchestrator uses this to decide whether a context switch is
    /// needed at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.delegates.read().is_empty()
    }

    /// Takes a consistent snapshot of the current delegate list.
    fn snapshot(&self) -> Arc<Vec<Delegate>> {
        Arc::clone(&self.delegates.read())
    }
}

impl Default for CompositeLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleLoader for CompositeLoader {
    /// Tries delegates in registration order, returning the first success.
    ///
    /// An empty delegate set short-circuits without iteration. A delegate
    /// miss never blocks consultation of the next delegate.
    fn resolve(&self, name: &str) -> Option<CodeRef> {
        let snapshot = self.snapshot();
        if snapshot.is_empty() {
            return None;
        }
        for (key, loader) in snapshot.iter() {
            if let Some(code) = loader.resolve(name) {
                tracing::trace!(delegate = %key, %name, "composite resolve hit");
                return Some(code);
            }
        }
        None
    }

    /// Tries delegates in registration order for a resource stream.
    ///
    /// A delegate I/O failure is logged and treated as a miss so later
    /// delegates still get consulted; `Err` is returned only when no
    /// delegate could be asked at all (never, in practice).
    fn open_resource(&self, path: &str) -> std::io::Result<Option<Box<dyn Read + Send>>> {
        let snapshot = self.snapshot();
        if snapshot.is_empty() {
            return Ok(None);
        }
        for (key, loader) in snapshot.iter() {
            match loader.open_resource(path) {
                Ok(Some(stream)) => return Ok(Some(stream)),
                Ok(None) => {}
                Err(e) => {
                    tracing::debug!(delegate = %key, %path, error = %e, "delegate resource open failed, trying next");
                }
            }
        }
        Ok(None)
    }
}
