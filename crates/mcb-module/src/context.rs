//! Thread-local resolution context with scoped save/restore.
//!
//! The one place MCB keeps ambient state: the worker thread's active
//! resolution context. Everything else is passed explicitly, but the
//! framework underneath resolves names against "the current loader", so
//! the switch is encapsulated as a scoped-acquisition primitive whose
//! release cannot be forgotten.
//!
//! # Invariant
//!
//! The previous context is restored when the scope drops — on the success
//! path, on the error path, and during unwind. A worker thread that
//! services unrelated calls back to back must never observe a stale
//! loader from an earlier call.

use crate::loader::ModuleLoader;
use std::cell::RefCell;
use std::sync::Arc;

thread_local! {
    static ACTIVE: RefCell<Option<Arc<dyn ModuleLoader>>> = const { RefCell::new(None) };
}

/// Returns the thread's active resolution loader, if one is installed.
#[must_use]
pub fn current() -> Option<Arc<dyn ModuleLoader>> {
    ACTIVE.with(|slot| slot.borrow().clone())
}

/// RAII guard that installs a loader as the thread's active resolution
/// context and restores the previous one on drop.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use mcb_module::{current, CompositeLoader, ResolutionScope};
///
/// assert!(current().is_none());
/// {
///     let loader = Arc::new(CompositeLoader::new());
///     let _scope = ResolutionScope::install(loader);
///     assert!(current().is_some());
/// }
/// // Restored when the scope dropped
/// assert!(current().is_none());
/// ```
pub struct ResolutionScope {
    previous: Option<Arc<dyn ModuleLoader>>,
}

impl ResolutionScope {
    /// Saves the current context and installs `loader` in its place.
    #[must_use]
    pub fn install(loader: Arc<dyn ModuleLoader>) -> Self {
        let previous = ACTIVE.with(|slot| slot.borrow_mut().replace(loader));
        Self { previous }
    }
}

impl Drop for ResolutionScope {
    fn drop(&mut self) {
        let previous = self.previous.take();
        ACTIVE.with(|slot| {
            *slot.borrow_mut() = previous;
        });
    }
}
