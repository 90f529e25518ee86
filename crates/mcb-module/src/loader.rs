//! The per-module code resolution capability.

use mcb_types::ModuleId;
use std::io::Read;

/// A resolved code handle.
///
/// The host resolves qualified names instead of linking against a static
/// class path, so "code" is represented as a name tagged with the module
/// that owns it. The service locator uses the tag to find the owning
/// module's service registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeRef {
    /// Qualified name the loader resolved (e.g., `"api.ReportService"`).
    pub name: String,
    /// The module whose resolver produced this handle.
    pub module: ModuleId,
}

impl CodeRef {
    /// Creates a code handle owned by `module`.
    #[must_use]
    pub fn new(name: impl Into<String>, module: ModuleId) -> Self {
        Self {
            name: name.into(),
            module,
        }
    }
}

/// Code and resource resolution for one module.
///
/// Registered by the host at module-activation time and never mutated;
/// removed only by explicit deregistration. Implementations are expected
/// to do their own caching — the composite layer does not cache results.
///
/// # Contract
///
/// - [`resolve`](Self::resolve) returns `None` when the name is unknown
///   to this module; it must not fail loudly, since the composite loader
///   will consult the next delegate.
/// - [`open_resource`](Self::open_resource) distinguishes "not found"
///   (`Ok(None)`) from an I/O failure (`Err`); callers decide whether an
///   I/O failure is fatal (the policy chain treats it as a miss).
pub trait ModuleLoader: Send + Sync {
    /// Resolves a qualified name to a code handle.
    fn resolve(&self, name: &str) -> Option<CodeRef>;

    /// Opens a byte stream for a resource path inside the module.
    fn open_resource(&self, path: &str) -> std::io::Result<Option<Box<dyn Read + Send>>>;
}
