//! Module ownership and per-module service registries.

use crate::loader::CodeRef;
use mcb_types::ModuleId;
use std::any::Any;
use std::sync::Arc;

/// A shared service instance published by a module.
///
/// Services are looked up by qualified name through the
/// [`ServiceLocator`](crate::ServiceLocator) and downcast at the call
/// site:
///
/// ```
/// use std::any::Any;
/// use mcb_module::Service;
///
/// struct ReportService;
///
/// impl Service for ReportService {
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
/// }
///
/// let service: Box<dyn Service> = Box::new(ReportService);
/// assert!(service.as_any().downcast_ref::<ReportService>().is_some());
/// ```
pub trait Service: Send + Sync {
    /// Downcast seam for callers that know the concrete type.
    fn as_any(&self) -> &dyn Any;
}

/// An independently loaded unit of code with its own service registry.
pub trait Module: Send + Sync {
    /// The module's identity.
    fn id(&self) -> &ModuleId;

    /// Returns the module's live instance registered under `name`, if any.
    fn get_service(&self, name: &str) -> Option<Arc<dyn Service>>;
}

/// Host-side lookup from resolved code to the module that owns it.
pub trait ModuleRegistry: Send + Sync {
    /// Finds the module that owns `code`.
    fn find_owning_module(&self, code: &CodeRef) -> Option<Arc<dyn Module>>;
}
