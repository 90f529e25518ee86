//! Service locator — name-keyed cache of shared service instances.

use crate::error::LocatorError;
use crate::loader::ModuleLoader;
use crate::registry::{ModuleRegistry, Service};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Fallback constructor registered per service name.
///
/// The compile-safe replacement for reflective default construction:
/// when a module has no registered instance for a name, the locator runs
/// this factory instead.
pub type ServiceFactory =
    Arc<dyn Fn() -> Result<Arc<dyn Service>, String> + Send + Sync>;

/// Locates and caches service instances by qualified name across the
/// modular host.
///
/// # Lookup sequence
///
/// 1. Cache hit → return it (no re-resolution).
/// 2. Resolve the name through the dynamic loader; a miss is logged and
///    yields `None` — the miss is NOT cached, a module activating later
///    may satisfy it.
/// 3. Find the owning module and ask its service registry for a live
///    instance; a hit is cached under the name and returned.
/// 4. No registered instance → construct a fresh one via the registered
///    factory, **without caching** (such services are assumed stateless
///    and cheap, or the missing registration is transient). A missing or
///    failing factory is a hard error.
///
/// # Cache semantics
///
/// Once present, an entry is stable for the process lifetime unless
/// explicitly [`invalidate`](Self::invalidate)d. Absence is never cached.
///
/// # Concurrency
///
/// Shared across all calls; many lookups, rare first-insertions, so the
/// cache sits behind a read-preferring `RwLock`.
pub struct ServiceLocator {
    loader: Arc<dyn ModuleLoader>,
    registry: Arc<dyn ModuleRegistry>,
    cache: RwLock<HashMap<String, Arc<dyn Service>>>,
    factories: RwLock<HashMap<String, ServiceFactory>>,
}

impl ServiceLocator {
    /// Creates a locator resolving through `loader` and `registry`.
    ///
    /// Ownership is injected, never ambient: the host constructs one
    /// locator and shares it across calls.
    #[must_use]
    pub fn new(loader: Arc<dyn ModuleLoader>, registry: Arc<dyn ModuleRegistry>) -> Self {
        Self {
            loader,
            registry,
            cache: RwLock::new(HashMap::new()),
            factories: RwLock::new(HashMap::new()),
        }
    }

    /// Registers the fallback factory for `name`.
    pub fn register_factory(&self, name: impl Into<String>, factory: ServiceFactory) {
        self.factories.write().insert(name.into(), factory);
    }

    /// Looks up the service registered under `name`.
    ///
    /// Returns `Ok(None)` when the name is empty, unresolvable, or owned
    /// by a module the registry does not know — all conditions a later
    /// call might see differently. Returns `Err` only from the fallback
    /// construction path.
    pub fn get_instance(&self, name: &str) -> Result<Option<Arc<dyn Service>>, LocatorError> {
        if name.is_empty() {
            return Ok(None);
        }

        if let Some(cached) = self.cache.read().get(name) {
            return Ok(Some(Arc::clone(cached)));
        }

        let Some(code) = self.loader.resolve(name) else {
            error!(%name, "service name not resolvable through any module loader");
            return Ok(None);
        };

        let Some(module) = self.registry.find_owning_module(&code) else {
            debug!(%name, module = %code.module, "no registry entry for owning module");
            return Ok(None);
        };

        if let Some(service) = module.get_service(name) {
            self.cache
                .write()
                .insert(name.to_string(), Arc::clone(&service));
            return Ok(Some(service));
        }

        // No live instance registered; construct fresh, never cache.
        info!(%name, module = %module.id(), "no registered instance, constructing fallback");
        let factory = {
            let factories = self.factories.read();
            factories.get(name).cloned()
        };
        match factory {
            Some(factory) => factory().map(Some).map_err(|reason| {
                LocatorError::ConstructionFailed {
                    name: name.to_string(),
                    reason,
                }
            }),
            None => Err(LocatorError::NoFactory {
                name: name.to_string(),
            }),
        }
    }

    /// Puts an instance directly into the cache.
    pub fn insert(&self, name: impl Into<String>, service: Arc<dyn Service>) {
        self.cache.write().insert(name.into(), service);
    }

    /// Drops the cached entry for `name`, if any.
    pub fn invalidate(&self, name: &str) -> bool {
        self.cache.write().remove(name).is_some()
    }

    /// Returns the cached entry for `name` without resolving.
    #[must_use]
    pub fn cached(&self, name: &str) -> Option<Arc<dyn Service>> {
        self.cache.read().get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MapLoader, MapRegistry, StaticModule};
    use mcb_types::ModuleId;
    use std::any::Any;

    struct Probe(&'static str);

    impl Service for Probe {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn locator_with(
        codes: &[&str],
        services: &[(&str, &'static str)],
    ) -> (ServiceLocator, Arc<StaticModule>) {
        let module_id = ModuleId::host("m");
        let mut loader = MapLoader::new(module_id.clone());
        for c in codes {
            loader = loader.with_code(*c);
        }
        let module = Arc::new(StaticModule::new(module_id.clone()));
        for (name, tag) in services {
            module.publish(*name, Arc::new(Probe(tag)));
        }
        let registry = MapRegistry::new().with_module(module_id, Arc::clone(&module) as _);
        (
            ServiceLocator::new(Arc::new(loader), Arc::new(registry)),
            module,
        )
    }

    fn tag(service: &Arc<dyn Service>) -> &'static str {
        service.as_any().downcast_ref::<Probe>().unwrap().0
    }

    #[test]
    fn empty_name_yields_none() {
        let (locator, _) = locator_with(&[], &[]);
        assert!(locator.get_instance("").unwrap().is_none());
    }

    #[test]
    fn unresolvable_name_yields_none_uncached() {
        let (locator, _) = locator_with(&[], &[]);
        assert!(locator.get_instance("api.Gone").unwrap().is_none());
        assert!(locator.cached("api.Gone").is_none());
    }

    #[test]
    fn registered_service_is_cached() {
        let (locator, _) = locator_with(&["api.Report"], &[("api.Report", "live")]);

        let first = locator.get_instance("api.Report").unwrap().unwrap();
        assert_eq!(tag(&first), "live");
        assert!(locator.cached("api.Report").is_some());

        let second = locator.get_instance("api.Report").unwrap().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn fallback_constructs_fresh_without_caching() {
        let (locator, module) = locator_with(&["api.Report"], &[]);
        locator.register_factory(
            "api.Report",
            Arc::new(|| Ok(Arc::new(Probe("fresh")) as Arc<dyn Service>)),
        );

        let a = locator.get_instance("api.Report").unwrap().unwrap();
        let b = locator.get_instance("api.Report").unwrap().unwrap();
        assert_eq!(tag(&a), "fresh");
        assert!(!Arc::ptr_eq(&a, &b)); // re-instantiated each call
        assert!(locator.cached("api.Report").is_none());

        // A registration appearing later is found and cached on the next call.
        module.publish("api.Report", Arc::new(Probe("registered")));
        let c = locator.get_instance("api.Report").unwrap().unwrap();
        assert_eq!(tag(&c), "registered");
        assert!(locator.cached("api.Report").is_some());
    }

    #[test]
    fn factory_failure_is_hard_error() {
        let (locator, _) = locator_with(&["api.Report"], &[]);
        locator.register_factory("api.Report", Arc::new(|| Err("ctor blew up".into())));

        let err = locator.get_instance("api.Report").err().unwrap();
        assert!(matches!(err, LocatorError::ConstructionFailed { .. }));
    }

    #[test]
    fn missing_factory_is_hard_error() {
        let (locator, _) = locator_with(&["api.Report"], &[]);
        let err = locator.get_instance("api.Report").err().unwrap();
        assert!(matches!(err, LocatorError::NoFactory { .. }));
    }

    #[test]
    fn invalidate_forces_re_resolution() {
        let (locator, module) = locator_with(&["api.Report"], &[("api.Report", "v1")]);
        assert_eq!(tag(&locator.get_instance("api.Report").unwrap().unwrap()), "v1");

        module.publish("api.Report", Arc::new(Probe("v2")));
        // Cache is stable until invalidated.
        assert_eq!(tag(&locator.get_instance("api.Report").unwrap().unwrap()), "v1");

        assert!(locator.invalidate("api.Report"));
        assert_eq!(tag(&locator.get_instance("api.Report").unwrap().unwrap()), "v2");
    }
}
