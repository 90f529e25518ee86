//! Test doubles for the module layer.
//!
//! Map-backed loaders, modules and registries used by this crate's unit
//! tests and by the policy/call crates' suites. Not compiled out of
//! non-test builds because downstream crates need them in `tests/`.

use crate::loader::{CodeRef, ModuleLoader};
use crate::registry::{Module, ModuleRegistry, Service};
use mcb_types::ModuleId;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::sync::Arc;

/// A loader backed by a fixed set of code names and resource blobs.
pub struct MapLoader {
    module: ModuleId,
    codes: Vec<String>,
    resources: HashMap<String, Vec<u8>>,
    fail_resources: bool,
}

impl MapLoader {
    /// Creates an empty loader owned by `module`.
    #[must_use]
    pub fn new(module: ModuleId) -> Self {
        Self {
            module,
            codes: Vec::new(),
            resources: HashMap::new(),
            fail_resources: false,
        }
    }

    /// Adds a resolvable code name.
    #[must_use]
    pub fn with_code(mut self, name: impl Into<String>) -> Self {
        self.codes.push(name.into());
        self
    }

    /// Adds a resource blob under `path`.
    #[must_use]
    pub fn with_resource(mut self, path: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.resources.insert(path.into(), bytes);
        self
    }

    /// Makes every `open_resource` call fail with an I/O error.
    #[must_use]
    pub fn failing_resources(mut self) -> Self {
        self.fail_resources = true;
        self
    }
}

impl ModuleLoader for MapLoader {
    fn resolve(&self, name: &str) -> Option<CodeRef> {
        self.codes
            .iter()
            .any(|c| c == name)
            .then(|| CodeRef::new(name, self.module.clone()))
    }

    fn open_resource(&self, path: &str) -> std::io::Result<Option<Box<dyn Read + Send>>> {
        if self.fail_resources {
            return Err(std::io::Error::other("simulated resource failure"));
        }
        Ok(self
            .resources
            .get(path)
            .map(|bytes| Box::new(Cursor::new(bytes.clone())) as Box<dyn Read + Send>))
    }
}

/// A module with a mutable in-memory service registry.
pub struct StaticModule {
    id: ModuleId,
    services: RwLock<HashMap<String, Arc<dyn Service>>>,
}

impl StaticModule {
    /// Creates a module with no published services.
    #[must_use]
    pub fn new(id: ModuleId) -> Self {
        Self {
            id,
            services: RwLock::new(HashMap::new()),
        }
    }

    /// Publishes (or replaces) a service under `name`.
    pub fn publish(&self, name: impl Into<String>, service: Arc<dyn Service>) {
        self.services.write().insert(name.into(), service);
    }

    /// Withdraws the service registered under `name`.
    pub fn withdraw(&self, name: &str) -> bool {
        self.services.write().remove(name).is_some()
    }
}

impl Module for StaticModule {
    fn id(&self) -> &ModuleId {
        &self.id
    }

    fn get_service(&self, name: &str) -> Option<Arc<dyn Service>> {
        self.services.read().get(name).cloned()
    }
}

/// A registry backed by a fixed ModuleId → Module map.
#[derive(Default)]
pub struct MapRegistry {
    modules: HashMap<ModuleId, Arc<dyn Module>>,
}

impl MapRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a module keyed by its identity.
    #[must_use]
    pub fn with_module(mut self, id: ModuleId, module: Arc<dyn Module>) -> Self {
        self.modules.insert(id, module);
        self
    }
}

impl ModuleRegistry for MapRegistry {
    fn find_owning_module(&self, code: &CodeRef) -> Option<Arc<dyn Module>> {
        self.modules.get(&code.module).cloned()
    }
}
