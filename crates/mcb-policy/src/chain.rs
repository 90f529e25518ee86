//! The fallback chain that locates a policy artifact.

use crate::descriptor::{parse_policy, PolicyDescriptor};
use crate::error::PolicyError;
use mcb_module::ModuleLoader;
use std::io::Read;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// File extension for policy artifacts.
pub const POLICY_EXTENSION: &str = ".policy";

/// A privileged resource-resolution handle.
///
/// Acquired from a [`SessionFactory`], used for at most one chain
/// strategy, and released by `Drop` — the drop is the guaranteed logout
/// path, so the handle is released on success, miss and failure alike.
pub trait ResolverSession: Send {
    /// Resolves `path` to a resource stream through the privileged view.
    fn resolve(&mut self, path: &str) -> std::io::Result<Option<Box<dyn Read + Send>>>;
}

/// Opens privileged resolver sessions.
pub trait SessionFactory: Send + Sync {
    /// Logs in a privileged session.
    fn open_privileged(&self) -> std::io::Result<Box<dyn ResolverSession>>;
}

/// The host container's static resource mechanism.
pub trait StaticResources: Send + Sync {
    /// Opens a static resource stream.
    fn open(&self, path: &str) -> std::io::Result<Option<Box<dyn Read + Send>>>;
}

/// Locates policy artifacts through an ordered chain of strategies.
///
/// | # | Strategy | Used when |
/// |---|----------|-----------|
/// | 1 | module-resource | a home module is designated |
/// | 2 | resolver-service | a session factory is configured |
/// | 3 | container-default | a static-resource mechanism is configured |
///
/// Every strategy failure — `None` or an I/O error — falls through to
/// the next strategy; an error from one strategy never propagates past
/// the chain.
pub struct PolicyResolver {
    home: Option<Arc<dyn ModuleLoader>>,
    sessions: Option<Arc<dyn SessionFactory>>,
    container: Option<Arc<dyn StaticResources>>,
}

impl PolicyResolver {
    /// Creates a resolver with no strategies configured.
    #[must_use]
    pub fn new() -> Self {
        Self {
            home: None,
            sessions: None,
            container: None,
        }
    }

    /// Designates the module whose resources hold the artifact.
    #[must_use]
    pub fn with_home_module(mut self, home: Arc<dyn ModuleLoader>) -> Self {
        self.home = Some(home);
        self
    }

    /// Configures the privileged resolver-service strategy.
    #[must_use]
    pub fn with_sessions(mut self, sessions: Arc<dyn SessionFactory>) -> Self {
        self.sessions = Some(sessions);
        self
    }

    /// Configures the container's static-resource fallback.
    #[must_use]
    pub fn with_container(mut self, container: Arc<dyn StaticResources>) -> Self {
        self.container = Some(container);
        self
    }

    /// Runs the chain until a strategy yields a stream.
    ///
    /// Returns `None` when every configured strategy came up empty.
    #[must_use]
    pub fn open(&self, path: &str) -> Option<Box<dyn Read + Send>> {
        if let Some(home) = &self.home {
            match home.open_resource(path) {
                Ok(Some(stream)) => return Some(stream),
                Ok(None) => debug!(%path, "home module has no such resource"),
                Err(e) => debug!(%path, error = %e, "module-resource strategy failed, falling through"),
            }
        }

        if let Some(sessions) = &self.sessions {
            match self.open_via_session(sessions.as_ref(), path) {
                Ok(Some(stream)) => return Some(stream),
                Ok(None) => debug!(%path, "resolver service has no such resource"),
                Err(e) => debug!(%path, error = %e, "resolver-service strategy failed, falling through"),
            }
        }

        if let Some(container) = &self.container {
            match container.open(path) {
                Ok(Some(stream)) => return Some(stream),
                Ok(None) => debug!(%path, "container has no such resource"),
                Err(e) => debug!(%path, error = %e, "container-default strategy failed"),
            }
        }

        None
    }

    /// Session-scoped resolution: the session lives exactly as long as
    /// this frame and is released by drop on every exit path.
    fn open_via_session(
        &self,
        sessions: &dyn SessionFactory,
        path: &str,
    ) -> std::io::Result<Option<Box<dyn Read + Send>>> {
        let mut session = sessions.open_privileged()?;
        session.resolve(path)
    }

    /// Locates and parses the artifact at `path`.
    ///
    /// - No strategy yields a stream → logged, `Ok(None)`; callers must
    ///   treat the absent descriptor as "request cannot be serviced".
    /// - Stream obtained but malformed/unreadable → `Err` (hard), logged
    ///   as a configuration problem.
    pub fn load(
        &self,
        path: &str,
        loader: &dyn ModuleLoader,
    ) -> Result<Option<PolicyDescriptor>, PolicyError> {
        let Some(stream) = self.open(path) else {
            warn!(%path, "policy artifact not found; was it included in the deployment?");
            return Ok(None);
        };

        match parse_policy(stream, loader, path) {
            Ok(descriptor) => Ok(Some(descriptor)),
            Err(e) => {
                error!(%path, error = %e, "policy artifact unusable");
                Err(e)
            }
        }
    }
}

impl Default for PolicyResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Derives the artifact path for a call.
///
/// The module base path must sit inside the servicing context path;
/// anything else means the client and server deployments disagree, which
/// is logged and yields `None`. Otherwise the context prefix is stripped,
/// `root` is prepended and the strong name plus [`POLICY_EXTENSION`] is
/// appended.
#[must_use]
pub fn policy_path(
    context_path: &str,
    module_base_path: &str,
    strong_name: &str,
    root: &str,
) -> Option<String> {
    if !module_base_path.starts_with(context_path) {
        warn!(
            %module_base_path,
            %context_path,
            "module base path is outside this context; client and server may be out of date"
        );
        return None;
    }
    let relative = &module_base_path[context_path.len()..];
    Some(format!("{root}{relative}{strong_name}{POLICY_EXTENSION}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcb_module::testing::MapLoader;
    use mcb_types::ModuleId;
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const PATH: &str = "app/ABCDEF.policy";

    fn bytes_of(mut stream: Box<dyn Read + Send>) -> Vec<u8> {
        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).unwrap();
        buf
    }

    /// Session double that counts how many live sessions exist, so tests
    /// can prove release happened on every exit path.
    struct CountingFactory {
        live: Arc<AtomicUsize>,
        opened: Arc<AtomicUsize>,
        payload: Option<Vec<u8>>,
        fail_resolve: bool,
    }

    struct CountingSession {
        live: Arc<AtomicUsize>,
        payload: Option<Vec<u8>>,
        fail_resolve: bool,
    }

    impl SessionFactory for CountingFactory {
        fn open_privileged(&self) -> std::io::Result<Box<dyn ResolverSession>> {
            self.opened.fetch_add(1, Ordering::SeqCst);
            self.live.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(CountingSession {
                live: Arc::clone(&self.live),
                payload: self.payload.clone(),
                fail_resolve: self.fail_resolve,
            }))
        }
    }

    impl ResolverSession for CountingSession {
        fn resolve(&mut self, _path: &str) -> std::io::Result<Option<Box<dyn Read + Send>>> {
            if self.fail_resolve {
                return Err(std::io::Error::other("resolver hung up"));
            }
            Ok(self
                .payload
                .clone()
                .map(|p| Box::new(Cursor::new(p)) as Box<dyn Read + Send>))
        }
    }

    impl Drop for CountingSession {
        fn drop(&mut self) {
            self.live.fetch_sub(1, Ordering::SeqCst);
        }
    }

    fn counting_factory(
        payload: Option<&[u8]>,
        fail_resolve: bool,
    ) -> (Arc<CountingFactory>, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let live = Arc::new(AtomicUsize::new(0));
        let opened = Arc::new(AtomicUsize::new(0));
        let factory = Arc::new(CountingFactory {
            live: Arc::clone(&live),
            opened: Arc::clone(&opened),
            payload: payload.map(<[u8]>::to_vec),
            fail_resolve,
        });
        (factory, live, opened)
    }

    struct MapContainer(Vec<u8>);

    impl StaticResources for MapContainer {
        fn open(&self, _path: &str) -> std::io::Result<Option<Box<dyn Read + Send>>> {
            Ok(Some(Box::new(Cursor::new(self.0.clone()))))
        }
    }

    #[test]
    fn home_module_strategy_first() {
        let home = Arc::new(
            MapLoader::new(ModuleId::host("app")).with_resource(PATH, b"from-module".to_vec()),
        );
        let (factory, _, opened) = counting_factory(Some(b"from-session"), false);
        let resolver = PolicyResolver::new()
            .with_home_module(home)
            .with_sessions(factory);

        assert_eq!(bytes_of(resolver.open(PATH).unwrap()), b"from-module");
        // Strategy 2 was never consulted.
        assert_eq!(opened.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn module_io_error_falls_through_to_session() {
        let home = Arc::new(MapLoader::new(ModuleId::host("app")).failing_resources());
        let (factory, live, opened) = counting_factory(Some(b"from-session"), false);
        let resolver = PolicyResolver::new()
            .with_home_module(home)
            .with_sessions(factory);

        assert_eq!(bytes_of(resolver.open(PATH).unwrap()), b"from-session");
        assert_eq!(opened.load(Ordering::SeqCst), 1);
        // The session was released before the chain returned.
        assert_eq!(live.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn session_released_on_miss_and_failure() {
        let (miss_factory, miss_live, _) = counting_factory(None, false);
        let resolver = PolicyResolver::new().with_sessions(miss_factory);
        assert!(resolver.open(PATH).is_none());
        assert_eq!(miss_live.load(Ordering::SeqCst), 0);

        let (err_factory, err_live, _) = counting_factory(None, true);
        let resolver = PolicyResolver::new().with_sessions(err_factory);
        assert!(resolver.open(PATH).is_none());
        assert_eq!(err_live.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn container_default_is_last_resort() {
        let (factory, _, _) = counting_factory(None, false);
        let resolver = PolicyResolver::new()
            .with_sessions(factory)
            .with_container(Arc::new(MapContainer(b"from-container".to_vec())));

        assert_eq!(bytes_of(resolver.open(PATH).unwrap()), b"from-container");
    }

    #[test]
    fn load_absent_artifact_is_none() {
        let resolver = PolicyResolver::new();
        let loader = MapLoader::new(ModuleId::host("m"));
        assert!(resolver.load(PATH, &loader).unwrap().is_none());
    }

    #[test]
    fn load_parses_through_chain() {
        let home = Arc::new(
            MapLoader::new(ModuleId::host("app"))
                .with_resource(PATH, b"api.Report, true, true\n".to_vec()),
        );
        let resolver = PolicyResolver::new().with_home_module(home);
        let loader = MapLoader::new(ModuleId::host("m")).with_code("api.Report");

        let descriptor = resolver.load(PATH, &loader).unwrap().unwrap();
        assert!(descriptor.contains("api.Report"));
    }

    #[test]
    fn load_malformed_is_hard() {
        let home = Arc::new(
            MapLoader::new(ModuleId::host("app")).with_resource(PATH, b"broken line\n".to_vec()),
        );
        let resolver = PolicyResolver::new().with_home_module(home);
        let loader = MapLoader::new(ModuleId::host("m"));

        assert!(resolver.load(PATH, &loader).is_err());
    }

    #[test]
    fn policy_path_inside_context() {
        let path = policy_path("/portal", "/portal/app/", "ABCDEF", "webroot").unwrap();
        assert_eq!(path, "webroot/app/ABCDEF.policy");
    }

    #[test]
    fn policy_path_outside_context_is_none() {
        assert!(policy_path("/portal", "/elsewhere/app/", "ABCDEF", "").is_none());
    }
}
