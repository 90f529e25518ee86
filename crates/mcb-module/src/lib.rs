//! Module resolution layer for the Modular Call Bridge.
//!
//! In the host, code arrives as independently activated modules, each with
//! its own resolver and service registry. The call framework, however,
//! expects one place to resolve names. This crate bridges the two:
//!
//! ```text
//! ┌────────────┐  add(key, loader)   ┌──────────────────┐
//! │  Module A  │ ──────────────────► │                  │
//! ├────────────┤                     │  CompositeLoader │ ◄── one virtual
//! │  Module B  │ ──────────────────► │  (ordered, CoW)  │     resolver
//! ├────────────┤                     │                  │
//! │  Module C  │ ──────────────────► └──────────────────┘
//! └────────────┘                              │
//!                                 ResolutionScope (thread-local,
//!                                 save on install / restore on drop)
//! ```
//!
//! # Pieces
//!
//! | Item | Purpose |
//! |------|---------|
//! | [`ModuleLoader`] | Per-module code/resource resolution capability |
//! | [`CompositeLoader`] | Ordered merge of registered loaders |
//! | [`ResolutionScope`] | Scoped install/restore of the thread's active loader |
//! | [`Module`], [`ModuleRegistry`] | Ownership and per-module service registries |
//! | [`ServiceLocator`] | Name-keyed shared-instance cache with factory fallback |
//!
//! # Concurrency
//!
//! Module activation can race with in-flight calls. The composite loader
//! keeps its delegate list behind a copy-on-write snapshot so a resolution
//! in progress always sees a consistent ordered view; the service locator
//! cache is a read-heavy `RwLock` map.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use mcb_module::{CompositeLoader, ModuleLoader};
//! use mcb_module::testing::MapLoader;
//! use mcb_types::ModuleId;
//!
//! let composite = CompositeLoader::new();
//! let module = ModuleId::host("reports");
//! composite.add("reports", Arc::new(MapLoader::new(module).with_code("api.Report")));
//!
//! let code = composite.resolve("api.Report").expect("registered");
//! assert_eq!(code.name, "api.Report");
//! ```

mod composite;
mod context;
mod error;
mod loader;
mod locator;
mod registry;

pub mod testing;

pub use composite::CompositeLoader;
pub use context::{current, ResolutionScope};
pub use error::LocatorError;
pub use loader::{CodeRef, ModuleLoader};
pub use locator::{ServiceFactory, ServiceLocator};
pub use registry::{Module, ModuleRegistry, Service};
