//! # MCB Call — Phased Call Dispatch
//!
//! The bridge's front door: takes one inbound payload and drives it
//! through a fixed lifecycle, wiring the module layer's resolution
//! context around the business phases.
//!
//! ## Lifecycle
//!
//! ```text
//! ┌───────┐   ┌───────────────┐   ┌──────────────┐   ┌──────┐
//! │ START │──▶│ ContextSwitch?│──▶│ AUTHENTICATE │──▶│ INIT │
//! └───────┘   └───────────────┘   └──────────────┘   └──┬───┘
//!                                                       │
//! ┌─────┐   ┌────────────────┐   ┌────────────┐   ┌─────▼────┐
//! │ END │◀──│ ContextRestore?│◀──│ [FINALIZE] │◀──│ PROCESS  │
//! └─────┘   └────────────────┘   └────────────┘   └──────────┘
//! ```
//!
//! - `ContextSwitch`/`ContextRestore` happen only when modules are
//!   registered; restore is guaranteed even on panic.
//! - `FINALIZE` runs iff `INIT` succeeded, exactly once; its failure
//!   overwrites the held result.
//! - Every phase failure leaves as an opaque payload, never as an error.
//!
//! ## Quick Start
//!
//! ```
//! use mcb_call::{CallConfig, CallContext, CallError, CallOrchestrator, NoHooks, Processor};
//! use mcb_module::CompositeLoader;
//! use std::sync::Arc;
//!
//! struct Upper;
//!
//! impl Processor for Upper {
//!     fn process(
//!         &self,
//!         _ctx: &mut CallContext,
//!         payload: &str,
//!     ) -> Result<String, mcb_call::BoxError> {
//!         Ok(payload.to_uppercase())
//!     }
//!
//!     fn encode_failure(&self, error: &CallError, _payload: &str) -> String {
//!         format!("!{error}")
//!     }
//! }
//!
//! let orchestrator = CallOrchestrator::new(
//!     Arc::new(CompositeLoader::new()),
//!     CallConfig::default(),
//! );
//! assert_eq!(orchestrator.dispatch(&Upper, &mut NoHooks, "ping"), "PING");
//! ```

mod config;
mod context;
mod error;
mod orchestrator;
mod traits;

pub use config::CallConfig;
pub use context::CallContext;
pub use error::{AuthError, CallError, Phase};
pub use orchestrator::{CallOrchestrator, AUDIT_TARGET};
pub use traits::{Authenticator, BoxError, CallHooks, NoHooks, Processor};
