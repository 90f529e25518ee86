//! Core types for the Modular Call Bridge (MCB).
//!
//! MCB lets a remote-call processing framework run inside a host where code
//! arrives as independently loaded, reloadable modules instead of a single
//! static resolution context. This crate is the foundation layer every other
//! MCB crate builds on.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Foundation Layer                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  mcb-types   : ModuleId, CallId, Caller, ErrorCode  ◄── HERE │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Resolution Layer                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  mcb-module  : ModuleLoader, CompositeLoader, ServiceLocator │
//! │  mcb-policy  : PolicyDescriptor, PolicyResolver chain        │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Call Layer                              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  mcb-call    : CallOrchestrator, CallContext, capabilities   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Identifier Design
//!
//! Identifiers are UUID-based. Host-activated modules get deterministic
//! UUID v5 identities so the same module name maps to the same identity
//! across processes; ad-hoc modules get random v4 identities.
//!
//! # Example
//!
//! ```
//! use mcb_types::{CallId, Caller, ModuleId};
//!
//! // Host modules have deterministic UUIDs
//! let reports = ModuleId::host("reports");
//! assert_eq!(reports, ModuleId::host("reports"));
//!
//! // Each inbound call gets its own identity for audit correlation
//! let call = CallId::new();
//! println!("servicing {call}");
//!
//! // Who is calling (None until authentication succeeds)
//! let caller = Caller::user("alice");
//! assert_eq!(caller.label(), "alice");
//! ```

mod caller;
mod error;
mod id;

pub use caller::Caller;
pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use id::{CallId, ModuleId};
