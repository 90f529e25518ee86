//! Capabilities the orchestrator is wired to.
//!
//! The bridge core treats authentication, business processing and the
//! caller's setup/teardown as opaque capabilities: the host wires in
//! whatever implements these traits, and the orchestrator only knows
//! the phase contract.

use crate::context::CallContext;
use crate::error::{AuthError, CallError};

/// Arbitrary failure from a caller-supplied hook or processor.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The host's authentication capability.
///
/// Invoked once per call, before any hook runs. On success the
/// implementation records the established identity on the context; on
/// failure the call is aborted before anything was acquired.
pub trait Authenticator: Send + Sync {
    /// Authenticates the call, setting the caller identity on success.
    fn authenticate(&self, ctx: &mut CallContext) -> Result<(), AuthError>;
}

/// The underlying call-processing framework.
pub trait Processor: Send + Sync {
    /// Processes the call payload, returning the encoded response.
    fn process(&self, ctx: &mut CallContext, payload: &str) -> Result<String, BoxError>;

    /// Encodes a phase failure as an opaque response blob.
    ///
    /// `payload` is provided for correlation only; implementations must
    /// not branch on it.
    fn encode_failure(&self, error: &CallError, payload: &str) -> String;
}

/// Caller-supplied lifecycle hooks around PROCESS.
///
/// # Acquire/release pairing
///
/// [`finalize`](Self::finalize) is invoked if and only if
/// [`init`](Self::init) returned `Ok` — exactly once per successful
/// init, regardless of the PROCESS outcome. Typical use: `init` opens a
/// privileged session, `finalize` closes it.
pub trait CallHooks {
    /// Acquisition before processing. Defaults to a no-op.
    fn init(&mut self, _ctx: &mut CallContext) -> Result<(), BoxError> {
        Ok(())
    }

    /// Release after processing. Defaults to a no-op.
    fn finalize(&mut self, _ctx: &mut CallContext) -> Result<(), BoxError> {
        Ok(())
    }
}

/// Hooks for calls that acquire nothing.
pub struct NoHooks;

impl CallHooks for NoHooks {}
