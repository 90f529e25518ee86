//! The call lifecycle orchestrator.

use crate::config::CallConfig;
use crate::context::CallContext;
use crate::error::{CallError, Phase};
use crate::traits::{Authenticator, CallHooks, Processor};
use mcb_module::{CompositeLoader, ModuleLoader, ResolutionScope};
use mcb_types::ErrorCode;
use std::sync::Arc;
use tracing::{error, info};

/// Dedicated tracing target for the per-call audit trail.
///
/// Every phase transition logs here with the call id, phase, caller and
/// outcome, so one call's history can be filtered out of the host's log
/// stream.
pub const AUDIT_TARGET: &str = "mcb::audit";

/// Drives one inbound call through the fixed phase sequence.
///
/// ```text
/// START -> (ContextSwitch?) -> AUTHENTICATE -> INIT -> PROCESS
///       -> [FINALIZE] -> (ContextRestore?) -> END
/// ```
///
/// # Phase rules
///
/// - **ContextSwitch** happens only when the composite loader has at
///   least one delegate; the previous thread context is restored
///   unconditionally when the dispatch frame unwinds — success, failure
///   or panic — so a reused worker thread never inherits a stale
///   resolution context.
/// - **AUTHENTICATE** failure aborts before anything was acquired.
/// - **FINALIZE** runs iff **INIT** succeeded, exactly once per call.
/// - A **FINALIZE** failure overwrites the held result, even a
///   successful one.
///
/// Every phase failure is converted into an opaque failure payload via
/// [`Processor::encode_failure`]; no error crosses the dispatch boundary.
///
/// One instance serves many calls concurrently; all per-call state lives
/// in the [`CallContext`] created inside [`dispatch`](Self::dispatch).
pub struct CallOrchestrator {
    loaders: Arc<CompositeLoader>,
    authenticator: Option<Arc<dyn Authenticator>>,
    config: CallConfig,
}

impl CallOrchestrator {
    /// Creates an orchestrator resolving through `loaders`.
    #[must_use]
    pub fn new(loaders: Arc<CompositeLoader>, config: CallConfig) -> Self {
        Self {
            loaders,
            authenticator: None,
            config,
        }
    }

    /// Wires in the host's authentication capability.
    #[must_use]
    pub fn with_authenticator(mut self, authenticator: Arc<dyn Authenticator>) -> Self {
        self.authenticator = Some(authenticator);
        self
    }

    /// The composite loader calls resolve against.
    #[must_use]
    pub fn loaders(&self) -> &Arc<CompositeLoader> {
        &self.loaders
    }

    /// Services one inbound call and returns the response payload —
    /// the PROCESS result, or the failure payload of whichever phase
    /// aborted last.
    pub fn dispatch(
        &self,
        processor: &dyn Processor,
        hooks: &mut dyn CallHooks,
        payload: &str,
    ) -> String {
        let mut ctx = CallContext::new();

        // ContextSwitch only when modules are registered; the guard's
        // drop is the ContextRestore and runs even if a phase unwinds.
        let _scope = (!self.loaders.is_empty()).then(|| {
            ResolutionScope::install(Arc::clone(&self.loaders) as Arc<dyn ModuleLoader>)
        });

        self.run_phases(processor, hooks, &mut ctx, payload)
    }

    fn run_phases(
        &self,
        processor: &dyn Processor,
        hooks: &mut dyn CallHooks,
        ctx: &mut CallContext,
        payload: &str,
    ) -> String {
        if let Some(authenticator) = &self.authenticator {
            if let Err(e) = authenticator.authenticate(ctx) {
                return self.fail(processor, ctx, payload, CallError::from(e));
            }
            self.audit_phase_ok(ctx, Phase::Authenticate, payload);
        }

        if let Err(e) = hooks.init(ctx) {
            // Nothing was acquired; finalize is not owed.
            return self.fail(
                processor,
                ctx,
                payload,
                CallError::Init {
                    reason: e.to_string(),
                },
            );
        }
        self.audit_phase_ok(ctx, Phase::Init, payload);

        let mut outcome = match processor.process(ctx, payload) {
            Ok(result) => {
                info!(
                    target: AUDIT_TARGET,
                    call = %ctx.id(),
                    phase = %Phase::Process,
                    caller = ctx.caller_label(),
                    "call processed"
                );
                result
            }
            Err(e) => self.fail(
                processor,
                ctx,
                payload,
                CallError::Process {
                    reason: e.to_string(),
                },
            ),
        };

        // Init succeeded, so finalize is owed exactly once — and its
        // failure wins over whatever outcome is currently held.
        if let Err(e) = hooks.finalize(ctx) {
            outcome = self.fail(
                processor,
                ctx,
                payload,
                CallError::Finalize {
                    reason: e.to_string(),
                },
            );
        }

        outcome
    }

    fn audit_phase_ok(&self, ctx: &CallContext, phase: Phase, payload: &str) {
        if self.config.log_payloads {
            info!(
                target: AUDIT_TARGET,
                call = %ctx.id(),
                phase = %phase,
                caller = ctx.caller_label(),
                %payload,
                "phase complete"
            );
        } else {
            info!(
                target: AUDIT_TARGET,
                call = %ctx.id(),
                phase = %phase,
                caller = ctx.caller_label(),
                "phase complete"
            );
        }
    }

    fn fail(
        &self,
        processor: &dyn Processor,
        ctx: &CallContext,
        payload: &str,
        err: CallError,
    ) -> String {
        error!(
            target: AUDIT_TARGET,
            call = %ctx.id(),
            phase = %err.phase(),
            caller = ctx.caller_label(),
            code = err.code(),
            error = %err,
            "call phase failed"
        );
        processor.encode_failure(&err, payload)
    }
}
