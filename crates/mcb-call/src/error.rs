//! Call lifecycle errors and the phase taxonomy.
//!
//! # Error Code Convention
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`AuthError::Denied`] | `AUTH_DENIED` | No |
//! | [`AuthError::Internal`] | `AUTH_INTERNAL` | Yes |
//! | [`CallError::Auth`] | `CALL_AUTH_FAILED` | per source |
//! | [`CallError::Init`] | `CALL_INIT_FAILED` | Yes |
//! | [`CallError::Process`] | `CALL_PROCESS_FAILED` | Yes |
//! | [`CallError::Finalize`] | `CALL_FINALIZE_FAILED` | No |
//!
//! The core never retries; recoverability is advice for the caller that
//! owns retry policy.

use mcb_types::ErrorCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One step of the call lifecycle.
///
/// ```text
/// START -> (ContextSwitch?) -> AUTHENTICATE -> INIT -> PROCESS
///       -> [FINALIZE] -> (ContextRestore?) -> END
/// ```
///
/// The optional steps are bookkeeping around the phases, not phases
/// themselves: failure payloads name one of these four.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Caller identity establishment.
    Authenticate,
    /// Caller-supplied acquisition hook.
    Init,
    /// Business processing of the payload.
    Process,
    /// Caller-supplied release hook. Owed iff Init completed.
    Finalize,
}

impl Phase {
    /// Stable lowercase name for audit lines and failure payloads.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Authenticate => "authenticate",
            Self::Init => "init",
            Self::Process => "process",
            Self::Finalize => "finalize",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authentication failure.
///
/// The single capability the bridge demands of the host's security
/// stack: authenticate a call context, or say why not.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
pub enum AuthError {
    /// The caller's credentials were rejected.
    #[error("access denied: {0}")]
    Denied(String),

    /// The security stack itself failed (e.g., directory unreachable).
    #[error("authentication unavailable: {0}")]
    Internal(String),
}

impl ErrorCode for AuthError {
    fn code(&self) -> &'static str {
        match self {
            Self::Denied(_) => "AUTH_DENIED",
            Self::Internal(_) => "AUTH_INTERNAL",
        }
    }

    fn is_recoverable(&self) -> bool {
        // Denied credentials stay denied; an unavailable stack may return.
        matches!(self, Self::Internal(_))
    }
}

/// A phase failure, as handed to `Processor::encode_failure`.
///
/// Every phase boundary in the orchestrator converts its error into one
/// of these instead of letting anything cross the dispatch boundary.
#[derive(Debug, Error)]
pub enum CallError {
    /// AUTHENTICATE failed; INIT/PROCESS/FINALIZE were skipped entirely.
    #[error("authentication failed")]
    Auth(#[source] AuthError),

    /// INIT failed; nothing was acquired, so FINALIZE is not owed.
    #[error("call initialization failed: {reason}")]
    Init {
        /// Hook-reported failure.
        reason: String,
    },

    /// PROCESS failed after a successful INIT; FINALIZE still runs.
    #[error("call processing failed: {reason}")]
    Process {
        /// Processor-reported failure.
        reason: String,
    },

    /// FINALIZE failed; this outcome wins over any PROCESS result,
    /// because a half-released resource is itself call-fatal.
    #[error("call finalization failed: {reason}")]
    Finalize {
        /// Hook-reported failure.
        reason: String,
    },
}

impl CallError {
    /// The phase that produced this failure.
    #[must_use]
    pub fn phase(&self) -> Phase {
        match self {
            Self::Auth(_) => Phase::Authenticate,
            Self::Init { .. } => Phase::Init,
            Self::Process { .. } => Phase::Process,
            Self::Finalize { .. } => Phase::Finalize,
        }
    }
}

impl ErrorCode for CallError {
    fn code(&self) -> &'static str {
        match self {
            Self::Auth(_) => "CALL_AUTH_FAILED",
            Self::Init { .. } => "CALL_INIT_FAILED",
            Self::Process { .. } => "CALL_PROCESS_FAILED",
            Self::Finalize { .. } => "CALL_FINALIZE_FAILED",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::Auth(source) => source.is_recoverable(),
            // Acquisition and processing failures may be transient.
            Self::Init { .. } | Self::Process { .. } => true,
            // A failed release left state behind; retrying the call
            // cannot clean it up.
            Self::Finalize { .. } => false,
        }
    }
}

impl From<AuthError> for CallError {
    fn from(source: AuthError) -> Self {
        Self::Auth(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcb_types::assert_error_codes;

    fn all_call_variants() -> Vec<CallError> {
        vec![
            CallError::Auth(AuthError::Denied("x".into())),
            CallError::Init { reason: "x".into() },
            CallError::Process { reason: "x".into() },
            CallError::Finalize { reason: "x".into() },
        ]
    }

    #[test]
    fn call_error_codes_valid() {
        assert_error_codes(&all_call_variants(), "CALL_");
    }

    #[test]
    fn auth_error_codes_valid() {
        assert_error_codes(
            &[
                AuthError::Denied("x".into()),
                AuthError::Internal("x".into()),
            ],
            "AUTH_",
        );
    }

    #[test]
    fn phases_match_variants() {
        let phases: Vec<Phase> = all_call_variants().iter().map(CallError::phase).collect();
        assert_eq!(
            phases,
            vec![Phase::Authenticate, Phase::Init, Phase::Process, Phase::Finalize]
        );
    }

    #[test]
    fn finalize_is_terminal() {
        assert!(!CallError::Finalize { reason: "x".into() }.is_recoverable());
        assert!(CallError::Process { reason: "x".into() }.is_recoverable());
    }

    #[test]
    fn phase_names_stable() {
        assert_eq!(Phase::Authenticate.as_str(), "authenticate");
        assert_eq!(Phase::Finalize.to_string(), "finalize");
    }
}
