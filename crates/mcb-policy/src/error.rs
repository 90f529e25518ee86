//! Policy layer errors.
//!
//! Only hard failures live here. Unresolvable entries inside a valid
//! artifact are soft: they are carried on the descriptor as
//! [`UnresolvedEntry`](crate::UnresolvedEntry) values, never as errors.
//!
//! # Error Code Convention
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`Malformed`](PolicyError::Malformed) | `POLICY_MALFORMED` | No |
//! | [`Io`](PolicyError::Io) | `POLICY_IO` | Yes |

use mcb_types::ErrorCode;
use thiserror::Error;

/// Hard failure while reading or parsing a policy artifact.
///
/// Both variants mean the request cannot be serviced; they are logged
/// server-side as configuration problems.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// The artifact's syntax is invalid.
    #[error("malformed policy artifact '{origin}' at line {line}: {reason}")]
    Malformed {
        /// Where the artifact came from (path or strategy label).
        origin: String,
        /// 1-based line number of the offending entry.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// Reading the artifact stream failed.
    #[error("failed to read policy artifact '{origin}'")]
    Io {
        /// Where the artifact came from.
        origin: String,
        #[source]
        source: std::io::Error,
    },
}

impl ErrorCode for PolicyError {
    fn code(&self) -> &'static str {
        match self {
            Self::Malformed { .. } => "POLICY_MALFORMED",
            Self::Io { .. } => "POLICY_IO",
        }
    }

    fn is_recoverable(&self) -> bool {
        // A malformed artifact needs redeployment; a read failure may
        // have been transient.
        matches!(self, Self::Io { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcb_types::assert_error_codes;

    fn all_variants() -> Vec<PolicyError> {
        vec![
            PolicyError::Malformed {
                origin: "x.policy".into(),
                line: 1,
                reason: "bad flag".into(),
            },
            PolicyError::Io {
                origin: "x.policy".into(),
                source: std::io::Error::other("gone"),
            },
        ]
    }

    #[test]
    fn all_error_codes_valid() {
        assert_error_codes(&all_variants(), "POLICY_");
    }

    #[test]
    fn malformed_carries_location() {
        let err = PolicyError::Malformed {
            origin: "reports.policy".into(),
            line: 7,
            reason: "expected 3 fields".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("reports.policy"), "got: {msg}");
        assert!(msg.contains("line 7"), "got: {msg}");
        assert!(!err.is_recoverable());
    }
}
