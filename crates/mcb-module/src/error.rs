//! Module layer errors.
//!
//! # Error Code Convention
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`NoFactory`](LocatorError::NoFactory) | `LOCATOR_NO_FACTORY` | No |
//! | [`ConstructionFailed`](LocatorError::ConstructionFailed) | `LOCATOR_CONSTRUCTION_FAILED` | No |
//!
//! Resolution misses are not errors here: the locator logs them and
//! returns `None`, because a module that has not activated yet may
//! satisfy the same lookup later.

use mcb_types::ErrorCode;
use thiserror::Error;

/// Service locator failure.
///
/// Produced only by the uncached fallback path: a lookup that found no
/// registered instance and could not construct one. Both variants are
/// fatal to the caller of `get_instance`.
#[derive(Debug, Clone, Error)]
pub enum LocatorError {
    /// No registered instance and no factory to construct a fallback.
    #[error("no service instance or factory for '{name}'")]
    NoFactory {
        /// The qualified service name that was requested.
        name: String,
    },

    /// The fallback factory ran and failed.
    #[error("fallback construction of '{name}' failed: {reason}")]
    ConstructionFailed {
        /// The qualified service name that was requested.
        name: String,
        /// Factory-reported failure.
        reason: String,
    },
}

impl ErrorCode for LocatorError {
    fn code(&self) -> &'static str {
        match self {
            Self::NoFactory { .. } => "LOCATOR_NO_FACTORY",
            Self::ConstructionFailed { .. } => "LOCATOR_CONSTRUCTION_FAILED",
        }
    }

    fn is_recoverable(&self) -> bool {
        // A broken or missing factory will not fix itself between calls.
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcb_types::assert_error_codes;

    fn all_variants() -> Vec<LocatorError> {
        vec![
            LocatorError::NoFactory { name: "x".into() },
            LocatorError::ConstructionFailed {
                name: "x".into(),
                reason: "boom".into(),
            },
        ]
    }

    #[test]
    fn all_error_codes_valid() {
        assert_error_codes(&all_variants(), "LOCATOR_");
    }

    #[test]
    fn display_carries_name() {
        let err = LocatorError::ConstructionFailed {
            name: "api.Report".into(),
            reason: "ctor".into(),
        };
        assert!(err.to_string().contains("api.Report"));
        assert!(!err.is_recoverable());
    }
}
