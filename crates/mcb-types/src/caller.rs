//! Caller identity.
//!
//! The call context carries `Option<Caller>`: `None` until authentication
//! succeeds, then the identity the authenticator established.

use serde::{Deserialize, Serialize};

/// The authenticated identity behind an inbound call.
///
/// # Caller vs Module
///
/// - [`Caller`]: who triggered the call (human user, host process)
/// - `ModuleId`: what code services it
///
/// A module services calls on behalf of a caller, but the two are distinct:
/// audit lines attribute outcomes to the caller, resolution decisions to
/// modules.
///
/// # Example
///
/// ```
/// use mcb_types::Caller;
///
/// let user = Caller::user("alice");
/// assert!(user.is_user());
/// assert_eq!(user.label(), "alice");
///
/// let system = Caller::System;
/// assert_eq!(system.label(), "system");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Caller {
    /// The host itself (maintenance calls, privileged resolution).
    System,
    /// A named user established by the authenticator.
    User(String),
}

impl Caller {
    /// Creates a user caller.
    #[must_use]
    pub fn user(id: impl Into<String>) -> Self {
        Self::User(id.into())
    }

    /// Returns `true` for a user caller.
    #[must_use]
    pub fn is_user(&self) -> bool {
        matches!(self, Self::User(_))
    }

    /// Short label for audit log lines.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::System => "system",
            Self::User(id) => id,
        }
    }
}

impl std::fmt::Display for Caller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::System => write!(f, "system"),
            Self::User(id) => write!(f, "user:{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_caller() {
        let c = Caller::user("alice");
        assert!(c.is_user());
        assert_eq!(c.to_string(), "user:alice");
    }

    #[test]
    fn system_caller() {
        let c = Caller::System;
        assert!(!c.is_user());
        assert_eq!(c.to_string(), "system");
    }

    #[test]
    fn serde_round_trip() {
        let c = Caller::user("bob");
        let json = serde_json::to_string(&c).unwrap();
        let back: Caller = serde_json::from_str(&json).unwrap();
        assert_eq!(c, back);
    }
}
