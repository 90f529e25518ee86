//! Identifier types for MCB.
//!
//! Module identities are UUID-based so they stay comparable across
//! processes; call identities exist for audit correlation only.

use serde::{Deserialize, Serialize};
use uuid::{uuid, Uuid};

/// MCB namespace UUID for deterministic UUID v5 generation.
///
/// Used as the namespace when deriving stable identities for
/// host-activated modules.
const MCB_NAMESPACE: Uuid = uuid!("7c1f2d8a-55e3-4b19-9d4e-3a60c8f0b21d");

/// Identifier for an independently loaded module in the host.
///
/// A module is a unit of code with its own resolver and service registry.
/// Examples:
///
/// - `host::reports` — a module activated by the host container
/// - `plugin::billing` — a dynamically installed extension
///
/// # UUID Strategy
///
/// - **Host modules**: UUID v5 (deterministic from name). The same module
///   name yields the same identity after a host restart, which keeps
///   registry keys and audit trails stable.
/// - **Other modules**: UUID v4 (random). Two activations of the same
///   plugin are distinct identities.
///
/// # Equality Semantics
///
/// `PartialEq` compares all fields including the UUID. For name-only
/// comparison use [`fqn_eq`](Self::fqn_eq).
///
/// # Example
///
/// ```
/// use mcb_types::ModuleId;
///
/// let r1 = ModuleId::host("reports");
/// let r2 = ModuleId::host("reports");
/// assert_eq!(r1, r2); // deterministic
///
/// let p1 = ModuleId::new("plugin", "billing");
/// let p2 = ModuleId::new("plugin", "billing");
/// assert_ne!(p1, p2);      // distinct activations
/// assert!(p1.fqn_eq(&p2)); // same logical module
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleId {
    /// Globally unique identifier.
    pub uuid: Uuid,
    /// Namespace (e.g., "host", "plugin").
    pub namespace: String,
    /// Module name within the namespace.
    pub name: String,
}

impl ModuleId {
    /// Creates a new [`ModuleId`] with a random UUID v4.
    ///
    /// Use this for dynamically installed modules where each activation
    /// is a distinct identity.
    #[must_use]
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Creates a host module ID with a deterministic UUID v5.
    ///
    /// The UUID is derived from the MCB namespace UUID and the module
    /// name, so the same name always produces the same identity.
    ///
    /// # Example
    ///
    /// ```
    /// use mcb_types::ModuleId;
    ///
    /// let a = ModuleId::host("reports");
    /// let b = ModuleId::host("reports");
    /// assert_eq!(a.uuid, b.uuid);
    /// assert!(a.is_host());
    /// ```
    #[must_use]
    pub fn host(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            uuid: Uuid::new_v5(&MCB_NAMESPACE, name.as_bytes()),
            namespace: "host".to_string(),
            name,
        }
    }

    /// Returns the fully qualified name in `namespace::name` format.
    #[must_use]
    pub fn fqn(&self) -> String {
        format!("{}::{}", self.namespace, self.name)
    }

    /// Compares two [`ModuleId`]s by FQN only, ignoring the UUID.
    #[must_use]
    pub fn fqn_eq(&self, other: &Self) -> bool {
        self.namespace == other.namespace && self.name == other.name
    }

    /// Returns `true` if this module was activated by the host.
    #[must_use]
    pub fn is_host(&self) -> bool {
        self.namespace == "host"
    }
}

impl std::fmt::Display for ModuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}::{}@{}", self.namespace, self.name, self.uuid)
    }
}

/// Identifier for one inbound call.
///
/// Each dispatch through the orchestrator mints a fresh [`CallId`]; audit
/// log lines carry it so the phases of one call can be correlated.
///
/// # Example
///
/// ```
/// use mcb_types::CallId;
///
/// let id = CallId::new();
/// println!("call: {id}");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallId(pub Uuid);

#[allow(clippy::new_without_default)] // Default intentionally not implemented - a CallId is minted per dispatch
impl CallId {
    /// Creates a new [`CallId`] with a random UUID v4.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID.
    #[must_use]
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for CallId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "call:{}", self.0)
    }
}
