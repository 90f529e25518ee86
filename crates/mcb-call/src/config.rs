//! Call layer configuration.
//!
//! Injected into the orchestrator at construction; never read from
//! ambient/global state.

use serde::{Deserialize, Serialize};

/// Configuration for call dispatch.
///
/// # Example
///
/// ```
/// use mcb_call::CallConfig;
///
/// let config: CallConfig = serde_json::from_str(
///     r#"{ "default_locale": "de", "log_payloads": true }"#,
/// ).unwrap();
/// assert_eq!(config.default_locale, "de");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CallConfig {
    /// Locale used when a call context has none set.
    pub default_locale: String,
    /// Whether audit lines include the payload text.
    ///
    /// Off by default: payloads can carry user data, and the audit trail
    /// is complete without them (phase, caller, outcome, error).
    pub log_payloads: bool,
}

impl Default for CallConfig {
    fn default() -> Self {
        Self {
            default_locale: "en".to_string(),
            log_payloads: false,
        }
    }
}
