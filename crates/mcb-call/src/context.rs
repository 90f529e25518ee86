//! Per-call context.

use crate::config::CallConfig;
use mcb_types::{CallId, Caller};
use std::collections::HashMap;

/// Stack-scoped state for one inbound call.
///
/// Owned exclusively by the dispatch that created it and never shared
/// across calls. The caller identity stays `None` until authentication
/// succeeds; the locale defaults lazily from configuration on first use.
#[derive(Debug)]
pub struct CallContext {
    id: CallId,
    caller: Option<Caller>,
    locale: Option<String>,
    attributes: HashMap<String, serde_json::Value>,
}

impl CallContext {
    /// Creates a fresh context for one call.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: CallId::new(),
            caller: None,
            locale: None,
            attributes: HashMap::new(),
        }
    }

    /// The call's identity, for audit correlation.
    #[must_use]
    pub fn id(&self) -> CallId {
        self.id
    }

    /// The authenticated caller, if authentication has run and succeeded.
    #[must_use]
    pub fn caller(&self) -> Option<&Caller> {
        self.caller.as_ref()
    }

    /// Records the identity the authenticator established.
    pub fn set_caller(&mut self, caller: Caller) {
        self.caller = Some(caller);
    }

    /// Caller label for audit lines; `"anonymous"` before authentication.
    #[must_use]
    pub fn caller_label(&self) -> &str {
        self.caller.as_ref().map_or("anonymous", Caller::label)
    }

    /// Sets the call's locale explicitly.
    pub fn set_locale(&mut self, locale: impl Into<String>) {
        self.locale = Some(locale.into());
    }

    /// Returns the call's locale, defaulting it lazily from `config` if
    /// none was set. Subsequent reads see the defaulted value.
    pub fn locale_or_default(&mut self, config: &CallConfig) -> &str {
        self.locale
            .get_or_insert_with(|| config.default_locale.clone())
    }

    /// Looks up a stashed attribute.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&serde_json::Value> {
        self.attributes.get(key)
    }

    /// Stashes an attribute for later phases of the same call.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.attributes.insert(key.into(), value);
    }
}

impl Default for CallContext {
    fn default() -> Self {
        Self::new()
    }
}
