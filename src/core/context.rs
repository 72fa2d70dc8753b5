//! Request-scoped context and context field extraction
//!
//! This module provides:
//! - `RequestContext`: immutable, type-erased values carried with a request
//! - `ContextKey`: name of a value the logger knows how to extract
//! - `ContextKeyRegistry`: ordered, shareable list of recognized keys
//! - `LoggingField`: a key/value pair pulled out of a context

use parking_lot::RwLock;
use std::any::Any;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Name of a value carried in a [`RequestContext`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextKey(Cow<'static, str>);

impl ContextKey {
    pub const USER_ID: ContextKey = ContextKey::from_static("user_id");
    pub const TRACE_ID: ContextKey = ContextKey::from_static("trace_id");
    pub const SPAN_ID: ContextKey = ContextKey::from_static("span_id");
    pub const ENTITY_GUID: ContextKey = ContextKey::from_static("entity_guid");
    pub const HOSTNAME: ContextKey = ContextKey::from_static("hostname");
    pub const APPLICATION_NAME: ContextKey = ContextKey::from_static("application_name");
    pub const APPLICATION_ENVIRONMENT: ContextKey =
        ContextKey::from_static("application_environment");
    pub const REQUEST_ID: ContextKey = ContextKey::from_static("request_id");
    pub const ACCEPT_LANGUAGE: ContextKey = ContextKey::from_static("accept_language");
    pub const USER_CONTEXT: ContextKey = ContextKey::from_static("user_context");
    pub const IP_ADDRESS: ContextKey = ContextKey::from_static("ip_address");

    /// Keys every registry starts with, in extraction order
    pub const BUILT_IN: [ContextKey; 11] = [
        ContextKey::USER_ID,
        ContextKey::TRACE_ID,
        ContextKey::SPAN_ID,
        ContextKey::ENTITY_GUID,
        ContextKey::HOSTNAME,
        ContextKey::APPLICATION_NAME,
        ContextKey::APPLICATION_ENVIRONMENT,
        ContextKey::REQUEST_ID,
        ContextKey::ACCEPT_LANGUAGE,
        ContextKey::USER_CONTEXT,
        ContextKey::IP_ADDRESS,
    ];

    pub const fn from_static(name: &'static str) -> Self {
        ContextKey(Cow::Borrowed(name))
    }

    pub fn new(name: impl Into<String>) -> Self {
        ContextKey(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for ContextKey {
    fn from(name: &'static str) -> Self {
        ContextKey::from_static(name)
    }
}

impl From<String> for ContextKey {
    fn from(name: String) -> Self {
        ContextKey::new(name)
    }
}

/// A key/value pair extracted from a request context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingField {
    pub key: ContextKey,
    pub value: String,
}

/// Request-scoped values, opaque to everything but the extractor.
///
/// Values are stored type-erased; only `String` and `&'static str` values are
/// picked up as logging fields. Contexts are immutable: [`with_value`]
/// returns a new context sharing the parent's values.
///
/// [`with_value`]: RequestContext::with_value
///
/// # Example
///
/// ```
/// use rust_context_logger::{ContextKey, RequestContext};
///
/// let ctx = RequestContext::new()
///     .with_value(ContextKey::TRACE_ID, "4bf92f35".to_string())
///     .with_value(ContextKey::USER_ID, "u-42");
///
/// assert!(ctx.get_str(&ContextKey::TRACE_ID).is_some());
/// ```
#[derive(Clone, Default)]
pub struct RequestContext {
    values: Arc<HashMap<ContextKey, Arc<dyn Any + Send + Sync>>>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive a context that additionally carries `value` under `key`
    #[must_use]
    pub fn with_value<K, V>(&self, key: K, value: V) -> Self
    where
        K: Into<ContextKey>,
        V: Any + Send + Sync,
    {
        let mut values = (*self.values).clone();
        values.insert(key.into(), Arc::new(value));
        Self {
            values: Arc::new(values),
        }
    }

    /// Raw value stored under `key`, whatever its type
    pub fn value(&self, key: &ContextKey) -> Option<&(dyn Any + Send + Sync)> {
        self.values.get(key).map(|v| v.as_ref())
    }

    /// String value stored under `key`; `None` when absent or not a string
    pub fn get_str(&self, key: &ContextKey) -> Option<&str> {
        if key.is_empty() {
            return None;
        }

        let value = self.value(key)?;
        if let Some(s) = value.downcast_ref::<String>() {
            Some(s.as_str())
        } else {
            value.downcast_ref::<&'static str>().copied()
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.values.keys().map(ContextKey::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("RequestContext").field("keys", &keys).finish()
    }
}

/// Ordered list of context keys the logger extracts.
///
/// Clones share the same underlying list, so a registry handed to several
/// loggers can be extended in one place. Keys are only ever appended.
///
/// # Example
///
/// ```
/// use rust_context_logger::{ContextKey, ContextKeyRegistry, RequestContext};
///
/// let registry = ContextKeyRegistry::new();
/// registry.append([ContextKey::new("tenant_id")]);
///
/// let ctx = RequestContext::new()
///     .with_value(ContextKey::new("tenant_id"), "acme".to_string());
///
/// let fields = registry.extract(Some(&ctx));
/// assert_eq!(fields[0].value, "acme");
/// ```
#[derive(Debug, Clone)]
pub struct ContextKeyRegistry {
    keys: Arc<RwLock<Vec<ContextKey>>>,
}

impl ContextKeyRegistry {
    /// Registry holding the built-in keys
    pub fn new() -> Self {
        Self::with_keys(ContextKey::BUILT_IN)
    }

    /// Registry with no keys at all
    pub fn empty() -> Self {
        Self::with_keys(Vec::new())
    }

    pub fn with_keys<I>(keys: I) -> Self
    where
        I: IntoIterator<Item = ContextKey>,
    {
        Self {
            keys: Arc::new(RwLock::new(keys.into_iter().collect())),
        }
    }

    /// Append keys after the existing ones
    pub fn append<I>(&self, keys: I)
    where
        I: IntoIterator,
        I::Item: Into<ContextKey>,
    {
        self.keys.write().extend(keys.into_iter().map(Into::into));
    }

    /// Snapshot of the keys in extraction order
    pub fn keys(&self) -> Vec<ContextKey> {
        self.keys.read().clone()
    }

    pub fn len(&self) -> usize {
        self.keys.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.read().is_empty()
    }

    /// Extract the string values of registered keys present in `ctx`.
    ///
    /// Keys are visited in registry order. Empty keys, absent values and
    /// non-string values contribute nothing; `None` yields no fields.
    pub fn extract(&self, ctx: Option<&RequestContext>) -> Vec<LoggingField> {
        let Some(ctx) = ctx else {
            return Vec::new();
        };

        if ctx.is_empty() {
            return Vec::new();
        }

        let keys = self.keys.read();
        let mut fields = Vec::with_capacity(keys.len().min(ctx.len()));

        for key in keys.iter() {
            if let Some(value) = ctx.get_str(key) {
                fields.push(LoggingField {
                    key: key.clone(),
                    value: value.to_string(),
                });
            }
        }

        fields
    }
}

impl Default for ContextKeyRegistry {
    fn default() -> Self {
        Self::new()
    }
}
