//! Raw client configuration and the ways to load it.
//!
//! [`RawConfig`] is the caller-facing record: a URL plus individually
//! optional overrides. It can be built in code, from a loosely typed JSON
//! value, from a JSON file or from `LIBSQL_*` environment variables. Nothing
//! here interprets the URL; that is [`crate::expand_config`]'s job.

use crate::error::{Error, Result};
use serde_json::{Map, Value};
use std::any::Any;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Environment variable holding the database URL.
pub const ENV_URL: &str = "LIBSQL_URL";
pub const ENV_AUTH_TOKEN: &str = "LIBSQL_AUTH_TOKEN";
pub const ENV_ENCRYPTION_KEY: &str = "LIBSQL_ENCRYPTION_KEY";
pub const ENV_SYNC_URL: &str = "LIBSQL_SYNC_URL";
pub const ENV_SYNC_INTERVAL: &str = "LIBSQL_SYNC_INTERVAL";
pub const ENV_INT_MODE: &str = "LIBSQL_INT_MODE";
pub const ENV_TLS: &str = "LIBSQL_TLS";

/// Opaque handle to a caller-supplied network fetch implementation.
///
/// The handle is stored and forwarded, never invoked. Transports recover
/// their concrete type with [`FetchHandle::downcast_ref`]. Two handles are
/// equal only if they point at the same allocation.
#[derive(Clone)]
pub struct FetchHandle(Arc<dyn Any + Send + Sync>);

impl FetchHandle {
    pub fn new<T: Any + Send + Sync>(fetch: T) -> Self {
        Self(Arc::new(fetch))
    }

    /// Wrap an already shared value without another allocation.
    pub fn from_arc(fetch: Arc<dyn Any + Send + Sync>) -> Self {
        Self(fetch)
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        (*self.0).downcast_ref::<T>()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for FetchHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for FetchHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FetchHandle(..)")
    }
}

/// Client configuration as supplied by the caller.
///
/// Only `url` is required. `int_mode` is kept as text and validated during
/// expansion, so any value a caller passes reaches the same check.
///
/// # Examples
///
/// ```
/// use libsql_client_config::RawConfig;
///
/// let raw = RawConfig::new("libsql://db.example.com")
///     .auth_token("secret")
///     .int_mode("bigint");
/// assert_eq!(raw.url, "libsql://db.example.com");
/// ```
#[derive(Clone, Default, PartialEq)]
pub struct RawConfig {
    pub url: String,
    pub tls: Option<bool>,
    pub auth_token: Option<String>,
    pub encryption_key: Option<String>,
    pub sync_url: Option<String>,
    /// Seconds between background syncs.
    pub sync_interval: Option<u64>,
    pub int_mode: Option<String>,
    pub fetch: Option<FetchHandle>,
}

impl fmt::Debug for RawConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawConfig")
            .field("url", &self.url)
            .field("tls", &self.tls)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .field(
                "encryption_key",
                &self.encryption_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("sync_url", &self.sync_url)
            .field("sync_interval", &self.sync_interval)
            .field("int_mode", &self.int_mode)
            .field("fetch", &self.fetch)
            .finish()
    }
}

impl RawConfig {
    /// Create a configuration with only a URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn tls(mut self, tls: bool) -> Self {
        self.tls = Some(tls);
        self
    }

    #[must_use]
    pub fn auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    #[must_use]
    pub fn encryption_key(mut self, key: impl Into<String>) -> Self {
        self.encryption_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn sync_url(mut self, url: impl Into<String>) -> Self {
        self.sync_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn sync_interval(mut self, seconds: u64) -> Self {
        self.sync_interval = Some(seconds);
        self
    }

    #[must_use]
    pub fn int_mode(mut self, mode: impl Into<String>) -> Self {
        self.int_mode = Some(mode.into());
        self
    }

    #[must_use]
    pub fn fetch(mut self, fetch: FetchHandle) -> Self {
        self.fetch = Some(fetch);
        self
    }

    /// Read a configuration from a loosely typed JSON value.
    ///
    /// The value must be an object; anything else fails with
    /// [`Error::TypeMismatch`] before any field is read. Field names are the
    /// camelCase ones (`authToken`, `syncInterval`, ...). `null` counts as
    /// absent and unknown fields are ignored. A non-string `intMode` is
    /// rendered as JSON text so the expander reports it verbatim.
    ///
    /// # Examples
    ///
    /// ```
    /// use libsql_client_config::RawConfig;
    /// use serde_json::json;
    ///
    /// let raw = RawConfig::from_value(&json!({"url": "file:local.db", "intMode": "string"})).unwrap();
    /// assert_eq!(raw.int_mode.as_deref(), Some("string"));
    ///
    /// let err = RawConfig::from_value(&json!("file:local.db")).unwrap_err();
    /// assert_eq!(err.to_string(), "Expected client configuration as object, got string");
    /// ```
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            Error::TypeMismatch(format!(
                "Expected client configuration as object, got {}",
                json_type_name(value)
            ))
        })?;

        let url = string_field(object, "url")?.ok_or_else(|| {
            Error::TypeMismatch("Expected client configuration to have a \"url\" string".to_string())
        })?;

        let tls = match present(object, "tls") {
            None => None,
            Some(Value::Bool(b)) => Some(*b),
            Some(other) => return Err(field_type_error("tls", "boolean", other)),
        };

        let sync_interval = match present(object, "syncInterval") {
            None => None,
            Some(v) => Some(v.as_u64().ok_or_else(|| {
                field_type_error("syncInterval", "non-negative integer", v)
            })?),
        };

        let int_mode = present(object, "intMode").map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        });

        Ok(RawConfig {
            url,
            tls,
            auth_token: string_field(object, "authToken")?,
            encryption_key: string_field(object, "encryptionKey")?,
            sync_url: string_field(object, "syncUrl")?,
            sync_interval,
            int_mode,
            fetch: None,
        })
    }

    /// Parse JSON text, then read it with [`RawConfig::from_value`].
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    /// Load a JSON config file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading client config file");
        let content = std::fs::read_to_string(path).map_err(|e| Error::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json_str(&content)
    }

    /// Build a configuration from `LIBSQL_*` environment variables.
    ///
    /// `LIBSQL_URL` is required. `LIBSQL_TLS` accepts `true`/`false` in any
    /// case and `LIBSQL_SYNC_INTERVAL` a whole number of seconds.
    pub fn from_env() -> Result<Self> {
        let url = std::env::var(ENV_URL).map_err(|_| Error::MissingEnv(ENV_URL.to_string()))?;

        let tls = match env_var(ENV_TLS) {
            None => None,
            Some(v) => Some(parse_bool(&v).ok_or_else(|| {
                Error::TypeMismatch(format!(
                    "Expected {} to be \"true\" or \"false\", got {:?}",
                    ENV_TLS, v
                ))
            })?),
        };

        let sync_interval = match env_var(ENV_SYNC_INTERVAL) {
            None => None,
            Some(v) => Some(v.trim().parse::<u64>().map_err(|_| {
                Error::TypeMismatch(format!(
                    "Expected {} to be a whole number of seconds, got {:?}",
                    ENV_SYNC_INTERVAL, v
                ))
            })?),
        };

        let auth_token = env_var(ENV_AUTH_TOKEN);
        debug!(
            has_auth_token = auth_token.is_some(),
            "client config read from environment"
        );

        Ok(RawConfig {
            url,
            tls,
            auth_token,
            encryption_key: env_var(ENV_ENCRYPTION_KEY),
            sync_url: env_var(ENV_SYNC_URL),
            sync_interval,
            int_mode: env_var(ENV_INT_MODE),
            fetch: None,
        })
    }
}

/// Name of a JSON value's type, as reported in type mismatch messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Parse a boolean value from a string.
///
/// Returns `Some(true)` for "true", `Some(false)` for "false", and `None` for other values.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn present<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    object.get(key).filter(|v| !v.is_null())
}

fn string_field(object: &Map<String, Value>, key: &str) -> Result<Option<String>> {
    match present(object, key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(field_type_error(key, "string", other)),
    }
}

fn field_type_error(key: &str, expected: &str, got: &Value) -> Error {
    Error::TypeMismatch(format!(
        "Expected client configuration field {:?} to be a {}, got {}",
        key,
        expected,
        json_type_name(got)
    ))
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
