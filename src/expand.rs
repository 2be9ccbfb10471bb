//! Expansion of a [`RawConfig`] into the canonical [`ExpandedConfig`].

use crate::config::{FetchHandle, RawConfig};
use crate::error::{Error, Result};
use crate::scheme::{IntMode, Scheme, TlsParam, LIBSQL_SCHEME, MEMORY_SENTINEL};
use crate::uri::{parse_uri, Authority, QueryPair};
use serde_json::Value;
use std::fmt;
use tracing::{debug, trace};
use url::Url;

/// A fully resolved client configuration.
///
/// Built once by [`expand_config`] and never modified afterwards. For network
/// schemes `tls` is always decided; for [`Scheme::File`] there is no
/// authority.
#[derive(Clone, PartialEq)]
pub struct ExpandedConfig {
    scheme: Scheme,
    tls: bool,
    authority: Option<Authority>,
    path: String,
    auth_token: Option<String>,
    encryption_key: Option<String>,
    sync_url: Option<String>,
    sync_interval: Option<u64>,
    int_mode: IntMode,
    fetch: Option<FetchHandle>,
}

impl ExpandedConfig {
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn tls(&self) -> bool {
        self.tls
    }

    pub fn authority(&self) -> Option<&Authority> {
        self.authority.as_ref()
    }

    /// URL path for network schemes; filesystem path (or `:memory:`) for `file`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    pub fn encryption_key(&self) -> Option<&str> {
        self.encryption_key.as_deref()
    }

    pub fn sync_url(&self) -> Option<&str> {
        self.sync_url.as_deref()
    }

    /// Seconds between background syncs.
    pub fn sync_interval(&self) -> Option<u64> {
        self.sync_interval
    }

    pub fn int_mode(&self) -> IntMode {
        self.int_mode
    }

    pub fn fetch(&self) -> Option<&FetchHandle> {
        self.fetch.as_ref()
    }

    /// Whether this is the in-memory database.
    pub fn is_memory(&self) -> bool {
        self.scheme == Scheme::File && self.path == MEMORY_SENTINEL
    }

    /// The URL a transport connects to: `scheme://authority/path`, or a
    /// `file://` URL for an absolute database path.
    ///
    /// Fails with [`Error::UrlInvalid`] for `:memory:` and relative file
    /// paths, which have no URL form, and for hosts or credentials the
    /// [`url`] crate refuses.
    ///
    /// # Examples
    ///
    /// ```
    /// use libsql_client_config::{expand_config, RawConfig};
    ///
    /// let config = expand_config(&RawConfig::new("libsql://db.example.com:8080/v2"), true).unwrap();
    /// assert_eq!(config.base_url().unwrap().as_str(), "https://db.example.com:8080/v2");
    /// ```
    pub fn base_url(&self) -> Result<Url> {
        if self.scheme.is_file() {
            return Url::from_file_path(&self.path).map_err(|_| {
                Error::UrlInvalid(format!(
                    "The database path {:?} has no \"file:\" URL form",
                    self.path
                ))
            });
        }

        let authority = self.authority.as_ref().ok_or_else(|| {
            Error::UrlInvalid(format!(
                "A {:?} configuration has no host",
                format!("{}:", self.scheme)
            ))
        })?;

        let invalid = |what: &str| {
            Error::UrlInvalid(format!(
                "Cannot build a URL with the {} of host {:?}",
                what, authority.host
            ))
        };

        let host = if authority.is_ipv6() {
            format!("[{}]", authority.host)
        } else {
            authority.host.clone()
        };
        let mut url =
            Url::parse(&format!("{}://{}", self.scheme, host)).map_err(|_| invalid("authority"))?;

        url.set_port(authority.port).map_err(|_| invalid("port"))?;
        if let Some(ref userinfo) = authority.userinfo {
            url.set_username(&userinfo.username)
                .map_err(|_| invalid("username"))?;
            url.set_password(userinfo.password.as_deref())
                .map_err(|_| invalid("password"))?;
        }
        url.set_path(&self.path);

        Ok(url)
    }
}

impl fmt::Debug for ExpandedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpandedConfig")
            .field("scheme", &self.scheme)
            .field("tls", &self.tls)
            .field("authority", &self.authority)
            .field("path", &self.path)
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

/// Overrides that URL query parameters are allowed to change.
#[derive(Debug)]
struct QueryOverrides {
    tls: Option<bool>,
    auth_token: Option<String>,
}

impl QueryOverrides {
    /// Apply query pairs in order. The first unsupported key stops the fold.
    fn apply(mut self, pairs: &[QueryPair]) -> Result<Self> {
        for pair in pairs {
            trace!(key = %pair.key, "applying URL query parameter");
            match pair.key.as_str() {
                "authToken" => {
                    self.auth_token = Some(pair.value.clone()).filter(|v| !v.is_empty());
                }
                "tls" => {
                    self.tls = Some(TlsParam::parse(&pair.value)?.enabled());
                }
                _ => {
                    return Err(Error::UrlParamNotSupported(format!(
                        "Unsupported URL query parameter {:?}",
                        pair.key
                    )))
                }
            }
        }
        Ok(self)
    }
}

/// Expand a raw configuration into the form transports consume.
///
/// `prefer_http` picks the request/response transport (`http`/`https`) over
/// the streaming one (`ws`/`wss`) when a `libsql:` URL leaves the choice
/// open. URL query parameters (`authToken`, `tls`) override the matching
/// fields of `raw`.
///
/// # Examples
///
/// ```
/// use libsql_client_config::{expand_config, RawConfig, Scheme};
///
/// let config = expand_config(&RawConfig::new("libsql://db.example.com"), false).unwrap();
/// assert_eq!(config.scheme(), Scheme::Wss);
/// assert!(config.tls());
///
/// let config = expand_config(&RawConfig::new("libsql://localhost:8080?tls=0"), true).unwrap();
/// assert_eq!(config.scheme(), Scheme::Http);
/// assert!(!config.tls());
///
/// let config = expand_config(&RawConfig::new(":memory:"), true).unwrap();
/// assert_eq!(config.scheme(), Scheme::File);
/// assert!(config.authority().is_none());
/// ```
pub fn expand_config(raw: &RawConfig, prefer_http: bool) -> Result<ExpandedConfig> {
    let int_mode = match raw.int_mode {
        Some(ref mode) => mode.parse::<IntMode>()?,
        None => IntMode::default(),
    };

    if raw.url == MEMORY_SENTINEL {
        debug!(int_mode = %int_mode, "expanded in-memory client config");
        return Ok(ExpandedConfig {
            scheme: Scheme::File,
            tls: false,
            authority: None,
            path: MEMORY_SENTINEL.to_string(),
            auth_token: None,
            encryption_key: None,
            sync_url: raw.sync_url.clone(),
            sync_interval: raw.sync_interval,
            int_mode,
            fetch: raw.fetch.clone(),
        });
    }

    let uri = parse_uri(&raw.url)?;

    let overrides = QueryOverrides {
        tls: raw.tls,
        auth_token: raw.auth_token.clone(),
    }
    .apply(&uri.query)?;
    let mut tls = overrides.tls;

    let scheme = if uri.scheme.eq_ignore_ascii_case(LIBSQL_SCHEME) {
        if tls == Some(false) {
            if uri.authority.as_ref().and_then(|a| a.port).is_none() {
                return Err(Error::UrlInvalid(
                    "A \"libsql:\" URL with ?tls=0 must specify an explicit port".to_string(),
                ));
            }
            if prefer_http {
                Scheme::Http
            } else {
                Scheme::Ws
            }
        } else {
            tls = Some(true);
            if prefer_http {
                Scheme::Https
            } else {
                Scheme::Wss
            }
        }
    } else {
        let scheme = uri.scheme.parse::<Scheme>()?;
        if matches!(scheme, Scheme::Http | Scheme::Ws) && tls.is_none() {
            tls = Some(false);
        }
        scheme
    };

    if let Some(ref fragment) = uri.fragment {
        return Err(Error::UrlInvalid(format!(
            "URL fragments are not supported: {:?}",
            format!("#{}", fragment)
        )));
    }

    let authority = match uri.authority {
        Some(authority) if scheme.is_file() => {
            if !is_local_file_host(&authority.host) {
                return Err(Error::UrlInvalid(format!(
                    "A \"file:\" URL cannot have a host, got {:?}",
                    authority.host
                )));
            }
            None
        }
        None if scheme.is_file() => None,
        Some(authority) if !authority.host.is_empty() => Some(authority),
        _ => {
            return Err(Error::UrlInvalid(format!(
                "A {:?} URL must specify a host, got {:?}",
                format!("{}:", uri.scheme.to_ascii_lowercase()),
                raw.url
            )))
        }
    };

    let tls = tls.unwrap_or(true);
    debug!(
        scheme = %scheme,
        tls,
        has_auth_token = overrides.auth_token.is_some(),
        int_mode = %int_mode,
        "expanded client config"
    );

    Ok(ExpandedConfig {
        scheme,
        tls,
        authority,
        path: uri.path,
        auth_token: overrides.auth_token,
        encryption_key: raw.encryption_key.clone(),
        sync_url: raw.sync_url.clone(),
        sync_interval: raw.sync_interval,
        int_mode,
        fetch: raw.fetch.clone(),
    })
}

/// `file:` URLs may only name the local machine: an empty host or `localhost`.
fn is_local_file_host(host: &str) -> bool {
    host.is_empty() || host.eq_ignore_ascii_case("localhost")
}

/// Read a loosely typed JSON configuration and expand it.
///
/// A value that is not a JSON object fails with [`Error::TypeMismatch`]
/// before any field is examined.
pub fn expand_value(value: &Value, prefer_http: bool) -> Result<ExpandedConfig> {
    let raw = RawConfig::from_value(value)?;
    expand_config(&raw, prefer_http)
}
