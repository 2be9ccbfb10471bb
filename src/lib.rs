//! Client configuration expansion for libSQL.
//!
//! A libSQL client is configured with a URL plus a handful of optional
//! overrides. This crate turns that input into one canonical
//! [`ExpandedConfig`] that a transport can use without re-interpreting
//! anything:
//!
//! - the concrete scheme (`https`, `http`, `wss`, `ws` or `file`)
//! - the final TLS decision
//! - authority and path
//! - auth token, encryption key, sync settings and integer mode
//!
//! # Quick Start
//!
//! ```
//! use libsql_client_config::{expand_config, RawConfig, Scheme};
//!
//! let raw = RawConfig::new("libsql://my-db.example.com?authToken=secret");
//! let config = expand_config(&raw, false).unwrap();
//!
//! assert_eq!(config.scheme(), Scheme::Wss);
//! assert!(config.tls());
//! assert_eq!(config.auth_token(), Some("secret"));
//! ```
//!
//! # Supported URLs
//!
//! ```text
//! libsql://host[:port][/path]   resolved to wss/https (or ws/http with ?tls=0)
//! https://host  http://host      request/response transport
//! wss://host    ws://host        streaming transport
//! file:path                      local database file
//! file://localhost/path          same, with the local host spelled out
//! :memory:                       in-memory database, never parsed
//! ```
//!
//! The only query parameters accepted are `authToken` (an empty value clears
//! the token) and `tls` (`0` or `1`). Both override the matching
//! [`RawConfig`] fields. A `libsql:` URL with TLS disabled must name an
//! explicit port.
//!
//! # Loosely Typed Input
//!
//! Configuration coming from JSON goes through [`expand_value`], which rejects
//! anything that is not an object before looking at fields:
//!
//! ```
//! use libsql_client_config::{expand_value, ErrorKind};
//! use serde_json::json;
//!
//! let err = expand_value(&json!("libsql://host"), false).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::TypeMismatch);
//! ```

mod config;
mod error;
mod expand;
pub mod scheme;
pub mod uri;

// Re-export main types
pub use config::{
    json_type_name, parse_bool, FetchHandle, RawConfig, ENV_AUTH_TOKEN, ENV_ENCRYPTION_KEY,
    ENV_INT_MODE, ENV_SYNC_INTERVAL, ENV_SYNC_URL, ENV_TLS, ENV_URL,
};
pub use error::{Error, ErrorKind, Result};
pub use expand::{expand_config, expand_value, ExpandedConfig};
pub use scheme::{IntMode, Scheme, MEMORY_SENTINEL};
pub use uri::{Authority, QueryPair, Uri, UserInfo};
