//! Closed enumerations for the resolved transport scheme and integer mode.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The in-memory database sentinel. It is never parsed as a URL.
pub const MEMORY_SENTINEL: &str = ":memory:";

/// The abstract scheme resolved into one of the concrete [`Scheme`]s.
pub const LIBSQL_SCHEME: &str = "libsql";

/// Where the supported URL forms are documented.
pub const SUPPORTED_URLS_LINK: &str = "https://github.com/libsql/libsql-client-ts#supported-urls";

/// A concrete transport scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Scheme {
    /// Request/response over TLS.
    Https,
    /// Request/response without TLS.
    Http,
    /// Streaming (WebSocket) over TLS.
    Wss,
    /// Streaming (WebSocket) without TLS.
    Ws,
    /// Local database file.
    File,
}

impl Scheme {
    /// The lower-case scheme name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Https => "https",
            Self::Http => "http",
            Self::Wss => "wss",
            Self::Ws => "ws",
            Self::File => "file",
        }
    }

    pub fn is_http(&self) -> bool {
        matches!(self, Self::Https | Self::Http)
    }

    pub fn is_websocket(&self) -> bool {
        matches!(self, Self::Wss | Self::Ws)
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Self::File)
    }

    /// Whether the scheme itself implies TLS.
    pub fn is_secure(&self) -> bool {
        matches!(self, Self::Https | Self::Wss)
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = Error;

    /// Parse a concrete scheme, ignoring case. `libsql` is not concrete and
    /// is rejected like any other unknown scheme.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "https" => Ok(Self::Https),
            "http" => Ok(Self::Http),
            "wss" => Ok(Self::Wss),
            "ws" => Ok(Self::Ws),
            "file" => Ok(Self::File),
            _ => Err(unsupported_scheme(s)),
        }
    }
}

impl TryFrom<String> for Scheme {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

pub(crate) fn unsupported_scheme(scheme: &str) -> Error {
    Error::UrlSchemeNotSupported(format!(
        "The client supports only \"libsql:\", \"wss:\", \"ws:\", \"https:\", \"http:\" and \"file:\" URLs, \
         got {:?}. For more information, please read {}",
        format!("{}:", scheme),
        SUPPORTED_URLS_LINK
    ))
}

/// How integers are represented downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum IntMode {
    /// Floating point numbers; large values lose precision.
    #[default]
    Number,
    /// Arbitrary precision integers.
    Bigint,
    /// Decimal strings.
    String,
}

impl IntMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Bigint => "bigint",
            Self::String => "string",
        }
    }
}

impl fmt::Display for IntMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntMode {
    type Err = Error;

    /// Exact, case-sensitive match on the three tags.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "number" => Ok(Self::Number),
            "bigint" => Ok(Self::Bigint),
            "string" => Ok(Self::String),
            _ => Err(Error::TypeMismatch(format!(
                "Invalid value for intMode, expected \"number\", \"bigint\" or \"string\", got {:?}",
                s
            ))),
        }
    }
}

impl TryFrom<String> for IntMode {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

/// Value of the `tls` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TlsParam {
    Off,
    On,
}

impl TlsParam {
    pub(crate) fn parse(value: &str) -> Result<Self> {
        match value {
            "0" => Ok(Self::Off),
            "1" => Ok(Self::On),
            _ => Err(Error::UrlInvalid(format!(
                "Unknown value for the \"tls\" query argument: {:?}. Supported values are \"0\" and \"1\"",
                value
            ))),
        }
    }

    pub(crate) fn enabled(self) -> bool {
        matches!(self, Self::On)
    }
}
