//! Error types for libsql-client-config.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or expanding a client configuration.
///
/// Every validation variant carries the complete user-facing message, which
/// always quotes the offending value.
#[derive(Error, Debug)]
pub enum Error {
    /// The raw configuration has the wrong shape, or a field has the wrong type.
    #[error("{0}")]
    TypeMismatch(String),

    /// The URL (or one of its components) is not acceptable.
    #[error("{0}")]
    UrlInvalid(String),

    /// The URL carries a query parameter the client does not understand.
    #[error("{0}")]
    UrlParamNotSupported(String),

    /// The URL scheme is not one the client can connect with.
    #[error("{0}")]
    UrlSchemeNotSupported(String),

    /// Failed to read a config file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config text is not valid JSON.
    #[error("failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),

    /// A required environment variable is not set.
    #[error("environment variable {0} is not set")]
    MissingEnv(String),
}

/// Classification of an [`Error`], independent of its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    TypeMismatch,
    UrlInvalid,
    UrlParamNotSupported,
    UrlSchemeNotSupported,
    ConfigLoad,
}

impl ErrorKind {
    /// Stable machine-readable code for this kind.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::TypeMismatch => "TYPE_MISMATCH",
            ErrorKind::UrlInvalid => "URL_INVALID",
            ErrorKind::UrlParamNotSupported => "URL_PARAM_NOT_SUPPORTED",
            ErrorKind::UrlSchemeNotSupported => "URL_SCHEME_NOT_SUPPORTED",
            ErrorKind::ConfigLoad => "CONFIG_LOAD",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Error {
    /// The kind this error is classified as.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::TypeMismatch(_) => ErrorKind::TypeMismatch,
            Error::UrlInvalid(_) => ErrorKind::UrlInvalid,
            Error::UrlParamNotSupported(_) => ErrorKind::UrlParamNotSupported,
            Error::UrlSchemeNotSupported(_) => ErrorKind::UrlSchemeNotSupported,
            Error::ReadFile { .. } | Error::Json(_) | Error::MissingEnv(_) => ErrorKind::ConfigLoad,
        }
    }

    /// Shorthand for `self.kind().code()`.
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }
}

/// Result type alias for libsql-client-config operations.
pub type Result<T> = std::result::Result<T, Error>;
