//! URL query override and error reporting tests.
//!
//! Every validation failure must carry the right kind and quote the offending
//! value, so callers can surface the message as-is.

use libsql_client_config::{expand_config, expand_value, Error, ErrorKind, RawConfig};
use serde_json::json;

fn expand_err(url: &str) -> Error {
    expand_config(&RawConfig::new(url), false).unwrap_err()
}

// =============================================================================
// authToken
// =============================================================================

#[test]
fn test_auth_token_from_query() {
    let config = expand_config(&RawConfig::new("libsql://host?authToken=abc"), false).unwrap();
    assert_eq!(config.auth_token(), Some("abc"));
}

#[test]
fn test_empty_auth_token_clears() {
    let config = expand_config(&RawConfig::new("libsql://host?authToken="), false).unwrap();
    assert_eq!(config.auth_token(), None);

    // Clears a structured token too.
    let raw = RawConfig::new("libsql://host?authToken=").auth_token("structured");
    let config = expand_config(&raw, false).unwrap();
    assert_eq!(config.auth_token(), None);
}

#[test]
fn test_query_token_overrides_structured_token() {
    let raw = RawConfig::new("libsql://host?authToken=from-url").auth_token("from-field");
    let config = expand_config(&raw, false).unwrap();
    assert_eq!(config.auth_token(), Some("from-url"));
}

#[test]
fn test_structured_token_used_without_query() {
    let raw = RawConfig::new("libsql://host").auth_token("from-field");
    let config = expand_config(&raw, false).unwrap();
    assert_eq!(config.auth_token(), Some("from-field"));
}

#[test]
fn test_auth_token_is_percent_decoded() {
    let config =
        expand_config(&RawConfig::new("libsql://host?authToken=a%2Bb+c"), false).unwrap();
    assert_eq!(config.auth_token(), Some("a+b c"));
}

// =============================================================================
// tls
// =============================================================================

#[test]
fn test_query_tls_overrides_structured_tls() {
    let raw = RawConfig::new("libsql://host?tls=1").tls(false);
    let config = expand_config(&raw, false).unwrap();
    assert!(config.tls());

    let raw = RawConfig::new("https://host?tls=0").tls(true);
    let config = expand_config(&raw, false).unwrap();
    assert!(!config.tls());
}

#[test]
fn test_last_tls_value_wins() {
    let config = expand_config(&RawConfig::new("libsql://host:80?tls=1&tls=0"), false).unwrap();
    assert!(!config.tls());
}

#[test]
fn test_invalid_tls_value() {
    for value in ["true", "yes", "", "01"] {
        let err = expand_err(&format!("libsql://host?tls={}", value));
        assert_eq!(err.kind(), ErrorKind::UrlInvalid);
        assert_eq!(
            err.to_string(),
            format!(
                "Unknown value for the \"tls\" query argument: {:?}. Supported values are \"0\" and \"1\"",
                value
            )
        );
    }
}

// =============================================================================
// Unsupported parameters
// =============================================================================

#[test]
fn test_unsupported_param() {
    let err = expand_err("libsql://host?foo=bar");
    assert_eq!(err.kind(), ErrorKind::UrlParamNotSupported);
    assert_eq!(err.code(), "URL_PARAM_NOT_SUPPORTED");
    assert_eq!(err.to_string(), "Unsupported URL query parameter \"foo\"");
}

#[test]
fn test_first_unsupported_param_is_reported() {
    let err = expand_err("libsql://host?authToken=x&first=1&second=2");
    assert_eq!(err.to_string(), "Unsupported URL query parameter \"first\"");
}

#[test]
fn test_param_names_are_case_sensitive() {
    let err = expand_err("libsql://host?authtoken=x");
    assert_eq!(err.kind(), ErrorKind::UrlParamNotSupported);
    assert!(err.to_string().contains("\"authtoken\""));
}

#[test]
fn test_query_error_precedes_scheme_error() {
    let err = expand_err("ftp://host?foo=bar");
    assert_eq!(err.kind(), ErrorKind::UrlParamNotSupported);
}

// =============================================================================
// Schemes and fragments
// =============================================================================

#[test]
fn test_unsupported_scheme() {
    let err = expand_err("ftp://host");
    assert_eq!(err.kind(), ErrorKind::UrlSchemeNotSupported);
    assert_eq!(err.code(), "URL_SCHEME_NOT_SUPPORTED");
    let message = err.to_string();
    assert!(message.contains("got \"ftp:\""));
    assert!(message.contains("\"libsql:\""));
    assert!(message.contains("https://github.com/libsql/libsql-client-ts#supported-urls"));
}

#[test]
fn test_unsupported_scheme_echoed_as_given() {
    let err = expand_err("FTP://host");
    assert!(err.to_string().contains("got \"FTP:\""));
}

#[test]
fn test_fragment_rejected() {
    let err = expand_err("https://host#frag");
    assert_eq!(err.kind(), ErrorKind::UrlInvalid);
    assert_eq!(err.to_string(), "URL fragments are not supported: \"#frag\"");

    let err = expand_err("libsql://host#");
    assert_eq!(err.to_string(), "URL fragments are not supported: \"#\"");
}

#[test]
fn test_network_url_without_host() {
    for url in ["wss:db", "https:/path", "libsql:foo"] {
        let err = expand_err(url);
        assert_eq!(err.kind(), ErrorKind::UrlInvalid);
        assert!(
            err.to_string().contains(&format!("got {:?}", url)),
            "message should quote {}",
            url
        );
    }

    let err = expand_err("wss://?authToken=x");
    assert_eq!(err.kind(), ErrorKind::UrlInvalid);
    assert_eq!(
        err.to_string(),
        "A \"wss:\" URL must specify a host, got \"wss://?authToken=x\""
    );
}

#[test]
fn test_fragment_error_precedes_host_error() {
    let err = expand_err("https:/path#frag");
    assert_eq!(err.to_string(), "URL fragments are not supported: \"#frag\"");
}

#[test]
fn test_scheme_error_precedes_fragment_error() {
    let err = expand_err("ftp://host#frag");
    assert_eq!(err.kind(), ErrorKind::UrlSchemeNotSupported);
}

// =============================================================================
// Type mismatches
// =============================================================================

#[test]
fn test_invalid_int_mode() {
    let err = expand_config(&RawConfig::new("http://host").int_mode("float"), false).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    assert_eq!(err.code(), "TYPE_MISMATCH");
    assert_eq!(
        err.to_string(),
        "Invalid value for intMode, expected \"number\", \"bigint\" or \"string\", got \"float\""
    );
}

#[test]
fn test_int_mode_checked_before_url() {
    let err = expand_config(&RawConfig::new("ftp://host").int_mode("float"), false).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
}

#[test]
fn test_non_object_config_rejected_first() {
    let err = expand_value(&json!("libsql://host"), false).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    assert_eq!(
        err.to_string(),
        "Expected client configuration as object, got string"
    );

    let err = expand_value(&json!(null), true).unwrap_err();
    assert_eq!(err.to_string(), "Expected client configuration as object, got null");
}

#[test]
fn test_non_string_int_mode_from_json() {
    let err = expand_value(&json!({"url": "http://host", "intMode": 64}), false).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    assert!(err.to_string().contains("got \"64\""));
}

// =============================================================================
// Parser errors are forwarded
// =============================================================================

#[test]
fn test_parser_errors_forwarded() {
    let err = expand_err("not a url");
    assert_eq!(err.kind(), ErrorKind::UrlInvalid);
    assert_eq!(err.to_string(), "The URL 'not a url' is not in a valid format");

    let err = expand_err("libsql://host?authToken=%zz");
    assert_eq!(err.kind(), ErrorKind::UrlInvalid);
    assert!(err.to_string().contains("percent encoding"));
}
