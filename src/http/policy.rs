//! Connection persistence decision.
//!
//! HTTP/1.1 connections persist unless the client sends `Connection: close`.
//! Every other version closes unless the client sends `Connection: keep-alive`.

use crate::http::request::{Request, CONNECTION};

const HTTP_11: &str = "HTTP/1.1";

/// Decide whether the connection stays open after this cycle.
pub fn keep_alive(version: &str, connection: Option<&str>) -> bool {
    let connection = connection.unwrap_or("");
    if version == HTTP_11 {
        !connection.eq_ignore_ascii_case("close")
    } else {
        connection.eq_ignore_ascii_case("keep-alive")
    }
}

/// [`keep_alive`] applied to a decoded request.
pub fn should_keep_alive(request: &Request) -> bool {
    keep_alive(request.version(), request.header(CONNECTION))
}

/// Value of the outgoing `Connection` header for a keep-alive decision.
pub fn connection_header_value(keep_alive: bool) -> &'static str {
    if keep_alive {
        "keep-alive"
    } else {
        "close"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http11_defaults_to_keep_alive() {
        assert!(keep_alive("HTTP/1.1", None));
        assert!(keep_alive("HTTP/1.1", Some("keep-alive")));
        assert!(keep_alive("HTTP/1.1", Some("upgrade")));
    }

    #[test]
    fn http11_close_in_any_case() {
        for value in ["close", "Close", "CLOSE", "cLoSe"] {
            assert!(!keep_alive("HTTP/1.1", Some(value)), "{value}");
        }
    }

    #[test]
    fn http10_defaults_to_close() {
        assert!(!keep_alive("HTTP/1.0", None));
        assert!(!keep_alive("HTTP/1.0", Some("close")));
        assert!(!keep_alive("HTTP/1.0", Some("upgrade")));
    }

    #[test]
    fn http10_keep_alive_in_any_case() {
        for value in ["keep-alive", "Keep-Alive", "KEEP-ALIVE"] {
            assert!(keep_alive("HTTP/1.0", Some(value)), "{value}");
        }
    }

    #[test]
    fn unknown_versions_follow_http10_rules() {
        assert!(!keep_alive("HTTP/2.0", None));
        assert!(keep_alive("HTTP/0.9", Some("Keep-Alive")));
        assert!(!keep_alive("http/1.1", None));
    }

    #[test]
    fn header_value_matches_decision() {
        assert_eq!(connection_header_value(true), "keep-alive");
        assert_eq!(connection_header_value(false), "close");
    }
}
