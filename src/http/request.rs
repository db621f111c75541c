//! Decoded request representation.
//!
//! # Responsibilities
//! - Hold the request line, headers and body exactly as decoded
//! - Expose the route/params split used by the dispatcher
//! - Provide header lookups for the connection policy and compressor
//!
//! # Design Decisions
//! - Immutable once decoded; the driver only ever borrows it
//! - Header names are case-sensitive, last duplicate wins
//! - The original target is preserved next to the derived split

use std::collections::HashMap;

/// Header carrying the connection persistence directive.
pub const CONNECTION: &str = "Connection";
/// Header listing the content-codings a client accepts.
pub const ACCEPT_ENCODING: &str = "Accept-Encoding";
/// Header declaring the body length.
pub const CONTENT_LENGTH: &str = "Content-Length";
/// Header identifying the client software.
pub const USER_AGENT: &str = "User-Agent";

/// A fully decoded HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: String,
    target: String,
    route: String,
    params: String,
    version: String,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

impl Request {
    /// Build a request from its decoded parts.
    ///
    /// The target is split at its last `/` into a route and a trailing
    /// parameter, unless that slash is the leading one (or there is none),
    /// in which case the route is the whole target and params are empty.
    pub fn new(
        method: impl Into<String>,
        target: impl Into<String>,
        version: impl Into<String>,
        headers: HashMap<String, String>,
        body: Vec<u8>,
    ) -> Self {
        let target = target.into();
        let (route, params) = split_target(&target);
        Self {
            method: method.into(),
            route: route.to_string(),
            params: params.to_string(),
            target,
            version: version.into(),
            headers,
            body,
        }
    }

    /// Request method token, e.g. `GET`.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The request-target exactly as sent.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Target up to (not including) the last `/`.
    pub fn route(&self) -> &str {
        &self.route
    }

    /// Target after the last `/`.
    pub fn params(&self) -> &str {
        &self.params
    }

    /// Protocol version token, e.g. `HTTP/1.1`.
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Look up a header by its exact name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

fn split_target(target: &str) -> (&str, &str) {
    match target.rfind('/') {
        Some(idx) if idx > 0 => (&target[..idx], &target[idx + 1..]),
        _ => (target, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(target: &str) -> Request {
        Request::new("GET", target, "HTTP/1.1", HashMap::new(), Vec::new())
    }

    #[test]
    fn nested_target_splits_at_last_slash() {
        let req = request("/echo/hello");
        assert_eq!(req.route(), "/echo");
        assert_eq!(req.params(), "hello");
        assert_eq!(req.target(), "/echo/hello");
    }

    #[test]
    fn single_segment_target_is_not_split() {
        let req = request("/user-agent");
        assert_eq!(req.route(), "/user-agent");
        assert_eq!(req.params(), "");

        let root = request("/");
        assert_eq!(root.route(), "/");
        assert_eq!(root.params(), "");
    }

    #[test]
    fn trailing_slash_yields_empty_params() {
        let req = request("/files/");
        assert_eq!(req.route(), "/files");
        assert_eq!(req.params(), "");
    }

    #[test]
    fn target_without_slash_is_kept_whole() {
        let req = request("*");
        assert_eq!(req.route(), "*");
        assert_eq!(req.params(), "");
    }

    #[test]
    fn header_lookup_is_case_sensitive() {
        let mut headers = HashMap::new();
        headers.insert("User-Agent".to_string(), "curl/8.0".to_string());
        let req = Request::new("GET", "/", "HTTP/1.1", headers, Vec::new());
        assert_eq!(req.header(USER_AGENT), Some("curl/8.0"));
        assert_eq!(req.header("user-agent"), None);
    }
}
