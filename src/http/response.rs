//! Response model.
//!
//! # Responsibilities
//! - Carry the status, headers and optional body built by the dispatcher
//! - Let the driver stamp the `Connection` header and the compressor swap
//!   the body before encoding
//!
//! # Design Decisions
//! - Headers live in a sorted map so the encoded order is deterministic
//! - An absent body (`None`) differs from an empty one: no body means no
//!   `Content-Length` line at all

use std::collections::BTreeMap;
use std::fmt;

use crate::http::request::Request;

/// Header naming the body's media type.
pub const CONTENT_TYPE: &str = "Content-Type";
/// Header naming the content-coding applied to the body.
pub const CONTENT_ENCODING: &str = "Content-Encoding";

/// Response status codes this server emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Ok,
    Created,
    NotFound,
    InternalServerError,
}

impl Status {
    pub fn code(&self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::Created => 201,
            Status::NotFound => 404,
            Status::InternalServerError => 500,
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Created => "Created",
            Status::NotFound => "Not Found",
            Status::InternalServerError => "Internal Server Error",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code(), self.reason())
    }
}

/// An HTTP response under construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    version: String,
    status: Status,
    headers: BTreeMap<String, String>,
    body: Option<Vec<u8>>,
}

impl Response {
    /// Create a `200 OK` response with no headers and no body.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            status: Status::Ok,
            headers: BTreeMap::new(),
            body: None,
        }
    }

    /// Create a response answering `request`, echoing its version.
    pub fn for_request(request: &Request) -> Self {
        Self::new(request.version())
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Insert or replace a header.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), value.into());
    }

    pub fn set_body(&mut self, body: impl Into<Vec<u8>>) {
        self.body = Some(body.into());
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_and_reasons() {
        assert_eq!(Status::Ok.to_string(), "200 OK");
        assert_eq!(Status::Created.to_string(), "201 Created");
        assert_eq!(Status::NotFound.to_string(), "404 Not Found");
        assert_eq!(
            Status::InternalServerError.to_string(),
            "500 Internal Server Error"
        );
    }

    #[test]
    fn builder_defaults_to_ok_without_body() {
        let res = Response::new("HTTP/1.0");
        assert_eq!(res.version(), "HTTP/1.0");
        assert_eq!(res.status(), Status::Ok);
        assert!(res.headers().is_empty());
        assert!(res.body().is_none());
    }

    #[test]
    fn empty_body_is_still_present() {
        let res = Response::new("HTTP/1.1").with_body(Vec::new());
        assert_eq!(res.body(), Some(&[][..]));
    }

    #[test]
    fn set_header_replaces_previous_value() {
        let mut res = Response::new("HTTP/1.1").with_header("Connection", "keep-alive");
        res.set_header("Connection", "close");
        assert_eq!(res.header("Connection"), Some("close"));
        assert_eq!(res.headers().len(), 1);
    }
}
