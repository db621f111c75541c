//! Response body content-coding.
//!
//! # Responsibilities
//! - Negotiate a content-coding from the request's `Accept-Encoding`
//! - Gzip the response body when `gzip` is selected
//!
//! # Design Decisions
//! - The first listed token found in the allow-list wins; q-values are not
//!   interpreted
//! - The `*` wildcard is accepted but leaves the body untouched
//! - A compression failure degrades to the uncompressed body

use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{self, Write};

use crate::config::CompressionConfig;
use crate::http::request::{Request, ACCEPT_ENCODING};
use crate::http::response::{Response, CONTENT_ENCODING};

/// Content-codings the server is willing to negotiate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentCoding {
    /// `*`: any coding is acceptable to the client.
    Any,
    /// `gzip`
    Gzip,
}

impl ContentCoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentCoding::Any => "*",
            ContentCoding::Gzip => "gzip",
        }
    }

    /// Parse a single `Accept-Encoding` token (already trimmed).
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "*" => Some(ContentCoding::Any),
            "gzip" => Some(ContentCoding::Gzip),
            _ => None,
        }
    }
}

/// Default allow-list, in no particular priority.
pub const ALLOWED_CODINGS: &[ContentCoding] = &[ContentCoding::Any, ContentCoding::Gzip];

/// Body encoder used for the `gzip` coding.
type GzipFn = fn(&[u8], Compression) -> io::Result<Vec<u8>>;

/// Applies the negotiated content-coding to outgoing responses.
#[derive(Debug, Clone)]
pub struct Compressor {
    enabled: bool,
    level: Compression,
    allowed: Vec<ContentCoding>,
    encode: GzipFn,
}

impl Compressor {
    pub fn new(config: &CompressionConfig) -> Self {
        Self {
            enabled: config.enabled,
            level: Compression::new(config.level),
            allowed: ALLOWED_CODINGS.to_vec(),
            encode: gzip,
        }
    }

    /// Pick the first token of `accept_encoding` that is in the allow-list.
    pub fn negotiate(&self, accept_encoding: &str) -> Option<ContentCoding> {
        accept_encoding
            .split(',')
            .filter_map(|token| ContentCoding::from_token(token.trim()))
            .find(|coding| self.allowed.contains(coding))
    }

    /// Transcode the body of `response` according to `request`'s preferences.
    pub fn apply(&self, request: &Request, response: &mut Response) {
        if !self.enabled {
            return;
        }
        let Some(body) = response.body() else {
            return;
        };
        let Some(accept) = request.header(ACCEPT_ENCODING) else {
            return;
        };

        match self.negotiate(accept) {
            Some(ContentCoding::Gzip) => match (self.encode)(body, self.level) {
                Ok(compressed) => {
                    tracing::trace!(
                        original = body.len(),
                        compressed = compressed.len(),
                        "Body gzip-encoded"
                    );
                    response.set_body(compressed);
                    response.set_header(CONTENT_ENCODING, ContentCoding::Gzip.as_str());
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Compression failed, sending uncompressed body");
                }
            },
            Some(ContentCoding::Any) | None => {}
        }
    }
}

impl Default for Compressor {
    fn default() -> Self {
        Self::new(&CompressionConfig::default())
    }
}

/// Gzip `data` at the given level.
pub fn gzip(data: &[u8], level: Compression) -> io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(data.len() / 2 + 32), level);
    encoder.write_all(data)?;
    encoder.finish()
}
