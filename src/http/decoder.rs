//! Request decoding from a raw byte stream.
//!
//! # Responsibilities
//! - Read the header block up to the blank-line terminator
//! - Split the request line and header lines
//! - Read exactly `Content-Length` body bytes
//! - Enforce the idle read timeout on every read
//!
//! # Design Decisions
//! - The header block ends after four consecutive CR/LF bytes, which also
//!   tolerates clients that send `\n\n` or `\r\r` style terminators
//! - Malformed input is an outcome, not an error: the driver just stops
//! - Only bytes belonging to the current request are consumed, so a
//!   buffered reader keeps any following request intact
//! - A short body is returned truncated rather than waited on forever

use std::collections::HashMap;
use std::io;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::config::{LineSplitting, ParserConfig, ServerConfig};
use crate::http::request::{Request, CONTENT_LENGTH};

/// Largest single read issued while collecting a body.
const BODY_CHUNK: usize = 8192;

/// Consecutive CR/LF bytes that terminate the header block.
const HEADER_TERMINATOR_RUN: usize = 4;

/// Result of decoding one request off a stream.
#[derive(Debug)]
pub enum ParseOutcome {
    /// A complete request was decoded.
    Parsed(Request),
    /// Nothing usable was decoded (short stream or malformed head).
    Incomplete,
    /// The underlying stream failed or timed out.
    TransportFailure(io::Error),
}

impl ParseOutcome {
    /// Returns the decoded request, if any.
    pub fn into_request(self) -> Option<Request> {
        match self {
            ParseOutcome::Parsed(request) => Some(request),
            _ => None,
        }
    }
}

/// Streaming HTTP/1.x request decoder.
#[derive(Debug, Clone)]
pub struct Decoder {
    line_splitting: LineSplitting,
    max_header_bytes: usize,
    read_timeout: Option<Duration>,
}

impl Decoder {
    /// Create a decoder from parser settings and an optional per-read timeout.
    pub fn new(config: &ParserConfig, read_timeout: Option<Duration>) -> Self {
        Self {
            line_splitting: config.line_splitting,
            max_header_bytes: config.max_header_bytes,
            read_timeout,
        }
    }

    /// Create a decoder using the server's parser and idle timeout settings.
    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(&config.parser, Some(config.timeouts.idle()))
    }

    /// Decode exactly one request from `reader`.
    pub async fn decode<R>(&self, reader: &mut R) -> ParseOutcome
    where
        R: AsyncRead + Unpin,
    {
        match self.try_decode(reader).await {
            Ok(Some(request)) => ParseOutcome::Parsed(request),
            Ok(None) => ParseOutcome::Incomplete,
            Err(e) => ParseOutcome::TransportFailure(e),
        }
    }

    async fn try_decode<R>(&self, reader: &mut R) -> io::Result<Option<Request>>
    where
        R: AsyncRead + Unpin,
    {
        let head = match self.read_head(reader).await? {
            Some(head) => head,
            None => return Ok(None),
        };

        let text = String::from_utf8_lossy(&head);
        let lines = split_lines(&text, self.line_splitting);

        let Some(request_line) = lines.first() else {
            return Ok(None);
        };
        let mut parts = request_line.splitn(3, ' ');
        let (Some(method), Some(target), Some(version)) = (parts.next(), parts.next(), parts.next())
        else {
            return Ok(None);
        };
        if method.is_empty() {
            return Ok(None);
        }

        let headers = parse_headers(&lines[1..]);
        let body = match content_length(&headers) {
            Some(len) => self.read_body(reader, len).await?,
            None => Vec::new(),
        };

        Ok(Some(Request::new(method, target, version, headers, body)))
    }

    /// Collect bytes until the header terminator. `None` means the stream
    /// ended first or the head outgrew `max_header_bytes`.
    async fn read_head<R>(&self, reader: &mut R) -> io::Result<Option<Vec<u8>>>
    where
        R: AsyncRead + Unpin,
    {
        let mut head = Vec::with_capacity(512);
        let mut byte = [0u8; 1];
        let mut crlf_run = 0;

        loop {
            if self.read(reader, &mut byte).await? == 0 {
                return Ok(None);
            }
            head.push(byte[0]);

            if matches!(byte[0], b'\r' | b'\n') {
                crlf_run += 1;
            } else {
                crlf_run = 0;
            }

            if crlf_run == HEADER_TERMINATOR_RUN {
                return Ok(Some(head));
            }
            if head.len() >= self.max_header_bytes {
                tracing::debug!(
                    limit = self.max_header_bytes,
                    "Header block exceeded limit"
                );
                return Ok(None);
            }
        }
    }

    async fn read_body<R>(&self, reader: &mut R, len: usize) -> io::Result<Vec<u8>>
    where
        R: AsyncRead + Unpin,
    {
        let mut body = Vec::with_capacity(len.min(BODY_CHUNK));
        let mut chunk = vec![0u8; len.min(BODY_CHUNK)];

        while body.len() < len {
            let want = (len - body.len()).min(chunk.len());
            let n = self.read(reader, &mut chunk[..want]).await?;
            if n == 0 {
                tracing::debug!(
                    expected = len,
                    received = body.len(),
                    "Stream ended before full body, returning truncated body"
                );
                break;
            }
            body.extend_from_slice(&chunk[..n]);
        }

        Ok(body)
    }

    async fn read<R>(&self, reader: &mut R, buf: &mut [u8]) -> io::Result<usize>
    where
        R: AsyncRead + Unpin,
    {
        match self.read_timeout {
            Some(limit) => tokio::time::timeout(limit, reader.read(buf))
                .await
                .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "idle read timeout"))?,
            None => reader.read(buf).await,
        }
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new(&ParserConfig::default(), None)
    }
}

/// Split a header block into lines.
///
/// Trailing empty lines are dropped; empty lines elsewhere are kept and
/// later skipped by the header parser.
fn split_lines(text: &str, mode: LineSplitting) -> Vec<&str> {
    let mut lines: Vec<&str> = match mode {
        LineSplitting::Strict => text.split("\r\n").collect(),
        LineSplitting::Permissive => split_permissive(text),
    };
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines
}

/// Any of `\r\n`, `\n\n`, `\r\r` or a lone `\n` is a line boundary,
/// matched leftmost first in that priority.
fn split_permissive(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let width = match (bytes[i], bytes.get(i + 1)) {
            (b'\r', Some(b'\n')) | (b'\n', Some(b'\n')) | (b'\r', Some(b'\r')) => 2,
            (b'\n', _) => 1,
            _ => 0,
        };
        if width == 0 {
            i += 1;
            continue;
        }
        lines.push(&text[start..i]);
        i += width;
        start = i;
    }
    lines.push(&text[start..]);
    lines
}

fn parse_headers(lines: &[&str]) -> HashMap<String, String> {
    lines
        .iter()
        .filter(|line| !line.is_empty())
        .filter_map(|line| line.split_once(": "))
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

/// A `Content-Length` that is not a positive integer counts as absent.
fn content_length(headers: &HashMap<String, String>) -> Option<usize> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|len| *len > 0)
}
