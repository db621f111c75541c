//! Response serialization.
//!
//! Wire layout: status line, one `Name: Value` line per header, a computed
//! `Content-Length` when a body is present and the caller did not set one,
//! a blank line, then the raw body.

use std::io;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::request::CONTENT_LENGTH;
use crate::http::response::Response;

/// Encode `response` into the exact bytes sent on the wire.
pub fn encode(response: &Response) -> Vec<u8> {
    let mut head = format!("{} {}\r\n", response.version(), response.status());

    for (name, value) in response.headers() {
        head.push_str(name);
        head.push_str(": ");
        head.push_str(value);
        head.push_str("\r\n");
    }

    let body = response.body();
    if let Some(body) = body {
        if response.header(CONTENT_LENGTH).is_none() {
            head.push_str(&format!("{}: {}\r\n", CONTENT_LENGTH, body.len()));
        }
    }
    head.push_str("\r\n");

    let mut out = head.into_bytes();
    if let Some(body) = body {
        out.extend_from_slice(body);
    }
    out
}

/// Encode `response` and write it to `writer`, flushing afterwards.
pub async fn write_response<W>(writer: &mut W, response: &Response) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(&encode(response)).await?;
    writer.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::response::Status;

    fn split_head(bytes: &[u8]) -> (String, &[u8]) {
        let pos = bytes
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .expect("blank line");
        (
            String::from_utf8(bytes[..pos + 4].to_vec()).unwrap(),
            &bytes[pos + 4..],
        )
    }

    #[test]
    fn encodes_body_with_computed_length() {
        let res = Response::new("HTTP/1.1")
            .with_header("Content-Type", "text/plain")
            .with_body("hello");
        assert_eq!(
            encode(&res),
            b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 5\r\n\r\nhello"
        );
    }

    #[test]
    fn absent_body_emits_no_length() {
        let res = Response::new("HTTP/1.1").with_status(Status::NotFound);
        assert_eq!(encode(&res), b"HTTP/1.1 404 Not Found\r\n\r\n");
    }

    #[test]
    fn empty_body_emits_zero_length() {
        let res = Response::new("HTTP/1.1").with_body(Vec::new());
        assert_eq!(encode(&res), b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n");
    }

    #[test]
    fn caller_length_is_not_overwritten() {
        let res = Response::new("HTTP/1.1")
            .with_header("Content-Length", "99")
            .with_body("abc");
        let encoded = encode(&res);
        let (head, body) = split_head(&encoded);
        assert_eq!(head.matches("Content-Length").count(), 1);
        assert!(head.contains("Content-Length: 99\r\n"));
        assert_eq!(body, b"abc");
    }

    #[test]
    fn length_matches_body_bytes() {
        for len in [1usize, 7, 1024, 70_000] {
            let res = Response::new("HTTP/1.1").with_body(vec![0xAB; len]);
            let encoded = encode(&res);
            let (head, body) = split_head(&encoded);
            assert!(head.contains(&format!("Content-Length: {len}\r\n")));
            assert_eq!(body.len(), len);
        }
    }

    #[test]
    fn header_order_is_deterministic() {
        let res = Response::new("HTTP/1.0")
            .with_status(Status::Created)
            .with_header("Connection", "close")
            .with_header("Content-Encoding", "gzip");
        assert_eq!(
            encode(&res),
            b"HTTP/1.0 201 Created\r\nConnection: close\r\nContent-Encoding: gzip\r\n\r\n"
        );
    }

    #[tokio::test]
    async fn write_response_writes_encoded_bytes() {
        let res = Response::new("HTTP/1.1")
            .with_status(Status::InternalServerError)
            .with_header("Connection", "keep-alive");
        let mut out = Vec::new();
        write_response(&mut out, &res).await.unwrap();
        assert_eq!(
            out,
            b"HTTP/1.1 500 Internal Server Error\r\nConnection: keep-alive\r\n\r\n"
        );
    }
}
