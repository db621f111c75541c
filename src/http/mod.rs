//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection (buffered read half)
//!     → decoder.rs (request line, headers, Content-Length body)
//!     → [routing layer builds the response]
//!     → policy.rs (keep-alive decision, Connection header)
//!     → compression.rs (gzip when negotiated)
//!     → encoder.rs (status line, headers, framing)
//!     → Send to client, loop or close
//! ```

pub mod compression;
pub mod decoder;
pub mod encoder;
pub mod policy;
pub mod request;
pub mod response;
pub mod server;

pub use compression::{Compressor, ContentCoding};
pub use decoder::{Decoder, ParseOutcome};
pub use encoder::{encode, write_response};
pub use request::Request;
pub use response::{Response, Status};
pub use server::HttpServer;
