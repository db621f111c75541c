//! Minimal HTTP/1.1 server library.
//!
//! Decodes requests straight off a TCP stream, answers a fixed set of
//! routes (echo, user-agent, files, root probe) and keeps connections
//! alive across requests according to the HTTP version and `Connection`
//! header.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod routing;

pub use config::schema::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
