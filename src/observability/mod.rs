//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields
//!     → spans per connection (connection_id, peer) and per request
//!       (request_id, method, target)
//!
//! Consumers:
//!     → logging.rs subscriber (stdout, filtered)
//! ```
//!
//! # Design Decisions
//! - Structured fields rather than formatted messages
//! - Connection and request IDs flow through every event in a cycle
//! - `RUST_LOG` overrides the configured level

pub mod logging;
