//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (accept loop, worker pool limit)
//!     → connection.rs (ID, live-connection tracking)
//!     → Hand off to the HTTP connection driver
//!
//! Driver States:
//!     Reading → Dispatched → Reading (keep-alive) | Closed
//! ```
//!
//! # Design Decisions
//! - A worker slot is taken before accept, so a saturated pool queues
//!   connections in the kernel backlog
//! - Each connection is tracked so shutdown can drain them

pub mod connection;
pub mod listener;

pub use connection::{ConnectionGuard, ConnectionId, ConnectionState, ConnectionTracker};
pub use listener::{Listener, ListenerError, WorkerPermit};
