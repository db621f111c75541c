//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Decoded Request (route, params, method, headers, body)
//!     → router.rs (allow-list lookup on the route)
//!     → built-in handler (root, echo, user-agent)
//!       or files.rs (read/write under the root directory)
//!     → Return: filled Response (status, headers, optional body)
//! ```
//!
//! # Design Decisions
//! - Routes fixed at startup, immutable at runtime
//! - Exact match on the route part of the target, no patterns
//! - Failures become status codes (404, 500), never connection errors

pub mod files;
pub mod router;

pub use files::FileStore;
pub use router::{Dispatcher, Route, RouteTable, StaticRouter};
