//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Parse CLI → Load config → Init logging → Bind listener → Serve
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain connections (bounded) → Exit
//!
//! Signals (signals.rs):
//!     Ctrl+C / SIGTERM → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Listener binds last, after config and logging are ready
//! - Shutdown has a deadline: connections still open after the grace
//!   period are abandoned

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
