//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and services open scopes:
//!     → mdc.rs (thread-local key/value context, Started/Finished records)
//!
//! Every tracing event:
//!     → logging.rs (formatter reads the context, prefixes the line)
//!     → stdout
//! ```
//!
//! # Design Decisions
//! - Structured logging through `tracing`
//! - Request ID flows through the context of each request
//! - The context is per thread; a unit of work stays on one thread

pub mod logging;
pub mod mdc;

pub use mdc::{MdcScope, ScopeLevel};
