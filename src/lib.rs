//! Notes REST service library

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod notes;
pub mod observability;

pub use config::ServiceConfig;
pub use error::{NoteError, Result};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use observability::{MdcScope, ScopeLevel};

#[doc(hidden)]
pub mod __private {
    pub use tracing;
}
