//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (add/propagate request ID)
//!     → handler opens INFO scope on a blocking thread
//!     → notes service
//!     → response.rs (map errors to status codes)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestId, X_REQUEST_ID};
pub use response::{ApiError, ErrorResponse};
pub use server::{build_router, AppState, HttpServer};
