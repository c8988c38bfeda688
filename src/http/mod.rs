//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, body decoding)
//!     → handlers.rs (validation, engine query)
//!     → response.rs (JSON body, error mapping)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuid, RegionRequest, X_REQUEST_ID};
pub use response::{ApiError, ErrorResponse, RegionResponse};
pub use server::{build_router, AppState, HttpServer};
