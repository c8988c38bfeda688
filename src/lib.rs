//! Region latency service library.
//!
//! Answers "which regions are within N ms of this origin region?" from a
//! static latency matrix and region map loaded at startup.

pub mod config;
pub mod http;
pub mod latency;
pub mod lifecycle;
pub mod observability;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use latency::LatencyEngine;
pub use lifecycle::Shutdown;
