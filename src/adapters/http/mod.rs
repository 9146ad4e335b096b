//! HTTP adapters - REST API implementations.
//!
//! - `ajo` - The `/ajo` endpoints
//! - `middleware` - Bearer token authentication
//! - `router` - Assembles the application with tracing, CORS and timeouts

pub mod ajo;
pub mod middleware;
pub mod router;

pub use ajo::{AjoHandlers, AjoPorts};
pub use router::app_router;
