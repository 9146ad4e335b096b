//! HTTP adapter for the Ajo module.
//!
//! - `dto` - camelCase request and response bodies
//! - `handlers` - axum handlers and the `AjoError` to status mapping
//! - `routes` - the `/ajo` router

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::{handle_ajo_error, AjoHandlers, AjoPorts};
pub use routes::ajo_routes;
