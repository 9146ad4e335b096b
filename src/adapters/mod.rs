//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - Bearer token validation (HS256 JWT, mock)
//! - `email` - Resend transactional email
//! - `http` - axum REST surface
//! - `memory` - In-memory implementations of every port
//! - `postgres` - sqlx persistence
//! - `push` - Expo push notifications

pub mod auth;
pub mod email;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod push;
