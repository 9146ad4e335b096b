//! CoopManager - Cooperative management backend
//!
//! This crate implements Ajo, the rotating savings arrangement run inside a
//! cooperative: admins configure commission and interest rates, create an
//! Ajo over a set of members, record contributions, and produce per-member
//! statements. Members accept or decline invitations and see their own
//! standing.
//!
//! Layout follows ports and adapters: `domain` holds the rules, `ports` the
//! traits the application needs, `application` the command and query
//! handlers, and `adapters` the HTTP, PostgreSQL, email and push
//! implementations.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
