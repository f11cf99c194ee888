//! Postforge API server library.
//!
//! Exposes the building blocks (config, state, error handling, lifecycle,
//! routes) so integration tests and the binary entrypoint share them.

pub mod cache;
pub mod config;
pub mod error;
pub mod handlers;
pub mod lifecycle;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
