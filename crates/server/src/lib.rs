//! Demonstration API server for the manila response formatter.
//!
//! Exposes the building blocks (config, error type, routes, router) so
//! integration tests and the binary entrypoint share the same middleware
//! stack.

pub mod config;
pub mod error;
pub mod router;
pub mod routes;
