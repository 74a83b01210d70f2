//! Envelope data model for the manila response formatter.
//!
//! Pure serde types with no web-framework dependency. The `manila-axum`
//! crate turns HTTP responses into these values; this crate only defines
//! the wire shape and the status keying.

pub mod envelope;

pub use envelope::{DebugInfo, Envelope, ErrorBody, Status};
