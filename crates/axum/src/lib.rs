//! Axum middleware that wraps route output and error responses in the
//! uniform manila envelope when the client asks for JSON.
//!
//! Installing the formatter is layering it over a router; building the
//! router without the layer restores stock axum behaviour for every
//! route:
//!
//! ```ignore
//! let app = Router::new()
//!     .route("/items", get(list_items))
//!     .layer(CatchPanicLayer::custom(EnvelopePanicHandler))
//!     .layer(JsonFormattingLayer::new().debug(true));
//! ```
//!
//! The formatting layer must be added last (outermost) so it sees the
//! responses produced by every inner layer, panic recovery included.
//! Clients that do not send `application/json` in their `Accept` header
//! receive every response byte-for-byte unchanged.

pub mod accept;
pub mod details;
pub mod layer;
pub mod panic;

pub use accept::{accepts_json, AcceptsJson};
pub use details::ErrorDetails;
pub use layer::{FormattingConfig, JsonFormatting, JsonFormattingLayer};
pub use panic::EnvelopePanicHandler;
