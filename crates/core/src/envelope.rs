//! The uniform response envelope and its fixed status keying.
//!
//! Every JSON-formatted response carries the same four keys: `status`,
//! `status_code`, `data`, `error`. `data` is populated only on success,
//! `error` only on error; the unused side serializes as `null` so clients
//! can destructure unconditionally.

use serde::{Serialize, Serializer};
use serde_json::Value;

/// Outcome classification for an enveloped response.
///
/// Keyed by small integer codes on the wire (`status_code`) with a fixed
/// display string (`status`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The route handler ran and produced a result.
    Success,
    /// The framework surfaced an HTTP error for this request.
    Error,
    /// The formatter itself was handed a status it does not know.
    InternalFailure,
}

impl Status {
    /// The integer key serialized as `status_code`.
    pub fn code(self) -> u8 {
        match self {
            Status::Success => 0,
            Status::Error => 1,
            Status::InternalFailure => 2,
        }
    }

    /// Map an integer key back to a status.
    ///
    /// Total: unknown codes yield [`Status::InternalFailure`], so a bad
    /// internal key still produces a well-formed envelope.
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Status::Success,
            1 => Status::Error,
            _ => Status::InternalFailure,
        }
    }

    /// The display string serialized as `status`.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Success => "success",
            Status::Error => "error",
            Status::InternalFailure => "internal failure",
        }
    }
}

impl Serialize for Status {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// The uniform JSON wrapper for route output and error responses.
///
/// Built once per request/response cycle and serialized straight into the
/// response body. Use the constructors instead of assembling fields by
/// hand so `status` and `status_code` stay consistent.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    /// Outcome classification, e.g. `"success"`.
    pub status: Status,
    /// Integer key for [`Self::status`].
    pub status_code: u8,
    /// Route handler output; `null` unless the request succeeded.
    pub data: Option<Value>,
    /// Error description; `null` unless the request failed.
    pub error: Option<ErrorBody>,
}

impl Envelope {
    /// Skeleton envelope for a status, with `data` and `error` unset.
    pub fn new(status: Status) -> Self {
        Envelope {
            status,
            status_code: status.code(),
            data: None,
            error: None,
        }
    }

    /// Skeleton envelope from a raw status code.
    ///
    /// Total mapping, see [`Status::from_code`].
    pub fn from_code(code: u8) -> Self {
        Self::new(Status::from_code(code))
    }

    /// Success envelope carrying the route handler's output.
    pub fn success(data: Value) -> Self {
        let mut envelope = Self::new(Status::Success);
        envelope.data = Some(data);
        envelope
    }

    /// Error envelope carrying a framework-surfaced HTTP error.
    pub fn failure(error: ErrorBody) -> Self {
        let mut envelope = Self::new(Status::Error);
        envelope.error = Some(error);
        envelope
    }
}

/// Error half of the envelope, built from an HTTP error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    /// HTTP status code of the failed response.
    pub status_code: u16,
    /// Full status line, e.g. `"404 Not Found"`.
    pub status: String,
    /// Human-readable message taken from the error response.
    pub message: String,
    /// Exception and traceback context; key omitted outside debug mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<DebugInfo>,
}

/// Debug-mode error context.
#[derive(Debug, Clone, Serialize)]
pub struct DebugInfo {
    /// Printable representation of the underlying error or panic payload.
    pub exception: String,
    /// Captured backtrace, when one was available.
    pub traceback: String,
}
