//! Response extension carrying error context for the envelope.

/// Structured error context attached to an error response.
///
/// Application error types and [`EnvelopePanicHandler`] insert this into
/// response extensions; [`JsonFormatting`] reads it when building the
/// envelope's `error` object. `message` feeds `error.message`;
/// `exception` and `traceback` feed `error.debug` when debug mode is on.
///
/// Without this extension the formatter falls back to the response body
/// text, so attaching it is optional for applications that are happy with
/// plain-text error bodies.
///
/// [`EnvelopePanicHandler`]: crate::EnvelopePanicHandler
/// [`JsonFormatting`]: crate::JsonFormatting
#[derive(Debug, Clone)]
pub struct ErrorDetails {
    /// Human-readable error message.
    pub message: String,
    /// Printable representation of the underlying error, if any.
    pub exception: Option<String>,
    /// Captured backtrace, if any.
    pub traceback: Option<String>,
}

impl ErrorDetails {
    /// Context with a message only.
    pub fn new(message: impl Into<String>) -> Self {
        ErrorDetails {
            message: message.into(),
            exception: None,
            traceback: None,
        }
    }

    /// Attach a printable representation of the underlying error.
    pub fn exception(mut self, exception: impl Into<String>) -> Self {
        self.exception = Some(exception.into());
        self
    }

    /// Attach a captured backtrace.
    pub fn traceback(mut self, traceback: impl Into<String>) -> Self {
        self.traceback = Some(traceback.into());
        self
    }
}
