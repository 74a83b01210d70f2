//! Panic-to-error bridge for `tower_http::catch_panic`.

use std::any::Any;
use std::backtrace::Backtrace;

use axum::body::Body;
use axum::http::{header, HeaderValue, Response, StatusCode};
use tower_http::catch_panic::ResponseForPanic;

use crate::details::ErrorDetails;

/// Builds the 500 response for a panicking handler and records the panic
/// payload and backtrace as [`ErrorDetails`], so the formatting layer can
/// expose them under `error.debug` when debug mode is on.
///
/// Use with `CatchPanicLayer::custom`, layered inside the formatting
/// layer:
///
/// ```ignore
/// let app = router
///     .layer(CatchPanicLayer::custom(EnvelopePanicHandler))
///     .layer(JsonFormattingLayer::new().debug(true));
/// ```
///
/// Non-JSON clients receive the plain 500 body untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvelopePanicHandler;

impl ResponseForPanic for EnvelopePanicHandler {
    type ResponseBody = Body;

    fn response_for_panic(&mut self, err: Box<dyn Any + Send + 'static>) -> Response<Body> {
        let exception = panic_message(err.as_ref());
        let traceback = Backtrace::force_capture().to_string();
        tracing::error!(panic = %exception, "request handler panicked");

        let mut response = Response::new(Body::from("Internal Server Error"));
        *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        response.extensions_mut().insert(
            ErrorDetails::new("Internal Server Error")
                .exception(exception)
                .traceback(traceback),
        );
        response
    }
}

/// Render a panic payload the way `std` would print it.
fn panic_message(err: &(dyn Any + Send)) -> String {
    if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic payload".to_string()
    }
}
