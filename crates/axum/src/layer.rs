//! The response formatting layer and service.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::{to_bytes, Body, Bytes};
use axum::http::response::Parts;
use axum::http::{header, HeaderMap, HeaderValue, Request, Response, StatusCode};
use serde_json::Value;
use tower::{Layer, Service};

use manila_core::{DebugInfo, Envelope, ErrorBody};

use crate::accept::{accepts_json, AcceptsJson};
use crate::details::ErrorDetails;

/// Formatting options shared by the layer and its services.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormattingConfig {
    /// Include `error.debug` (exception and traceback) in error envelopes.
    pub debug: bool,
    /// Pretty-print serialized envelopes.
    pub pretty: bool,
}

/// Layer that installs the JSON envelope formatter.
///
/// Adding the layer is the whole installation; a router built without it
/// behaves exactly like stock axum again.
#[derive(Debug, Clone, Default)]
pub struct JsonFormattingLayer {
    config: FormattingConfig,
}

impl JsonFormattingLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Include exception and traceback context in error envelopes.
    pub fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    /// Pretty-print serialized envelopes.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.config.pretty = pretty;
        self
    }
}

impl<S> Layer<S> for JsonFormattingLayer {
    type Service = JsonFormatting<S>;

    fn layer(&self, inner: S) -> Self::Service {
        JsonFormatting {
            inner,
            config: self.config,
        }
    }
}

/// Middleware service produced by [`JsonFormattingLayer`].
///
/// Sniffs the `Accept` header once per request, records the decision as
/// an [`AcceptsJson`] request extension, runs the inner service, then
/// rewraps the response in the envelope when the client asked for JSON.
/// All other requests pass through byte-for-byte.
#[derive(Debug, Clone)]
pub struct JsonFormatting<S> {
    inner: S,
    config: FormattingConfig,
}

impl<S> Service<Request<Body>> for JsonFormatting<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response<Body>;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let wants_json = accepts_json(req.headers());
        req.extensions_mut().insert(AcceptsJson(wants_json));

        let config = self.config;
        let future = self.inner.call(req);
        Box::pin(async move {
            let response = future.await?;
            if !wants_json {
                return Ok(response);
            }
            Ok(format_response(response, config).await)
        })
    }
}

/// Buffer a response and rewrap its body in the envelope.
async fn format_response(response: Response<Body>, config: FormattingConfig) -> Response<Body> {
    let (mut parts, body) = response.into_parts();

    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(err) => {
            // A streaming body that failed mid-read can be neither
            // enveloped nor restored.
            tracing::error!(error = %err, "failed to buffer response body");
            return internal_failure_response(config);
        }
    };

    let envelope = if parts.status.is_client_error() || parts.status.is_server_error() {
        let details = parts.extensions.get::<ErrorDetails>();
        Envelope::failure(error_body(parts.status, &bytes, details, config.debug))
    } else {
        Envelope::success(success_data(&parts, &bytes))
    };

    match serialize(&envelope, config) {
        Ok(json) => {
            parts.headers.remove(header::CONTENT_LENGTH);
            parts.headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
            Response::from_parts(parts, Body::from(json))
        }
        Err(err) => {
            // Hand the original bytes back rather than eat the response.
            tracing::error!(error = %err, "failed to serialize response envelope");
            Response::from_parts(parts, Body::from(bytes))
        }
    }
}

/// Interpret a successful response body as the envelope's `data` value.
///
/// JSON bodies are embedded as their parsed value so `Json(..)` handler
/// output round-trips; anything else is carried as a string; an empty
/// body becomes `null`.
fn success_data(parts: &Parts, bytes: &Bytes) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    if is_json_content_type(&parts.headers) {
        if let Ok(value) = serde_json::from_slice(bytes) {
            return value;
        }
    }
    Value::String(String::from_utf8_lossy(bytes).into_owned())
}

/// Build the envelope's `error` object from an error response.
///
/// Message precedence: [`ErrorDetails`] extension, then the body text,
/// then the status' canonical reason. The debug block is attached only
/// when debug mode is on and the response actually carried exception or
/// traceback context.
fn error_body(
    status: StatusCode,
    bytes: &Bytes,
    details: Option<&ErrorDetails>,
    debug: bool,
) -> ErrorBody {
    let message = match details {
        Some(details) => details.message.clone(),
        None if !bytes.is_empty() => String::from_utf8_lossy(bytes).into_owned(),
        None => status.canonical_reason().unwrap_or("").to_string(),
    };

    let debug_info = details
        .filter(|d| debug && (d.exception.is_some() || d.traceback.is_some()))
        .map(|d| DebugInfo {
            exception: d.exception.clone().unwrap_or_default(),
            traceback: d.traceback.clone().unwrap_or_default(),
        });

    ErrorBody {
        status_code: status.as_u16(),
        status: status_line(status),
        message,
        debug: debug_info,
    }
}

/// `"<code> <canonical reason>"`, e.g. `"404 Not Found"`.
fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}

fn is_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"))
}

fn serialize(envelope: &Envelope, config: FormattingConfig) -> serde_json::Result<Vec<u8>> {
    if config.pretty {
        serde_json::to_vec_pretty(envelope)
    } else {
        serde_json::to_vec(envelope)
    }
}

/// Last-resort response when the original body could not be buffered.
fn internal_failure_response(config: FormattingConfig) -> Response<Body> {
    let status = StatusCode::INTERNAL_SERVER_ERROR;
    let envelope = Envelope::failure(ErrorBody {
        status_code: status.as_u16(),
        status: status_line(status),
        message: "failed to read response body".to_string(),
        debug: None,
    });
    let json = serialize(&envelope, config).unwrap_or_default();

    let mut response = Response::new(Body::from(json));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}
