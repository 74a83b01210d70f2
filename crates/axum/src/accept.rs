//! `Accept` header sniffing.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, HeaderMap};

/// True iff the request's `Accept` header asks for JSON.
///
/// Deliberately a substring check rather than content negotiation:
/// quality factors and wildcard ranges are ignored. `Accept:
/// application/json;q=0.1` counts as JSON, `Accept: */*` does not.
pub fn accepts_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"))
}

/// Cached result of the JSON sniff for the current request.
///
/// [`JsonFormatting`](crate::JsonFormatting) inserts this into request
/// extensions before calling the inner service, so handlers can branch on
/// the decision without re-reading headers:
///
/// ```ignore
/// async fn my_handler(AcceptsJson(json): AcceptsJson) -> Response {
///     if json { /* lean payload, the layer wraps it */ } else { /* html */ }
/// }
/// ```
///
/// The extractor is infallible: when the layer is not installed it falls
/// back to sniffing the `Accept` header itself.
#[derive(Debug, Clone, Copy)]
pub struct AcceptsJson(pub bool);

impl<S> FromRequestParts<S> for AcceptsJson
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let cached = parts.extensions.get::<AcceptsJson>().copied();
        Ok(cached.unwrap_or_else(|| AcceptsJson(accepts_json(&parts.headers))))
    }
}
