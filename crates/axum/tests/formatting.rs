//! Integration tests for the JSON formatting layer.
//!
//! Each test drives a small router through `tower::ServiceExt::oneshot`
//! and inspects the raw response, so the full request/response cycle is
//! exercised exactly as axum runs it in production.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use http_body_util::BodyExt;
use serde::Serialize;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;

use manila_axum::{AcceptsJson, EnvelopePanicHandler, ErrorDetails, JsonFormattingLayer};

/// Payload returned by the JSON demo route.
#[derive(Serialize)]
struct Widget {
    id: u32,
    name: &'static str,
}

/// Error type in the shape applications are expected to use: plain body
/// plus an [`ErrorDetails`] extension for the formatter.
#[derive(Debug)]
struct TeapotError;

impl IntoResponse for TeapotError {
    fn into_response(self) -> Response {
        let mut response =
            (StatusCode::IM_A_TEAPOT, "short and stout".to_string()).into_response();
        response.extensions_mut().insert(
            ErrorDetails::new("short and stout").exception(format!("{self:?}")),
        );
        response
    }
}

async fn widget() -> Json<Widget> {
    Json(Widget {
        id: 7,
        name: "sprocket",
    })
}

async fn motd() -> &'static str {
    "all services nominal"
}

async fn empty() -> StatusCode {
    StatusCode::OK
}

async fn teapot() -> TeapotError {
    TeapotError
}

async fn boom() -> &'static str {
    panic!("the kettle exploded");
}

async fn negotiated(AcceptsJson(json): AcceptsJson) -> String {
    format!("json={json}")
}

fn routes() -> Router {
    Router::new()
        .route("/widget", get(widget))
        .route("/motd", get(motd))
        .route("/empty", get(empty))
        .route("/teapot", get(teapot))
        .route("/negotiated", get(negotiated))
}

/// Routes with the formatter installed.
fn formatted_app() -> Router {
    routes().layer(JsonFormattingLayer::new())
}

/// Routes with panic recovery and a debug-configurable formatter.
fn panicking_app(debug: bool) -> Router {
    Router::new()
        .route("/boom", get(boom))
        .layer(CatchPanicLayer::custom(EnvelopePanicHandler))
        .layer(JsonFormattingLayer::new().debug(debug))
}

async fn send(app: Router, uri: &str, accept: Option<&str>) -> Response {
    let mut builder = Request::builder().uri(uri);
    if let Some(accept) = accept {
        builder = builder.header(header::ACCEPT, accept);
    }
    let request = builder.body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

async fn body_json(response: Response) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Test: JSON accept wraps handler output in a success envelope
// ---------------------------------------------------------------------------

#[tokio::test]
async fn json_accept_wraps_handler_output() {
    let response = send(formatted_app(), "/widget", Some("application/json")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );

    let json = body_json(response).await;
    assert_eq!(json["status"], "success");
    assert_eq!(json["status_code"], 0);
    assert_eq!(json["data"], serde_json::json!({"id": 7, "name": "sprocket"}));
    assert!(json["error"].is_null());
}

// ---------------------------------------------------------------------------
// Test: non-JSON accept passes the response through byte-identical
// ---------------------------------------------------------------------------

#[tokio::test]
async fn non_json_accept_passes_through_unchanged() {
    let undecorated = send(routes(), "/widget", Some("text/html")).await;
    let formatted = send(formatted_app(), "/widget", Some("text/html")).await;

    assert_eq!(formatted.status(), undecorated.status());
    assert_eq!(
        formatted.headers().get(header::CONTENT_TYPE),
        undecorated.headers().get(header::CONTENT_TYPE)
    );
    assert_eq!(
        body_bytes(formatted).await,
        body_bytes(undecorated).await
    );
}

// ---------------------------------------------------------------------------
// Test: missing Accept header also passes through
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_accept_header_passes_through() {
    let response = send(formatted_app(), "/motd", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"all services nominal");
}

// ---------------------------------------------------------------------------
// Test: plain-text output is carried as a string `data` value
// ---------------------------------------------------------------------------

#[tokio::test]
async fn text_output_carried_as_string_data() {
    let response = send(formatted_app(), "/motd", Some("application/json")).await;

    let json = body_json(response).await;
    assert_eq!(json["status_code"], 0);
    assert_eq!(json["data"], "all services nominal");
}

// ---------------------------------------------------------------------------
// Test: empty success body yields a null `data` value
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_body_yields_null_data() {
    let response = send(formatted_app(), "/empty", Some("application/json")).await;

    let json = body_json(response).await;
    assert_eq!(json["status"], "success");
    assert!(json["data"].is_null());
}

// ---------------------------------------------------------------------------
// Test: framework 404 is reformatted as an error envelope
// ---------------------------------------------------------------------------

#[tokio::test]
async fn framework_error_wrapped_with_status_1() {
    let response = send(formatted_app(), "/nope", Some("application/json")).await;

    // The HTTP status is preserved; only the body is enveloped.
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["status"], "error");
    assert_eq!(json["status_code"], 1);
    assert!(json["data"].is_null());
    assert_eq!(json["error"]["status_code"], 404);
    assert_eq!(json["error"]["status"], "404 Not Found");
}

// ---------------------------------------------------------------------------
// Test: application errors surface their ErrorDetails message
// ---------------------------------------------------------------------------

#[tokio::test]
async fn application_error_uses_details_message() {
    let response = send(formatted_app(), "/teapot", Some("application/json")).await;

    assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);

    let json = body_json(response).await;
    assert_eq!(json["status_code"], 1);
    assert_eq!(json["error"]["status_code"], 418);
    assert_eq!(json["error"]["status"], "418 I'm a teapot");
    assert_eq!(json["error"]["message"], "short and stout");
    // Debug mode is off, so no exception leaks.
    assert!(json["error"].as_object().unwrap().get("debug").is_none());
}

// ---------------------------------------------------------------------------
// Test: debug mode adds exception and traceback for a panicking handler
// ---------------------------------------------------------------------------

#[tokio::test]
async fn debug_mode_adds_exception_and_traceback() {
    let response = send(panicking_app(true), "/boom", Some("application/json")).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["status_code"], 1);
    assert_eq!(json["error"]["status_code"], 500);

    let debug = &json["error"]["debug"];
    assert_eq!(debug["exception"], "the kettle exploded");
    assert!(debug["traceback"].is_string());
}

// ---------------------------------------------------------------------------
// Test: with debug disabled the debug key is absent
// ---------------------------------------------------------------------------

#[tokio::test]
async fn debug_disabled_omits_debug_key() {
    let response = send(panicking_app(false), "/boom", Some("application/json")).await;

    let json = body_json(response).await;
    assert_eq!(json["error"]["status_code"], 500);
    assert!(json["error"].as_object().unwrap().get("debug").is_none());
}

// ---------------------------------------------------------------------------
// Test: panics still produce the plain 500 for non-JSON clients
// ---------------------------------------------------------------------------

#[tokio::test]
async fn panic_stays_plain_for_non_json_clients() {
    let response = send(panicking_app(true), "/boom", Some("text/html")).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_bytes(response).await, b"Internal Server Error");
}

// ---------------------------------------------------------------------------
// Test: building the router without the layer restores stock behaviour
// ---------------------------------------------------------------------------

#[tokio::test]
async fn router_without_layer_is_stock_axum() {
    let response = send(routes(), "/widget", Some("application/json")).await;
    let json = body_json(response).await;

    // No envelope keys, just the handler's own payload.
    assert_eq!(json, serde_json::json!({"id": 7, "name": "sprocket"}));

    let error = send(routes(), "/nope", Some("application/json")).await;
    assert_eq!(error.status(), StatusCode::NOT_FOUND);
    assert!(body_bytes(error).await.is_empty());
}

// ---------------------------------------------------------------------------
// Test: handlers can read the cached AcceptsJson decision
// ---------------------------------------------------------------------------

#[tokio::test]
async fn handlers_see_cached_accepts_json() {
    let response = send(formatted_app(), "/negotiated", Some("application/json")).await;
    let json = body_json(response).await;
    assert_eq!(json["data"], "json=true");

    let response = send(formatted_app(), "/negotiated", Some("text/html")).await;
    assert_eq!(body_bytes(response).await, b"json=false");
}

// ---------------------------------------------------------------------------
// Test: pretty mode emits indented JSON with the same content
// ---------------------------------------------------------------------------

#[tokio::test]
async fn pretty_mode_emits_indented_json() {
    let app = routes().layer(JsonFormattingLayer::new().pretty(true));
    let response = send(app, "/widget", Some("application/json")).await;

    let bytes = body_bytes(response).await;
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.contains('\n'));

    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["status_code"], 0);
    assert_eq!(json["data"]["name"], "sprocket");
}
