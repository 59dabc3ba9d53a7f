//! Minimal HTTP front for the dispute desk.
//!
//! Routes:
//!   GET     /               status message
//!   POST    /api/classify   classify a `{ "rows": [...] }` batch
//!   GET     /api/history    every audit entry, in append order
//!   OPTIONS *               CORS preflight

use anyhow::Result;
use rege_core::{config::DeskConfig, desk::DisputeDesk, error::RegeError};
use serde_json::{json, Value};
use std::io::Read;
use tiny_http::{Header, Method, Request, Response, Server};

pub fn serve(desk: &DisputeDesk, config: &DeskConfig) -> Result<()> {
    let addr = config.addr();
    let server = Server::http(&addr).map_err(|e| anyhow::anyhow!("server: {e}"))?;
    log::info!("RegE Radar backend listening on http://{addr}");

    for mut request in server.incoming_requests() {
        let (status, payload) = match read_body(&mut request, config.max_body_bytes) {
            Ok(body) => {
                let path = request.url().split('?').next().unwrap_or("/").to_string();
                route(desk, request.method(), &path, &body)
            }
            Err(reply) => reply,
        };
        log::debug!("{} {} -> {status}", request.method(), request.url());
        let _ = request.respond(json_response(status, payload));
    }
    Ok(())
}

/// Dispatch one request. Returns the status code and JSON payload
/// (`None` for an empty body).
pub fn route(desk: &DisputeDesk, method: &Method, path: &str, body: &str) -> (u16, Option<Value>) {
    match (method, path) {
        (Method::Options, _) => (204, None),
        (Method::Get, "/") => (200, Some(json!(desk.status()))),
        (Method::Get, "/api/history") => (200, Some(json!(desk.history()))),
        (Method::Post, "/api/classify") => {
            let parsed: Value = match serde_json::from_str(body) {
                Ok(v) => v,
                Err(e) => return (400, Some(json!({ "error": format!("Invalid JSON: {e}") }))),
            };
            match desk.classify(&parsed) {
                Ok(response) => (200, Some(json!(response))),
                Err(RegeError::InvalidBatch { message }) => (400, Some(json!({ "error": message }))),
                Err(e) => {
                    log::warn!("classify failed: {e}");
                    (500, Some(json!({ "error": "Could not record the audit entries." })))
                }
            }
        }
        _ => (404, Some(json!({ "error": format!("No route for {method} {path}") }))),
    }
}

fn read_body(request: &mut Request, limit: usize) -> Result<String, (u16, Option<Value>)> {
    let too_large = || (413, Some(json!({ "error": format!("Request body exceeds {limit} bytes.") })));
    if request.body_length().is_some_and(|n| n > limit) {
        return Err(too_large());
    }
    let mut body = String::new();
    request
        .as_reader()
        .take(limit as u64 + 1)
        .read_to_string(&mut body)
        .map_err(|e| (400, Some(json!({ "error": format!("read body: {e}") }))))?;
    if body.len() > limit {
        return Err(too_large());
    }
    Ok(body)
}

fn json_response(status: u16, payload: Option<Value>) -> Response<std::io::Cursor<Vec<u8>>> {
    let body = payload.map(|p| p.to_string()).unwrap_or_default();
    let mut response = Response::from_string(body).with_status_code(status);
    for header in cors_headers() {
        response.add_header(header);
    }
    response
}

fn cors_headers() -> Vec<Header> {
    [
        ("Content-Type", "application/json"),
        ("Access-Control-Allow-Origin", "*"),
        ("Access-Control-Allow-Methods", "GET, POST, OPTIONS"),
        ("Access-Control-Allow-Headers", "Content-Type"),
    ]
    .iter()
    .filter_map(|(k, v)| Header::from_bytes(k.as_bytes(), v.as_bytes()).ok())
    .collect()
}
