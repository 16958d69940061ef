/// HTTP endpoint for querying sensor values
///
/// Read-only view over the coordinator snapshot for dashboards and
/// scripts that want the current lake sensors without polling laghi.net.
///
/// Endpoints:
/// - GET /health - Service health and refresh state
/// - GET /sensors - All sensors
/// - GET /sensor/{unique_id} - One sensor

use crate::coordinator::SnapshotHandle;
use crate::sensors::{build_sensors, find_sensor};
use std::io::Cursor;

type JsonResponse = tiny_http::Response<Cursor<Vec<u8>>>;

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

/// Builds the response for `url` against the current snapshot.
pub fn route(url: &str, snapshot: &SnapshotHandle, configured: &[String]) -> (u16, serde_json::Value) {
    // Query strings are not used by any route
    let path = url.split('?').next().unwrap_or(url);

    if path == "/health" {
        return handle_health(snapshot);
    }
    if path == "/sensors" {
        return handle_sensors(snapshot, configured);
    }
    if let Some(raw_id) = path.strip_prefix("/sensor/") {
        // Lake names like "Lago d'Iseo" put an apostrophe in the id
        return match urlencoding::decode(raw_id) {
            Ok(unique_id) => handle_sensor(snapshot, configured, &unique_id),
            Err(_) => unknown_sensor(raw_id),
        };
    }

    (
        404,
        serde_json::json!({
            "error": "Not found",
            "available_endpoints": ["/health", "/sensors", "/sensor/{unique_id}"]
        }),
    )
}

fn handle_health(snapshot: &SnapshotHandle) -> (u16, serde_json::Value) {
    let snap = snapshot.read();
    (
        200,
        serde_json::json!({
            "status": "ok",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "last_update_success": snap.last_update_success,
            "consecutive_failures": snap.consecutive_failures,
            "last_refreshed": snap.last_refreshed,
            "lakes": snap.records.len(),
        }),
    )
}

fn handle_sensors(snapshot: &SnapshotHandle, configured: &[String]) -> (u16, serde_json::Value) {
    let snap = snapshot.read();
    let states: Vec<_> = build_sensors(&snap, configured)
        .iter()
        .map(|s| s.state(&snap))
        .collect();
    (200, serde_json::json!(states))
}

fn handle_sensor(snapshot: &SnapshotHandle, configured: &[String], unique_id: &str) -> (u16, serde_json::Value) {
    let snap = snapshot.read();
    let sensors = build_sensors(&snap, configured);
    match find_sensor(&sensors, unique_id) {
        Some(sensor) => (200, serde_json::json!(sensor.state(&snap))),
        None => unknown_sensor(unique_id),
    }
}

fn unknown_sensor(unique_id: &str) -> (u16, serde_json::Value) {
    (
        404,
        serde_json::json!({
            "error": "Unknown sensor",
            "unique_id": unique_id
        }),
    )
}

// ---------------------------------------------------------------------------
// HTTP Server
// ---------------------------------------------------------------------------

/// Start HTTP endpoint server on the specified port
pub fn start_endpoint_server(port: u16, snapshot: SnapshotHandle, configured: Vec<String>) -> Result<(), String> {
    let server = tiny_http::Server::http(format!("0.0.0.0:{}", port))
        .map_err(|e| format!("Failed to start HTTP server: {}", e))?;

    log::info!("HTTP endpoint listening on http://0.0.0.0:{}", port);

    for request in server.incoming_requests() {
        let (status, body) = route(request.url(), &snapshot, &configured);
        if let Err(e) = request.respond(create_response(status, &body)) {
            log::warn!("Failed to send response: {}", e);
        }
    }

    Ok(())
}

/// Create HTTP response with JSON body
fn create_response(status_code: u16, json: &serde_json::Value) -> JsonResponse {
    let body = serde_json::to_string_pretty(json).unwrap_or_else(|_| "{}".to_string());
    let response = tiny_http::Response::from_data(body.into_bytes())
        .with_status_code(tiny_http::StatusCode::from(status_code));

    match tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]) {
        Ok(header) => response.with_header(header),
        Err(()) => response,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
