/// laghi.net widget client.
///
/// laghi.net only answers the BootWidgetData POST for a browser-like
/// session, so every cycle is a two-step exchange on one long-lived HTTP
/// client:
///
///   1. GET  https://laghi.net/Page/laghi                       (session cookie)
///   2. POST https://laghi.net/MappaConSegnaposti/BootWidgetData  config=370
///
/// Every failure on this path degrades to "no data this cycle": the
/// public operations return `None` / an empty `Vec`, never an error.

use crate::ingest::extract::extract_lakes_in;
use crate::model::{LaghiError, LakeRecord, Result};
use chrono::{Local, TimeZone};
use serde_json::Value;
use std::time::Duration;

pub const SESSION_URL: &str = "https://laghi.net/Page/laghi";
pub const DATA_URL: &str = "https://laghi.net/MappaConSegnaposti/BootWidgetData";

/// Widget selector posted to the data endpoint.
pub const WIDGET_CONFIG_ID: &str = "370";

const USER_AGENT: &str = concat!("laghi_service/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Transport seam
// ---------------------------------------------------------------------------

/// The two HTTP calls the client needs. Implementations must keep session
/// state (cookies) between calls on the same instance.
pub trait Transport {
    /// GET `url`, discarding the body.
    fn get(&self, url: &str) -> Result<()>;

    /// POST `form` url-encoded to `url`, returning the body text.
    fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<String>;
}

impl Transport for reqwest::blocking::Client {
    fn get(&self, url: &str) -> Result<()> {
        let response = reqwest::blocking::Client::get(self, url).send()?;
        if !response.status().is_success() {
            return Err(LaghiError::Status {
                step: "session request",
                status: response.status().as_u16(),
            });
        }
        Ok(())
    }

    fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<String> {
        let response = self
            .post(url)
            .header("X-Requested-With", "XMLHttpRequest")
            .form(form)
            .send()?;
        if !response.status().is_success() {
            return Err(LaghiError::Status {
                step: "data request",
                status: response.status().as_u16(),
            });
        }
        Ok(response.text()?)
    }
}

/// Builds the blocking HTTP client used in production: cookie store on,
/// per-request timeout applied.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::blocking::Client> {
    let client = reqwest::blocking::Client::builder()
        .cookie_store(true)
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Owns the HTTP session for the life of the instance. Refresh cycles must
/// be serial; the coordinator guarantees one in-flight call at a time.
pub struct FetchClient<T = reqwest::blocking::Client> {
    transport: T,
    session_url: String,
    data_url: String,
}

impl FetchClient<reqwest::blocking::Client> {
    /// Client against laghi.net with a fresh cookie-enabled HTTP client.
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(FetchClient::with_transport(build_http_client(timeout)?))
    }
}

impl<T: Transport> FetchClient<T> {
    pub fn with_transport(transport: T) -> Self {
        FetchClient::with_endpoints(transport, SESSION_URL, DATA_URL)
    }

    /// Client against arbitrary endpoints (local mirrors, tests).
    pub fn with_endpoints(transport: T, session_url: impl Into<String>, data_url: impl Into<String>) -> Self {
        FetchClient {
            transport,
            session_url: session_url.into(),
            data_url: data_url.into(),
        }
    }

    /// GETs the bootstrap page so the session acquires its cookies.
    pub fn establish_session(&self) -> Result<()> {
        self.transport.get(&self.session_url)
    }

    /// POSTs the widget selector and returns the parsed payload, or `None`
    /// when the body is not JSON or the upstream reports `success: false`.
    pub fn fetch_payload(&self) -> Option<Value> {
        match self.request_payload() {
            Ok(payload) => Some(payload),
            Err(e) => {
                log_fetch_failure(&e);
                None
            }
        }
    }

    /// Fetches and normalizes the current lake records, with sample times
    /// interpreted in the host's local time zone. Empty on any failure.
    pub fn get_data(&self) -> Vec<LakeRecord> {
        self.get_data_in(&Local)
    }

    /// `get_data` with an explicit time zone for sample timestamps.
    pub fn get_data_in<Tz: TimeZone>(&self, tz: &Tz) -> Vec<LakeRecord> {
        // One best-effort attempt: a failed bootstrap ends the cycle.
        if let Err(e) = self.establish_session() {
            log_fetch_failure(&e);
            return Vec::new();
        }

        match self.fetch_payload() {
            Some(payload) => extract_lakes_in(&payload, tz),
            None => Vec::new(),
        }
    }

    fn request_payload(&self) -> Result<Value> {
        let body = self
            .transport
            .post_form(&self.data_url, &[("config", WIDGET_CONFIG_ID)])?;
        parse_envelope(&body)
    }
}

/// Parses the BootWidgetData body and checks its `success` flag.
///
/// # Errors
/// - `LaghiError::InvalidJson` — body is not JSON.
/// - `LaghiError::MissingShape` — JSON without a boolean `success`.
/// - `LaghiError::UpstreamFailure` — `success` is `false`.
pub fn parse_envelope(body: &str) -> Result<Value> {
    let payload: Value =
        serde_json::from_str(body).map_err(|e| LaghiError::InvalidJson(e.to_string()))?;

    match payload.get("success").and_then(Value::as_bool) {
        Some(true) => Ok(payload),
        Some(false) => Err(LaghiError::UpstreamFailure),
        None => Err(LaghiError::MissingShape(
            "response has no boolean success flag".to_string(),
        )),
    }
}

/// Logs why a cycle produced no data, keeping transport failure kinds apart.
fn log_fetch_failure(error: &LaghiError) {
    match error {
        LaghiError::Http(e) if e.is_timeout() => log::warn!("laghi.net timed out: {}", e),
        LaghiError::Http(e) if e.is_connect() => log::warn!("Could not connect to laghi.net: {}", e),
        LaghiError::Http(e) => log::warn!("laghi.net transport error: {}", e),
        other => log::warn!("No data from laghi.net: {}", other),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
