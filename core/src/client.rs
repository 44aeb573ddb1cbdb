//! Request builder, executor and response parser for the CRE API.
//!
//! # Design
//! `CreClient` holds a read-only `CreConfig` and a `Transport`; it keeps no
//! other state between calls. Each operation is split into a `build_*`
//! method that produces an `HttpRequest` and a `parse_*` method that
//! consumes an `HttpResponse`, so hosts that want to drive the network
//! themselves can. `submit_records`, `fetch_offering` and `ping` run the
//! whole round-trip through the configured transport.

use serde_json::Value;

use crate::config::CreConfig;
use crate::error::ApiError;
use crate::headers::{default_headers, merge_headers};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::logging::RequestLog;
use crate::transport::{Transport, UreqTransport};
use crate::types::{OfferingKey, OfferingRecord, RecordBatch};
use crate::wire;

const API_PREFIX: &str = "course/recordentry/eapi";
const SUBMIT_PATH: &str = "cre";
const PING_PATH: &str = "ping";

/// Client for the Course Record Entry API.
#[derive(Debug, Clone)]
pub struct CreClient<T = UreqTransport> {
    config: CreConfig,
    transport: T,
}

impl CreClient<UreqTransport> {
    /// Create a client using the default ureq transport with the configured
    /// timeout.
    pub fn new(config: CreConfig) -> Self {
        let transport = UreqTransport::new(config.timeout());
        Self { config, transport }
    }
}

impl<T> CreClient<T> {
    pub fn with_transport(config: CreConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &CreConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Versioned path for `path`, with or without its leading `/`.
    fn resolve_path(&self, path: &str) -> String {
        format!(
            "/{API_PREFIX}/v{}/{}",
            self.config.api_version,
            path.trim_start_matches('/')
        )
    }

    /// Absolute URL for `path`: `{protocol}://{host}/course/recordentry/eapi/v{version}/{path}`.
    pub fn build_url(&self, path: &str) -> String {
        format!(
            "{}://{}{}",
            self.config.protocol,
            self.config.host.trim_end_matches('/'),
            self.resolve_path(path)
        )
    }

    /// Build a request with the default headers merged under `headers`.
    pub fn build_request(
        &self,
        method: HttpMethod,
        path: &str,
        query: Vec<(String, String)>,
        body: Option<String>,
        headers: &[(String, String)],
    ) -> HttpRequest {
        HttpRequest {
            method,
            url: self.build_url(path),
            path: self.resolve_path(path),
            query,
            headers: merge_headers(headers, &default_headers(&self.config)),
            body,
        }
    }

    pub fn build_submit_records(&self, key: &OfferingKey, records: &[OfferingRecord]) -> HttpRequest {
        let body = wire::serialize_records(key, &self.config.source_system, records);
        self.build_request(HttpMethod::Post, SUBMIT_PATH, Vec::new(), Some(body), &[])
    }

    /// The offering id is percent-encoded as a single path segment.
    pub fn build_fetch_offering(&self, offering_id: &str) -> HttpRequest {
        let path = format!("{SUBMIT_PATH}/{}", encode_segment(offering_id));
        self.build_request(HttpMethod::Get, &path, Vec::new(), None, &[])
    }

    pub fn build_ping(&self) -> HttpRequest {
        self.build_request(HttpMethod::Get, PING_PATH, Vec::new(), None, &[])
    }

    pub fn parse_submit_records(
        &self,
        request: &HttpRequest,
        response: HttpResponse,
    ) -> Result<Value, ApiError> {
        check_status(request, &response)?;
        Ok(parse_body(&response.body))
    }

    /// A 404 means the offering is unknown upstream and yields `Ok(None)`.
    pub fn parse_fetch_offering(
        &self,
        request: &HttpRequest,
        response: HttpResponse,
    ) -> Result<Option<Value>, ApiError> {
        if response.status == 404 {
            return Ok(None);
        }
        check_status(request, &response)?;
        Ok(Some(parse_body(&response.body)))
    }

    pub fn parse_ping(&self, request: &HttpRequest, response: HttpResponse) -> Result<Value, ApiError> {
        check_status(request, &response)?;
        Ok(parse_body(&response.body))
    }
}

impl<T: Transport> CreClient<T> {
    /// Run one request through the transport and log the outcome.
    ///
    /// Any response, whatever its status, is returned as `Ok`.
    pub fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let response = self.transport.execute(request).map_err(|source| {
            if self.config.log.enabled {
                tracing::warn!(
                    client = %self.config.client_name,
                    method = %request.method,
                    url = %request.url,
                    error = %source,
                    "cre request failed without a response"
                );
            }
            ApiError::Transport {
                url: request.url.clone(),
                source,
            }
        })?;

        if self.config.log.enabled {
            RequestLog::capture(&self.config, request, &response).emit(self.config.log.level);
        }
        Ok(response)
    }

    /// Serialize `records` and POST them as one submission.
    ///
    /// Records with an unrecognized type are dropped from the body without
    /// error.
    pub fn submit_records(
        &self,
        organization_id: &str,
        batch_id: &str,
        class_id: &str,
        records: &[OfferingRecord],
    ) -> Result<Value, ApiError> {
        let key = OfferingKey::new(organization_id, batch_id, class_id);
        let request = self.build_submit_records(&key, records);
        let response = self.execute(&request)?;
        self.parse_submit_records(&request, response)
    }

    pub fn submit_batch(&self, batch: &RecordBatch) -> Result<Value, ApiError> {
        let request = self.build_submit_records(&batch.key, &batch.records);
        let response = self.execute(&request)?;
        self.parse_submit_records(&request, response)
    }

    /// Fetch the roster of a submitted offering; `None` if upstream has none.
    pub fn fetch_offering(&self, offering_id: &str) -> Result<Option<Value>, ApiError> {
        let request = self.build_fetch_offering(offering_id);
        let response = self.execute(&request)?;
        self.parse_fetch_offering(&request, response)
    }

    pub fn ping(&self) -> Result<Value, ApiError> {
        let request = self.build_ping();
        let response = self.execute(&request)?;
        self.parse_ping(&request, response)
    }
}

/// Percent-encode `segment`; `.` and `..` are encoded too so they stay
/// literal instead of acting as dot-segments.
fn encode_segment(segment: &str) -> String {
    match segment {
        "." => "%2E".to_string(),
        ".." => "%2E%2E".to_string(),
        other => urlencoding::encode(other).into_owned(),
    }
}

/// Map non-2xx statuses to `ApiError::Http`.
fn check_status(request: &HttpRequest, response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::Http {
        url: request.url.clone(),
        status: response.status,
        body: response.body.clone(),
    })
}

/// JSON when the body parses as JSON, otherwise the raw text. Empty is null.
fn parse_body(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}
