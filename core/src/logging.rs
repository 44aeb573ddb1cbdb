//! Per-request log events.
//!
//! One event per completed request, emitted through `tracing` at the level
//! chosen in `LogConfig`. Optional fields are `None` when their toggle is
//! off and are then not recorded on the event at all.

use crate::config::{CreConfig, LogLevel};
use crate::http::{HttpRequest, HttpResponse};

/// The fields of one request log event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLog<'a> {
    pub client: &'a str,
    pub host: &'a str,
    pub method: &'static str,
    pub url: Option<&'a str>,
    pub path: Option<&'a str>,
    pub request_body: Option<&'a str>,
    pub status: u16,
    pub status_text: &'static str,
    pub response_body: Option<&'a str>,
}

impl<'a> RequestLog<'a> {
    pub fn capture(
        config: &'a CreConfig,
        request: &'a HttpRequest,
        response: &'a HttpResponse,
    ) -> Self {
        let toggles = &config.log;
        Self {
            client: &config.client_name,
            host: &config.host,
            method: request.method.as_str(),
            url: toggles.url.then_some(request.url.as_str()),
            path: toggles.path.then_some(request.path.as_str()),
            request_body: request.body.as_deref().filter(|_| toggles.request_body),
            status: response.status,
            status_text: response.status_text(),
            response_body: toggles.response_body.then_some(response.body.as_str()),
        }
    }

    pub fn emit(&self, level: LogLevel) {
        macro_rules! request_event {
            ($level:expr, $log:expr) => {
                tracing::event!(
                    $level,
                    client = $log.client,
                    host = $log.host,
                    method = $log.method,
                    url = $log.url,
                    path = $log.path,
                    request_body = $log.request_body,
                    status = $log.status,
                    status_text = $log.status_text,
                    response_body = $log.response_body,
                    "cre request completed"
                )
            };
        }

        match level {
            LogLevel::Trace => request_event!(tracing::Level::TRACE, self),
            LogLevel::Debug => request_event!(tracing::Level::DEBUG, self),
            LogLevel::Info => request_event!(tracing::Level::INFO, self),
            LogLevel::Warn => request_event!(tracing::Level::WARN, self),
            LogLevel::Error => request_event!(tracing::Level::ERROR, self),
        }
    }
}
