//! Client for the Course Record Entry (CRE) API.
//!
//! # Overview
//! Serializes offering records (organization, instructor, student) into the
//! upstream's `|`-delimited text format, attaches the credential headers the
//! API expects, and exposes three operations: submit a batch of records,
//! fetch an offering's roster, and ping.
//!
//! # Design
//! - `CreClient` holds only its configuration and a `Transport`.
//! - Each operation is split into `build_*` (produces an `HttpRequest`) and
//!   `parse_*` (consumes an `HttpResponse`); the convenience methods run the
//!   round-trip through the transport in between.
//! - Records are a sum type; unrecognized record types are skipped when
//!   serializing rather than rejected.
//! - Retries, pooling and TLS are left to the transport.

pub mod client;
pub mod config;
pub mod error;
pub mod headers;
pub mod http;
pub mod logging;
pub mod transport;
pub mod types;
pub mod wire;

pub use client::CreClient;
pub use config::{CreConfig, LogConfig, LogLevel};
pub use error::{ApiError, BoxError};
pub use headers::{default_headers, merge_headers};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use logging::RequestLog;
pub use transport::{Transport, UreqTransport};
pub use types::{Instructor, OfferingKey, OfferingRecord, Organization, RecordBatch, Student};
pub use wire::{serialize_record, serialize_records};
