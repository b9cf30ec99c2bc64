//! Typed data-access layer for the affiliate dashboard API.
//!
//! # Overview
//! `ApiClient` issues GET/POST requests against a configured base URL and
//! turns every outcome into either a typed value or an `ApiError`. Domain
//! modules (`LoyaltyApi`, `CommissionApi`, `ReferralApi`, `UserApi`) are
//! thin wrappers that only choose a path, a query and a response type.
//!
//! # Design
//! - Requests and responses are plain data (`HttpRequest`, `HttpResponse`);
//!   the `Transport` trait is the only place network I/O happens.
//! - `is_api_error` is a structural check over JSON, so any backend body
//!   shaped like `{message, errors?}` is surfaced verbatim.
//! - Paginated responses always carry consistent `meta`; see `pagination`.
//! - Logging goes through an injected `LogSink`, never a global.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod pagination;
pub mod transport;
pub mod types;

#[cfg(test)]
mod testing;

pub use api::{CommissionApi, LoyaltyApi, ReferralApi, UserApi};
pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::{is_api_error, ApiError, BuildError, FieldError, NotAnApiError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Query, QueryValue};
pub use logging::{LogSink, NoopSink, TracingSink};
pub use pagination::{PageMeta, PaginatedResponse};
pub use transport::{ReqwestTransport, Transport};
pub use types::*;
