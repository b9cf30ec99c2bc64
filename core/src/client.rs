//! Typed HTTP client for the dashboard API.
//!
//! # Design
//! `ApiClient` holds only read-only configuration: the base URL, the
//! transport and the log sink. Each call is split into a pure `build_*`
//! step producing an `HttpRequest`, one round trip through the
//! `Transport`, and a pure `parse*` step consuming the `HttpResponse`.
//! Every failure leaving this module is an `ApiError`; nothing else can
//! reach the caller.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::api::{CommissionApi, LoyaltyApi, ReferralApi, UserApi};
use crate::config::ClientConfig;
use crate::error::{ApiError, BuildError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Query};
use crate::logging::{LogSink, TracingSink};
use crate::pagination::{decode_page, PaginatedResponse};
use crate::transport::{ReqwestTransport, Transport};

/// Stateless, cheaply clonable client for the dashboard API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn Transport>,
    logger: Arc<dyn LogSink>,
}

impl ApiClient {
    pub fn new(base_url: &str, transport: Arc<dyn Transport>, logger: Arc<dyn LogSink>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
            logger,
        }
    }

    /// Client using `reqwest` and `tracing`, configured from `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, BuildError> {
        let transport = ReqwestTransport::new(config.timeout())?;
        Ok(Self::new(
            &config.base_url,
            Arc::new(transport),
            Arc::new(TracingSink::new(config.dev_mode)),
        ))
    }

    /// Client configured from the environment, see `ClientConfig::load`.
    pub fn from_env() -> Result<Self, BuildError> {
        Self::from_config(&ClientConfig::load()?)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn loyalty(&self) -> LoyaltyApi<'_> {
        LoyaltyApi::new(self)
    }

    pub fn commissions(&self) -> CommissionApi<'_> {
        CommissionApi::new(self)
    }

    pub fn referrals(&self) -> ReferralApi<'_> {
        ReferralApi::new(self)
    }

    pub fn users(&self) -> UserApi<'_> {
        UserApi::new(self)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn build_get(&self, path: &str, query: Query) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: self.url(path),
            query: query.into_pairs(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::from_encode(&e))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: self.url(path),
            query: Vec::new(),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    /// Decode a response into `T`, or normalize it into an `ApiError`.
    pub fn parse<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, ApiError> {
        check_status(&response)?;
        decode_body(&response.body).map_err(|e| ApiError::from_decode(&e))
    }

    /// Decode a paginated response, repairing its `meta` when needed.
    pub fn parse_page<T: DeserializeOwned>(
        &self,
        response: HttpResponse,
    ) -> Result<PaginatedResponse<T>, ApiError> {
        check_status(&response)?;
        let decoded = decode_page(&response.body).map_err(|e| ApiError::from_decode(&e))?;
        if decoded.meta_replaced {
            self.logger.warning(
                "pagination meta missing or inconsistent, using defaults",
                Some(&serde_json::json!({ "meta": decoded.page.meta })),
            );
        }
        Ok(decoded.page)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: Query) -> Result<T, ApiError> {
        let request = self.build_get(path, query);
        self.round_trip(request, |response| self.parse(response)).await
    }

    pub async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Query,
    ) -> Result<PaginatedResponse<T>, ApiError> {
        let request = self.build_get(path, query);
        self.round_trip(request, |response| self.parse_page(response)).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self
            .build_post(path, body)
            .inspect_err(|err| self.log_failure(path, err))?;
        self.round_trip(request, |response| self.parse(response)).await
    }

    /// Send `request` once and hand the response to `parse`.
    async fn round_trip<T>(
        &self,
        request: HttpRequest,
        parse: impl FnOnce(HttpResponse) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let method = request.method.as_str();
        let url = request.full_url();
        let body_bytes = request
            .body
            .as_ref()
            .map(|body| serde_json::json!({ "bodyBytes": body.len() }));
        self.logger.debug(&format!("{method} {url}"), body_bytes.as_ref());

        let response = match self.transport.execute(request).await {
            Ok(response) => response,
            Err(err) => {
                let err = ApiError::from_transport(&err);
                self.log_failure(&url, &err);
                return Err(err);
            }
        };

        let status = response.status;
        match parse(response) {
            Ok(value) => {
                self.logger.debug(&format!("{method} {url} -> {status}"), None);
                Ok(value)
            }
            Err(err) => {
                self.log_failure(&format!("{url} -> {status}"), &err);
                Err(err)
            }
        }
    }

    fn log_failure(&self, context: &str, err: &ApiError) {
        let data = serde_json::to_value(err).unwrap_or(Value::Null);
        self.logger.error(&format!("API request failed: {context}"), Some(&data));
    }
}

/// Map a non-success status to the body's `ApiError`, or a generic one.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    let error = serde_json::from_str::<Value>(&response.body)
        .ok()
        .and_then(|body| ApiError::from_value(&body))
        .unwrap_or_else(|| ApiError::from_status(response.status));
    Err(error)
}

/// An empty body decodes as JSON `null`.
fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, serde_json::Error> {
    if body.trim().is_empty() {
        return serde_json::from_value(Value::Null);
    }
    serde_json::from_str(body)
}
