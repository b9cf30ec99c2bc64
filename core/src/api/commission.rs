//! Commission listing with status filter, earnings summary and payout requests.

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::http::Query;
use crate::pagination::PaginatedResponse;
use crate::types::{Commission, CommissionStatus, CommissionSummary, Payout, PayoutRequest};

/// Affiliate commissions and payouts.
#[derive(Debug, Clone, Copy)]
pub struct CommissionApi<'a> {
    client: &'a ApiClient,
}

impl<'a> CommissionApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_commissions(
        &self,
        page: Option<u32>,
        limit: Option<u32>,
        status: Option<CommissionStatus>,
    ) -> Result<PaginatedResponse<Commission>, ApiError> {
        let query = Query::new()
            .param("page", page)
            .param("limit", limit)
            .param("status", status.map(CommissionStatus::as_str));
        self.client.get_page("/commissions", query).await
    }

    pub async fn get_summary(&self) -> Result<CommissionSummary, ApiError> {
        self.client.get("/commissions/summary", Query::new()).await
    }

    pub async fn request_payout(&self, request: &PayoutRequest) -> Result<Payout, ApiError> {
        self.client.post("/commissions/payouts", request).await
    }
}
