//! Loyalty points: balance, transaction history, redemption and tiers.

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::http::Query;
use crate::pagination::PaginatedResponse;
use crate::types::{
    LoyaltyPoints, PointsTransaction, RedeemPointsRequest, RedemptionResult, TierBenefit,
};

/// Loyalty points, history, redemption and tiers.
#[derive(Debug, Clone, Copy)]
pub struct LoyaltyApi<'a> {
    client: &'a ApiClient,
}

impl<'a> LoyaltyApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_points(&self) -> Result<LoyaltyPoints, ApiError> {
        self.client.get("/loyalty/points", Query::new()).await
    }

    pub async fn get_transactions(
        &self,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> Result<PaginatedResponse<PointsTransaction>, ApiError> {
        let query = Query::new().param("page", page).param("limit", limit);
        self.client.get_page("/loyalty/transactions", query).await
    }

    pub async fn redeem_points(
        &self,
        request: &RedeemPointsRequest,
    ) -> Result<RedemptionResult, ApiError> {
        self.client.post("/loyalty/redeem", request).await
    }

    pub async fn get_tiers(&self) -> Result<Vec<TierBenefit>, ApiError> {
        self.client.get("/loyalty/tiers", Query::new()).await
    }
}
