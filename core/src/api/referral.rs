//! Referral invitations and the user's shareable referral link.

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::http::Query;
use crate::pagination::PaginatedResponse;
use crate::types::{CreateReferral, Referral, ReferralLink};

/// Referral invitations and the user's share link.
#[derive(Debug, Clone, Copy)]
pub struct ReferralApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ReferralApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_referrals(
        &self,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> Result<PaginatedResponse<Referral>, ApiError> {
        let query = Query::new().param("page", page).param("limit", limit);
        self.client.get_page("/referrals", query).await
    }

    pub async fn create_referral(&self, input: &CreateReferral) -> Result<Referral, ApiError> {
        self.client.post("/referrals", input).await
    }

    pub async fn get_referral_link(&self) -> Result<ReferralLink, ApiError> {
        self.client.get("/referrals/link", Query::new()).await
    }
}
