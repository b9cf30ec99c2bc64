//! User profile: fetch the current user and update name or email.

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::http::Query;
use crate::types::{UpdateProfile, User};

/// The signed-in user's profile.
#[derive(Debug, Clone, Copy)]
pub struct UserApi<'a> {
    client: &'a ApiClient,
}

impl<'a> UserApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_current_user(&self) -> Result<User, ApiError> {
        self.client.get("/users/me", Query::new()).await
    }

    pub async fn update_profile(&self, input: &UpdateProfile) -> Result<User, ApiError> {
        self.client.post("/users/me", input).await
    }
}
