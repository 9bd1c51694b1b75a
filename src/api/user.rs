//! User service.

use crate::client::{ApiClient, Query};
use crate::model::Model;
use crate::models::UserResponse;
use crate::Result;

/// Service for the authenticated user.
#[derive(Debug, Clone, Copy)]
pub struct UserService<'a> {
    client: &'a ApiClient,
}

impl<'a> UserService<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Get the user profile.
    pub async fn get(&self) -> Result<UserResponse> {
        let raw = self.client.get("user", &Query::new()).await?;
        UserResponse::from_data(&raw)
    }
}
