//! Realtime API authentication.

use serde::Serialize;
use serde_json::{json, Value};

use super::raw_verbs;
use crate::client::{ApiClient, Query};
use crate::model::Model;
use crate::models::Token;
use crate::Result;

/// The realtime API (`realtime.lemon.markets`).
///
/// Only authentication is wrapped; the token is used to connect to the
/// live feed with a client of your choice.
///
/// # Example
///
/// ```no_run
/// # async fn example(client: lemon_rs::LemonClient) -> lemon_rs::Result<()> {
/// let token = client.streaming().authenticate().await?;
/// println!("{} valid until {}", token.user_id, token.expires_at);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct StreamingApi<'a> {
    client: &'a ApiClient,
}

impl<'a> StreamingApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Obtain a short-lived token for the live feed.
    pub async fn authenticate(&self) -> Result<Token> {
        let raw = self.client.post("auth", &json!({})).await?;
        Token::from_data(&raw)
    }

    raw_verbs!();
}
