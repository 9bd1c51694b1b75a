//! HTTP client and service layer for the lemon.markets APIs.
//!
//! This module provides the main entry point [`LemonClient`] and the
//! shared request path [`ApiClient`] used by every endpoint.
//!
//! # Example
//!
//! ```no_run
//! use lemon_rs::{ClientConfig, Environment, LemonClient};
//!
//! # async fn example() -> lemon_rs::Result<()> {
//! let client = LemonClient::with_config(
//!     ClientConfig::new("your-api-token").with_environment(Environment::Paper),
//! )?;
//!
//! let user = client.trading().user().get().await?;
//! println!("{}", user.results.email);
//! # Ok(())
//! # }
//! ```

mod config;
mod http;
pub mod paginated;
mod query;

pub use config::{
    ClientConfig, Environment, RetryConfig, DEFAULT_MARKET_DATA_URL, DEFAULT_MONEY_TRADING_URL,
    DEFAULT_PAPER_TRADING_URL, DEFAULT_STREAMING_URL,
};
pub use http::{ApiClient, LemonClient};
pub use paginated::{IterableResponse, PageFetcher, Paginated};
pub use query::Query;
