//! # lemon-rs
//!
//! A typed async client for the lemon.markets brokerage APIs.
//!
//! Responses are decoded by a small declarative model layer: each model is
//! declared once with [`model!`], and a parser mapping derived from the
//! declaration turns raw JSON into typed values. Failed requests are
//! classified into a typed [`ApiError`](error::ApiError) from the
//! `error_code` in the body.
//!
//! ## Features
//!
//! - **Market data**: Instruments, venues, latest quotes and trades, OHLC bars
//! - **Trading**: Account, withdrawals, bank statements, documents, orders,
//!   positions, performance and user profile
//! - **Realtime**: Token for the live feed
//! - **Pagination**: Every list endpoint returns a [`Paginated`] page that
//!   streams items across pages on demand
//! - **Async-first**: Built on Tokio and reqwest
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lemon_rs::LemonClient;
//! use lemon_rs::api::{InstrumentsQuery, QuotesQuery};
//!
//! #[tokio::main]
//! async fn main() -> lemon_rs::Result<()> {
//!     let client = LemonClient::new("your-api-token")?;
//!
//!     let instruments = client
//!         .market_data()
//!         .instruments()
//!         .get(InstrumentsQuery::new().search("tesla"))
//!         .await?;
//!     println!("{} matches", instruments.total);
//!
//!     let quotes = client
//!         .market_data()
//!         .quotes()
//!         .get_latest(QuotesQuery::new(["US88160R1014"]).mic("XMUN"))
//!         .await?;
//!     for quote in &quotes.results {
//!         println!("{}: bid={} ask={}", quote.isin, quote.b, quote.a);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Order Placement
//!
//! ```rust,no_run
//! use lemon_rs::{Environment, ClientConfig, LemonClient};
//! use lemon_rs::models::{NewOrderBuilder, OrderSide, OrderVenue};
//!
//! #[tokio::main]
//! async fn main() -> lemon_rs::Result<()> {
//!     let client = LemonClient::with_config(
//!         ClientConfig::new("your-api-token").with_environment(Environment::Paper),
//!     )?;
//!
//!     let order = NewOrderBuilder::new()
//!         .isin("US88160R1014")
//!         .side(OrderSide::Buy)
//!         .quantity(1)
//!         .limit_price(9_000_000)
//!         .venue(OrderVenue::Xmun)
//!         .build()?;
//!
//!     let created = client.trading().orders().create(order).await?;
//!     let id = created.results.order_id();
//!     client.trading().orders().activate(&id, None).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! ```rust,no_run
//! use lemon_rs::error::{ApiError, DomainErrorCode, TradingErrorCode};
//! use lemon_rs::{Error, LemonClient, OrderId};
//!
//! # async fn example(client: LemonClient) {
//! match client.trading().orders().get(&OrderId::new("ord_123")).await {
//!     Ok(order) => println!("{}", order.results.status),
//!     Err(err) if err.is_not_found() => println!("no such order"),
//!     Err(Error::Api(ApiError::Domain {
//!         code: DomainErrorCode::Trading(TradingErrorCode::TradingBlocked),
//!         ..
//!     })) => println!("trading is blocked"),
//!     Err(err) => println!("failed: {err}"),
//! }
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod api;
pub mod client;
pub mod error;
pub mod model;
pub mod models;

// Re-export primary types at crate root for convenience
pub use client::{ClientConfig, Environment, LemonClient, Paginated, RetryConfig};
pub use error::{Error, Result};
pub use model::Model;
pub use models::{DocumentId, Expiry, OrderId};

#[doc(hidden)]
pub use serde as __serde;
#[doc(hidden)]
pub use serde_json as __serde_json;

/// Prelude module for convenient imports.
///
/// ```rust
/// use lemon_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::api::{
        BankStatementsQuery, DocumentsQuery, InstrumentsQuery, OhlcQuery, OrdersQuery, PageQuery,
        PerformanceQuery, PositionsQuery, QuotesQuery, StatementsQuery, TradesQuery, VenuesQuery,
    };
    pub use crate::client::{ClientConfig, Environment, IterableResponse, LemonClient, Paginated};
    pub use crate::error::{ApiError, Error, Result};
    pub use crate::model::Model;
    pub use crate::models::{
        // Primitives
        DocumentId, Expiry, OrderId,
        // Literals
        InstrumentType, OhlcPeriod, OrderSide, OrderStatus, OrderType, OrderVenue, Plan, Sorting,
        TradingMode,
        // Market data
        Instrument, OhlcData, Quote, Trade, Venue,
        // Trading
        Account, BankStatement, Document, NewOrder, NewOrderBuilder, Order, Performance, Position,
        Statement, User, Withdrawal,
        // Realtime
        Token,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_urls() {
        assert_eq!(
            Environment::Paper.trading_base_url(),
            "https://paper-trading.lemon.markets/v1/"
        );
        assert_eq!(
            Environment::Money.trading_base_url(),
            "https://trading.lemon.markets/v1/"
        );
    }

    #[test]
    fn test_order_id_creation() {
        let id = OrderId::new("ord_123");
        assert_eq!(id.as_str(), "ord_123");
    }
}
