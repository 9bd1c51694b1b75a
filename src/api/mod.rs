//! Endpoint wrappers for the lemon.markets APIs.
//!
//! [`MarketDataApi`], [`TradingApi`] and [`StreamingApi`] are thin views
//! over the [`ApiClient`] of their host. Each hands out services for a
//! subset of endpoints and also exposes raw `get`/`post`/`put`/`delete`
//! calls returning JSON for anything not wrapped here.

mod account;
mod instruments;
mod market_data;
mod orders;
mod positions;
mod streaming;
mod user;

pub use account::{AccountService, BankStatementsFrom, BankStatementsQuery, DocumentsQuery, PageQuery};
pub use instruments::{InstrumentsQuery, InstrumentsService, VenuesQuery, VenuesService};
pub use market_data::{
    OhlcFrom, OhlcQuery, OhlcService, OhlcTo, QuotesQuery, QuotesService, TradesQuery,
    TradesService,
};
pub use orders::{OrdersQuery, OrdersService};
pub use positions::{PerformanceQuery, PositionsQuery, PositionsService, StatementsQuery};
pub use streaming::StreamingApi;
pub use user::UserService;

use serde::Serialize;
use serde_json::Value;

use crate::client::{ApiClient, Query};
use crate::Result;

macro_rules! raw_verbs {
    () => {
        /// The underlying client for this host.
        pub fn client(&self) -> &ApiClient {
            self.client
        }

        /// GET a path relative to this API's base URL.
        pub async fn get(&self, path: &str, query: &Query) -> Result<Value> {
            self.client.get(path, query).await
        }

        /// POST a JSON body to a path relative to this API's base URL.
        pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value> {
            self.client.post(path, body).await
        }

        /// PUT a JSON body to a path relative to this API's base URL.
        pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value> {
            self.client.put(path, body).await
        }

        /// DELETE a path relative to this API's base URL.
        pub async fn delete(&self, path: &str, query: &Query) -> Result<Value> {
            self.client.delete(path, query).await
        }
    };
}

pub(crate) use raw_verbs;

/// The market data API (`data.lemon.markets`).
#[derive(Debug, Clone, Copy)]
pub struct MarketDataApi<'a> {
    client: &'a ApiClient,
}

impl<'a> MarketDataApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Instrument search and lookup.
    pub fn instruments(&self) -> InstrumentsService<'a> {
        InstrumentsService::new(self.client)
    }

    /// Trading venues.
    pub fn venues(&self) -> VenuesService<'a> {
        VenuesService::new(self.client)
    }

    /// Latest quotes.
    pub fn quotes(&self) -> QuotesService<'a> {
        QuotesService::new(self.client)
    }

    /// Latest trades.
    pub fn trades(&self) -> TradesService<'a> {
        TradesService::new(self.client)
    }

    /// OHLC bars.
    pub fn ohlc(&self) -> OhlcService<'a> {
        OhlcService::new(self.client)
    }

    raw_verbs!();
}

/// The trading API for the configured environment.
#[derive(Debug, Clone, Copy)]
pub struct TradingApi<'a> {
    client: &'a ApiClient,
}

impl<'a> TradingApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Account, withdrawals, bank statements and documents.
    pub fn account(&self) -> AccountService<'a> {
        AccountService::new(self.client)
    }

    /// Order placement and management.
    pub fn orders(&self) -> OrdersService<'a> {
        OrdersService::new(self.client)
    }

    /// Positions, statements and performance.
    pub fn positions(&self) -> PositionsService<'a> {
        PositionsService::new(self.client)
    }

    /// The authenticated user.
    pub fn user(&self) -> UserService<'a> {
        UserService::new(self.client)
    }

    raw_verbs!();
}

/// Format a timestamp for a query string.
pub(crate) fn format_datetime(dt: &chrono::DateTime<chrono::Utc>) -> String {
    dt.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Render an ID as one percent-encoded path segment.
///
/// Surrounding whitespace is trimmed. Empty IDs and the dot segments are
/// rejected, since they would address a different resource.
pub(crate) fn path_segment(kind: &str, id: &str) -> Result<String> {
    let id = id.trim();
    if id.is_empty() || id == "." || id == ".." {
        return Err(crate::Error::InvalidInput(format!("invalid {kind} id: {id:?}")));
    }
    let mut scratch = url::Url::parse("http://localhost/")?;
    scratch
        .path_segments_mut()
        .map_err(|()| crate::Error::InvalidInput(format!("invalid {kind} id: {id:?}")))?
        .push(id);
    Ok(scratch.path().trim_start_matches('/').to_string())
}
