//! Data models for the lemon.markets APIs.
//!
//! Every type here is declared with [`model!`](crate::model!) and decoded
//! through its parser mapping. Models are organized by domain:
//!
//! - [`primitives`] - Identifier newtypes and order expiry
//! - [`enums`] - String literal types (instrument type, order side, ...)
//! - [`instrument`] - Instruments and venues
//! - [`market_data`] - Quotes, trades and OHLC bars
//! - [`account`] - Account, withdrawals, bank statements, documents, user
//! - [`order`] - Orders and order creation
//! - [`position`] - Positions, statements and performance
//! - [`streaming`] - Realtime API authentication

pub mod primitives;
pub mod enums;
pub mod instrument;
pub mod market_data;
pub mod account;
pub mod order;
pub mod position;
pub mod streaming;

pub use primitives::*;
pub use enums::*;
pub use instrument::*;
pub use market_data::*;
pub use account::*;
pub use order::*;
pub use position::*;
pub use streaming::*;

/// Declare a page of a list endpoint and make it iterable.
///
/// Trading pages additionally carry the `mode` of the account.
macro_rules! page_model {
    ($(#[$meta:meta])* market_data $name:ident => $item:ty) => {
        $crate::model! {
            $(#[$meta])*
            pub struct $name {
                /// Server time of the response
                pub time: chrono::DateTime<chrono::Utc>,
                /// Results on this page
                pub results: Vec<$item>,
                /// URL of the previous page
                pub previous: Option<String>,
                /// URL of the next page
                pub next: Option<String>,
                /// Total number of results
                pub total: i64,
                /// Current page number
                pub page: i64,
                /// Total number of pages
                pub pages: i64,
            }
        }

        $crate::iterable_response!($name => $item);
    };
    ($(#[$meta:meta])* trading $name:ident => $item:ty) => {
        $crate::model! {
            $(#[$meta])*
            pub struct $name {
                /// Server time of the response
                pub time: chrono::DateTime<chrono::Utc>,
                /// Paper or money
                pub mode: $crate::models::TradingMode,
                /// Results on this page
                pub results: Vec<$item>,
                /// URL of the previous page
                pub previous: Option<String>,
                /// URL of the next page
                pub next: Option<String>,
                /// Total number of results
                pub total: i64,
                /// Current page number
                pub page: i64,
                /// Total number of pages
                pub pages: i64,
            }
        }

        $crate::iterable_response!($name => $item);
    };
}

/// Declare a single-result trading response.
macro_rules! result_model {
    ($(#[$meta:meta])* $name:ident => $result:ty) => {
        $crate::model! {
            $(#[$meta])*
            pub struct $name {
                /// Server time of the response
                pub time: chrono::DateTime<chrono::Utc>,
                /// Paper or money
                pub mode: $crate::models::TradingMode,
                /// The result
                pub results: $result,
            }
        }
    };
}

pub(crate) use page_model;
pub(crate) use result_model;

crate::model! {
    /// Acknowledgement of a trading action that returns no result.
    pub struct StatusResponse {
        /// Server time of the response
        pub time: chrono::DateTime<chrono::Utc>,
        /// Paper or money
        pub mode: TradingMode,
        /// Status reported by the API, usually `"ok"`
        pub status: Option<String>,
    }
}
