//! Position, statement and performance models.

use chrono::{DateTime, NaiveDate, Utc};

use super::{page_model, StatementType};

crate::model! {
    /// Shares of one instrument currently held.
    pub struct Position {
        /// ISIN of the instrument
        pub isin: String,
        /// Instrument title
        pub isin_title: String,
        /// Number of shares
        pub quantity: i64,
        /// Average buy price
        pub buy_price_avg: i64,
        /// Estimated value of the position
        pub estimated_price_total: Option<i64>,
        /// Estimated price per share
        pub estimated_price: Option<i64>,
    }
}

page_model! {
    /// A page of `GET /positions`.
    trading PositionsResponse => Position
}

crate::model! {
    /// A change to a position.
    pub struct Statement {
        /// Statement identifier
        pub id: String,
        /// Order that caused the change
        pub order_id: Option<String>,
        /// External reference for imports and corporate actions
        pub external_id: Option<String>,
        /// Kind of change
        pub kind as "type": StatementType,
        /// Number of shares
        pub quantity: i64,
        /// ISIN of the instrument
        pub isin: String,
        /// Instrument title
        pub isin_title: Option<String>,
        /// Booking date
        pub date: NaiveDate,
        /// When the statement was created
        pub created_at: DateTime<Utc>,
    }
}

page_model! {
    /// A page of `GET /positions/statements`.
    trading StatementsResponse => Statement
}

crate::model! {
    /// Realised performance of one instrument.
    pub struct Performance {
        /// ISIN of the instrument
        pub isin: String,
        /// Instrument title
        pub isin_title: String,
        /// Realised profit
        pub profit: i64,
        /// Realised loss
        pub loss: i64,
        /// Shares bought
        pub quantity_bought: i64,
        /// Shares sold
        pub quantity_sold: i64,
        /// Shares still held
        pub quantity_open: i64,
        /// When the position was opened
        pub opened_at: Option<DateTime<Utc>>,
        /// When the position was closed
        pub closed_at: Option<DateTime<Utc>>,
        /// Fees paid
        pub fees: i64,
    }
}

page_model! {
    /// A page of `GET /positions/performance`.
    trading PerformanceResponse => Performance
}
