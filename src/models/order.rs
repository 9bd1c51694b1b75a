//! Order models for placing and managing trades.
//!
//! Prices and amounts are integers in hundredths of a cent.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{
    page_model, result_model, Expiry, OrderId, OrderSide, OrderStatus, OrderType, OrderVenue,
};

crate::model! {
    /// Cost disclosure attached to an order.
    pub struct RegulatoryInformation {
        /// Entry costs
        pub costs_entry: Option<i64>,
        /// Entry costs in percent
        pub costs_entry_pct: Option<String>,
        /// Running costs
        pub costs_running: i64,
        /// Running costs in percent
        pub costs_running_pct: Option<String>,
        /// Product costs
        pub costs_product: i64,
        /// Product costs in percent
        pub costs_product_pct: Option<String>,
        /// Exit costs
        pub costs_exit: i64,
        /// Exit costs in percent
        pub costs_exit_pct: Option<String>,
        /// Yield reduction in the first year
        pub yield_reduction_year: Option<i64>,
        /// Yield reduction in the first year, in percent
        pub yield_reduction_year_pct: Option<String>,
        /// Yield reduction in the following years
        pub yield_reduction_year_following: Option<i64>,
        /// Yield reduction in the following years, in percent
        pub yield_reduction_year_following_pct: Option<String>,
        /// Yield reduction in the exit year
        pub yield_reduction_year_exit: i64,
        /// Yield reduction in the exit year, in percent
        pub yield_reduction_year_exit_pct: String,
        /// Estimated holding duration
        pub estimated_holding_duration_years: Option<String>,
        /// Estimated total yield reduction
        pub estimated_yield_reduction_total: Option<i64>,
        /// Estimated total yield reduction, in percent
        pub estimated_yield_reduction_total_pct: Option<String>,
        /// Link to the key investor information document
        pub kiid as "KIID": Option<String>,
        /// Legal disclaimer
        pub legal_disclaimer: String,
    }
}

crate::model! {
    /// An order as returned by the order endpoints.
    pub struct Order {
        /// Order identifier
        pub id: String,
        /// ISIN of the instrument
        pub isin: String,
        /// Instrument title
        pub isin_title: String,
        /// Expiry of the order
        pub expires_at: DateTime<Utc>,
        /// When the order was created
        pub created_at: DateTime<Utc>,
        /// Buy or sell
        pub side: OrderSide,
        /// Number of shares
        pub quantity: i64,
        /// Stop price
        pub stop_price: Option<i64>,
        /// Limit price
        pub limit_price: Option<i64>,
        /// Estimated price per share
        pub estimated_price: Option<i64>,
        /// Estimated total price
        pub estimated_price_total: Option<i64>,
        /// Venue the order is routed to
        pub venue: OrderVenue,
        /// Lifecycle state
        pub status: OrderStatus,
        /// Order type
        pub kind as "type": OrderType,
        /// Shares executed so far
        pub executed_quantity: i64,
        /// Average execution price
        pub executed_price: i64,
        /// Total execution price
        pub executed_price_total: Option<i64>,
        /// When the order was activated
        pub activated_at: Option<DateTime<Utc>>,
        /// When the order was executed
        pub executed_at: Option<DateTime<Utc>>,
        /// When the order was rejected
        pub rejected_at: Option<DateTime<Utc>>,
        /// When the order was cancelled
        pub cancelled_at: Option<DateTime<Utc>>,
        /// Free-form notes
        pub notes: Option<String>,
        /// Order fee
        pub charge: Option<i64>,
        /// When the fee is charged
        pub chargeable_at: Option<DateTime<Utc>>,
        /// API key that created the order
        pub key_creation_id: Option<String>,
        /// API key that activated the order
        pub key_activation_id: Option<String>,
        /// Cost disclosure
        pub regulatory_information: Option<RegulatoryInformation>,
        /// Idempotency key given on creation
        pub idempotency: Option<String>,
    }
}

impl Order {
    /// The order identifier as a typed ID.
    pub fn order_id(&self) -> OrderId {
        OrderId::new(self.id.as_str())
    }
}

page_model! {
    /// A page of `GET /orders`.
    trading OrdersResponse => Order
}

result_model! {
    /// Response of `GET /orders/{id}`.
    OrderResponse => Order
}

crate::model! {
    /// An order as returned right after creation.
    pub struct CreatedOrder {
        /// Order identifier
        pub id: String,
        /// Lifecycle state, `inactive` until activated
        pub status: OrderStatus,
        /// When the order was created
        pub created_at: DateTime<Utc>,
        /// Cost disclosure
        pub regulatory_information: RegulatoryInformation,
        /// ISIN of the instrument
        pub isin: String,
        /// Expiry of the order
        pub expires_at: DateTime<Utc>,
        /// Buy or sell
        pub side: OrderSide,
        /// Number of shares
        pub quantity: i64,
        /// Stop price
        pub stop_price: Option<i64>,
        /// Limit price
        pub limit_price: Option<i64>,
        /// Venue the order is routed to
        pub venue: Option<OrderVenue>,
        /// Estimated price per share
        pub estimated_price: i64,
        /// Estimated total price
        pub estimated_price_total: i64,
        /// Free-form notes
        pub notes: Option<String>,
        /// Order fee
        pub charge: Option<i64>,
        /// When the fee is charged
        pub chargeable_at: Option<DateTime<Utc>>,
        /// API key that created the order
        pub key_creation_id: Option<String>,
        /// Idempotency key given on creation
        pub idempotency: Option<String>,
    }
}

impl CreatedOrder {
    /// The order identifier as a typed ID.
    pub fn order_id(&self) -> OrderId {
        OrderId::new(self.id.as_str())
    }
}

result_model! {
    /// Response of `POST /orders`.
    CreateOrderResponse => CreatedOrder
}

/// A new order to be submitted.
///
/// Use [`NewOrderBuilder`] to construct orders.
///
/// # Example
///
/// ```
/// use lemon_rs::models::{NewOrderBuilder, OrderSide, OrderVenue};
/// use lemon_rs::Expiry;
///
/// let order = NewOrderBuilder::new()
///     .isin("US88160R1014")
///     .side(OrderSide::Buy)
///     .quantity(1)
///     .limit_price(9_000_000)
///     .venue(OrderVenue::Xmun)
///     .expires_at(Expiry::Days(7))
///     .build()
///     .unwrap();
/// assert_eq!(order.quantity, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewOrder {
    /// ISIN of the instrument
    pub isin: String,
    /// Buy or sell
    pub side: OrderSide,
    /// Number of shares
    pub quantity: i64,
    /// Expiry, a date or a number of days
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<Expiry>,
    /// Venue to route the order to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<OrderVenue>,
    /// Stop price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_price: Option<i64>,
    /// Limit price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_price: Option<i64>,
    /// Free-form notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Idempotency key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idempotency: Option<String>,
}

/// Builder for creating new orders with validation.
#[derive(Debug, Default, Clone)]
pub struct NewOrderBuilder {
    isin: Option<String>,
    side: Option<OrderSide>,
    quantity: Option<i64>,
    expires_at: Option<Expiry>,
    venue: Option<OrderVenue>,
    stop_price: Option<i64>,
    limit_price: Option<i64>,
    notes: Option<String>,
    idempotency: Option<String>,
}

impl NewOrderBuilder {
    /// Create a new order builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the instrument.
    pub fn isin(mut self, isin: impl Into<String>) -> Self {
        self.isin = Some(isin.into());
        self
    }

    /// Set the side.
    pub fn side(mut self, side: OrderSide) -> Self {
        self.side = Some(side);
        self
    }

    /// Set the number of shares.
    pub fn quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Set the expiry.
    pub fn expires_at(mut self, expiry: impl Into<Expiry>) -> Self {
        self.expires_at = Some(expiry.into());
        self
    }

    /// Set the venue.
    pub fn venue(mut self, venue: OrderVenue) -> Self {
        self.venue = Some(venue);
        self
    }

    /// Set the stop price.
    pub fn stop_price(mut self, price: i64) -> Self {
        self.stop_price = Some(price);
        self
    }

    /// Set the limit price.
    pub fn limit_price(mut self, price: i64) -> Self {
        self.limit_price = Some(price);
        self
    }

    /// Attach notes to the order.
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Set an idempotency key.
    pub fn idempotency(mut self, key: impl Into<String>) -> Self {
        self.idempotency = Some(key.into());
        self
    }

    /// Build the order, validating all fields.
    pub fn build(self) -> crate::Result<NewOrder> {
        let isin = self
            .isin
            .map(|isin| isin.trim().to_string())
            .filter(|isin| !isin.is_empty())
            .ok_or_else(|| crate::Error::InvalidInput("isin is required".to_string()))?;

        let side = self
            .side
            .ok_or_else(|| crate::Error::InvalidInput("side is required".to_string()))?;

        let quantity = self
            .quantity
            .ok_or_else(|| crate::Error::InvalidInput("quantity is required".to_string()))?;
        if quantity <= 0 {
            return Err(crate::Error::InvalidInput(
                "quantity must be positive".to_string(),
            ));
        }

        if matches!(self.stop_price, Some(p) if p <= 0) || matches!(self.limit_price, Some(p) if p <= 0) {
            return Err(crate::Error::InvalidInput(
                "prices must be positive".to_string(),
            ));
        }

        Ok(NewOrder {
            isin,
            side,
            quantity,
            expires_at: self.expires_at,
            venue: self.venue,
            stop_price: self.stop_price,
            limit_price: self.limit_price,
            notes: self.notes,
            idempotency: self.idempotency,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub(crate) struct ActivateOrder<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin: Option<&'a str>,
}
