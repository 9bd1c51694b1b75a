//! Orders service for order placement and management.

use chrono::NaiveDate;

use super::path_segment;
use crate::client::{ApiClient, Paginated, Query};
use crate::model::Model;
use crate::models::order::ActivateOrder;
use crate::models::{
    CreateOrderResponse, NewOrder, OrderId, OrderResponse, OrderSide, OrderStatus, OrderType,
    OrdersResponse, StatusResponse,
};
use crate::Result;

/// Service for order operations.
///
/// Orders are created inactive and must be activated before they are
/// routed to the venue.
///
/// # Example
///
/// ```no_run
/// use lemon_rs::models::{NewOrderBuilder, OrderSide, OrderVenue};
/// use lemon_rs::Expiry;
///
/// # async fn example(client: lemon_rs::LemonClient) -> lemon_rs::Result<()> {
/// let order = NewOrderBuilder::new()
///     .isin("US88160R1014")
///     .side(OrderSide::Buy)
///     .quantity(1)
///     .venue(OrderVenue::Xmun)
///     .expires_at(Expiry::Days(7))
///     .build()?;
///
/// let created = client.trading().orders().create(order).await?;
/// let id = created.results.order_id();
/// println!("Estimated total: {}", created.results.estimated_price_total);
///
/// client.trading().orders().activate(&id, None).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct OrdersService<'a> {
    client: &'a ApiClient,
}

/// Query parameters for `GET /orders`.
#[derive(Debug, Clone, Default)]
pub struct OrdersQuery {
    /// Orders created on or after this date
    pub from: Option<NaiveDate>,
    /// Orders created on or before this date
    pub to: Option<NaiveDate>,
    /// Filter by instrument
    pub isin: Option<String>,
    /// Filter by side
    pub side: Option<OrderSide>,
    /// Filter by status
    pub status: Vec<OrderStatus>,
    /// Filter by order type
    pub kind: Option<OrderType>,
    /// Filter by the API key that created the order
    pub key_creation_id: Option<String>,
    /// Results per page
    pub limit: Option<u32>,
    /// Page number
    pub page: Option<u32>,
}

impl OrdersQuery {
    /// An empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the start of the range.
    pub fn from(mut self, from: NaiveDate) -> Self {
        self.from = Some(from);
        self
    }

    /// Set the end of the range.
    pub fn to(mut self, to: NaiveDate) -> Self {
        self.to = Some(to);
        self
    }

    /// Filter by instrument.
    pub fn isin(mut self, isin: impl Into<String>) -> Self {
        self.isin = Some(isin.into());
        self
    }

    /// Filter by side.
    pub fn side(mut self, side: OrderSide) -> Self {
        self.side = Some(side);
        self
    }

    /// Add a status filter.
    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status.push(status);
        self
    }

    /// Filter by order type.
    pub fn kind(mut self, kind: OrderType) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Filter by the creating API key.
    pub fn key_creation_id(mut self, id: impl Into<String>) -> Self {
        self.key_creation_id = Some(id.into());
        self
    }

    /// Set the page size.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the page number.
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// The query string parameters.
    pub fn to_query(&self) -> Query {
        Query::new()
            .opt("from", self.from.map(|d| d.format("%Y-%m-%d")))
            .opt("to", self.to.map(|d| d.format("%Y-%m-%d")))
            .opt("isin", self.isin.as_ref())
            .opt("side", self.side.as_ref())
            .list("status", &self.status)
            .opt("type", self.kind.as_ref())
            .opt("key_creation_id", self.key_creation_id.as_ref())
            .opt("limit", self.limit)
            .opt("page", self.page)
    }
}

impl<'a> OrdersService<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// List orders with optional filters.
    pub async fn list(&self, query: OrdersQuery) -> Result<Paginated<'a, OrdersResponse>> {
        let raw = self.client.get("orders", &query.to_query()).await?;
        Ok(Paginated::new(OrdersResponse::from_data(&raw)?, self.client))
    }

    /// Create an inactive order.
    pub async fn create(&self, order: NewOrder) -> Result<CreateOrderResponse> {
        let raw = self.client.post("orders", &order).await?;
        CreateOrderResponse::from_data(&raw)
    }

    /// Activate an order, with the PIN if the account requires one.
    pub async fn activate(&self, order_id: &OrderId, pin: Option<&str>) -> Result<StatusResponse> {
        let path = format!("orders/{}/activate", path_segment("order", order_id.as_str())?);
        let raw = self.client.post(&path, &ActivateOrder { pin }).await?;
        StatusResponse::from_data(&raw)
    }

    /// Get a specific order.
    pub async fn get(&self, order_id: &OrderId) -> Result<OrderResponse> {
        let path = format!("orders/{}", path_segment("order", order_id.as_str())?);
        let raw = self.client.get(&path, &Query::new()).await?;
        OrderResponse::from_data(&raw)
    }

    /// Cancel an order.
    pub async fn cancel(&self, order_id: &OrderId) -> Result<StatusResponse> {
        let path = format!("orders/{}", path_segment("order", order_id.as_str())?);
        let raw = self.client.delete(&path, &Query::new()).await?;
        StatusResponse::from_data(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orders_query() {
        let query = OrdersQuery::new()
            .isin("US88160R1014")
            .status(OrderStatus::Open)
            .status(OrderStatus::Executed)
            .kind(OrderType::Limit)
            .to_query();
        assert_eq!(
            query.to_string(),
            "isin=US88160R1014&status=open&status=executed&type=limit"
        );
    }

    #[test]
    fn test_order_path_is_one_segment() {
        let id = OrderId::new("ord_1/activate");
        let path = format!("orders/{}", path_segment("order", id.as_str()).unwrap());
        assert_eq!(path, "orders/ord_1%2Factivate");
    }
}
