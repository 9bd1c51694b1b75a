//! Positions service.

use chrono::NaiveDate;

use crate::client::{ApiClient, Paginated, Query};
use crate::model::Model;
use crate::models::{
    PerformanceResponse, PositionsResponse, Sorting, StatementType, StatementsResponse,
};
use crate::Result;

/// Service for positions, position statements and performance.
#[derive(Debug, Clone, Copy)]
pub struct PositionsService<'a> {
    client: &'a ApiClient,
}

/// Query parameters for `GET /positions`.
#[derive(Debug, Clone, Default)]
pub struct PositionsQuery {
    /// Filter by instrument
    pub isin: Option<String>,
    /// Results per page
    pub limit: Option<u32>,
    /// Page number
    pub page: Option<u32>,
}

impl PositionsQuery {
    /// An empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by instrument.
    pub fn isin(mut self, isin: impl Into<String>) -> Self {
        self.isin = Some(isin.into());
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
            .opt("isin", self.isin.as_ref())
            .opt("limit", self.limit)
            .opt("page", self.page)
    }
}

/// Query parameters for `GET /positions/statements`.
#[derive(Debug, Clone, Default)]
pub struct StatementsQuery {
    /// Filter by instrument
    pub isin: Option<String>,
    /// Statements on or after this date
    pub from: Option<NaiveDate>,
    /// Statements on or before this date
    pub to: Option<NaiveDate>,
    /// Filter by statement type
    pub types: Vec<StatementType>,
    /// Result ordering
    pub sorting: Option<Sorting>,
    /// Results per page
    pub limit: Option<u32>,
    /// Page number
    pub page: Option<u32>,
}

impl StatementsQuery {
    /// An empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by instrument.
    pub fn isin(mut self, isin: impl Into<String>) -> Self {
        self.isin = Some(isin.into());
        self
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

    /// Add a statement type filter.
    pub fn kind(mut self, kind: StatementType) -> Self {
        self.types.push(kind);
        self
    }

    /// Set the ordering.
    pub fn sorting(mut self, sorting: Sorting) -> Self {
        self.sorting = Some(sorting);
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
            .opt("isin", self.isin.as_ref())
            .opt("from", self.from.map(|d| d.format("%Y-%m-%d")))
            .opt("to", self.to.map(|d| d.format("%Y-%m-%d")))
            .list("types", &self.types)
            .opt("sorting", self.sorting.as_ref())
            .opt("limit", self.limit)
            .opt("page", self.page)
    }
}

/// Query parameters for `GET /positions/performance`.
#[derive(Debug, Clone, Default)]
pub struct PerformanceQuery {
    /// Filter by instrument
    pub isin: Option<String>,
    /// Performance from this date
    pub from: Option<NaiveDate>,
    /// Performance until this date
    pub to: Option<NaiveDate>,
    /// Result ordering
    pub sorting: Option<Sorting>,
    /// Results per page
    pub limit: Option<u32>,
    /// Page number
    pub page: Option<u32>,
}

impl PerformanceQuery {
    /// An empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by instrument.
    pub fn isin(mut self, isin: impl Into<String>) -> Self {
        self.isin = Some(isin.into());
        self
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

    /// Set the ordering.
    pub fn sorting(mut self, sorting: Sorting) -> Self {
        self.sorting = Some(sorting);
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
            .opt("isin", self.isin.as_ref())
            .opt("from", self.from.map(|d| d.format("%Y-%m-%d")))
            .opt("to", self.to.map(|d| d.format("%Y-%m-%d")))
            .opt("sorting", self.sorting.as_ref())
            .opt("limit", self.limit)
            .opt("page", self.page)
    }
}

impl<'a> PositionsService<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// List open positions.
    pub async fn list(&self, query: PositionsQuery) -> Result<Paginated<'a, PositionsResponse>> {
        let raw = self.client.get("positions", &query.to_query()).await?;
        Ok(Paginated::new(PositionsResponse::from_data(&raw)?, self.client))
    }

    /// List changes to positions.
    pub async fn statements(
        &self,
        query: StatementsQuery,
    ) -> Result<Paginated<'a, StatementsResponse>> {
        let raw = self
            .client
            .get("positions/statements", &query.to_query())
            .await?;
        Ok(Paginated::new(StatementsResponse::from_data(&raw)?, self.client))
    }

    /// Realised performance per instrument.
    pub async fn performance(
        &self,
        query: PerformanceQuery,
    ) -> Result<Paginated<'a, PerformanceResponse>> {
        let raw = self
            .client
            .get("positions/performance", &query.to_query())
            .await?;
        Ok(Paginated::new(PerformanceResponse::from_data(&raw)?, self.client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statements_query_repeats_types() {
        let query = StatementsQuery::new()
            .kind(StatementType::OrderBuy)
            .kind(StatementType::Split)
            .sorting(Sorting::Desc)
            .to_query();
        assert_eq!(query.to_string(), "types=order_buy&types=split&sorting=desc");
    }

    #[test]
    fn test_performance_query_dates() {
        let query = PerformanceQuery::new()
            .from(NaiveDate::from_ymd_opt(2022, 1, 1).unwrap())
            .to_query();
        assert_eq!(query.get("from"), Some("2022-01-01"));
    }
}
