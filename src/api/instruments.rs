//! Instruments and venues services.

use chrono::{DateTime, Utc};

use crate::client::{ApiClient, Paginated, Query};
use crate::model::Model;
use crate::models::{InstrumentType, InstrumentsResponse, Sorting, VenuesResponse};
use crate::Result;

/// Service for instrument search.
///
/// # Example
///
/// ```no_run
/// use lemon_rs::api::InstrumentsQuery;
/// use lemon_rs::models::InstrumentType;
///
/// # async fn example(client: lemon_rs::LemonClient) -> lemon_rs::Result<()> {
/// let page = client
///     .market_data()
///     .instruments()
///     .get(InstrumentsQuery::new().search("tesla").kind(InstrumentType::Stock))
///     .await?;
///
/// for instrument in &page.results {
///     println!("{} {}", instrument.isin, instrument.name);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct InstrumentsService<'a> {
    client: &'a ApiClient,
}

/// Query parameters for `GET /instruments`.
#[derive(Debug, Clone, Default)]
pub struct InstrumentsQuery {
    /// Filter by ISIN
    pub isin: Vec<String>,
    /// Free-text search over name, title, symbol, ISIN and WKN
    pub search: Option<String>,
    /// Filter by instrument type
    pub kind: Vec<InstrumentType>,
    /// Filter by venue
    pub mic: Vec<String>,
    /// Filter by trading currency
    pub currency: Vec<String>,
    /// Only tradable instruments
    pub tradable: Option<bool>,
    /// Result ordering
    pub sorting: Option<Sorting>,
    /// Results per page
    pub limit: Option<u32>,
    /// Page number
    pub page: Option<u32>,
    /// Only return data if changed since this instant
    pub modified_since: Option<DateTime<Utc>>,
}

impl InstrumentsQuery {
    /// An empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an ISIN filter.
    pub fn isin(mut self, isin: impl Into<String>) -> Self {
        self.isin.push(isin.into());
        self
    }

    /// Set the search term.
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Add an instrument type filter.
    pub fn kind(mut self, kind: InstrumentType) -> Self {
        self.kind.push(kind);
        self
    }

    /// Add a venue filter.
    pub fn mic(mut self, mic: impl Into<String>) -> Self {
        self.mic.push(mic.into());
        self
    }

    /// Add a currency filter.
    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency.push(currency.into());
        self
    }

    /// Only tradable (or only non-tradable) instruments.
    pub fn tradable(mut self, tradable: bool) -> Self {
        self.tradable = Some(tradable);
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

    /// Send `If-Modified-Since`.
    pub fn modified_since(mut self, since: DateTime<Utc>) -> Self {
        self.modified_since = Some(since);
        self
    }

    /// The query string parameters.
    pub fn to_query(&self) -> Query {
        Query::new()
            .list("isin", &self.isin)
            .opt("search", self.search.as_ref())
            .list("type", &self.kind)
            .list("mic", &self.mic)
            .list("currency", &self.currency)
            .flag("tradable", self.tradable)
            .opt("sorting", self.sorting.as_ref())
            .opt("limit", self.limit)
            .opt("page", self.page)
    }
}

impl<'a> InstrumentsService<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Search instruments.
    ///
    /// With [`InstrumentsQuery::modified_since`] set, a `304 Not Modified`
    /// answer yields an empty last page.
    pub async fn get(&self, query: InstrumentsQuery) -> Result<Paginated<'a, InstrumentsResponse>> {
        let raw = self
            .client
            .get_conditional("instruments", &query.to_query(), query.modified_since)
            .await?;

        let response = match raw {
            Some(raw) => InstrumentsResponse::from_data(&raw)?,
            None => InstrumentsResponse {
                time: Utc::now(),
                results: Vec::new(),
                previous: None,
                next: None,
                total: 0,
                page: 0,
                pages: 0,
            },
        };
        Ok(Paginated::new(response, self.client))
    }
}

/// Service for trading venues.
#[derive(Debug, Clone, Copy)]
pub struct VenuesService<'a> {
    client: &'a ApiClient,
}

/// Query parameters for `GET /venues`.
#[derive(Debug, Clone, Default)]
pub struct VenuesQuery {
    /// Filter by venue
    pub mic: Vec<String>,
    /// Result ordering
    pub sorting: Option<Sorting>,
    /// Results per page
    pub limit: Option<u32>,
    /// Page number
    pub page: Option<u32>,
}

impl VenuesQuery {
    /// An empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a venue filter.
    pub fn mic(mut self, mic: impl Into<String>) -> Self {
        self.mic.push(mic.into());
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
            .list("mic", &self.mic)
            .opt("sorting", self.sorting.as_ref())
            .opt("limit", self.limit)
            .opt("page", self.page)
    }
}

impl<'a> VenuesService<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// List trading venues.
    pub async fn get(&self, query: VenuesQuery) -> Result<Paginated<'a, VenuesResponse>> {
        let raw = self.client.get("venues", &query.to_query()).await?;
        Ok(Paginated::new(VenuesResponse::from_data(&raw)?, self.client))
    }
}
