//! Quotes, trades and OHLC services.

use std::fmt;

use chrono::{DateTime, Utc};

use super::format_datetime;
use crate::client::{ApiClient, Paginated, Query};
use crate::model::Model;
use crate::models::{OhlcPeriod, OhlcResponse, QuotesResponse, Sorting, TradesResponse};
use crate::Result;

/// Query parameters for `GET /quotes/latest`.
///
/// `decimals` asks for prices as decimal numbers and `epoch` for
/// timestamps as epoch milliseconds; both decode to the same model types.
#[derive(Debug, Clone, Default)]
pub struct QuotesQuery {
    /// Instruments to quote
    pub isin: Vec<String>,
    /// Venue
    pub mic: Option<String>,
    /// Prices as decimals
    pub decimals: Option<bool>,
    /// Timestamps as epoch milliseconds
    pub epoch: Option<bool>,
    /// Result ordering
    pub sorting: Option<Sorting>,
    /// Results per page
    pub limit: Option<u32>,
    /// Page number
    pub page: Option<u32>,
}

/// Query parameters for `GET /trades/latest`.
pub type TradesQuery = QuotesQuery;

impl QuotesQuery {
    /// A query for the given instruments.
    pub fn new<I, S>(isins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            isin: isins.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Set the venue.
    pub fn mic(mut self, mic: impl Into<String>) -> Self {
        self.mic = Some(mic.into());
        self
    }

    /// Ask for decimal prices.
    pub fn decimals(mut self, decimals: bool) -> Self {
        self.decimals = Some(decimals);
        self
    }

    /// Ask for epoch timestamps.
    pub fn epoch(mut self, epoch: bool) -> Self {
        self.epoch = Some(epoch);
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
            .list("isin", &self.isin)
            .opt("mic", self.mic.as_ref())
            .flag("decimals", self.decimals)
            .flag("epoch", self.epoch)
            .opt("sorting", self.sorting.as_ref())
            .opt("limit", self.limit)
            .opt("page", self.page)
    }
}

/// Service for latest quotes.
#[derive(Debug, Clone, Copy)]
pub struct QuotesService<'a> {
    client: &'a ApiClient,
}

impl<'a> QuotesService<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Latest quote per instrument.
    pub async fn get_latest(&self, query: QuotesQuery) -> Result<Paginated<'a, QuotesResponse>> {
        let raw = self.client.get("quotes/latest", &query.to_query()).await?;
        Ok(Paginated::new(QuotesResponse::from_data(&raw)?, self.client))
    }
}

/// Service for latest trades.
#[derive(Debug, Clone, Copy)]
pub struct TradesService<'a> {
    client: &'a ApiClient,
}

impl<'a> TradesService<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Latest trade per instrument.
    pub async fn get_latest(&self, query: TradesQuery) -> Result<Paginated<'a, TradesResponse>> {
        let raw = self.client.get("trades/latest", &query.to_query()).await?;
        Ok(Paginated::new(TradesResponse::from_data(&raw)?, self.client))
    }
}

/// Start of an OHLC range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OhlcFrom {
    /// Only the most recent bar
    Latest,
    /// From this instant
    At(DateTime<Utc>),
}

impl fmt::Display for OhlcFrom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OhlcFrom::Latest => f.write_str("latest"),
            OhlcFrom::At(dt) => f.write_str(&format_datetime(dt)),
        }
    }
}

impl From<DateTime<Utc>> for OhlcFrom {
    fn from(dt: DateTime<Utc>) -> Self {
        OhlcFrom::At(dt)
    }
}

/// End of an OHLC range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OhlcTo {
    /// Until this instant
    At(DateTime<Utc>),
    /// This many days after the start
    Days(u32),
}

impl fmt::Display for OhlcTo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OhlcTo::At(dt) => f.write_str(&format_datetime(dt)),
            OhlcTo::Days(days) => write!(f, "P{days}D"),
        }
    }
}

impl From<DateTime<Utc>> for OhlcTo {
    fn from(dt: DateTime<Utc>) -> Self {
        OhlcTo::At(dt)
    }
}

/// Query parameters for `GET /ohlc/{period}`.
#[derive(Debug, Clone, Default)]
pub struct OhlcQuery {
    /// Instruments
    pub isin: Vec<String>,
    /// Venue
    pub mic: Option<String>,
    /// Start of the range
    pub from: Option<OhlcFrom>,
    /// End of the range
    pub to: Option<OhlcTo>,
    /// Prices as decimals
    pub decimals: Option<bool>,
    /// Timestamps as epoch milliseconds
    pub epoch: Option<bool>,
    /// Result ordering
    pub sorting: Option<Sorting>,
    /// Results per page
    pub limit: Option<u32>,
    /// Page number
    pub page: Option<u32>,
}

impl OhlcQuery {
    /// A query for the given instruments.
    pub fn new<I, S>(isins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            isin: isins.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Set the venue.
    pub fn mic(mut self, mic: impl Into<String>) -> Self {
        self.mic = Some(mic.into());
        self
    }

    /// Set the start of the range.
    pub fn from(mut self, from: impl Into<OhlcFrom>) -> Self {
        self.from = Some(from.into());
        self
    }

    /// Set the end of the range.
    pub fn to(mut self, to: impl Into<OhlcTo>) -> Self {
        self.to = Some(to.into());
        self
    }

    /// Ask for decimal prices.
    pub fn decimals(mut self, decimals: bool) -> Self {
        self.decimals = Some(decimals);
        self
    }

    /// Ask for epoch timestamps.
    pub fn epoch(mut self, epoch: bool) -> Self {
        self.epoch = Some(epoch);
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
            .list("isin", &self.isin)
            .opt("mic", self.mic.as_ref())
            .opt("from", self.from)
            .opt("to", self.to)
            .flag("decimals", self.decimals)
            .flag("epoch", self.epoch)
            .opt("sorting", self.sorting.as_ref())
            .opt("limit", self.limit)
            .opt("page", self.page)
    }
}

/// Service for OHLC bars.
#[derive(Debug, Clone, Copy)]
pub struct OhlcService<'a> {
    client: &'a ApiClient,
}

impl<'a> OhlcService<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// OHLC bars of the given length.
    pub async fn get(
        &self,
        period: OhlcPeriod,
        query: OhlcQuery,
    ) -> Result<Paginated<'a, OhlcResponse>> {
        let path = format!("ohlc/{period}");
        let raw = self.client.get(&path, &query.to_query()).await?;
        Ok(Paginated::new(OhlcResponse::from_data(&raw)?, self.client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_quotes_query() {
        let query = QuotesQuery::new(["US88160R1014"]).mic("XMUN").epoch(true).to_query();
        assert_eq!(query.to_string(), "isin=US88160R1014&mic=XMUN&epoch=true");
    }

    #[test]
    fn test_ohlc_range() {
        let from = Utc.with_ymd_and_hms(2022, 2, 1, 0, 0, 0).unwrap();
        let query = OhlcQuery::new(["US88160R1014"]).from(from).to(OhlcTo::Days(7)).to_query();
        assert_eq!(query.get("from"), Some("2022-02-01T00:00:00.000Z"));
        assert_eq!(query.get("to"), Some("P7D"));

        let query = OhlcQuery::new(["US88160R1014"]).from(OhlcFrom::Latest).to_query();
        assert_eq!(query.get("from"), Some("latest"));
    }
}
