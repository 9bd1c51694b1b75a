//! Account service for balances, withdrawals, statements and documents.

use std::fmt;

use chrono::NaiveDate;

use super::path_segment;
use crate::client::{ApiClient, Paginated, Query};
use crate::model::Model;
use crate::models::{
    AccountResponse, AccountUpdate, BankStatementType, BankStatementsResponse, DocumentId,
    DocumentResponse, DocumentsResponse, Sorting, StatusResponse, Withdraw, WithdrawalsResponse,
};
use crate::Result;

/// Service for account operations.
///
/// # Example
///
/// ```no_run
/// use lemon_rs::api::PageQuery;
///
/// # async fn example(client: lemon_rs::LemonClient) -> lemon_rs::Result<()> {
/// let account = client.trading().account().get().await?;
/// println!("Cash to invest: {:?}", account.results.cash_to_invest);
///
/// let withdrawals = client.trading().account().withdrawals(PageQuery::new()).await?;
/// for withdrawal in withdrawals.collect_all().await? {
///     println!("{} {}", withdrawal.id, withdrawal.amount);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AccountService<'a> {
    client: &'a ApiClient,
}

/// Plain paging parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageQuery {
    /// Results per page
    pub limit: Option<u32>,
    /// Page number
    pub page: Option<u32>,
}

impl PageQuery {
    /// No paging parameters.
    pub fn new() -> Self {
        Self::default()
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
        Query::new().opt("limit", self.limit).opt("page", self.page)
    }
}

/// Start of a bank statement range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BankStatementsFrom {
    /// From the opening of the account
    Beginning,
    /// From this date
    Date(NaiveDate),
}

impl fmt::Display for BankStatementsFrom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BankStatementsFrom::Beginning => f.write_str("beginning"),
            BankStatementsFrom::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

impl From<NaiveDate> for BankStatementsFrom {
    fn from(date: NaiveDate) -> Self {
        BankStatementsFrom::Date(date)
    }
}

/// Query parameters for `GET /account/bankstatements`.
#[derive(Debug, Clone, Default)]
pub struct BankStatementsQuery {
    /// Filter by booking type
    pub kind: Option<BankStatementType>,
    /// Start of the range
    pub from: Option<BankStatementsFrom>,
    /// End of the range
    pub to: Option<NaiveDate>,
    /// Result ordering
    pub sorting: Option<Sorting>,
    /// Results per page
    pub limit: Option<u32>,
    /// Page number
    pub page: Option<u32>,
}

impl BankStatementsQuery {
    /// An empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by booking type.
    pub fn kind(mut self, kind: BankStatementType) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Set the start of the range.
    pub fn from(mut self, from: impl Into<BankStatementsFrom>) -> Self {
        self.from = Some(from.into());
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
            .opt("type", self.kind.as_ref())
            .opt("from", self.from)
            .opt("to", self.to.map(|d| d.format("%Y-%m-%d")))
            .opt("sorting", self.sorting.as_ref())
            .opt("limit", self.limit)
            .opt("page", self.page)
    }
}

/// Query parameters for `GET /account/documents`.
#[derive(Debug, Clone, Default)]
pub struct DocumentsQuery {
    /// Result ordering
    pub sorting: Option<Sorting>,
    /// Results per page
    pub limit: Option<u32>,
    /// Page number
    pub page: Option<u32>,
}

impl DocumentsQuery {
    /// An empty query.
    pub fn new() -> Self {
        Self::default()
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
            .opt("sorting", self.sorting.as_ref())
            .opt("limit", self.limit)
            .opt("page", self.page)
    }
}

impl<'a> AccountService<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Get the account.
    pub async fn get(&self) -> Result<AccountResponse> {
        let raw = self.client.get("account", &Query::new()).await?;
        AccountResponse::from_data(&raw)
    }

    /// Update the account's address.
    pub async fn update(&self, update: AccountUpdate) -> Result<AccountResponse> {
        let raw = self.client.put("account", &update).await?;
        AccountResponse::from_data(&raw)
    }

    /// List withdrawals.
    pub async fn withdrawals(&self, query: PageQuery) -> Result<Paginated<'a, WithdrawalsResponse>> {
        let raw = self.client.get("account/withdrawals", &query.to_query()).await?;
        Ok(Paginated::new(WithdrawalsResponse::from_data(&raw)?, self.client))
    }

    /// Request a withdrawal to the reference account.
    pub async fn withdraw(&self, withdraw: Withdraw) -> Result<StatusResponse> {
        if withdraw.amount <= 0 {
            return Err(crate::Error::InvalidInput(
                "withdrawal amount must be positive".to_string(),
            ));
        }
        let raw = self.client.post("account/withdrawals", &withdraw).await?;
        StatusResponse::from_data(&raw)
    }

    /// List bank statement entries.
    pub async fn bank_statements(
        &self,
        query: BankStatementsQuery,
    ) -> Result<Paginated<'a, BankStatementsResponse>> {
        let raw = self
            .client
            .get("account/bankstatements", &query.to_query())
            .await?;
        Ok(Paginated::new(BankStatementsResponse::from_data(&raw)?, self.client))
    }

    /// List account documents.
    pub async fn documents(&self, query: DocumentsQuery) -> Result<Paginated<'a, DocumentsResponse>> {
        let raw = self.client.get("account/documents", &query.to_query()).await?;
        Ok(Paginated::new(DocumentsResponse::from_data(&raw)?, self.client))
    }

    /// Get the download location of a document.
    pub async fn document(&self, id: &DocumentId) -> Result<DocumentResponse> {
        let path = format!("account/documents/{}", path_segment("document", id.as_str())?);
        let raw = self
            .client
            .get(&path, &Query::new().flag("no_redirect", Some(true)))
            .await?;
        DocumentResponse::from_data(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bank_statements_query() {
        let query = BankStatementsQuery::new()
            .kind(BankStatementType::Dividend)
            .from(BankStatementsFrom::Beginning)
            .to(NaiveDate::from_ymd_opt(2022, 2, 28).unwrap())
            .to_query();
        assert_eq!(query.to_string(), "type=dividend&from=beginning&to=2022-02-28");
    }

    #[test]
    fn test_page_query() {
        assert!(PageQuery::new().to_query().is_empty());
        assert_eq!(PageQuery::new().limit(10).page(2).to_query().to_string(), "limit=10&page=2");
    }
}
