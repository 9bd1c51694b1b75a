//! Account, user, withdrawal, bank statement and document models.
//!
//! Amounts are integers in hundredths of a cent (`10000` is one euro).

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::{page_model, result_model, BankStatementType, Plan, TradingMode};

crate::model! {
    /// A brokerage account.
    pub struct Account {
        /// When the account was created
        pub created_at: DateTime<Utc>,
        /// Account identifier
        pub account_id: String,
        /// First name of the account holder
        pub firstname: Option<String>,
        /// Last name of the account holder
        pub lastname: Option<String>,
        /// Contact email
        pub email: Option<String>,
        /// Contact phone number
        pub phone: Option<String>,
        /// Postal address
        pub address: Option<String>,
        /// Billing address
        pub billing_address: Option<String>,
        /// Billing email
        pub billing_email: Option<String>,
        /// Billing name
        pub billing_name: Option<String>,
        /// Billing VAT number
        pub billing_vat: Option<String>,
        /// Paper or money
        pub mode: Option<TradingMode>,
        /// Deposit identifier
        pub deposit_id: Option<String>,
        /// Client identifier
        pub client_id: Option<String>,
        /// Account number
        pub account_number: Option<String>,
        /// IBAN of the brokerage account
        pub iban_brokerage: Option<String>,
        /// IBAN of the reference account
        pub iban_origin: Option<String>,
        /// Bank of the reference account
        pub bank_name_origin: Option<String>,
        /// Current balance
        pub balance: Option<i64>,
        /// Cash available for orders
        pub cash_to_invest: Option<i64>,
        /// Cash available for withdrawal
        pub cash_to_withdraw: Option<i64>,
        /// Amount bought today
        pub amount_bought_intraday: Option<i64>,
        /// Amount sold today
        pub amount_sold_intraday: Option<i64>,
        /// Amount reserved by open orders
        pub amount_open_orders: Option<i64>,
        /// Amount reserved by open withdrawals
        pub amount_open_withdrawals: Option<i64>,
        /// Estimated taxes
        pub amount_estimate_taxes: Option<i64>,
        /// When the account was approved
        pub approved_at: Option<DateTime<Utc>>,
        /// Trading plan
        pub trading_plan: Plan,
        /// Market data plan
        pub data_plan: Plan,
        /// Tax allowance
        pub tax_allowance: Option<i64>,
        /// Start of the tax allowance period
        pub tax_allowance_start: Option<NaiveDate>,
        /// End of the tax allowance period
        pub tax_allowance_end: Option<NaiveDate>,
    }
}

result_model! {
    /// Response of `GET /account` and `PUT /account`.
    AccountResponse => Account
}

/// Address fields accepted by `PUT /account`.
///
/// Fields left as `None` are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccountUpdate {
    /// Street name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_street: Option<String>,
    /// House number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_street_number: Option<String>,
    /// City
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_city: Option<String>,
    /// Postal code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_postal_code: Option<String>,
    /// Two-letter country code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_country: Option<String>,
}

crate::model! {
    /// A withdrawal to the reference account.
    pub struct Withdrawal {
        /// Withdrawal identifier
        pub id: String,
        /// Amount withdrawn
        pub amount: i64,
        /// When the withdrawal was requested
        pub created_at: DateTime<Utc>,
        /// When the withdrawal was booked
        pub date: Option<NaiveDate>,
        /// Idempotency key given on creation
        pub idempotency: Option<String>,
    }
}

page_model! {
    /// A page of `GET /account/withdrawals`.
    trading WithdrawalsResponse => Withdrawal
}

/// Body of `POST /account/withdrawals`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Withdraw {
    /// Amount to withdraw, in hundredths of a cent
    pub amount: i64,
    /// Personal verification PIN
    pub pin: String,
    /// Optional idempotency key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idempotency: Option<String>,
}

impl Withdraw {
    /// Create a withdrawal request.
    pub fn new(amount: i64, pin: impl Into<String>) -> Self {
        Self {
            amount,
            pin: pin.into(),
            idempotency: None,
        }
    }

    /// Attach an idempotency key.
    pub fn with_idempotency(mut self, key: impl Into<String>) -> Self {
        self.idempotency = Some(key.into());
        self
    }
}

crate::model! {
    /// An entry in the account's bank statement.
    pub struct BankStatement {
        /// Statement identifier
        pub id: String,
        /// Account identifier
        pub account_id: String,
        /// Kind of booking
        pub kind as "type": BankStatementType,
        /// Booking date
        pub date: NaiveDate,
        /// Booked amount
        pub amount: i64,
        /// ISIN for order and dividend bookings
        pub isin: Option<String>,
        /// Instrument title for order and dividend bookings
        pub isin_title: Option<String>,
        /// When the entry was created
        pub created_at: DateTime<Utc>,
        /// Quantity for order bookings
        pub quantity: Option<i64>,
    }
}

page_model! {
    /// A page of `GET /account/bankstatements`.
    trading BankStatementsResponse => BankStatement
}

crate::model! {
    /// An account document such as a contract note or tax report.
    pub struct Document {
        /// Document identifier
        pub id: String,
        /// File name
        pub name: String,
        /// When the document was created
        pub created_at: DateTime<Utc>,
        /// Document category
        pub category: String,
        /// API link to the document
        pub link: String,
        /// First time the document was opened
        pub viewed_first_at: Option<DateTime<Utc>>,
        /// Last time the document was opened
        pub viewed_last_at: Option<DateTime<Utc>>,
    }
}

page_model! {
    /// A page of `GET /account/documents`.
    trading DocumentsResponse => Document
}

crate::model! {
    /// Download location of a document.
    pub struct DocumentUrl {
        /// Public URL, valid for a short time
        pub public_url: Option<String>,
    }
}

result_model! {
    /// Response of `GET /account/documents/{id}`.
    DocumentResponse => DocumentUrl
}

crate::model! {
    /// The authenticated user.
    pub struct User {
        /// When the user signed up
        pub created_at: DateTime<Utc>,
        /// User identifier
        pub user_id: String,
        /// First name
        pub firstname: String,
        /// Last name
        pub lastname: String,
        /// Email address
        pub email: String,
        /// Phone number
        pub phone: Option<String>,
        /// When the phone number was verified
        pub phone_verified: Option<DateTime<Utc>>,
        /// Whether a PIN has been set
        pub pin_verified: bool,
        /// Account identifier
        pub account_id: String,
        /// Trading plan
        pub trading_plan: Plan,
        /// Market data plan
        pub data_plan: Plan,
        /// Tax allowance
        pub tax_allowance: Option<i64>,
        /// Start of the tax allowance period
        pub tax_allowance_start: Option<NaiveDate>,
        /// End of the tax allowance period
        pub tax_allowance_end: Option<NaiveDate>,
        /// Push notifications for orders
        pub optin_order_push: bool,
        /// Email notifications for orders
        pub optin_order_email: bool,
        /// Country code
        pub country: String,
        /// Preferred language
        pub language: String,
        /// Preferred timezone
        pub timezone: String,
    }
}

result_model! {
    /// Response of `GET /user`.
    UserResponse => User
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Model;
    use serde_json::json;

    #[test]
    fn test_account_response() {
        let response = AccountResponse::from_data(&json!({
            "time": "2022-02-14T20:44:03.759+00:00",
            "mode": "paper",
            "results": {
                "created_at": "2021-10-12T10:11:12.000+00:00",
                "account_id": "acc_pyNQNll99hhM4yQxD7FdSHXzs1RnDn9bLx",
                "firstname": "Hans",
                "lastname": null,
                "mode": "paper",
                "balance": 100000000,
                "cash_to_invest": 90000000,
                "approved_at": null,
                "trading_plan": "investor",
                "data_plan": "go",
                "tax_allowance_start": "2022-01-01",
                "tax_allowance_end": "2022-12-31"
            }
        }))
        .unwrap();

        assert_eq!(response.mode, TradingMode::Paper);
        let account = &response.results;
        assert_eq!(account.firstname.as_deref(), Some("Hans"));
        assert_eq!(account.lastname, None);
        assert_eq!(account.cash_to_invest, Some(90000000));
        assert_eq!(account.approved_at, None);
        assert_eq!(account.trading_plan, Plan::Investor);
        assert_eq!(
            account.tax_allowance_end,
            NaiveDate::from_ymd_opt(2022, 12, 31)
        );
    }

    #[test]
    fn test_account_update_skips_unset_fields() {
        let update = AccountUpdate {
            address_city: Some("Berlin".into()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"address_city": "Berlin"})
        );
    }

    #[test]
    fn test_withdraw_body() {
        let body = Withdraw::new(1000000, "1234");
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"amount": 1000000, "pin": "1234"})
        );
        let body = body.with_idempotency("w-1");
        assert_eq!(serde_json::to_value(&body).unwrap()["idempotency"], "w-1");
    }

    #[test]
    fn test_bank_statement_type_rename() {
        let statement = BankStatement::from_data(&json!({
            "id": "bst_123",
            "account_id": "acc_123",
            "type": "pay_in",
            "date": "2022-02-01",
            "amount": 100000000,
            "isin": null,
            "isin_title": null,
            "created_at": "2022-02-01T09:00:00+00:00",
            "quantity": null
        }))
        .unwrap();
        assert_eq!(statement.kind, BankStatementType::PayIn);
        assert_eq!(statement.quantity, None);
    }
}
