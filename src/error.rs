//! Error types for the lemon.markets API client.
//!
//! Every non-success HTTP response is passed through [`classify`] exactly
//! once, in the shared request path, and surfaces as an [`ApiError`].
//! Payloads that do not match a model's declared types surface as
//! [`Error::Deserialize`], so a malformed upstream payload is never confused
//! with a well-formed business error.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::model::{DeserializeError, SchemaError};

/// A specialized `Result` type for lemon.markets operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for all lemon.markets API operations.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed before a response was received
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization failed, or a response body was not JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Response payload does not match the model's declared field types
    #[error("failed to deserialize response: {0}")]
    Deserialize(#[from] DeserializeError),

    /// A model declares a field type that cannot be parsed
    #[error("invalid model declaration: {0}")]
    Schema(#[from] SchemaError),

    /// API returned a classified error response
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Invalid input provided to a function
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Returns `true` if this error is potentially transient and the
    /// operation could be retried.
    ///
    /// Business errors are never retryable.
    ///
    /// # Example
    ///
    /// ```
    /// use lemon_rs::Error;
    ///
    /// fn handle_error(err: Error) {
    ///     if err.is_retryable() {
    ///         println!("Retrying operation...");
    ///     }
    /// }
    /// ```
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(err) => err.is_timeout() || err.is_connect(),
            Error::Api(ApiError::InternalServer(_)) => true,
            _ => false,
        }
    }

    /// Returns `true` if the API rejected the token.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Api(ApiError::Authentication(_)))
    }

    /// Returns `true` if the API reported a missing entity.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Api(ApiError::EntityNotFound { .. }))
    }

    /// Returns `true` if a response payload did not match its model.
    pub fn is_deserialization_error(&self) -> bool {
        matches!(self, Error::Deserialize(_))
    }

    /// The classified API error, if this is one.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Api(err) => Some(err),
            _ => None,
        }
    }
}

/// The error body returned by the lemon.markets APIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// When the error occurred
    pub time: DateTime<Utc>,
    /// Machine-readable error code
    pub error_code: String,
    /// Human-readable message
    pub error_message: String,
}

impl fmt::Display for ErrorPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.error_message, self.error_code)
    }
}

/// A classified non-success API response.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The token is missing, invalid or expired
    #[error("authentication failed: {0}")]
    Authentication(ErrorPayload),

    /// The server rejected the request parameters
    #[error("invalid query: {0}")]
    InvalidQuery(ErrorPayload),

    /// The server failed to process the request
    #[error("internal server error: {0}")]
    InternalServer(ErrorPayload),

    /// A `<entity>_not_found` error
    #[error("{entity} not found: {payload}")]
    EntityNotFound {
        /// Error code with the `_not_found` suffix removed
        entity: String,
        /// Error body
        payload: ErrorPayload,
    },

    /// A known business-rule rejection from one API's code table
    #[error("{domain} error: {payload}")]
    Domain {
        /// API whose code table matched
        domain: ErrorDomain,
        /// Matched code
        code: DomainErrorCode,
        /// Error body
        payload: ErrorPayload,
    },

    /// Anything that could not be classified; carries the raw body
    #[error("unexpected API error: {body}")]
    Unknown {
        /// Response body, unchanged
        body: Value,
    },
}

impl ApiError {
    /// The parsed error body, unless the error is unclassified.
    pub fn payload(&self) -> Option<&ErrorPayload> {
        match self {
            ApiError::Authentication(payload)
            | ApiError::InvalidQuery(payload)
            | ApiError::InternalServer(payload)
            | ApiError::EntityNotFound { payload, .. }
            | ApiError::Domain { payload, .. } => Some(payload),
            ApiError::Unknown { .. } => None,
        }
    }

    /// The raw `error_code`, if the body carried one.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            ApiError::Unknown { body } => body.get("error_code").and_then(Value::as_str),
            other => other.payload().map(|p| p.error_code.as_str()),
        }
    }
}

macro_rules! error_codes {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident = $code:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[allow(missing_docs)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every code in this table.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The wire value.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $code),+
                }
            }

            /// Look up a wire value.
            pub fn from_code(code: &str) -> Option<Self> {
                match code {
                    $($code => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

error_codes! {
    /// Codes shared by every lemon.markets API.
    GeneralErrorCode {
        Unauthorized = "unauthorized",
        TokenInvalid = "token_invalid",
        InternalError = "internal_error",
        InvalidQuery = "invalid_query",
    }
}

error_codes! {
    /// Business error codes of the market data API.
    MarketDataErrorCode {
        InvalidRequest = "invalid_request",
        PlanNotAllowed = "plan_not_allowed",
        TooManyInstruments = "too_many_instruments",
        InvalidPeriod = "invalid_period",
    }
}

error_codes! {
    /// Business error codes of the trading API.
    TradingErrorCode {
        PinMissing = "pin_missing",
        PinInvalid = "pin_invalid",
        PinNotSet = "pin_not_set",
        InsufficientAccountBalance = "insufficient_account_balance",
        InsufficientHoldings = "insufficient_holdings",
        OrderTotalPriceLimitExceeded = "order_total_price_limit_exceeded",
        OrderExpirationDateInvalid = "order_expiration_date_invalid",
        OrderIdempotencyViolation = "order_idempotency_violation",
        OrderNotInactive = "order_not_inactive",
        OrderNotActivated = "order_not_activated",
        TradingDisabled = "trading_disabled",
        TradingBlocked = "trading_blocked",
        PlanNotAllowed = "plan_not_allowed",
        ForbiddenForVenue = "forbidden_for_venue",
        ForbiddenInCurrentState = "forbidden_in_current_state",
        InstrumentNotTradable = "instrument_not_tradable",
        CannotPlaceBuyOrders = "cannot_place_buy_orders",
        CannotPlaceSellOrders = "cannot_place_sell_orders",
        WithdrawalLimitExceeded = "withdrawal_limit_exceeded",
    }
}

/// Which API a request went to; selects the business code table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorDomain {
    /// `data.lemon.markets`
    MarketData,
    /// `trading.lemon.markets` and `paper-trading.lemon.markets`
    Trading,
    /// `realtime.lemon.markets`; has no business codes of its own
    Streaming,
}

impl ErrorDomain {
    /// Look up a business error code in this domain's table.
    pub fn lookup(&self, code: &str) -> Option<DomainErrorCode> {
        match self {
            ErrorDomain::MarketData => {
                MarketDataErrorCode::from_code(code).map(DomainErrorCode::MarketData)
            }
            ErrorDomain::Trading => TradingErrorCode::from_code(code).map(DomainErrorCode::Trading),
            ErrorDomain::Streaming => None,
        }
    }
}

impl fmt::Display for ErrorDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorDomain::MarketData => "market data",
            ErrorDomain::Trading => "trading",
            ErrorDomain::Streaming => "streaming",
        })
    }
}

/// A code matched against one domain's table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainErrorCode {
    /// Market data business error
    MarketData(MarketDataErrorCode),
    /// Trading business error
    Trading(TradingErrorCode),
}

impl DomainErrorCode {
    /// The wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            DomainErrorCode::MarketData(code) => code.as_str(),
            DomainErrorCode::Trading(code) => code.as_str(),
        }
    }
}

impl fmt::Display for DomainErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a response body.
///
/// Success bodies are returned unchanged. Error bodies are matched, in
/// order, against the `_not_found` suffix, the general code table and the
/// domain's business code table. Anything else, including a body without
/// `error_code` or one whose fields cannot be read, becomes
/// [`ApiError::Unknown`] carrying the body.
///
/// # Example
///
/// ```
/// use lemon_rs::error::{classify, ApiError, ErrorDomain};
/// use serde_json::json;
///
/// let body = json!({
///     "time": "2022-02-14T20:44:03.759+00:00",
///     "error_code": "instrument_not_found",
///     "error_message": "no such instrument",
/// });
/// match classify(ErrorDomain::MarketData, false, body) {
///     Err(ApiError::EntityNotFound { entity, .. }) => assert_eq!(entity, "instrument"),
///     other => panic!("unexpected: {other:?}"),
/// }
/// ```
pub fn classify(
    domain: ErrorDomain,
    status_ok: bool,
    body: Value,
) -> std::result::Result<Value, ApiError> {
    if status_ok {
        return Ok(body);
    }
    Err(classify_error(domain, body))
}

fn classify_error(domain: ErrorDomain, body: Value) -> ApiError {
    if body.get("error_code").and_then(Value::as_str).is_none() {
        return ApiError::Unknown { body };
    }
    let payload = match ErrorPayload::deserialize(&body) {
        Ok(payload) => payload,
        Err(err) => {
            tracing::debug!(error = %err, "unreadable error payload");
            return ApiError::Unknown { body };
        }
    };

    if let Some(entity) = payload.error_code.strip_suffix("_not_found") {
        return ApiError::EntityNotFound {
            entity: entity.to_string(),
            payload,
        };
    }

    match GeneralErrorCode::from_code(&payload.error_code) {
        Some(GeneralErrorCode::Unauthorized | GeneralErrorCode::TokenInvalid) => {
            ApiError::Authentication(payload)
        }
        Some(GeneralErrorCode::InternalError) => ApiError::InternalServer(payload),
        Some(GeneralErrorCode::InvalidQuery) => ApiError::InvalidQuery(payload),
        None => match domain.lookup(&payload.error_code) {
            Some(code) => ApiError::Domain {
                domain,
                code,
                payload,
            },
            None => ApiError::Unknown { body },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn body(code: &str) -> Value {
        json!({
            "time": "2022-02-14T20:44:03.759+00:00",
            "mode": "paper",
            "status": "error",
            "error_code": code,
            "error_message": "something went wrong"
        })
    }

    fn classify_err(domain: ErrorDomain, body: Value) -> ApiError {
        classify(domain, false, body).unwrap_err()
    }

    #[test]
    fn test_ok_passes_body_through() {
        let raw = json!({"results": []});
        assert_eq!(classify(ErrorDomain::Trading, true, raw.clone()).unwrap(), raw);
    }

    #[test]
    fn test_general_codes() {
        assert!(matches!(
            classify_err(ErrorDomain::MarketData, body("unauthorized")),
            ApiError::Authentication(_)
        ));
        assert!(matches!(
            classify_err(ErrorDomain::Trading, body("token_invalid")),
            ApiError::Authentication(_)
        ));
        assert!(matches!(
            classify_err(ErrorDomain::Trading, body("internal_error")),
            ApiError::InternalServer(_)
        ));
        assert!(matches!(
            classify_err(ErrorDomain::MarketData, body("invalid_query")),
            ApiError::InvalidQuery(_)
        ));
    }

    #[test]
    fn test_payload_fields_are_kept() {
        let err = classify_err(ErrorDomain::Trading, body("unauthorized"));
        let payload = err.payload().unwrap();
        assert_eq!(payload.error_message, "something went wrong");
        assert_eq!(
            payload.time,
            Utc.with_ymd_and_hms(2022, 2, 14, 20, 44, 3).unwrap()
                + chrono::Duration::milliseconds(759)
        );
        assert_eq!(err.error_code(), Some("unauthorized"));
    }

    #[test]
    fn test_not_found_strips_suffix() {
        match classify_err(ErrorDomain::Trading, body("order_not_found")) {
            ApiError::EntityNotFound { entity, payload } => {
                assert_eq!(entity, "order");
                assert_eq!(payload.error_code, "order_not_found");
            }
            other => panic!("expected EntityNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_domain_codes_depend_on_domain() {
        match classify_err(ErrorDomain::Trading, body("pin_invalid")) {
            ApiError::Domain { domain, code, .. } => {
                assert_eq!(domain, ErrorDomain::Trading);
                assert_eq!(code, DomainErrorCode::Trading(TradingErrorCode::PinInvalid));
            }
            other => panic!("expected Domain, got {other:?}"),
        }

        // trading-only code is unknown to market data
        assert!(matches!(
            classify_err(ErrorDomain::MarketData, body("pin_invalid")),
            ApiError::Unknown { .. }
        ));
        assert!(matches!(
            classify_err(ErrorDomain::MarketData, body("too_many_instruments")),
            ApiError::Domain {
                code: DomainErrorCode::MarketData(MarketDataErrorCode::TooManyInstruments),
                ..
            }
        ));
        assert!(matches!(
            classify_err(ErrorDomain::Streaming, body("plan_not_allowed")),
            ApiError::Unknown { .. }
        ));
    }

    #[test]
    fn test_unknown_keeps_body() {
        let raw = json!({"message": "bad gateway"});
        assert_eq!(
            classify_err(ErrorDomain::MarketData, raw.clone()),
            ApiError::Unknown { body: raw }
        );

        let raw = body("brand_new_code");
        assert_eq!(
            classify_err(ErrorDomain::Trading, raw.clone()),
            ApiError::Unknown { body: raw }
        );
    }

    #[test]
    fn test_unreadable_payload_is_unknown() {
        let raw = json!({"error_code": "unauthorized", "time": "yesterday"});
        assert_eq!(
            classify_err(ErrorDomain::Trading, raw.clone()),
            ApiError::Unknown { body: raw }
        );
    }

    #[test]
    fn test_code_tables_round_trip() {
        for code in TradingErrorCode::ALL {
            assert_eq!(TradingErrorCode::from_code(code.as_str()), Some(*code));
        }
        assert_eq!(TradingErrorCode::ALL.len(), 19);
        assert_eq!(MarketDataErrorCode::ALL.len(), 4);
    }

    #[test]
    fn test_error_predicates() {
        let err = Error::from(classify_err(ErrorDomain::Trading, body("unauthorized")));
        assert!(err.is_auth_error());
        assert!(!err.is_retryable());

        let err = Error::from(classify_err(ErrorDomain::Trading, body("internal_error")));
        assert!(err.is_retryable());

        let err = Error::from(classify_err(ErrorDomain::Trading, body("position_not_found")));
        assert!(err.is_not_found());
        assert!(err.api_error().is_some());
        assert!(!Error::InvalidInput("bad".into()).is_retryable());
    }
}
