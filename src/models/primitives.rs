//! Primitive types and newtypes for type-safe API interactions.
//!
//! This module provides strongly-typed wrappers around string identifiers
//! to prevent mixing up different types of IDs at compile time.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// A strongly-typed order ID.
///
/// # Example
///
/// ```
/// use lemon_rs::OrderId;
///
/// let id = OrderId::new("ord_pyPGQhhHHUc2QSZQMfxg5bmBNnzTgm5R7q");
/// println!("Order: {}", id);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Create a new order ID.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the order ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for OrderId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A strongly-typed document ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Create a new document ID.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the document ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// When an order expires: a calendar date or a number of days from now.
///
/// Rendered as `YYYY-MM-DD` or as an ISO-8601 period such as `P7D`.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use lemon_rs::Expiry;
///
/// assert_eq!(Expiry::Days(7).to_string(), "P7D");
/// let date = NaiveDate::from_ymd_opt(2022, 3, 1).unwrap();
/// assert_eq!(Expiry::Date(date).to_string(), "2022-03-01");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Expiry {
    /// Expire at the end of this date
    Date(NaiveDate),
    /// Expire after this many days
    Days(u32),
}

impl fmt::Display for Expiry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expiry::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Expiry::Days(days) => write!(f, "P{days}D"),
        }
    }
}

impl Serialize for Expiry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<NaiveDate> for Expiry {
    fn from(date: NaiveDate) -> Self {
        Expiry::Date(date)
    }
}
