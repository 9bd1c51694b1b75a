//! Query-string building.

use std::fmt::Display;

/// Ordered query parameters.
///
/// `None` values are dropped and list values repeat their key, which is
/// how the lemon.markets APIs read multi-valued filters.
///
/// # Example
///
/// ```
/// use lemon_rs::client::Query;
///
/// let query = Query::new()
///     .list("isin", ["US88160R1014", "US0378331005"])
///     .opt("mic", Some("XMUN"))
///     .opt("limit", None::<u32>)
///     .flag("decimals", Some(true));
///
/// assert_eq!(
///     query.to_string(),
///     "isin=US88160R1014&isin=US0378331005&mic=XMUN&decimals=true"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    /// Create an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one parameter.
    pub fn push(mut self, key: &str, value: impl Display) -> Self {
        self.pairs.push((key.to_string(), value.to_string()));
        self
    }

    /// Append a parameter if it is set.
    pub fn opt<T: Display>(self, key: &str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.push(key, value),
            None => self,
        }
    }

    /// Append every value under the same key.
    pub fn list<I>(self, key: &str, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        values
            .into_iter()
            .fold(self, |query, value| query.push(key, value))
    }

    /// Append a boolean flag (`true`/`false`) if it is set.
    pub fn flag(self, key: &str, value: Option<bool>) -> Self {
        self.opt(key, value)
    }

    /// Returns `true` if no parameters are set.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Parameters in insertion order.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Look up the first value of a parameter.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let encoded = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.pairs)
            .finish();
        f.write_str(&encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_is_dropped() {
        let query = Query::new().opt("search", None::<&str>).flag("tradable", None);
        assert!(query.is_empty());
    }

    #[test]
    fn test_list_repeats_key() {
        let query = Query::new().list("type", ["stock", "etf"]);
        assert_eq!(query.pairs().len(), 2);
        assert_eq!(query.get("type"), Some("stock"));
        assert_eq!(query.to_string(), "type=stock&type=etf");
    }

    #[test]
    fn test_values_are_encoded() {
        let query = Query::new().push("search", "tesla & co");
        assert_eq!(query.to_string(), "search=tesla+%26+co");
    }
}
