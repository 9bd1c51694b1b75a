//! Quote, trade and OHLC models.
//!
//! Prices arrive as integers (hundredths of a cent) or, with `decimals`,
//! as decimal numbers; both decode to `f64`. The timestamp `t` arrives as
//! an ISO-8601 string or, with `epoch`, as epoch milliseconds; both decode
//! to the same instant.

use chrono::{DateTime, Utc};

use super::page_model;

crate::model! {
    /// Latest quote of an instrument on a venue.
    pub struct Quote {
        /// ISIN of the instrument
        pub isin: String,
        /// Bid volume
        pub b_v: i64,
        /// Ask volume
        pub a_v: i64,
        /// Bid price
        pub b: f64,
        /// Ask price
        pub a: f64,
        /// Quote time
        pub t: DateTime<Utc>,
        /// Market identifier code
        pub mic: String,
    }
}

page_model! {
    /// A page of `GET /quotes/latest`.
    market_data QuotesResponse => Quote
}

crate::model! {
    /// Latest trade of an instrument on a venue.
    pub struct Trade {
        /// ISIN of the instrument
        pub isin: String,
        /// Trade price
        pub p: f64,
        /// Price times volume
        pub pbv: f64,
        /// Traded volume
        pub v: i64,
        /// Trade time
        pub t: DateTime<Utc>,
        /// Market identifier code
        pub mic: String,
    }
}

page_model! {
    /// A page of `GET /trades/latest`.
    market_data TradesResponse => Trade
}

crate::model! {
    /// One OHLC bar.
    pub struct OhlcData {
        /// ISIN of the instrument
        pub isin: String,
        /// Open price
        pub o: f64,
        /// High price
        pub h: f64,
        /// Low price
        pub l: f64,
        /// Close price
        pub c: f64,
        /// Traded volume
        pub v: i64,
        /// Price times volume
        pub pbv: f64,
        /// Start of the bar
        pub t: DateTime<Utc>,
        /// Market identifier code
        pub mic: String,
    }
}

page_model! {
    /// A page of `GET /ohlc/{period}`.
    market_data OhlcResponse => OhlcData
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Model;
    use serde_json::json;

    fn quote(b: serde_json::Value, t: serde_json::Value) -> Quote {
        Quote::from_data(&json!({
            "isin": "US88160R1014",
            "b_v": 11,
            "a_v": 5,
            "b": b,
            "a": 921.2,
            "t": t,
            "mic": "XMUN"
        }))
        .unwrap()
    }

    #[test]
    fn test_quote_time_formats_agree() {
        let iso = quote(json!(921.1), json!("2022-02-14T20:44:03.759+00:00"));
        let epoch = quote(json!(921.1), json!(1644871443759_i64));
        assert_eq!(iso, epoch);
    }

    #[test]
    fn test_integer_prices_decode_as_float() {
        let q = quote(json!(9211000), json!("2022-02-14T20:44:03.759+00:00"));
        assert_eq!(q.b, 9211000.0);
    }

    #[test]
    fn test_ohlc_round_trip() {
        let raw = json!({
            "isin": "US88160R1014",
            "o": 921.5,
            "h": 930.0,
            "l": 915.25,
            "c": 925.0,
            "v": 1500,
            "pbv": 1387500.0,
            "t": "2022-02-14T00:00:00+00:00",
            "mic": "XMUN"
        });
        let bar = OhlcData::from_data(&raw).unwrap();
        let rendered: serde_json::Value = serde_json::from_str(&bar.to_json().unwrap()).unwrap();
        assert_eq!(OhlcData::from_data(&rendered).unwrap(), bar);
    }
}
