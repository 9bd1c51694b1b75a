//! Instrument and venue models.

use chrono::{NaiveDate, NaiveTime};

use super::{page_model, InstrumentType};

crate::model! {
    /// A venue an instrument is listed on.
    pub struct InstrumentVenue {
        /// Venue name
        pub name: String,
        /// Venue title
        pub title: String,
        /// Market identifier code
        pub mic: String,
        /// Whether the venue is open right now
        pub is_open: bool,
        /// Whether the instrument is tradable on this venue
        pub tradable: bool,
        /// Trading currency
        pub currency: String,
    }
}

crate::model! {
    /// A tradable financial instrument.
    pub struct Instrument {
        /// International securities identification number
        pub isin: String,
        /// German securities identification number
        pub wkn: String,
        /// Instrument name
        pub name: String,
        /// Display title
        pub title: Option<String>,
        /// Ticker symbol
        pub symbol: Option<String>,
        /// Instrument type
        pub kind as "type": InstrumentType,
        /// Venues the instrument is listed on
        pub venues: Vec<InstrumentVenue>,
    }
}

page_model! {
    /// A page of `GET /instruments`.
    market_data InstrumentsResponse => Instrument
}

crate::model! {
    /// Daily trading hours of a venue, in the venue's timezone.
    pub struct OpeningHours {
        /// Opening time
        pub start: NaiveTime,
        /// Closing time
        pub end: NaiveTime,
        /// IANA timezone name, e.g. `Europe/Berlin`
        pub timezone: String,
    }
}

crate::model! {
    /// A trading venue.
    pub struct Venue {
        /// Venue name
        pub name: String,
        /// Venue title
        pub title: String,
        /// Market identifier code
        pub mic: String,
        /// Whether the venue is open right now
        pub is_open: bool,
        /// Daily trading hours
        pub opening_hours: OpeningHours,
        /// Upcoming trading days
        pub opening_days: Vec<NaiveDate>,
    }
}

page_model! {
    /// A page of `GET /venues`.
    market_data VenuesResponse => Venue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldValue, Model};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn instruments_payload() -> serde_json::Value {
        json!({
            "time": "2022-02-14T20:44:03.759+00:00",
            "results": [{
                "isin": "US19260Q1076",
                "wkn": "A2QP7J",
                "name": "COINBASE GLOBAL INC.",
                "title": "COINBASE GLOBAL INC",
                "symbol": "1QZ",
                "type": "stock",
                "venues": [{
                    "name": "Börse München - Gettex",
                    "title": "Gettex",
                    "mic": "XMUN",
                    "is_open": true,
                    "tradable": true,
                    "currency": "EUR"
                }]
            }],
            "previous": "https://data.lemon.markets/v1/instruments/?limit=100&page=1",
            "next": "https://data.lemon.markets/v1/instruments/?limit=100&page=3",
            "total": 26283,
            "page": 2,
            "pages": 263
        })
    }

    #[test]
    fn test_instruments_response() {
        let response = InstrumentsResponse::from_data(&instruments_payload()).unwrap();
        assert_eq!(response.results[0].isin, "US19260Q1076");
        assert_eq!(response.results[0].kind, InstrumentType::Stock);
        assert_eq!(response.results[0].venues[0].mic, "XMUN");
        assert_eq!(response.total, 26283);
        assert_eq!(response.page, 2);
        assert_eq!(response.pages, 263);

        let expected = Utc.with_ymd_and_hms(2022, 2, 14, 20, 44, 3).unwrap()
            + chrono::Duration::milliseconds(759);
        assert_eq!(response.to_dict().get("time"), Some(&FieldValue::DateTime(expected)));
    }

    #[test]
    fn test_instrument_optional_fields() {
        let instrument = Instrument::from_data(&json!({
            "isin": "DE0007100000",
            "wkn": "710000",
            "name": "MERCEDES-BENZ GROUP AG",
            "type": "stock",
            "venues": []
        }))
        .unwrap();
        assert_eq!(instrument.title, None);
        assert_eq!(instrument.symbol, None);
        assert!(instrument.venues.is_empty());
        assert_eq!(
            instrument.to_dict().get("type"),
            Some(&FieldValue::Str("stock".into()))
        );
    }

    #[test]
    fn test_venue() {
        let venue = Venue::from_data(&json!({
            "name": "Börse München - Gettex",
            "title": "Gettex",
            "mic": "XMUN",
            "is_open": true,
            "opening_hours": {"start": "08:00", "end": "22:00", "timezone": "Europe/Berlin"},
            "opening_days": ["2022-01-03", "2022-01-04"]
        }))
        .unwrap();
        assert_eq!(venue.opening_hours.start, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert_eq!(venue.opening_hours.timezone, "Europe/Berlin");
        assert_eq!(
            venue.opening_days,
            [
                NaiveDate::from_ymd_opt(2022, 1, 3).unwrap(),
                NaiveDate::from_ymd_opt(2022, 1, 4).unwrap()
            ]
        );
    }
}
