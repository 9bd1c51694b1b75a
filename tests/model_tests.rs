//! Tests for the declarative model layer through the public API.

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use serde_json::{json, Value};

use lemon_rs::model::{FieldType, FieldValue, Model};
use lemon_rs::models::{Instrument, InstrumentsResponse, OhlcData, Venue};

lemon_rs::literal! {
    /// Trade direction.
    pub enum Direction {
        /// Up
        Up = "up",
        /// Down
        Down = "down",
    }
}

lemon_rs::model! {
    /// A tick with every supported field shape.
    pub struct Tick {
        pub id: String,
        pub seq: i64,
        pub price: f64,
        pub live: bool,
        pub day: NaiveDate,
        pub at: chrono::DateTime<Utc>,
        pub open: NaiveTime,
        pub note: Option<String>,
        pub direction as "dir": Direction,
        pub sizes: Vec<i64>,
        pub children: Vec<Tick>,
    }
}

fn tick(id: &str, at: Value) -> Value {
    json!({
        "id": id,
        "seq": 7,
        "price": 12.5,
        "live": true,
        "day": "2022-02-14",
        "at": at,
        "open": "08:00:00",
        "note": null,
        "dir": "up",
        "sizes": [1, 2, 3],
        "children": []
    })
}

#[test]
fn test_schema_follows_declaration() {
    let names: Vec<_> = Tick::schema().fields().iter().map(|f| f.name).collect();
    assert_eq!(
        names,
        ["id", "seq", "price", "live", "day", "at", "open", "note", "dir", "sizes", "children"]
    );
    assert!(matches!(
        Tick::schema().field("dir").map(|f| &f.ty),
        Some(FieldType::Literal(values)) if *values == Direction::VALUES
    ));
    assert!(matches!(
        Tick::schema().field("children").map(|f| &f.ty),
        Some(FieldType::List(inner)) if matches!(**inner, FieldType::Model(_))
    ));
}

#[test]
fn test_round_trip_through_json() {
    let raw = tick("a", json!("2022-02-14T20:44:03.759+00:00"));
    let first = Tick::from_data(&raw).unwrap();
    let rendered: Value = serde_json::from_str(&first.to_json().unwrap()).unwrap();
    let second = Tick::from_data(&rendered).unwrap();
    assert_eq!(first, second);
    assert_eq!(rendered["dir"], "up");
    assert_eq!(rendered["note"], Value::Null);
}

#[test]
fn test_fractional_time_round_trips() {
    let mut raw = tick("a", json!("2022-02-14T20:44:03Z"));
    raw["open"] = json!("08:00:00.500");
    let first = Tick::from_data(&raw).unwrap();
    assert_eq!(
        first.open,
        NaiveTime::from_hms_milli_opt(8, 0, 0, 500).unwrap()
    );

    let rendered: Value = serde_json::from_str(&first.to_json().unwrap()).unwrap();
    assert_eq!(rendered["open"], "08:00:00.500");
    assert_eq!(Tick::from_data(&rendered).unwrap(), first);
}

#[test]
fn test_serde_matches_to_json() {
    let model = Tick::from_data(&tick("a", json!(1644871443759_i64))).unwrap();
    let via_serde = serde_json::to_value(&model).unwrap();
    let via_to_json: Value = serde_json::from_str(&model.to_json().unwrap()).unwrap();
    assert_eq!(via_serde, via_to_json);

    let back: Tick = serde_json::from_value(via_serde).unwrap();
    assert_eq!(back, model);
}

#[test]
fn test_missing_and_null_optional_fields() {
    let mut raw = tick("a", json!("2022-02-14T20:44:03Z"));
    raw.as_object_mut().unwrap().remove("note");
    assert_eq!(Tick::from_data(&raw).unwrap().note, None);

    raw["note"] = json!("hello");
    assert_eq!(Tick::from_data(&raw).unwrap().note.as_deref(), Some("hello"));
}

#[test]
fn test_null_in_required_field_is_an_error() {
    let mut raw = tick("a", json!("2022-02-14T20:44:03Z"));
    raw["seq"] = Value::Null;
    let err = Tick::from_data(&raw).unwrap_err();
    assert!(err.is_deserialization_error());
    assert!(err.to_string().contains("Tick.seq"));
}

#[test]
fn test_datetime_formats_agree() {
    let iso = Tick::from_data(&tick("a", json!("2022-02-14T20:44:03.759+00:00"))).unwrap();
    let epoch = Tick::from_data(&tick("a", json!(1644871443759_i64))).unwrap();
    let epoch_str = Tick::from_data(&tick("a", json!("1644871443759"))).unwrap();
    let offset = Tick::from_data(&tick("a", json!("2022-02-14T21:44:03.759+01:00"))).unwrap();

    let expected = Utc.with_ymd_and_hms(2022, 2, 14, 20, 44, 3).unwrap()
        + chrono::Duration::milliseconds(759);
    assert_eq!(iso.at, expected);
    assert_eq!(epoch.at, expected);
    assert_eq!(epoch_str.at, expected);
    assert_eq!(offset.at, expected);
}

#[test]
fn test_invalid_datetime_is_an_error() {
    let err = Tick::from_data(&tick("a", json!("yesterday"))).unwrap_err();
    assert!(err.is_deserialization_error());
}

#[test]
fn test_list_elements_parse_individually() {
    let mut raw = tick("parent", json!("2022-02-14T20:44:03Z"));
    raw["children"] = json!([
        tick("c1", json!("2022-02-14T20:44:03Z")),
        tick("c2", json!(1644871443000_i64))
    ]);
    let parent = Tick::from_data(&raw).unwrap();
    assert_eq!(parent.sizes, [1, 2, 3]);

    let singles: Vec<Tick> = raw["children"]
        .as_array()
        .unwrap()
        .iter()
        .map(|child| Tick::from_data(child).unwrap())
        .collect();
    assert_eq!(parent.children, singles);
    assert_eq!(parent.children[1].id, "c2");
}

#[test]
fn test_bad_list_element_reports_index() {
    let mut raw = tick("a", json!("2022-02-14T20:44:03Z"));
    raw["sizes"] = json!([1, "two", 3]);
    let err = Tick::from_data(&raw).unwrap_err();
    assert!(err.is_deserialization_error());
}

#[test]
fn test_to_dict_keeps_native_temporals() {
    let model = Tick::from_data(&tick("a", json!("2022-02-14T20:44:03Z"))).unwrap();
    let dict = model.to_dict();
    assert_eq!(
        dict.get("day"),
        Some(&FieldValue::Date(NaiveDate::from_ymd_opt(2022, 2, 14).unwrap()))
    );
    assert_eq!(
        dict.get("open"),
        Some(&FieldValue::Time(NaiveTime::from_hms_opt(8, 0, 0).unwrap()))
    );
    assert_eq!(dict.get("dir"), Some(&FieldValue::Str("up".to_string())));
    assert_eq!(dict.get("children"), Some(&FieldValue::List(Vec::new())));
}

#[test]
fn test_unknown_keys_are_ignored() {
    let mut raw = tick("a", json!("2022-02-14T20:44:03Z"));
    raw["added_later"] = json!({"anything": true});
    assert!(Tick::from_data(&raw).is_ok());
}

#[test]
fn test_unknown_literal_is_kept() {
    let mut raw = tick("a", json!("2022-02-14T20:44:03Z"));
    raw["dir"] = json!("sideways");
    let model = Tick::from_data(&raw).unwrap();
    assert_eq!(model.direction, Direction::Other("sideways".to_string()));
    assert_eq!(model.direction.as_str(), "sideways");
    assert!(!model.direction.is_known());
}

#[test]
fn test_not_an_object() {
    assert!(Venue::from_data(&json!([1, 2])).unwrap_err().is_deserialization_error());
}

#[test]
fn test_nested_error_names_path() {
    let err = InstrumentsResponse::from_data(&json!({
        "time": "2022-02-14T20:44:03.759+00:00",
        "results": [{
            "isin": "US19260Q1076",
            "wkn": "A2QP7J",
            "name": "COINBASE GLOBAL INC.",
            "type": "stock",
            "venues": [{"name": "Gettex", "title": "Gettex", "mic": null}]
        }],
        "previous": null,
        "next": null,
        "total": 1,
        "page": 1,
        "pages": 1
    }))
    .unwrap_err();
    assert!(err.is_deserialization_error());
}

#[test]
fn test_concrete_models_are_models() {
    assert_eq!(Instrument::NAME, "Instrument");
    assert_eq!(OhlcData::schema().fields().len(), 9);
    assert!(Instrument::parsers().is_ok());
}
