//! Field type grammar and the parser resolver.
//!
//! [`resolve_parser`] turns a declared [`FieldType`] into a conversion
//! function from a raw JSON value to a [`FieldValue`]. It recurses over
//! optional, list and nested-model wrappers and fails fast on shapes it
//! cannot express.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::Value;

use super::error::{ParseError, SchemaError, UnsupportedType};
use super::mapping::ParserMapping;
use super::value::FieldValue;
use super::Model;

/// Conversion from one raw JSON value to a typed value.
///
/// Never called with JSON `null`: the caller short-circuits nulls first.
pub type Parser = Arc<dyn Fn(&Value) -> Result<FieldValue, ParseError> + Send + Sync>;

/// Declared type of a model field.
#[derive(Debug, Clone)]
pub enum FieldType {
    /// UTF-8 string
    Str,
    /// Signed integer
    Int,
    /// Floating point number
    Float,
    /// Boolean
    Bool,
    /// Calendar date (`YYYY-MM-DD`)
    Date,
    /// Timestamp (ISO-8601 string or epoch milliseconds)
    DateTime,
    /// Time of day (`HH:MM[:SS]`)
    Time,
    /// String literal drawn from a known set; passed through unvalidated
    Literal(&'static [&'static str]),
    /// Nullable wrapper
    Optional(Box<FieldType>),
    /// Ordered list
    List(Box<FieldType>),
    /// Nested model, resolved lazily
    Model(ModelRef),
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Str => f.write_str("str"),
            FieldType::Int => f.write_str("int"),
            FieldType::Float => f.write_str("float"),
            FieldType::Bool => f.write_str("bool"),
            FieldType::Date => f.write_str("date"),
            FieldType::DateTime => f.write_str("datetime"),
            FieldType::Time => f.write_str("time"),
            FieldType::Literal(values) => write!(f, "Literal{values:?}"),
            FieldType::Optional(inner) => write!(f, "Optional[{inner}]"),
            FieldType::List(inner) => write!(f, "List[{inner}]"),
            FieldType::Model(model) => f.write_str(model.name),
        }
    }
}

/// Handle to a nested model's parser mapping.
///
/// Holds a function pointer instead of the mapping itself so that a model
/// can refer to itself, or to a model whose mapping is not built yet.
#[derive(Debug, Clone, Copy)]
pub struct ModelRef {
    /// Model name
    pub name: &'static str,
    mapping: fn() -> Result<&'static ParserMapping, SchemaError>,
}

impl ModelRef {
    /// Reference the model `M`.
    pub fn of<M: Model>() -> Self {
        Self {
            name: M::NAME,
            mapping: M::parsers,
        }
    }

    /// Resolve (building on first use) the referenced model's mapping.
    pub fn mapping(&self) -> Result<&'static ParserMapping, SchemaError> {
        (self.mapping)()
    }
}

/// Build the parser for a declared field type.
pub fn resolve_parser(ty: &FieldType) -> Result<Parser, UnsupportedType> {
    let parser: Parser = match ty {
        FieldType::Model(model) => {
            let model = *model;
            Arc::new(move |raw| parse_nested(&model, raw))
        }
        FieldType::Date => Arc::new(|raw| parse_date(raw).map(FieldValue::Date)),
        FieldType::DateTime => Arc::new(|raw| parse_datetime(raw).map(FieldValue::DateTime)),
        FieldType::Time => Arc::new(|raw| parse_time(raw).map(FieldValue::Time)),
        FieldType::Optional(inner) => {
            if matches!(**inner, FieldType::Optional(_)) {
                return Err(UnsupportedType {
                    ty: ty.to_string(),
                    reason: "nested optional is ambiguous",
                });
            }
            resolve_parser(inner)?
        }
        FieldType::List(inner) => {
            let element = match &**inner {
                FieldType::Optional(_) => nullable(resolve_parser(inner)?),
                _ => resolve_parser(inner)?,
            };
            Arc::new(move |raw| {
                let items = raw
                    .as_array()
                    .ok_or_else(|| ParseError::mismatch("list", raw))?;
                items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| {
                        element(item).map_err(|source| ParseError::Element {
                            index,
                            source: Box::new(source),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(FieldValue::List)
            })
        }
        FieldType::Literal(_) => Arc::new(|raw| match raw {
            Value::String(s) => Ok(FieldValue::Str(s.clone())),
            other => Err(ParseError::mismatch("string literal", other)),
        }),
        FieldType::Str => Arc::new(|raw| parse_str(raw).map(FieldValue::Str)),
        FieldType::Int => Arc::new(|raw| parse_int(raw).map(FieldValue::Int)),
        FieldType::Float => Arc::new(|raw| parse_float(raw).map(FieldValue::Float)),
        FieldType::Bool => Arc::new(|raw| match raw {
            Value::Bool(b) => Ok(FieldValue::Bool(*b)),
            other => Err(ParseError::mismatch("bool", other)),
        }),
    };
    Ok(parser)
}

fn nullable(parser: Parser) -> Parser {
    Arc::new(move |raw| match raw {
        Value::Null => Ok(FieldValue::Null),
        other => parser(other),
    })
}

fn parse_nested(model: &ModelRef, raw: &Value) -> Result<FieldValue, ParseError> {
    let mapping = model.mapping().map_err(ParseError::Schema)?;
    mapping
        .parse(raw)
        .map(FieldValue::Record)
        .map_err(|err| ParseError::Nested(Box::new(err)))
}

fn parse_str(raw: &Value) -> Result<String, ParseError> {
    match raw {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(ParseError::mismatch("str", other)),
    }
}

fn parse_int(raw: &Value) -> Result<i64, ParseError> {
    match raw {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(f as i64),
                _ => Err(ParseError::invalid("int", n)),
            }
        }
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| ParseError::invalid("int", s)),
        other => Err(ParseError::mismatch("int", other)),
    }
}

fn parse_float(raw: &Value) -> Result<f64, ParseError> {
    match raw {
        Value::Number(n) => n.as_f64().ok_or_else(|| ParseError::invalid("float", n)),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| ParseError::invalid("float", s)),
        other => Err(ParseError::mismatch("float", other)),
    }
}

/// Parse an ISO-8601 date, or the date part of an ISO-8601 timestamp.
pub fn parse_date(raw: &Value) -> Result<NaiveDate, ParseError> {
    let s = raw.as_str().ok_or_else(|| ParseError::mismatch("date", raw))?;
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_iso_datetime(s).map(|dt| dt.date_naive()))
        .ok_or_else(|| ParseError::invalid("date", s))
}

/// Parse a timestamp given as an ISO-8601 string or as epoch milliseconds.
///
/// Strings are tried as ISO-8601 first and as a millisecond count second.
/// Anything else is an error; nothing is coerced silently.
pub fn parse_datetime(raw: &Value) -> Result<DateTime<Utc>, ParseError> {
    match raw {
        Value::String(s) => parse_iso_datetime(s)
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|| s.trim().parse::<i64>().ok().and_then(from_epoch_millis))
            .ok_or_else(|| ParseError::invalid("datetime", s)),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            .and_then(from_epoch_millis)
            .ok_or_else(|| ParseError::invalid("datetime", n)),
        other => Err(ParseError::mismatch("datetime", other)),
    }
}

/// Parse a time of day in `HH:MM`, `HH:MM:SS` or `HH:MM:SS.fff` form.
pub fn parse_time(raw: &Value) -> Result<NaiveTime, ParseError> {
    let s = raw.as_str().ok_or_else(|| ParseError::mismatch("time", raw))?;
    ["%H:%M:%S%.f", "%H:%M"]
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(s, fmt).ok())
        .ok_or_else(|| ParseError::invalid("time", s))
}

fn parse_iso_datetime(s: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(dt);
    }
    // Timestamps without an offset are taken as UTC.
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc().fixed_offset())
}

fn from_epoch_millis(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn parse(ty: FieldType, raw: Value) -> Result<FieldValue, ParseError> {
        resolve_parser(&ty).unwrap()(&raw)
    }

    #[test]
    fn test_datetime_iso_and_epoch_agree() {
        let iso = parse_datetime(&json!("2022-02-14T20:44:03.759+00:00")).unwrap();
        let epoch = parse_datetime(&json!(1644871443759_i64)).unwrap();
        let epoch_str = parse_datetime(&json!("1644871443759")).unwrap();
        assert_eq!(iso, epoch);
        assert_eq!(iso, epoch_str);
    }

    #[test]
    fn test_datetime_converts_offset_to_utc() {
        let dt = parse_datetime(&json!("2022-01-01T10:00:00+02:00")).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2022, 1, 1, 8, 0, 0).unwrap());
    }

    #[test]
    fn test_datetime_naive_is_utc() {
        let dt = parse_datetime(&json!("2022-01-01T10:00:00")).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2022, 1, 1, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_datetime_rejects_garbage() {
        assert_eq!(
            parse_datetime(&json!("not a time")),
            Err(ParseError::Invalid {
                expected: "datetime",
                value: "not a time".into()
            })
        );
        assert!(matches!(
            parse_datetime(&json!(true)),
            Err(ParseError::Mismatch { .. })
        ));
    }

    #[test]
    fn test_date_accepts_timestamp_strings() {
        let expected = NaiveDate::from_ymd_opt(2022, 3, 4).unwrap();
        assert_eq!(parse_date(&json!("2022-03-04")).unwrap(), expected);
        assert_eq!(
            parse_date(&json!("2022-03-04T23:30:00-05:00")).unwrap(),
            expected
        );
    }

    #[test]
    fn test_time_formats() {
        assert_eq!(
            parse_time(&json!("08:00")).unwrap(),
            NaiveTime::from_hms_opt(8, 0, 0).unwrap()
        );
        assert_eq!(
            parse_time(&json!("22:15:30")).unwrap(),
            NaiveTime::from_hms_opt(22, 15, 30).unwrap()
        );
        assert!(parse_time(&json!("25:00")).is_err());
    }

    #[test]
    fn test_scalar_coercions() {
        assert_eq!(parse(FieldType::Int, json!("42")), Ok(FieldValue::Int(42)));
        assert_eq!(parse(FieldType::Int, json!(42.0)), Ok(FieldValue::Int(42)));
        assert!(parse(FieldType::Int, json!(42.5)).is_err());
        assert_eq!(parse(FieldType::Float, json!(3)), Ok(FieldValue::Float(3.0)));
        assert_eq!(parse(FieldType::Str, json!(7)), Ok(FieldValue::Str("7".into())));
        assert!(parse(FieldType::Bool, json!("true")).is_err());
    }

    #[test]
    fn test_literal_is_passthrough() {
        let ty = FieldType::Literal(&["stock", "etf"]);
        assert_eq!(parse(ty.clone(), json!("bond")), Ok(FieldValue::Str("bond".into())));
        assert!(parse(ty, json!(1)).is_err());
    }

    #[test]
    fn test_list_preserves_order_and_length() {
        let ty = FieldType::List(Box::new(FieldType::Int));
        assert_eq!(
            parse(ty.clone(), json!([3, 1, 2])),
            Ok(FieldValue::List(vec![
                FieldValue::Int(3),
                FieldValue::Int(1),
                FieldValue::Int(2)
            ]))
        );
        assert_eq!(parse(ty, json!([])), Ok(FieldValue::List(vec![])));
    }

    #[test]
    fn test_list_reports_element_index() {
        let ty = FieldType::List(Box::new(FieldType::Date));
        let err = parse(ty, json!(["2022-01-01", "nope"])).unwrap_err();
        assert!(matches!(err, ParseError::Element { index: 1, .. }));
    }

    #[test]
    fn test_list_of_optional_keeps_nulls() {
        let ty = FieldType::List(Box::new(FieldType::Optional(Box::new(FieldType::Int))));
        assert_eq!(
            parse(ty, json!([1, null])),
            Ok(FieldValue::List(vec![FieldValue::Int(1), FieldValue::Null]))
        );
    }

    #[test]
    fn test_nested_optional_is_rejected() {
        let ty = FieldType::Optional(Box::new(FieldType::Optional(Box::new(FieldType::Int))));
        let err = resolve_parser(&ty).err().unwrap();
        assert_eq!(err.ty, "Optional[Optional[int]]");
    }
}
