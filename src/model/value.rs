//! Typed field values and the record form returned by `to_dict()`.

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value};

use super::error::{DeserializeError, ParseError};
use super::FieldKind;

/// A value that has already been converted to its declared type.
///
/// Temporal values stay native here; they only become ISO-8601 strings
/// when the value is rendered as JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Absent or JSON `null`
    Null,
    /// Boolean scalar
    Bool(bool),
    /// Integer scalar
    Int(i64),
    /// Floating point scalar
    Float(f64),
    /// String scalar or string literal
    Str(String),
    /// Calendar date
    Date(NaiveDate),
    /// Absolute timestamp
    DateTime(DateTime<Utc>),
    /// Wall-clock time of day
    Time(NaiveTime),
    /// Ordered list
    List(Vec<FieldValue>),
    /// Nested model
    Record(Record),
}

impl FieldValue {
    /// Short name of this value's kind, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Bool(_) => "boolean",
            FieldValue::Int(_) => "integer",
            FieldValue::Float(_) => "float",
            FieldValue::Str(_) => "string",
            FieldValue::Date(_) => "date",
            FieldValue::DateTime(_) => "datetime",
            FieldValue::Time(_) => "time",
            FieldValue::List(_) => "list",
            FieldValue::Record(_) => "record",
        }
    }

    /// Returns `true` for [`FieldValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Render as a JSON value, with temporals as ISO-8601 strings.
    pub fn to_json_value(&self) -> Value {
        match self {
            FieldValue::Null => Value::Null,
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Int(i) => Value::from(*i),
            FieldValue::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
            FieldValue::Str(s) => Value::String(s.clone()),
            FieldValue::Date(d) => Value::String(format_date(d)),
            FieldValue::DateTime(dt) => Value::String(format_datetime(dt)),
            FieldValue::Time(t) => Value::String(format_time(t)),
            FieldValue::List(items) => Value::Array(items.iter().map(Self::to_json_value).collect()),
            FieldValue::Record(record) => record.to_json_value(),
        }
    }

    pub(crate) fn mismatch(&self, expected: &'static str) -> ParseError {
        ParseError::Mismatch {
            expected,
            found: self.kind(),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Null => serializer.serialize_none(),
            FieldValue::Bool(b) => serializer.serialize_bool(*b),
            FieldValue::Int(i) => serializer.serialize_i64(*i),
            FieldValue::Float(f) => serializer.serialize_f64(*f),
            FieldValue::Str(s) => serializer.serialize_str(s),
            FieldValue::Date(d) => serializer.serialize_str(&format_date(d)),
            FieldValue::DateTime(dt) => serializer.serialize_str(&format_datetime(dt)),
            FieldValue::Time(t) => serializer.serialize_str(&format_time(t)),
            FieldValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            FieldValue::Record(record) => record.serialize(serializer),
        }
    }
}

/// An ordered field-name to value mapping mirroring a model's declaration.
///
/// This is what [`Model::to_dict`](super::Model::to_dict) returns and what
/// a [`ParserMapping`](super::ParserMapping) produces from raw JSON.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    model: &'static str,
    fields: Vec<(&'static str, FieldValue)>,
}

impl Record {
    /// Create an empty record for the named model.
    pub fn new(model: &'static str) -> Self {
        Self {
            model,
            fields: Vec::new(),
        }
    }

    pub(crate) fn with_capacity(model: &'static str, capacity: usize) -> Self {
        Self {
            model,
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Name of the model this record belongs to.
    pub fn model(&self) -> &'static str {
        self.model
    }

    /// Append a field, replacing any previous value with the same name.
    pub fn insert(&mut self, name: &'static str, value: FieldValue) {
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Look up a field by wire name.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.fields.iter().map(|(n, v)| (*n, v))
    }

    /// Move a field's value out, leaving `Null` behind. Missing fields read as `Null`.
    pub fn take(&mut self, name: &str) -> FieldValue {
        self.fields
            .iter_mut()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| std::mem::replace(v, FieldValue::Null))
            .unwrap_or(FieldValue::Null)
    }

    /// Move a field's value out and convert it to its Rust type.
    pub fn take_field<T: FieldKind>(&mut self, name: &'static str) -> Result<T, DeserializeError> {
        let value = self.take(name);
        T::from_field(value).map_err(|source| DeserializeError::Field {
            model: self.model,
            field: name,
            source,
        })
    }

    /// Render as a JSON object, with temporals as ISO-8601 strings.
    pub fn to_json_value(&self) -> Value {
        let map: Map<String, Value> = self
            .fields
            .iter()
            .map(|(name, value)| ((*name).to_string(), value.to_json_value()))
            .collect();
        Value::Object(map)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

fn format_time(time: &NaiveTime) -> String {
    time.format("%H:%M:%S%.f").to_string()
}
