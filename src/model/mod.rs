//! Declarative response models.
//!
//! A model is a plain struct whose fields are declared once with the
//! [`model!`](crate::model!) macro. From that declaration the crate derives
//! a [`Schema`], and from the schema a [`ParserMapping`] that converts raw
//! JSON objects into typed values. The mapping is built the first time a
//! model type is decoded and reused for every payload after that.
//!
//! # Example
//!
//! ```
//! use lemon_rs::model::Model;
//! use serde_json::json;
//!
//! lemon_rs::model! {
//!     /// A trading venue.
//!     pub struct Venue {
//!         pub name: String,
//!         pub mic: String,
//!         pub is_open: bool,
//!     }
//! }
//!
//! let venue = Venue::from_data(&json!({
//!     "name": "Gettex",
//!     "mic": "XMUN",
//!     "is_open": true,
//! }))?;
//! assert_eq!(venue.mic, "XMUN");
//! # Ok::<(), lemon_rs::Error>(())
//! ```

mod error;
mod literal;
mod mapping;
mod types;
mod value;

pub use error::{DeserializeError, ParseError, SchemaError, UnsupportedType};
pub use mapping::{FieldDecl, ParserMapping, Schema};
pub use types::{parse_date, parse_datetime, parse_time, resolve_parser, FieldType, ModelRef, Parser};
pub use value::{FieldValue, Record};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde_json::Value;

/// A typed record decoded from an API payload.
///
/// Implemented by [`model!`](crate::model!); not meant to be implemented
/// by hand.
pub trait Model: Sized + Send + Sync + 'static {
    /// Model name used in error messages.
    const NAME: &'static str;

    /// Declared fields, in order.
    fn schema() -> &'static Schema;

    /// The parser mapping for this model, built on first use.
    ///
    /// Every call after the first returns the same mapping.
    fn parsers() -> Result<&'static ParserMapping, SchemaError>;

    /// Build the model from an already-converted record.
    fn from_record(record: Record) -> Result<Self, DeserializeError>;

    /// Convert the model back into its record form.
    fn to_record(&self) -> Record;

    /// Decode a raw JSON object.
    ///
    /// Missing or `null` values in optional fields become `None`. Keys the
    /// model does not declare are ignored.
    ///
    /// A missing or `null` value in a non-`Option` field fails with a
    /// deserialization error naming `Model.field`. Declare any field the
    /// API sometimes sends as `null` as `Option<T>`.
    fn from_data(data: &Value) -> crate::Result<Self> {
        let record = Self::parsers()?.parse(data)?;
        Ok(Self::from_record(record)?)
    }

    /// Field-name to value mapping, with nested models and lists
    /// converted recursively.
    fn to_dict(&self) -> Record {
        self.to_record()
    }

    /// Render as a JSON string. Temporal values become ISO-8601 strings.
    fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(&self.to_record())?)
    }
}

/// A Rust type usable as a model field.
///
/// Links a Rust type to its declared [`FieldType`] and converts between the
/// typed [`FieldValue`] and the Rust value.
pub trait FieldKind: Sized {
    /// The declared type of this field.
    fn field_type() -> FieldType;

    /// Convert a parsed value into the Rust value.
    fn from_field(value: FieldValue) -> Result<Self, ParseError>;

    /// Convert the Rust value into a field value.
    fn to_field(&self) -> FieldValue;
}

macro_rules! scalar_kind {
    ($ty:ty, $field_type:ident, $variant:ident, $expected:literal) => {
        impl FieldKind for $ty {
            fn field_type() -> FieldType {
                FieldType::$field_type
            }

            fn from_field(value: FieldValue) -> Result<Self, ParseError> {
                match value {
                    FieldValue::$variant(v) => Ok(v),
                    FieldValue::Null => Err(ParseError::Null),
                    other => Err(other.mismatch($expected)),
                }
            }

            fn to_field(&self) -> FieldValue {
                FieldValue::$variant(self.clone())
            }
        }
    };
}

scalar_kind!(String, Str, Str, "str");
scalar_kind!(i64, Int, Int, "int");
scalar_kind!(bool, Bool, Bool, "bool");
scalar_kind!(NaiveDate, Date, Date, "date");
scalar_kind!(DateTime<Utc>, DateTime, DateTime, "datetime");
scalar_kind!(NaiveTime, Time, Time, "time");

impl FieldKind for i32 {
    fn field_type() -> FieldType {
        FieldType::Int
    }

    fn from_field(value: FieldValue) -> Result<Self, ParseError> {
        match value {
            FieldValue::Int(v) => i32::try_from(v).map_err(|_| ParseError::invalid("int", v)),
            FieldValue::Null => Err(ParseError::Null),
            other => Err(other.mismatch("int")),
        }
    }

    fn to_field(&self) -> FieldValue {
        FieldValue::Int(i64::from(*self))
    }
}

impl FieldKind for f64 {
    fn field_type() -> FieldType {
        FieldType::Float
    }

    fn from_field(value: FieldValue) -> Result<Self, ParseError> {
        match value {
            FieldValue::Float(v) => Ok(v),
            FieldValue::Int(v) => Ok(v as f64),
            FieldValue::Null => Err(ParseError::Null),
            other => Err(other.mismatch("float")),
        }
    }

    fn to_field(&self) -> FieldValue {
        FieldValue::Float(*self)
    }
}

impl<T: FieldKind> FieldKind for Option<T> {
    fn field_type() -> FieldType {
        FieldType::Optional(Box::new(T::field_type()))
    }

    fn from_field(value: FieldValue) -> Result<Self, ParseError> {
        match value {
            FieldValue::Null => Ok(None),
            other => T::from_field(other).map(Some),
        }
    }

    fn to_field(&self) -> FieldValue {
        self.as_ref().map_or(FieldValue::Null, T::to_field)
    }
}

impl<T: FieldKind> FieldKind for Vec<T> {
    fn field_type() -> FieldType {
        FieldType::List(Box::new(T::field_type()))
    }

    fn from_field(value: FieldValue) -> Result<Self, ParseError> {
        match value {
            FieldValue::List(items) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| {
                    T::from_field(item).map_err(|source| ParseError::Element {
                        index,
                        source: Box::new(source),
                    })
                })
                .collect(),
            FieldValue::Null => Err(ParseError::Null),
            other => Err(other.mismatch("list")),
        }
    }

    fn to_field(&self) -> FieldValue {
        FieldValue::List(self.iter().map(T::to_field).collect())
    }
}

impl<T: FieldKind> FieldKind for Box<T> {
    fn field_type() -> FieldType {
        T::field_type()
    }

    fn from_field(value: FieldValue) -> Result<Self, ParseError> {
        T::from_field(value).map(Box::new)
    }

    fn to_field(&self) -> FieldValue {
        (**self).to_field()
    }
}

/// Field conversion for a nested model. Used by the [`model!`](crate::model!) expansion.
#[doc(hidden)]
pub fn nested_from_field<M: Model>(value: FieldValue) -> Result<M, ParseError> {
    match value {
        FieldValue::Record(record) => {
            M::from_record(record).map_err(|err| ParseError::Nested(Box::new(err)))
        }
        FieldValue::Null => Err(ParseError::Null),
        other => Err(other.mismatch(M::NAME)),
    }
}

/// Declare a response model.
///
/// Generates the struct (with `Debug`, `Clone` and `PartialEq`), its
/// [`Model`] and [`FieldKind`] impls, and serde impls that go through the
/// model's parser mapping. A field whose wire name is not a valid Rust
/// identifier is renamed with `as`:
///
/// ```
/// use lemon_rs::model::Model;
///
/// lemon_rs::model! {
///     pub struct Quote {
///         pub isin: String,
///         pub bid as "b": f64,
///         pub ask as "a": f64,
///     }
/// }
///
/// let quote = Quote::from_data(&serde_json::json!({"isin": "X", "b": 1.5, "a": 1.6}))?;
/// assert_eq!(quote.bid, 1.5);
/// # Ok::<(), lemon_rs::Error>(())
/// ```
#[macro_export]
macro_rules! model {
    (@wire $field:ident) => {
        stringify!($field)
    };
    (@wire $field:ident $wire:literal) => {
        $wire
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident $(as $wire:literal)? : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $ty,
            )*
        }

        impl $crate::model::Model for $name {
            const NAME: &'static str = stringify!($name);

            fn schema() -> &'static $crate::model::Schema {
                static SCHEMA: ::std::sync::OnceLock<$crate::model::Schema> =
                    ::std::sync::OnceLock::new();
                SCHEMA.get_or_init(|| {
                    $crate::model::Schema::new(
                        stringify!($name),
                        vec![$((
                            $crate::model!(@wire $field $($wire)?),
                            <$ty as $crate::model::FieldKind>::field_type(),
                        )),*],
                    )
                })
            }

            fn parsers() -> ::std::result::Result<
                &'static $crate::model::ParserMapping,
                $crate::model::SchemaError,
            > {
                static MAPPING: ::std::sync::OnceLock<
                    ::std::result::Result<$crate::model::ParserMapping, $crate::model::SchemaError>,
                > = ::std::sync::OnceLock::new();
                MAPPING
                    .get_or_init(|| $crate::model::ParserMapping::build(Self::schema()))
                    .as_ref()
                    .map_err(::std::clone::Clone::clone)
            }

            #[allow(unused_mut)]
            fn from_record(
                mut record: $crate::model::Record,
            ) -> ::std::result::Result<Self, $crate::model::DeserializeError> {
                ::std::result::Result::Ok(Self {
                    $(
                        $field: record.take_field::<$ty>($crate::model!(@wire $field $($wire)?))?,
                    )*
                })
            }

            fn to_record(&self) -> $crate::model::Record {
                let mut record = $crate::model::Record::new(stringify!($name));
                $(
                    record.insert(
                        $crate::model!(@wire $field $($wire)?),
                        $crate::model::FieldKind::to_field(&self.$field),
                    );
                )*
                record
            }
        }

        impl $crate::model::FieldKind for $name {
            fn field_type() -> $crate::model::FieldType {
                $crate::model::FieldType::Model($crate::model::ModelRef::of::<Self>())
            }

            fn from_field(
                value: $crate::model::FieldValue,
            ) -> ::std::result::Result<Self, $crate::model::ParseError> {
                $crate::model::nested_from_field::<Self>(value)
            }

            fn to_field(&self) -> $crate::model::FieldValue {
                $crate::model::FieldValue::Record($crate::model::Model::to_record(self))
            }
        }

        impl $crate::__serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: $crate::__serde::Serializer,
            {
                $crate::__serde::Serialize::serialize(
                    &$crate::model::Model::to_record(self),
                    serializer,
                )
            }
        }

        impl<'de> $crate::__serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: $crate::__serde::Deserializer<'de>,
            {
                let value: $crate::__serde_json::Value =
                    $crate::__serde::Deserialize::deserialize(deserializer)?;
                <Self as $crate::model::Model>::from_data(&value)
                    .map_err(<D::Error as $crate::__serde::de::Error>::custom)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    crate::model! {
        struct Leg {
            venue: String,
            qty as "quantity": i64,
            price: Option<f64>,
        }
    }

    crate::model! {
        struct Ticket {
            id: String,
            legs: Vec<Leg>,
            parent: Option<Box<Ticket>>,
        }
    }

    #[test]
    fn test_wire_rename() {
        let schema = Leg::schema();
        let names: Vec<_> = schema.fields().iter().map(|f| f.name).collect();
        assert_eq!(names, ["venue", "quantity", "price"]);

        let leg = Leg::from_data(&json!({"venue": "XMUN", "quantity": 3})).unwrap();
        assert_eq!(leg.qty, 3);
        assert_eq!(leg.price, None);
    }

    #[test]
    fn test_self_reference() {
        let ticket = Ticket::from_data(&json!({
            "id": "b",
            "legs": [],
            "parent": {"id": "a", "legs": [{"venue": "XMUN", "quantity": 1, "price": 2.5}]}
        }))
        .unwrap();
        let parent = ticket.parent.as_deref().unwrap();
        assert_eq!(parent.id, "a");
        assert_eq!(parent.legs[0].price, Some(2.5));
        assert!(parent.parent.is_none());
    }

    #[test]
    fn test_required_null_is_error() {
        let err = Leg::from_data(&json!({"venue": null, "quantity": 1})).unwrap_err();
        assert!(err.is_deserialization_error());
        assert_eq!(
            err.to_string(),
            "failed to deserialize response: Leg.venue: required value is null or missing"
        );
    }

    #[test]
    fn test_parsers_built_once() {
        let first = Leg::parsers().unwrap();
        let second = Leg::parsers().unwrap();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_to_json_round_trip() {
        let raw = json!({"venue": "XMUN", "quantity": 2, "price": 1.25});
        let leg = Leg::from_data(&raw).unwrap();
        let rendered: Value = serde_json::from_str(&leg.to_json().unwrap()).unwrap();
        assert_eq!(rendered, raw);
        assert_eq!(Leg::from_data(&rendered).unwrap(), leg);
    }
}
