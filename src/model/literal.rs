//! String literal field types.

/// Declare a string literal enum with a known set of values.
///
/// Each known value becomes a variant. Values outside the known set land in
/// the generated `Other` variant as received, so a value the API adds later
/// still decodes; use `is_known()` to check.
///
/// ```
/// lemon_rs::literal! {
///     /// Order side.
///     pub enum Side {
///         Buy = "buy",
///         Sell = "sell",
///     }
/// }
///
/// assert_eq!(Side::Buy.as_str(), "buy");
/// assert_eq!(Side::new("sell"), Side::Sell);
/// assert_eq!(Side::new("short"), Side::Other("short".to_string()));
/// assert!(!Side::new("short").is_known());
/// ```
#[macro_export]
macro_rules! literal {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $value:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
            /// A value outside the known set, kept as received
            Other(::std::string::String),
        }

        impl $name {
            /// Every known value, in declaration order.
            pub const VALUES: &'static [&'static str] = &[$($value),+];

            /// Parse a wire value, mapping known values to their variant.
            pub fn new(value: impl ::std::convert::Into<::std::string::String>) -> Self {
                let value = value.into();
                match value.as_str() {
                    $($value => Self::$variant,)+
                    _ => Self::Other(value),
                }
            }

            /// The wire value.
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $value,)+
                    Self::Other(value) => value,
                }
            }

            /// Returns `true` if the value is one of the known values.
            pub fn is_known(&self) -> bool {
                !matches!(self, Self::Other(_))
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::convert::AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl ::std::convert::From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl ::std::convert::From<::std::string::String> for $name {
            fn from(value: ::std::string::String) -> Self {
                Self::new(value)
            }
        }

        impl $crate::model::FieldKind for $name {
            fn field_type() -> $crate::model::FieldType {
                $crate::model::FieldType::Literal(Self::VALUES)
            }

            fn from_field(
                value: $crate::model::FieldValue,
            ) -> ::std::result::Result<Self, $crate::model::ParseError> {
                <::std::string::String as $crate::model::FieldKind>::from_field(value).map(Self::new)
            }

            fn to_field(&self) -> $crate::model::FieldValue {
                $crate::model::FieldValue::Str(self.as_str().to_string())
            }
        }

        impl $crate::__serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: $crate::__serde::Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> $crate::__serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: $crate::__serde::Deserializer<'de>,
            {
                <::std::string::String as $crate::__serde::Deserialize>::deserialize(deserializer)
                    .map(Self::new)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::model::{FieldKind, FieldType, FieldValue, Model};
    use serde_json::json;

    crate::literal! {
        enum Kind {
            Stock = "stock",
            Etf = "etf",
        }
    }

    crate::model! {
        struct Holding {
            kind as "type": Kind,
        }
    }

    #[test]
    fn test_known_values_map_to_variants() {
        assert_eq!(Kind::new("stock"), Kind::Stock);
        assert_ne!(Kind::Stock, Kind::Etf);
        assert_eq!(Kind::VALUES, ["stock", "etf"]);
        assert_eq!(Kind::from("etf").as_str(), "etf");
    }

    #[test]
    fn test_unknown_value_is_kept() {
        let holding = Holding::from_data(&json!({"type": "crypto"})).unwrap();
        assert_eq!(holding.kind, Kind::Other("crypto".to_string()));
        assert_eq!(holding.kind.as_str(), "crypto");
        assert!(!holding.kind.is_known());
        assert_eq!(holding.kind.to_field(), FieldValue::Str("crypto".into()));
    }

    #[test]
    fn test_declared_as_literal() {
        assert!(matches!(Kind::field_type(), FieldType::Literal(values) if values.len() == 2));
        assert_eq!(serde_json::to_value(Kind::Etf).unwrap(), json!("etf"));
    }
}
