//! Field declarations and the per-model parser mapping.

use std::fmt;

use serde_json::Value;

use super::error::{json_kind, DeserializeError, SchemaError};
use super::types::{resolve_parser, FieldType, Parser};
use super::value::{FieldValue, Record};

/// One declared field: wire name and type.
#[derive(Debug, Clone)]
pub struct FieldDecl {
    /// Wire (JSON) name
    pub name: &'static str,
    /// Declared type
    pub ty: FieldType,
}

/// The ordered field declarations of a model type.
#[derive(Debug, Clone)]
pub struct Schema {
    name: &'static str,
    fields: Vec<FieldDecl>,
}

impl Schema {
    /// Declare a model's fields in order.
    pub fn new(name: &'static str, fields: Vec<(&'static str, FieldType)>) -> Self {
        Self {
            name,
            fields: fields
                .into_iter()
                .map(|(name, ty)| FieldDecl { name, ty })
                .collect(),
        }
    }

    /// Model name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Field declarations in order.
    pub fn fields(&self) -> &[FieldDecl] {
        &self.fields
    }

    /// Look up a field declaration by wire name.
    pub fn field(&self, name: &str) -> Option<&FieldDecl> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Field name to parser pairs for one model type.
///
/// Built from the [`Schema`] alone, once per model type, and shared by
/// every `from_data` call afterwards.
pub struct ParserMapping {
    model: &'static str,
    entries: Vec<(&'static str, Parser)>,
}

impl ParserMapping {
    /// Resolve a parser for every declared field.
    pub fn build(schema: &Schema) -> Result<Self, SchemaError> {
        let entries = schema
            .fields()
            .iter()
            .map(|decl| {
                resolve_parser(&decl.ty)
                    .map(|parser| (decl.name, parser))
                    .map_err(|err| err.into_schema_error(schema.name(), decl.name))
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::trace!(model = schema.name(), fields = entries.len(), "built parser mapping");

        Ok(Self {
            model: schema.name(),
            entries,
        })
    }

    /// Model name.
    pub fn model(&self) -> &'static str {
        self.model
    }

    /// Number of mapped fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the model declares no fields.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Wire names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    /// Convert a raw JSON object into a record.
    ///
    /// Missing keys and `null` values become [`FieldValue::Null`] without
    /// calling the field's parser. Keys that are not declared are ignored.
    pub fn parse(&self, raw: &Value) -> Result<Record, DeserializeError> {
        let object = raw.as_object().ok_or(DeserializeError::NotAnObject {
            model: self.model,
            found: json_kind(raw),
        })?;

        let mut record = Record::with_capacity(self.model, self.entries.len());
        for (name, parser) in &self.entries {
            let value = match object.get(*name) {
                None | Some(Value::Null) => FieldValue::Null,
                Some(value) => parser(value).map_err(|source| DeserializeError::Field {
                    model: self.model,
                    field: name,
                    source,
                })?,
            };
            record.insert(name, value);
        }
        Ok(record)
    }
}

impl fmt::Debug for ParserMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserMapping")
            .field("model", &self.model)
            .field("fields", &self.field_names().collect::<Vec<_>>())
            .finish()
    }
}
