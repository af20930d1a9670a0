//! Serialized-object catalogs (`.marshal`).
//!
//! The payload is a bincode encoding of [`MarshalValue`], a self-describing
//! value tree. bincode itself is not self-describing, so catalogs cannot be
//! decoded straight into `serde_json::Value`; the tree is decoded first and
//! then converted.

use super::traits::{raw_from_json, CatalogParser, ParseError};
use super::CatalogFormat;
use crate::model::{RawCatalog, SchemaGeneration};
use bincode::Options;
use serde::de::{self, DeserializeSeed, Deserializer, EnumAccess, SeqAccess, VariantAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;

/// Upper bound on decoded payload size
const MARSHAL_BYTE_LIMIT: u64 = 512 * 1024 * 1024;

/// Arrays and maps nested deeper than this are rejected.
pub const MAX_MARSHAL_DEPTH: usize = 128;

fn codec() -> impl Options {
    bincode::DefaultOptions::new().with_limit(MARSHAL_BYTE_LIMIT)
}

fn too_deep() -> String {
    format!("nesting deeper than {MAX_MARSHAL_DEPTH} levels")
}

/// Self-describing value tree stored in `.marshal` files.
///
/// Decoding rejects trees with more than [`MAX_MARSHAL_DEPTH`] levels of
/// arrays and maps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MarshalValue {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Symbol(String),
    Array(Vec<MarshalValue>),
    Map(Vec<(MarshalValue, MarshalValue)>),
}

impl MarshalValue {
    fn into_json(self) -> Value {
        match self {
            Self::Nil => Value::Null,
            Self::Bool(b) => Value::Bool(b),
            Self::Int(i) => Value::Number(i.into()),
            Self::Float(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
            Self::Str(s) | Self::Symbol(s) => Value::String(s),
            Self::Array(items) => Value::Array(items.into_iter().map(Self::into_json).collect()),
            Self::Map(entries) => {
                let mut map = Map::with_capacity(entries.len());
                for (key, value) in entries {
                    map.insert(key.into_key(), value.into_json());
                }
                Value::Object(map)
            }
        }
    }

    fn into_key(self) -> String {
        match self {
            Self::Str(s) | Self::Symbol(s) => s,
            other => other.into_json().to_string(),
        }
    }

    fn from_json(value: &Value, remaining: usize) -> Result<Self, ParseError> {
        let nested = |remaining: usize| {
            remaining
                .checked_sub(1)
                .ok_or_else(|| ParseError::MarshalError(too_deep()))
        };
        Ok(match value {
            Value::Null => Self::Nil,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .or_else(|| n.as_f64().map(Self::Float))
                .unwrap_or(Self::Nil),
            Value::String(s) => Self::Str(s.clone()),
            Value::Array(items) => {
                let remaining = nested(remaining)?;
                Self::Array(
                    items
                        .iter()
                        .map(|item| Self::from_json(item, remaining))
                        .collect::<Result<_, _>>()?,
                )
            }
            Value::Object(map) => {
                let remaining = nested(remaining)?;
                Self::Map(
                    map.iter()
                        .map(|(k, v)| Ok((Self::Str(k.clone()), Self::from_json(v, remaining)?)))
                        .collect::<Result<_, ParseError>>()?,
                )
            }
        })
    }
}

/// Encode a JSON object graph in the `.marshal` format.
pub fn encode_marshal(value: &Value) -> Result<Vec<u8>, ParseError> {
    let tree = MarshalValue::from_json(value, MAX_MARSHAL_DEPTH)?;
    Ok(codec().serialize(&tree)?)
}

// ============================================================================
// Depth-limited decoding
// ============================================================================

const VARIANTS: &[&str] = &["Nil", "Bool", "Int", "Float", "Str", "Symbol", "Array", "Map"];

impl<'de> Deserialize<'de> for MarshalValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        ValueSeed {
            remaining: MAX_MARSHAL_DEPTH,
        }
        .deserialize(deserializer)
    }
}

enum Tag {
    Nil,
    Bool,
    Int,
    Float,
    Str,
    Symbol,
    Array,
    Map,
}

impl<'de> Deserialize<'de> for Tag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_identifier(TagVisitor)
    }
}

struct TagVisitor;

impl Visitor<'_> for TagVisitor {
    type Value = Tag;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a marshal value tag")
    }

    fn visit_u64<E: de::Error>(self, index: u64) -> Result<Tag, E> {
        Ok(match index {
            0 => Tag::Nil,
            1 => Tag::Bool,
            2 => Tag::Int,
            3 => Tag::Float,
            4 => Tag::Str,
            5 => Tag::Symbol,
            6 => Tag::Array,
            7 => Tag::Map,
            _ => {
                return Err(E::invalid_value(
                    de::Unexpected::Unsigned(index),
                    &"a tag below 8",
                ))
            }
        })
    }

    fn visit_str<E: de::Error>(self, name: &str) -> Result<Tag, E> {
        VARIANTS
            .iter()
            .position(|variant| *variant == name)
            .map_or_else(
                || Err(E::unknown_variant(name, VARIANTS)),
                |index| self.visit_u64(index as u64),
            )
    }
}

/// Decodes one value with `remaining` container levels left.
#[derive(Clone, Copy)]
struct ValueSeed {
    remaining: usize,
}

impl ValueSeed {
    fn nested<E: de::Error>(self) -> Result<Self, E> {
        self.remaining
            .checked_sub(1)
            .map(|remaining| Self { remaining })
            .ok_or_else(|| E::custom(too_deep()))
    }
}

impl<'de> DeserializeSeed<'de> for ValueSeed {
    type Value = MarshalValue;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<MarshalValue, D::Error> {
        deserializer.deserialize_enum("MarshalValue", VARIANTS, self)
    }
}

impl<'de> Visitor<'de> for ValueSeed {
    type Value = MarshalValue;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a marshal value")
    }

    fn visit_enum<A: EnumAccess<'de>>(self, data: A) -> Result<MarshalValue, A::Error> {
        let (tag, variant) = data.variant::<Tag>()?;
        Ok(match tag {
            Tag::Nil => {
                variant.unit_variant()?;
                MarshalValue::Nil
            }
            Tag::Bool => MarshalValue::Bool(variant.newtype_variant()?),
            Tag::Int => MarshalValue::Int(variant.newtype_variant()?),
            Tag::Float => MarshalValue::Float(variant.newtype_variant()?),
            Tag::Str => MarshalValue::Str(variant.newtype_variant()?),
            Tag::Symbol => MarshalValue::Symbol(variant.newtype_variant()?),
            Tag::Array => MarshalValue::Array(variant.newtype_variant_seed(ItemsSeed {
                element: self.nested::<A::Error>()?,
            })?),
            Tag::Map => MarshalValue::Map(variant.newtype_variant_seed(EntriesSeed {
                element: self.nested::<A::Error>()?,
            })?),
        })
    }
}

/// Decodes an array body; elements use `element`.
struct ItemsSeed {
    element: ValueSeed,
}

impl<'de> DeserializeSeed<'de> for ItemsSeed {
    type Value = Vec<MarshalValue>;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_seq(self)
    }
}

impl<'de> Visitor<'de> for ItemsSeed {
    type Value = Vec<MarshalValue>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a marshal array")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(4096));
        while let Some(item) = seq.next_element_seed(self.element)? {
            items.push(item);
        }
        Ok(items)
    }
}

/// Decodes a map body as a sequence of key/value pairs.
struct EntriesSeed {
    element: ValueSeed,
}

impl<'de> DeserializeSeed<'de> for EntriesSeed {
    type Value = Vec<(MarshalValue, MarshalValue)>;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_seq(self)
    }
}

impl<'de> Visitor<'de> for EntriesSeed {
    type Value = Vec<(MarshalValue, MarshalValue)>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a marshal map")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(4096));
        while let Some(entry) = seq.next_element_seed(PairSeed(self.element))? {
            entries.push(entry);
        }
        Ok(entries)
    }
}

struct PairSeed(ValueSeed);

impl<'de> DeserializeSeed<'de> for PairSeed {
    type Value = (MarshalValue, MarshalValue);

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_tuple(2, self)
    }
}

impl<'de> Visitor<'de> for PairSeed {
    type Value = (MarshalValue, MarshalValue);

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a key/value pair")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let key = seq
            .next_element_seed(self.0)?
            .ok_or_else(|| <A::Error as de::Error>::invalid_length(0, &self))?;
        let value = seq
            .next_element_seed(self.0)?
            .ok_or_else(|| <A::Error as de::Error>::invalid_length(1, &self))?;
        Ok((key, value))
    }
}

/// Marshal catalog parser
#[derive(Debug, Default, Clone, Copy)]
pub struct MarshalParser;

impl MarshalParser {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl CatalogParser for MarshalParser {
    fn parse_bytes(
        &self,
        content: &[u8],
        generation: SchemaGeneration,
    ) -> Result<RawCatalog, ParseError> {
        let tree: MarshalValue = codec().deserialize(content)?;
        raw_from_json(tree.into_json(), generation)
    }

    fn format(&self) -> CatalogFormat {
        CatalogFormat::Marshal
    }
}
