use std::str::FromStr;

use bson::Bson;
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use thiserror::Error;

/// Value conversion failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CastError {
    /// The JSON value cannot be represented as the field type
    #[error("cannot cast {value} to {to}")]
    Json { value: String, to: FieldType },

    /// The stored value cannot be represented as the field type
    #[error("cannot read stored {value} as {to}")]
    Stored { value: String, to: FieldType },

    /// Free-form value could not be converted between JSON and BSON
    #[error("conversion failed: {0}")]
    Conversion(String),
}

/// Scalar field types known to the metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Integer,
    Double,
    Boolean,
    BigDecimal,
    BigInteger,
    /// RFC 3339 timestamps, stored as native dates
    Date,
    /// Free-form JSON, stored as-is
    Any,
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Double => "double",
            FieldType::Boolean => "boolean",
            FieldType::BigDecimal => "bigdecimal",
            FieldType::BigInteger => "biginteger",
            FieldType::Date => "date",
            FieldType::Any => "any",
        };
        f.write_str(name)
    }
}

/// A value cast to its field type, before it is laid out physically.
#[derive(Debug, Clone, PartialEq)]
pub enum Canonical {
    Null,
    Boolean(bool),
    Integer(i64),
    Double(f64),
    String(String),
    BigDecimal(Decimal),
    BigInteger(i128),
    Date(bson::DateTime),
    Any(Bson),
}

impl Canonical {
    pub fn is_null(&self) -> bool {
        matches!(self, Canonical::Null)
    }

    /// Physical form. Arbitrary-precision numbers have no native BSON type
    /// and are stored as their decimal string.
    pub fn into_bson(self) -> Bson {
        match self {
            Canonical::Null => Bson::Null,
            Canonical::Boolean(b) => Bson::Boolean(b),
            Canonical::Integer(n) => Bson::Int64(n),
            Canonical::Double(n) => Bson::Double(n),
            Canonical::String(s) => Bson::String(s),
            Canonical::BigDecimal(d) => Bson::String(d.to_string()),
            Canonical::BigInteger(n) => Bson::String(n.to_string()),
            Canonical::Date(d) => Bson::DateTime(d),
            Canonical::Any(b) => b,
        }
    }
}

impl FieldType {
    pub fn supports_equality(&self) -> bool {
        !matches!(self, FieldType::Any)
    }

    pub fn supports_ordering(&self) -> bool {
        !matches!(self, FieldType::Any | FieldType::Boolean)
    }

    /// Casts a raw JSON value to this type. JSON null casts to [`Canonical::Null`].
    pub fn cast(&self, value: &Value) -> Result<Canonical, CastError> {
        if value.is_null() {
            return Ok(Canonical::Null);
        }
        let cast = match self {
            FieldType::String => match value {
                Value::String(s) => Some(Canonical::String(s.clone())),
                Value::Number(n) => Some(Canonical::String(n.to_string())),
                Value::Bool(b) => Some(Canonical::String(b.to_string())),
                _ => None,
            },
            FieldType::Integer => match value {
                Value::Number(n) => n
                    .as_i64()
                    .or_else(|| n.as_f64().and_then(whole_i64)),
                Value::String(s) => s.trim().parse::<i64>().ok(),
                Value::Bool(b) => Some(i64::from(*b)),
                _ => None,
            }
            .map(Canonical::Integer),
            FieldType::Double => match value {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
                _ => None,
            }
            .map(Canonical::Double),
            FieldType::Boolean => match value {
                Value::Bool(b) => Some(*b),
                Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                    "true" => Some(true),
                    "false" => Some(false),
                    _ => None,
                },
                Value::Number(n) => n.as_f64().map(|f| f != 0.0),
                _ => None,
            }
            .map(Canonical::Boolean),
            FieldType::BigDecimal => match value {
                Value::Number(n) => Decimal::from_str(&n.to_string())
                    .or_else(|_| Decimal::from_scientific(&n.to_string()))
                    .ok(),
                Value::String(s) => Decimal::from_str(s.trim()).ok(),
                _ => None,
            }
            .map(Canonical::BigDecimal),
            FieldType::BigInteger => match value {
                Value::Number(n) => n
                    .as_i64()
                    .map(i128::from)
                    .or_else(|| n.as_u64().map(i128::from)),
                Value::String(s) => s.trim().parse::<i128>().ok(),
                _ => None,
            }
            .map(Canonical::BigInteger),
            FieldType::Date => match value {
                Value::String(s) => bson::DateTime::parse_rfc3339_str(s).ok(),
                Value::Number(n) => n.as_i64().map(bson::DateTime::from_millis),
                _ => None,
            }
            .map(Canonical::Date),
            FieldType::Any => {
                return bson::to_bson(value)
                    .map(Canonical::Any)
                    .map_err(|e| CastError::Conversion(e.to_string()));
            }
        };
        cast.ok_or_else(|| CastError::Json {
            value: value.to_string(),
            to: *self,
        })
    }

    /// Converts a stored value back to JSON.
    ///
    /// Arbitrary-precision numbers come back as JSON strings so no precision is lost.
    pub fn to_json(&self, value: &Bson) -> Result<Value, CastError> {
        if matches!(value, Bson::Null | Bson::Undefined) {
            return Ok(Value::Null);
        }
        let json = match self {
            FieldType::String => match value {
                Bson::String(s) => Some(Value::String(s.clone())),
                Bson::ObjectId(oid) => Some(Value::String(oid.to_hex())),
                Bson::Int32(n) => Some(Value::String(n.to_string())),
                Bson::Int64(n) => Some(Value::String(n.to_string())),
                Bson::Double(n) => Some(Value::String(n.to_string())),
                Bson::Boolean(b) => Some(Value::String(b.to_string())),
                _ => None,
            },
            FieldType::Integer => match value {
                Bson::Int32(n) => Some(Value::from(*n)),
                Bson::Int64(n) => Some(Value::from(*n)),
                Bson::Double(n) => whole_i64(*n).map(Value::from),
                Bson::String(s) => s.parse::<i64>().ok().map(Value::from),
                _ => None,
            },
            FieldType::Double => match value {
                Bson::Double(n) => Number::from_f64(*n).map(Value::Number),
                Bson::Int32(n) => Number::from_f64(f64::from(*n)).map(Value::Number),
                Bson::Int64(n) => Number::from_f64(*n as f64).map(Value::Number),
                Bson::String(s) => s
                    .parse::<f64>()
                    .ok()
                    .and_then(Number::from_f64)
                    .map(Value::Number),
                _ => None,
            },
            FieldType::Boolean => match value {
                Bson::Boolean(b) => Some(Value::Bool(*b)),
                _ => None,
            },
            FieldType::BigDecimal => match value {
                Bson::String(s) => Decimal::from_str(s).ok(),
                Bson::Double(n) => Decimal::from_f64(*n),
                Bson::Int32(n) => Some(Decimal::from(*n)),
                Bson::Int64(n) => Some(Decimal::from(*n)),
                _ => None,
            }
            .map(|d| Value::String(d.to_string())),
            FieldType::BigInteger => match value {
                Bson::String(s) => s.parse::<i128>().ok(),
                Bson::Int32(n) => Some(i128::from(*n)),
                Bson::Int64(n) => Some(i128::from(*n)),
                Bson::Double(n) if n.fract() == 0.0 => Decimal::from_f64(*n).and_then(|d| d.to_i128()),
                _ => None,
            }
            .map(|n| Value::String(n.to_string())),
            FieldType::Date => match value {
                Bson::DateTime(d) => d.try_to_rfc3339_string().ok().map(Value::String),
                Bson::String(s) => Some(Value::String(s.clone())),
                _ => None,
            },
            FieldType::Any => Some(value.clone().into_relaxed_extjson()),
        };
        json.ok_or_else(|| CastError::Stored {
            value: value.to_string(),
            to: *self,
        })
    }
}

/// `f` as an `i64` when it is whole and inside the `i64` range.
fn whole_i64(f: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, which is already out of range
    (f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64).then_some(f as i64)
}
