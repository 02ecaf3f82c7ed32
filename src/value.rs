//! Field values exchanged between generated code and a renderer.
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{PrototypeError, Result};

/// Date kind used by `#[prototype]` fields named `Date`.
pub type Date = DateTime<Utc>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Null,
    Bool(bool),
    Text(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Decimal(Decimal),
    Date(Date),
}

impl Value {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Text(_) => "text",
            Value::Int(_) => "int",
            Value::UInt(_) => "uint",
            Value::Float(_) => "float",
            Value::Decimal(_) => "decimal",
            Value::Date(_) => "date",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Text(v) => f.write_str(v),
            Value::Int(v) => write!(f, "{v}"),
            Value::UInt(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Decimal(v) => write!(f, "{v}"),
            Value::Date(v) => f.write_str(&v.to_rfc3339()),
        }
    }
}

/// Conversion between a field type and [`Value`].
pub trait FieldValue: Sized {
    const TYPE_NAME: &'static str;

    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Result<Self>;
}

fn mismatch<T: FieldValue>(found: &Value) -> PrototypeError {
    PrototypeError::TypeMismatch {
        expected: T::TYPE_NAME,
        found: found.kind_name(),
    }
}

impl FieldValue for bool {
    const TYPE_NAME: &'static str = "bool";

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bool(v) => Ok(v),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl FieldValue for String {
    const TYPE_NAME: &'static str = "String";

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Text(v) => Ok(v),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

// 整数：超出目标范围同样视为类型不匹配
macro_rules! integer_field_value {
    ($variant:ident as $wide:ty: $($ty:ty),*) => {$(
        impl FieldValue for $ty {
            const TYPE_NAME: &'static str = stringify!($ty);

            fn to_value(&self) -> Value {
                Value::$variant(*self as $wide)
            }

            fn from_value(value: Value) -> Result<Self> {
                let converted = match &value {
                    Value::Int(v) => <$ty>::try_from(*v).ok(),
                    Value::UInt(v) => <$ty>::try_from(*v).ok(),
                    Value::Text(v) => v.trim().parse::<$ty>().ok(),
                    _ => None,
                };
                converted.ok_or_else(|| mismatch::<Self>(&value))
            }
        }
    )*};
}

integer_field_value!(Int as i64: i8, i16, i32, i64, isize);
integer_field_value!(UInt as u64: u8, u16, u32, u64, usize);

macro_rules! float_field_value {
    ($($ty:ty),*) => {$(
        impl FieldValue for $ty {
            const TYPE_NAME: &'static str = stringify!($ty);

            fn to_value(&self) -> Value {
                Value::Float(f64::from(*self))
            }

            fn from_value(value: Value) -> Result<Self> {
                match value {
                    Value::Float(v) => Ok(v as $ty),
                    Value::Int(v) => Ok(v as $ty),
                    Value::UInt(v) => Ok(v as $ty),
                    Value::Text(ref v) => v.trim().parse::<$ty>().map_err(|_| mismatch::<Self>(&value)),
                    other => Err(mismatch::<Self>(&other)),
                }
            }
        }
    )*};
}

float_field_value!(f32, f64);

impl FieldValue for Decimal {
    const TYPE_NAME: &'static str = "Decimal";

    fn to_value(&self) -> Value {
        Value::Decimal(*self)
    }

    fn from_value(value: Value) -> Result<Self> {
        let converted = match &value {
            Value::Decimal(v) => Some(*v),
            Value::Int(v) => Some(Decimal::from(*v)),
            Value::UInt(v) => Some(Decimal::from(*v)),
            Value::Float(v) => Decimal::try_from(*v).ok(),
            Value::Text(v) => v.trim().parse::<Decimal>().ok(),
            _ => None,
        };
        converted.ok_or_else(|| mismatch::<Self>(&value))
    }
}

impl FieldValue for Date {
    const TYPE_NAME: &'static str = "Date";

    fn to_value(&self) -> Value {
        Value::Date(*self)
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Date(v) => Ok(v),
            Value::Text(ref v) => DateTime::parse_from_rfc3339(v)
                .map(|d| d.with_timezone(&Utc))
                .map_err(|_| mismatch::<Self>(&value)),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl FieldValue for NaiveDateTime {
    const TYPE_NAME: &'static str = "NaiveDateTime";

    fn to_value(&self) -> Value {
        Value::Date(self.and_utc())
    }

    fn from_value(value: Value) -> Result<Self> {
        Date::from_value(value).map(|d| d.naive_utc())
    }
}

impl FieldValue for NaiveDate {
    const TYPE_NAME: &'static str = "NaiveDate";

    fn to_value(&self) -> Value {
        self.and_hms_opt(0, 0, 0)
            .map(|d| Value::Date(d.and_utc()))
            .unwrap_or(Value::Null)
    }

    fn from_value(value: Value) -> Result<Self> {
        Date::from_value(value).map(|d| d.date_naive())
    }
}

/// `Null` stands for an absent value.
impl<T: FieldValue> FieldValue for Option<T> {
    const TYPE_NAME: &'static str = T::TYPE_NAME;

    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}
