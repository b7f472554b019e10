//! Conversions between `Value` and Rust attribute types.

use chrono::{NaiveDate, NaiveDateTime};

use super::{Record, Value};
use crate::error::ConversionError;

/// Date formats accepted when a string is assigned to a date attribute
pub const DATE_INPUT_FORMATS: &[&str] = &[
    "%Y-%m-%d", // ISO format: 2023-01-15
    "%d-%m-%Y", // European: 15-01-2023
    "%d.%m.%Y", // German/Danish: 15.01.2023
    "%d/%m/%Y", // UK: 15/01/2023
    "%Y%m%d",   // Compact: 20230115
];

const DATETIME_INPUT_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse a date string with multiple format attempts
#[must_use]
pub fn parse_date_string(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
}

fn parse_datetime_string(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    DATETIME_INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .or_else(|| parse_date_string(s).and_then(|date| date.and_hms_opt(0, 0, 0)))
}

fn mismatch(expected: &'static str, value: &Value) -> ConversionError {
    let found = match value {
        Value::Str(s) => format!("{s:?}"),
        other => other.kind().to_string(),
    };
    ConversionError::new(expected, found)
}

macro_rules! impl_from_for_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::$variant(value.into())
                }
            }
        )*
    };
}

impl_from_for_value! {
    bool => Bool,
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    u8 => Int,
    u16 => Int,
    u32 => Int,
    f32 => Float,
    f64 => Float,
    String => Str,
    &str => Str,
    NaiveDate => Date,
    NaiveDateTime => DateTime,
    Record => Record,
}

/// Unsigned values above `i64::MAX` become floats
impl From<u64> for Value {
    fn from(value: u64) -> Self {
        i64::try_from(value).map_or(Self::Float(value as f64), Self::Int)
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        u64::try_from(value).map_or(Self::Null, Self::from)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

/// Coerce a `Value` into a Rust attribute type
///
/// String input is parsed where that makes sense, since flat parameters
/// usually arrive as text.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, ConversionError>;
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        Ok(value)
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Str(s) => Ok(s),
            Value::Null | Value::List(_) | Value::Record(_) => Err(mismatch("string", &value)),
            other => Ok(other.to_string()),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match &value {
            Value::Bool(b) => Ok(*b),
            Value::Int(0) => Ok(false),
            Value::Int(1) => Ok(true),
            Value::Str(s) => match s.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "t" | "yes" | "on" => Ok(true),
                "0" | "false" | "f" | "no" | "off" => Ok(false),
                _ => Err(mismatch("boolean", &value)),
            },
            _ => Err(mismatch("boolean", &value)),
        }
    }
}

// Every float in this range converts to i64 without saturating
const I64_LOWER: f64 = i64::MIN as f64;
const I64_UPPER: f64 = i64::MAX as f64;

fn integer_from_value(value: &Value) -> Result<i64, ConversionError> {
    match value {
        Value::Int(i) => Ok(*i),
        Value::Float(x) if x.fract() == 0.0 && (I64_LOWER..I64_UPPER).contains(x) => {
            Ok(*x as i64)
        }
        Value::Str(s) => s.trim().parse().map_err(|_| mismatch("integer", value)),
        _ => Err(mismatch("integer", value)),
    }
}

macro_rules! impl_from_value_for_int {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self, ConversionError> {
                    let wide = integer_from_value(&value)?;
                    <$ty>::try_from(wide).map_err(|_| mismatch(stringify!($ty), &value))
                }
            }
        )*
    };
}

impl_from_value_for_int!(i8, i16, i32, i64, u8, u16, u32, u64, usize);

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match &value {
            Value::Float(x) => Ok(*x),
            Value::Int(i) => Ok(*i as f64),
            Value::Str(s) => s.trim().parse().map_err(|_| mismatch("float", &value)),
            _ => Err(mismatch("float", &value)),
        }
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        f64::from_value(value).map(|x| x as f32)
    }
}

impl FromValue for NaiveDate {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match &value {
            Value::Date(date) => Ok(*date),
            Value::DateTime(dt) => Ok(dt.date()),
            Value::Str(s) => parse_date_string(s).ok_or_else(|| mismatch("date", &value)),
            _ => Err(mismatch("date", &value)),
        }
    }
}

impl FromValue for NaiveDateTime {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match &value {
            Value::DateTime(dt) => Ok(*dt),
            Value::Date(date) => date
                .and_hms_opt(0, 0, 0)
                .ok_or_else(|| mismatch("datetime", &value)),
            Value::Str(s) => parse_datetime_string(s).ok_or_else(|| mismatch("datetime", &value)),
            _ => Err(mismatch("datetime", &value)),
        }
    }
}

impl FromValue for Record {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Record(record) => Ok(record),
            other => Err(mismatch("record", &other)),
        }
    }
}

/// Null and blank strings become `None`
impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        if value.is_blank() {
            Ok(None)
        } else {
            T::from_value(value).map(Some)
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            Value::Null => Ok(Vec::new()),
            other => Err(mismatch("list", &other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_input_is_parsed() {
        assert_eq!(i32::from_value(Value::from(" 42 ")), Ok(42));
        assert_eq!(f64::from_value(Value::from("1.25")), Ok(1.25));
        assert_eq!(bool::from_value(Value::from("on")), Ok(true));
        assert_eq!(bool::from_value(Value::from("0")), Ok(false));
        assert_eq!(
            NaiveDate::from_value(Value::from("15.01.2023")),
            Ok(NaiveDate::from_ymd_opt(2023, 1, 15).unwrap())
        );
    }

    #[test]
    fn test_mismatch_reports_input() {
        let err = i32::from_value(Value::from("abc")).unwrap_err();
        assert_eq!(err.expected, "integer");
        assert_eq!(err.found, "\"abc\"");

        let err = u8::from_value(Value::Int(300)).unwrap_err();
        assert_eq!(err.expected, "u8");

        assert!(String::from_value(Value::Null).is_err());
    }

    #[test]
    fn test_float_to_integer_is_range_checked() {
        assert_eq!(i64::from_value(Value::Float(42.0)), Ok(42));
        assert_eq!(i64::from_value(Value::Float(-9.0e18)), Ok(-9_000_000_000_000_000_000));
        assert!(i64::from_value(Value::Float(1e30)).is_err());
        assert!(i64::from_value(Value::Float(-1e30)).is_err());
        assert!(i64::from_value(Value::Float(f64::NAN)).is_err());
        assert!(i32::from_value(Value::Float(1.5)).is_err());
    }

    #[test]
    fn test_unsigned_values() {
        assert_eq!(Value::from(7_u64), Value::Int(7));
        assert_eq!(Value::from(3_usize), Value::Int(3));
        assert_eq!(Value::from(u64::MAX), Value::Float(u64::MAX as f64));
        assert_eq!(u64::from_value(Value::from(7_u64)), Ok(7));
        assert!(u64::from_value(Value::Int(-1)).is_err());
    }

    #[test]
    fn test_optional_values() {
        assert_eq!(Option::<String>::from_value(Value::Null), Ok(None));
        assert_eq!(Option::<i32>::from_value(Value::from("")), Ok(None));
        assert_eq!(Option::<i32>::from_value(Value::from("7")), Ok(Some(7)));
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::Str("x".to_string()));
    }

    #[test]
    fn test_lists() {
        let value = Value::from(vec![1, 2, 3]);
        assert_eq!(Vec::<i64>::from_value(value), Ok(vec![1, 2, 3]));
        assert_eq!(Vec::<i64>::from_value(Value::Null), Ok(Vec::new()));
    }
}
