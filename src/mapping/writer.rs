//! Writer strategies and multiparam assembly

use std::sync::Arc;

use chrono::NaiveDate;
use itertools::Itertools;

use super::Mapping;
use crate::error::{MapperError, Result};
use crate::target::Target;
use crate::value::{FromValue, Params, Value};

/// A custom way of writing a mapping's value onto the target
///
/// Used for composite attributes and for writing through to an associated
/// object instead of the target itself.
pub trait WriteStrategy<T>: Send + Sync {
    fn write(&self, mapping: &Mapping<T>, target: &mut T, value: Value) -> Result<()>;
}

/// Adapts a closure into a `WriteStrategy`
pub struct FnWriter<F>(pub F);

impl<T, F> WriteStrategy<T> for FnWriter<F>
where
    F: Fn(&mut T, Value) -> Result<()> + Send + Sync,
{
    fn write(&self, _mapping: &Mapping<T>, target: &mut T, value: Value) -> Result<()> {
        (self.0)(target, value)
    }
}

/// The writer a live mapping uses
pub enum Writer<T> {
    /// Assign the target attribute directly
    Basic,
    Custom(Arc<dyn WriteStrategy<T>>),
}

impl<T: Target> Writer<T> {
    pub fn write(&self, mapping: &Mapping<T>, target: &mut T, value: Value) -> Result<()> {
        match self {
            Self::Basic => target.set_attribute(mapping.target_attribute(), value),
            Self::Custom(strategy) => strategy.write(mapping, target, value),
        }
    }
}

impl<T> Clone for Writer<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Basic => Self::Basic,
            Self::Custom(strategy) => Self::Custom(Arc::clone(strategy)),
        }
    }
}

impl<T> std::fmt::Debug for Writer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Basic => f.write_str("Basic"),
            Self::Custom(_) => f.write_str("Custom"),
        }
    }
}

/// Highest fragment index accepted in a multiparam key
pub const MAX_FRAGMENTS: usize = 16;

/// Assembles the parts of a composite value
pub type AssembleFn = fn(parts: &[Value]) -> std::result::Result<Value, String>;

/// A value submitted as several numbered fragments
///
/// A `born_on` mapping reads `born_on(1i)`, `born_on(2i)` and `born_on(3i)`
/// and assembles them into one date. A trailing `i` or `f` on the fragment
/// index coerces the fragment to an integer or float.
#[derive(Debug, Clone, Copy)]
pub enum Multiparam {
    /// year, month, day
    Date,
    /// year, month, day, hour, minute, second; the time parts default to 0
    DateTime,
    Custom(AssembleFn),
}

impl Multiparam {
    /// Assemble the value for `full_name` out of `params`
    ///
    /// Returns `None` when `params` holds no fragments for the name. Fragments
    /// that are all blank assemble to `Value::Null`. An index above
    /// `MAX_FRAGMENTS` is rejected.
    pub fn extract(&self, full_name: &str, params: &Params) -> Result<Option<Value>> {
        let fragments: Vec<(usize, Value)> = params
            .iter()
            .filter_map(|(key, value)| {
                let (index, cast) = parse_fragment_key(key, full_name)?;
                Some((index, typecast(value, cast)))
            })
            .sorted_by_key(|(index, _)| *index)
            .collect();

        let Some(&(last, _)) = fragments.last() else {
            return Ok(None);
        };
        if last > MAX_FRAGMENTS {
            return Err(MapperError::Multiparam {
                name: full_name.to_string(),
                reason: format!("fragment index {last} exceeds {MAX_FRAGMENTS}"),
            });
        }

        let mut parts = vec![Value::Null; last];
        for (index, value) in fragments {
            parts[index - 1] = value;
        }

        if parts.iter().all(Value::is_blank) {
            log::trace!("All fragments of {full_name} are blank");
            return Ok(Some(Value::Null));
        }

        let value = self.assemble(&parts).map_err(|reason| MapperError::Multiparam {
            name: full_name.to_string(),
            reason,
        })?;
        log::debug!("Assembled {full_name} from {} fragments", parts.len());
        Ok(Some(value))
    }

    fn assemble(&self, parts: &[Value]) -> std::result::Result<Value, String> {
        match self {
            Self::Date => assemble_date(parts).map(Value::Date),
            Self::DateTime => {
                let date = assemble_date(parts)?;
                let hour = part(parts, 3, "hour", Some(0))?;
                let minute = part(parts, 4, "minute", Some(0))?;
                let second = part(parts, 5, "second", Some(0))?;
                date.and_hms_opt(hour, minute, second)
                    .map(Value::DateTime)
                    .ok_or_else(|| format!("{hour:02}:{minute:02}:{second:02} is not a valid time"))
            }
            Self::Custom(assemble) => assemble(parts),
        }
    }
}

fn assemble_date(parts: &[Value]) -> std::result::Result<NaiveDate, String> {
    let year = part(parts, 0, "year", None)?;
    let month = part(parts, 1, "month", None)?;
    let day = part(parts, 2, "day", None)?;
    let year = i32::try_from(year).map_err(|_| format!("year {year} is out of range"))?;
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| format!("{year:04}-{month:02}-{day:02} is not a valid date"))
}

/// Read one numeric part, falling back to `default` when it is missing or blank
fn part(
    parts: &[Value],
    position: usize,
    label: &str,
    default: Option<u32>,
) -> std::result::Result<u32, String> {
    match parts.get(position) {
        Some(value) if !value.is_blank() => {
            u32::from_value(value.clone()).map_err(|err| format!("{label} part: {err}"))
        }
        _ => default.ok_or_else(|| format!("{label} part is missing")),
    }
}

/// Split `name(3i)` into its index and cast marker
fn parse_fragment_key(key: &str, full_name: &str) -> Option<(usize, Option<char>)> {
    let inner = key
        .strip_prefix(full_name)?
        .strip_prefix('(')?
        .strip_suffix(')')?;
    let (digits, cast) = match inner.chars().last()? {
        c @ ('i' | 'f') => (&inner[..inner.len() - 1], Some(c)),
        _ => (inner, None),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits
        .parse::<usize>()
        .ok()
        .filter(|index| *index > 0)
        .map(|index| (index, cast))
}

fn typecast(value: &Value, cast: Option<char>) -> Value {
    if value.is_blank() {
        return Value::Null;
    }
    let converted = match cast {
        Some('i') => i64::from_value(value.clone()).ok().map(Value::Int),
        Some('f') => f64::from_value(value.clone()).ok().map(Value::Float),
        _ => None,
    };
    converted.unwrap_or_else(|| value.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params;

    #[test]
    fn test_parse_fragment_key() {
        assert_eq!(parse_fragment_key("born_on(1i)", "born_on"), Some((1, Some('i'))));
        assert_eq!(parse_fragment_key("born_on(12)", "born_on"), Some((12, None)));
        assert_eq!(parse_fragment_key("born_on(2f)", "born_on"), Some((2, Some('f'))));
        assert_eq!(parse_fragment_key("born_on", "born_on"), None);
        assert_eq!(parse_fragment_key("born_on(0)", "born_on"), None);
        assert_eq!(parse_fragment_key("born_on(x)", "born_on"), None);
        assert_eq!(parse_fragment_key("born_on_at(1)", "born_on"), None);
    }

    #[test]
    fn test_date_from_fragments() {
        let params = params! {
            "born_on(3i)" => "15",
            "born_on(1i)" => "2023",
            "born_on(2i)" => "1",
        };
        let value = Multiparam::Date.extract("born_on", &params).unwrap();
        assert_eq!(value, Some(Value::Date(NaiveDate::from_ymd_opt(2023, 1, 15).unwrap())));
    }

    #[test]
    fn test_datetime_defaults_time_parts() {
        let params = params! { "at(1i)" => 2023, "at(2i)" => 6, "at(3i)" => 1, "at(4i)" => 9 };
        let value = Multiparam::DateTime.extract("at", &params).unwrap().unwrap();
        let expected = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap().and_hms_opt(9, 0, 0).unwrap();
        assert_eq!(value, Value::DateTime(expected));
    }

    #[test]
    fn test_blank_and_missing_fragments() {
        let params = params! { "born_on(1i)" => "", "born_on(2i)" => "", "born_on(3i)" => "" };
        assert_eq!(Multiparam::Date.extract("born_on", &params).unwrap(), Some(Value::Null));

        let params = params! { "born_on" => "2023-01-15" };
        assert_eq!(Multiparam::Date.extract("born_on", &params).unwrap(), None);
    }

    #[test]
    fn test_invalid_date_is_reported() {
        let params = params! { "born_on(1i)" => 2023, "born_on(2i)" => 2, "born_on(3i)" => 30 };
        let err = Multiparam::Date.extract("born_on", &params).unwrap_err();
        assert!(matches!(err, MapperError::Multiparam { ref name, .. } if name == "born_on"));

        let params = params! { "born_on(1i)" => 2023, "born_on(3i)" => 30 };
        let err = Multiparam::Date.extract("born_on", &params).unwrap_err();
        assert!(err.to_string().contains("month part is missing"));
    }

    #[test]
    fn test_fragment_index_is_bounded() {
        let params = params! { "born_on(18446744073709551615i)" => "1" };
        let err = Multiparam::Date.extract("born_on", &params).unwrap_err();
        assert!(err.to_string().contains("exceeds 16"));

        let params = params! { "born_on(100000000i)" => "1", "born_on(1i)" => "2023" };
        assert!(Multiparam::Date.extract("born_on", &params).is_err());

        let params = params! { "code(16)" => "x" };
        let value = Multiparam::Custom(|parts| Ok(Value::Int(parts.len() as i64)))
            .extract("code", &params)
            .unwrap();
        assert_eq!(value, Some(Value::Int(16)));
    }

    #[test]
    fn test_custom_assembly() {
        fn join(parts: &[Value]) -> std::result::Result<Value, String> {
            Ok(Value::Str(parts.iter().map(ToString::to_string).join("-")))
        }
        let params = params! { "phone(1)" => "555", "phone(2)" => "0100" };
        let value = Multiparam::Custom(join).extract("phone", &params).unwrap();
        assert_eq!(value, Some(Value::from("555-0100")));
    }
}
