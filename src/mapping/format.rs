//! Named value formats applied by readers
//!
//! The registry is a constant table. Adding a format means adding a function
//! and a row to `FORMATS`; nothing registers formats at runtime.

use std::fmt::{Display, Write};

use chrono::format::{Item, StrftimeItems};

use crate::config::FormatConfig;
use crate::value::Value;

/// A pure transform from an attribute value to its displayed form
///
/// `args` carries per-read overrides, e.g. the record field `enum` renders.
pub type FormatFn = fn(value: &Value, args: &[Value], config: &FormatConfig) -> Value;

/// The format registry
pub const FORMATS: &[(&str, FormatFn)] = &[
    ("enum", enum_label as FormatFn),
    ("localize", localize as FormatFn),
];

/// Look up a format by key, keeping the key for diagnostics
#[must_use]
pub fn resolve(key: &str) -> Option<Format> {
    FORMATS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(name, function)| Format::new(*name, *function))
}

/// How a mapping formats the values it reads
#[derive(Clone, Copy)]
pub struct Format {
    key: &'static str,
    function: FormatFn,
}

impl Format {
    pub(crate) const fn new(key: &'static str, function: FormatFn) -> Self {
        Self { key, function }
    }

    /// Registry key, or `"custom"` for function formats
    #[must_use]
    pub const fn key(&self) -> &'static str {
        self.key
    }

    #[must_use]
    pub fn apply(&self, value: &Value, args: &[Value], config: &FormatConfig) -> Value {
        if value.is_null() {
            return Value::Null;
        }
        (self.function)(value, args, config)
    }
}

impl std::fmt::Debug for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Format").field(&self.key).finish()
    }
}

/// Render a related record by one of its fields
///
/// The field is the first argument when given, `config.enum_label` otherwise.
/// Scalars are already labels and pass through unchanged.
fn enum_label(value: &Value, args: &[Value], config: &FormatConfig) -> Value {
    let label = args
        .first()
        .and_then(Value::as_str)
        .unwrap_or(&config.enum_label);
    match value {
        Value::Record(record) => record.get(label).cloned().unwrap_or_default(),
        other => other.clone(),
    }
}

/// Whether chrono accepts `format` as a strftime string
#[must_use]
pub fn is_valid_strftime(format: &str) -> bool {
    StrftimeItems::new(format).all(|item| !matches!(item, Item::Error))
}

/// Render dates and date-times with the configured display formats
///
/// An explicit chrono format string may be passed as the first argument. An
/// invalid one is ignored in favour of the configured format.
fn localize(value: &Value, args: &[Value], config: &FormatConfig) -> Value {
    let explicit = args.first().and_then(Value::as_str).filter(|format| {
        let valid = is_valid_strftime(format);
        if !valid {
            log::warn!("Ignoring invalid date format {format:?}");
        }
        valid
    });
    let rendered = match value {
        Value::Date(date) => render(date.format(explicit.unwrap_or(&config.date_format))),
        Value::DateTime(dt) => render(dt.format(explicit.unwrap_or(&config.datetime_format))),
        other => return other.clone(),
    };
    rendered.unwrap_or_else(|| {
        log::warn!("Could not render {} with the configured format", value.kind());
        value.clone()
    })
}

fn render(formatted: impl Display) -> Option<Value> {
    let mut out = String::new();
    write!(out, "{formatted}").ok()?;
    Some(Value::Str(out))
}
