//! Mapping declarations
//!
//! A `MappingFactory` is the immutable description of one mapping, created
//! once when a schema is declared and shared by every mapper built from it.

use std::sync::Arc;

use crate::error::{MapperError, Result};
use crate::mapper::dispatch::COERCION_PROBES;
use crate::mapping::format::{self, Format, FormatFn};
use crate::mapping::reader::{FnReader, ReadStrategy};
use crate::mapping::writer::{FnWriter, Multiparam, WriteStrategy};
use crate::value::Value;

/// Option names, reserved so that they never double as mapping names
pub const OPTION_KEYS: &[&str] = &["reader", "writer", "format", "multiparam"];

/// Which reader a mapping uses
pub enum ReaderOption<T> {
    /// Read the target attribute, formatted if a format is declared
    Default,
    /// The mapping is write-only
    Disabled,
    Custom(Arc<dyn ReadStrategy<T>>),
}

/// Which writer a mapping uses
pub enum WriterOption<T> {
    /// Assign the target attribute
    Default,
    /// The mapping is read-only
    Disabled,
    Custom(Arc<dyn WriteStrategy<T>>),
}

impl<T> Clone for ReaderOption<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Default => Self::Default,
            Self::Disabled => Self::Disabled,
            Self::Custom(strategy) => Self::Custom(Arc::clone(strategy)),
        }
    }
}

impl<T> Clone for WriterOption<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Default => Self::Default,
            Self::Disabled => Self::Disabled,
            Self::Custom(strategy) => Self::Custom(Arc::clone(strategy)),
        }
    }
}

/// A format named by registry key or given as a function
#[derive(Debug, Clone)]
pub enum FormatSpec {
    Named(String),
    Function(FormatFn),
}

/// Options for a mapping declaration
///
/// ```rust
/// use field_mapper::{AttributeBag, MappingOptions, Multiparam};
///
/// let born_on = MappingOptions::<AttributeBag>::new().with_multiparam(Multiparam::Date);
/// let category = MappingOptions::<AttributeBag>::new().with_format("enum");
/// ```
pub struct MappingOptions<T> {
    reader: ReaderOption<T>,
    writer: WriterOption<T>,
    format: Option<FormatSpec>,
    multiparam: Option<Multiparam>,
}

impl<T> Default for MappingOptions<T> {
    fn default() -> Self {
        Self {
            reader: ReaderOption::Default,
            writer: WriterOption::Default,
            format: None,
            multiparam: None,
        }
    }
}

impl<T> Clone for MappingOptions<T> {
    fn clone(&self) -> Self {
        Self {
            reader: self.reader.clone(),
            writer: self.writer.clone(),
            format: self.format.clone(),
            multiparam: self.multiparam,
        }
    }
}

impl<T: 'static> MappingOptions<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read through a custom strategy
    #[must_use]
    pub fn with_reader(mut self, reader: impl ReadStrategy<T> + 'static) -> Self {
        self.reader = ReaderOption::Custom(Arc::new(reader));
        self
    }

    /// Read through a closure over the target
    #[must_use]
    pub fn read_with<F>(self, read: F) -> Self
    where
        F: Fn(&T) -> Result<Value> + Send + Sync + 'static,
    {
        self.with_reader(FnReader(read))
    }

    #[must_use]
    pub fn without_reader(mut self) -> Self {
        self.reader = ReaderOption::Disabled;
        self
    }

    /// Write through a custom strategy
    #[must_use]
    pub fn with_writer(mut self, writer: impl WriteStrategy<T> + 'static) -> Self {
        self.writer = WriterOption::Custom(Arc::new(writer));
        self
    }

    /// Write through a closure over the target
    #[must_use]
    pub fn write_with<F>(self, write: F) -> Self
    where
        F: Fn(&mut T, Value) -> Result<()> + Send + Sync + 'static,
    {
        self.with_writer(FnWriter(write))
    }

    #[must_use]
    pub fn without_writer(mut self) -> Self {
        self.writer = WriterOption::Disabled;
        self
    }

    /// Format read values with a format from the registry
    #[must_use]
    pub fn with_format(mut self, key: impl Into<String>) -> Self {
        self.format = Some(FormatSpec::Named(key.into()));
        self
    }

    /// Format read values with a custom function
    #[must_use]
    pub fn with_format_fn(mut self, format: FormatFn) -> Self {
        self.format = Some(FormatSpec::Function(format));
        self
    }

    /// Assemble written values from numbered fragments
    #[must_use]
    pub fn with_multiparam(mut self, multiparam: Multiparam) -> Self {
        self.multiparam = Some(multiparam);
        self
    }
}

/// The name under which a mapping is declared, and the attribute it targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingName {
    pub name: String,
    pub target_attribute: String,
}

impl From<&str> for MappingName {
    fn from(name: &str) -> Self {
        Self {
            name: name.to_string(),
            target_attribute: name.to_string(),
        }
    }
}

impl From<String> for MappingName {
    fn from(name: String) -> Self {
        Self {
            target_attribute: name.clone(),
            name,
        }
    }
}

impl From<(&str, &str)> for MappingName {
    fn from((name, target_attribute): (&str, &str)) -> Self {
        Self {
            name: name.to_string(),
            target_attribute: target_attribute.to_string(),
        }
    }
}

impl From<(String, String)> for MappingName {
    fn from((name, target_attribute): (String, String)) -> Self {
        Self {
            name,
            target_attribute,
        }
    }
}

/// Immutable description of one mapping
pub struct MappingFactory<T> {
    name: String,
    target_attribute: String,
    reader: ReaderOption<T>,
    writer: WriterOption<T>,
    format: Option<Format>,
    multiparam: Option<Multiparam>,
}

impl<T> MappingFactory<T> {
    /// Validate a declaration and create its factory
    pub fn new(
        name: impl Into<String>,
        target_attribute: impl Into<String>,
        options: MappingOptions<T>,
    ) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;
        let target_attribute = target_attribute.into();
        if target_attribute.is_empty() {
            return Err(MapperError::InvalidName(format!(
                "mapping `{name}` has an empty target attribute"
            )));
        }

        let format = match options.format {
            Some(FormatSpec::Named(key)) => {
                Some(format::resolve(&key).ok_or(MapperError::UnknownFormat(key))?)
            }
            Some(FormatSpec::Function(function)) => Some(Format::new("custom", function)),
            None => None,
        };
        if format.is_some() && !matches!(options.reader, ReaderOption::Default) {
            log::warn!(
                "Mapping {name} declares a format and a custom reader; the format is ignored"
            );
        }

        Ok(Self {
            name,
            target_attribute,
            reader: options.reader,
            writer: options.writer,
            format,
            multiparam: options.multiparam,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn target_attribute(&self) -> &str {
        &self.target_attribute
    }

    #[must_use]
    pub const fn reader(&self) -> &ReaderOption<T> {
        &self.reader
    }

    #[must_use]
    pub const fn writer(&self) -> &WriterOption<T> {
        &self.writer
    }

    #[must_use]
    pub const fn format(&self) -> Option<Format> {
        self.format
    }

    #[must_use]
    pub const fn multiparam(&self) -> Option<Multiparam> {
        self.multiparam
    }

    /// Whether reads and writes go straight to `target_attribute`
    #[must_use]
    pub const fn uses_default_strategies(&self) -> bool {
        matches!(self.reader, ReaderOption::Default | ReaderOption::Disabled)
            && matches!(self.writer, WriterOption::Default | WriterOption::Disabled)
    }
}

impl<T> std::fmt::Debug for MappingFactory<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappingFactory")
            .field("name", &self.name)
            .field("target_attribute", &self.target_attribute)
            .field("format", &self.format)
            .field("multiparam", &self.multiparam)
            .finish_non_exhaustive()
    }
}

fn validate_name(name: &str) -> Result<()> {
    if OPTION_KEYS.contains(&name) || COERCION_PROBES.contains(&name) {
        return Err(MapperError::ReservedName(name.to_string()));
    }
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '.');
    if !valid {
        return Err(MapperError::InvalidName(format!("`{name}` is not a valid mapping name")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::AttributeBag;

    type Options = MappingOptions<AttributeBag>;

    #[test]
    fn test_mapping_names() {
        assert_eq!(
            MappingName::from("email"),
            MappingName {
                name: "email".to_string(),
                target_attribute: "email".to_string()
            }
        );
        assert_eq!(MappingName::from(("surname", "last_name")).target_attribute, "last_name");
    }

    #[test]
    fn test_reserved_names_are_rejected() {
        for name in ["format", "reader", "to_ary"] {
            let err = MappingFactory::new(name, "title", Options::new()).unwrap_err();
            assert!(matches!(err, MapperError::ReservedName(ref n) if n == name));
        }

        let err = MappingFactory::new("born_on(1i)", "born_on", Options::new()).unwrap_err();
        assert!(matches!(err, MapperError::InvalidName(_)));
        let err = MappingFactory::new("email=", "email", Options::new()).unwrap_err();
        assert!(matches!(err, MapperError::InvalidName(_)));
    }

    #[test]
    fn test_format_is_resolved_at_declaration() {
        let options = Options::new().with_format("enum");
        let factory = MappingFactory::new("category", "category", options).unwrap();
        assert_eq!(factory.format().map(|format| format.key()), Some("enum"));

        let options = Options::new().with_format("shout");
        let err = MappingFactory::new("category", "category", options).unwrap_err();
        assert!(matches!(err, MapperError::UnknownFormat(ref key) if key == "shout"));
    }

    #[test]
    fn test_default_strategies() {
        let factory = MappingFactory::new("title", "title", Options::new()).unwrap();
        assert!(factory.uses_default_strategies());

        let factory = MappingFactory::new(
            "title",
            "title",
            Options::new().read_with(|_| Ok(Value::from("fixed"))),
        )
        .unwrap();
        assert!(!factory.uses_default_strategies());
    }
}
