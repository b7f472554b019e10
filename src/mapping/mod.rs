//! Live mappings bound to a mapper
//!
//! A `Mapping` is what a `MappingFactory` produces for one mapper. It knows
//! the external field name, which attribute of the target it stands for, and
//! how to move a value between a flat parameter set and that attribute.

pub mod format;
pub mod reader;
pub mod writer;

use std::sync::Arc;

use crate::config::MapperConfig;
use crate::error::Result;
use crate::schema::{MappingFactory, ReaderOption, WriterOption};
use crate::target::Target;
use crate::value::{Params, Value};

pub use format::{Format, FormatFn};
pub use reader::{FnReader, ReadStrategy, Reader};
pub use writer::{AssembleFn, FnWriter, Multiparam, WriteStrategy, Writer, MAX_FRAGMENTS};

/// A mapping between one external field and one target attribute
pub struct Mapping<T> {
    factory: Arc<MappingFactory<T>>,
    full_name: String,
    config: Arc<MapperConfig>,
    reader: Option<Reader<T>>,
    writer: Option<Writer<T>>,
}

impl<T> Mapping<T> {
    pub(crate) fn new(factory: Arc<MappingFactory<T>>, config: Arc<MapperConfig>) -> Self {
        let reader = match factory.reader() {
            ReaderOption::Default => Some(
                factory
                    .format()
                    .map_or(Reader::Basic, Reader::Formatted),
            ),
            ReaderOption::Custom(strategy) => Some(Reader::Custom(Arc::clone(strategy))),
            ReaderOption::Disabled => None,
        };
        let writer = match factory.writer() {
            WriterOption::Default => Some(Writer::Basic),
            WriterOption::Custom(strategy) => Some(Writer::Custom(Arc::clone(strategy))),
            WriterOption::Disabled => None,
        };

        Self {
            full_name: config.full_name(factory.name()),
            factory,
            config,
            reader,
            writer,
        }
    }

    /// Declared name, without suffix
    #[must_use]
    pub fn name(&self) -> &str {
        self.factory.name()
    }

    /// Name of the field in the flat parameter set
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    #[must_use]
    pub fn target_attribute(&self) -> &str {
        self.factory.target_attribute()
    }

    #[must_use]
    pub fn factory(&self) -> &Arc<MappingFactory<T>> {
        &self.factory
    }

    #[must_use]
    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    #[must_use]
    pub fn multiparam(&self) -> Option<Multiparam> {
        self.factory.multiparam()
    }

    #[must_use]
    pub const fn reader(&self) -> Option<&Reader<T>> {
        self.reader.as_ref()
    }

    #[must_use]
    pub const fn writer(&self) -> Option<&Writer<T>> {
        self.writer.as_ref()
    }
}

impl<T: Target> Mapping<T> {
    /// Read the current value of the attribute
    pub fn read(&self, target: &T) -> Result<Value> {
        self.read_with(target, &[])
    }

    /// Read with arguments for the format, e.g. the record field `enum` renders
    ///
    /// A mapping without reader reads as `Value::Null`.
    pub fn read_with(&self, target: &T, args: &[Value]) -> Result<Value> {
        match &self.reader {
            Some(reader) => reader.read(self, target, args),
            None => Ok(Value::Null),
        }
    }

    /// Write a single value; a mapping without writer ignores it
    pub fn write(&self, target: &mut T, value: Value) -> Result<()> {
        match &self.writer {
            Some(writer) => writer.write(self, target, value),
            None => Ok(()),
        }
    }

    /// Write this mapping's value out of a flat parameter set
    ///
    /// Nothing happens unless `params` contains the full name (or, for
    /// multiparam mappings, fragments of it). A present `Value::Null` is written.
    pub fn write_from_params(&self, target: &mut T, params: &Params) -> Result<()> {
        if self.writer.is_none() {
            return Ok(());
        }

        let assembled = match self.multiparam() {
            Some(multiparam) => multiparam.extract(&self.full_name, params)?,
            None => None,
        };
        let value = match assembled {
            Some(value) => value,
            None => match params.get(&self.full_name) {
                Some(value) => value.clone(),
                None => return Ok(()),
            },
        };

        log::trace!("Writing {} to {}", self.full_name, self.target_attribute());
        self.write(target, value)
    }

    /// This mapping's value as a one-entry parameter set
    ///
    /// A mapping without reader contributes nothing.
    pub fn read_as_params(&self, target: &T) -> Result<Params> {
        let mut params = Params::new();
        if self.reader.is_some() {
            params.insert(self.full_name.clone(), self.read(target)?);
        }
        Ok(params)
    }
}

impl<T> std::fmt::Debug for Mapping<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mapping")
            .field("full_name", &self.full_name)
            .field("target_attribute", &self.target_attribute())
            .field("reader", &self.reader)
            .field("writer", &self.writer)
            .finish()
    }
}
