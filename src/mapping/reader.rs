//! Reader strategies

use std::sync::Arc;

use super::format::Format;
use super::Mapping;
use crate::error::Result;
use crate::target::Target;
use crate::value::Value;

/// A custom way of reading a mapping's value from the target
///
/// This is the extension point for derived attributes, e.g. a value that
/// lives on an associated object or is computed from several attributes.
pub trait ReadStrategy<T>: Send + Sync {
    fn read(&self, mapping: &Mapping<T>, target: &T) -> Result<Value>;
}

/// Adapts a closure into a `ReadStrategy`
pub struct FnReader<F>(pub F);

impl<T, F> ReadStrategy<T> for FnReader<F>
where
    F: Fn(&T) -> Result<Value> + Send + Sync,
{
    fn read(&self, _mapping: &Mapping<T>, target: &T) -> Result<Value> {
        (self.0)(target)
    }
}

/// The reader a live mapping uses
pub enum Reader<T> {
    /// Read the target attribute as is
    Basic,
    /// Read the target attribute and pass it through a format
    Formatted(Format),
    Custom(Arc<dyn ReadStrategy<T>>),
}

impl<T: Target> Reader<T> {
    /// Read the current value; `args` only matter to formatted readers
    pub fn read(&self, mapping: &Mapping<T>, target: &T, args: &[Value]) -> Result<Value> {
        match self {
            Self::Basic => target.get_attribute(mapping.target_attribute()),
            Self::Formatted(format) => {
                let value = target.get_attribute(mapping.target_attribute())?;
                Ok(format.apply(&value, args, &mapping.config().formats))
            }
            Self::Custom(strategy) => strategy.read(mapping, target),
        }
    }
}

impl<T> Clone for Reader<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Basic => Self::Basic,
            Self::Formatted(format) => Self::Formatted(*format),
            Self::Custom(strategy) => Self::Custom(Arc::clone(strategy)),
        }
    }
}

impl<T> std::fmt::Debug for Reader<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Basic => f.write_str("Basic"),
            Self::Formatted(format) => f.debug_tuple("Formatted").field(format).finish(),
            Self::Custom(_) => f.write_str("Custom"),
        }
    }
}
