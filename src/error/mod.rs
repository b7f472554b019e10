//! Error handling for the mapping engine.

use std::fmt;

/// A value could not be coerced into the Rust type of a target attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionError {
    /// The type the attribute expects
    pub expected: &'static str,
    /// The kind of value that was supplied
    pub found: String,
}

impl ConversionError {
    pub fn new(expected: &'static str, found: impl Into<String>) -> Self {
        Self {
            expected,
            found: found.into(),
        }
    }
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected {}, found {}", self.expected, self.found)
    }
}

impl std::error::Error for ConversionError {}

/// Errors raised while declaring or driving mappings
#[derive(Debug, thiserror::Error)]
pub enum MapperError {
    /// The target has no attribute with this name
    #[error("{target} has no attribute `{attribute}`")]
    UnknownAttribute {
        target: &'static str,
        attribute: String,
    },

    /// The attribute can be read but not assigned
    #[error("{target}.{attribute} is read-only")]
    ReadOnlyAttribute {
        target: &'static str,
        attribute: String,
    },

    /// The target rejected the value assigned to one of its attributes
    #[error("invalid value for {target}.{attribute}: {source}")]
    InvalidValue {
        target: &'static str,
        attribute: String,
        source: ConversionError,
    },

    /// Accessor lookup on the mapper failed
    #[error("no such property `{0}`")]
    NoSuchProperty(String),

    /// A mapping name collides with a reserved word
    #[error("`{0}` is reserved and cannot be used as a mapping name")]
    ReservedName(String),

    /// A mapping name or target attribute is malformed
    #[error("invalid mapping declaration: {0}")]
    InvalidName(String),

    /// Two mappings share a name in a strict schema
    #[error("mapping `{0}` is declared more than once")]
    DuplicateName(String),

    /// The format key is not in the format registry
    #[error("unknown format `{0}`")]
    UnknownFormat(String),

    /// A configured strftime string is not understood by chrono
    #[error("invalid date format {0:?}")]
    InvalidFormat(String),

    /// Incoming parameters are not a flat key/value set
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    /// Multiparam fragments could not be assembled
    #[error("cannot assemble `{name}` from its parts: {reason}")]
    Multiparam { name: String, reason: String },

    /// A custom reader or writer failed
    #[error(transparent)]
    Strategy(#[from] anyhow::Error),
}

impl MapperError {
    pub fn unknown_attribute(target: &'static str, attribute: impl Into<String>) -> Self {
        Self::UnknownAttribute {
            target,
            attribute: attribute.into(),
        }
    }

    pub fn read_only_attribute(target: &'static str, attribute: impl Into<String>) -> Self {
        Self::ReadOnlyAttribute {
            target,
            attribute: attribute.into(),
        }
    }

    pub fn invalid_value(
        target: &'static str,
        attribute: impl Into<String>,
        source: ConversionError,
    ) -> Self {
        Self::InvalidValue {
            target,
            attribute: attribute.into(),
            source,
        }
    }

    /// True for errors caused by the declared configuration rather than input data
    #[must_use]
    pub const fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownAttribute { .. }
                | Self::ReservedName(_)
                | Self::InvalidName(_)
                | Self::DuplicateName(_)
                | Self::UnknownFormat(_)
                | Self::InvalidFormat(_)
        )
    }
}

/// Result type for mapping operations
pub type Result<T> = std::result::Result<T, MapperError>;
