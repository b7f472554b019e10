//! The contract a mapped object has to fulfil
//!
//! Mappings never touch struct fields directly. Every read and write goes
//! through `Target::get_attribute` / `Target::set_attribute`, so the target
//! stays the single source of truth. Most targets derive the trait:
//!
//! ```rust
//! use field_mapper::{Target, Value};
//!
//! #[derive(Debug, Default, Target)]
//! #[target(name = "User")]
//! struct User {
//!     name: String,
//!     #[target(rename = "last_name")]
//!     surname: Option<String>,
//!     #[target(skip)]
//!     password_hash: String,
//! }
//!
//! let mut user = User::default();
//! user.set_attribute("last_name", Value::from("Smith")).unwrap();
//! assert_eq!(user.surname.as_deref(), Some("Smith"));
//! assert!(!user.has_attribute("password_hash"));
//! ```

use crate::error::{MapperError, Result};
use crate::value::Value;

pub trait Target {
    /// Name used in error messages
    fn type_name(&self) -> &'static str;

    /// Every attribute that can be read by name
    fn attribute_names(&self) -> &'static [&'static str];

    fn has_attribute(&self, name: &str) -> bool {
        self.attribute_names().contains(&name)
    }

    /// Read an attribute, failing with `MapperError::UnknownAttribute` when it does not exist
    fn get_attribute(&self, name: &str) -> Result<Value>;

    /// Assign an attribute, failing with `MapperError::UnknownAttribute` when it does not exist
    fn set_attribute(&mut self, name: &str, value: Value) -> Result<()>;
}

/// A plain attribute bag, handy as a target for loosely structured data
///
/// Attributes must be declared up front; reading or writing an undeclared
/// attribute is an error like on any other target.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeBag {
    names: &'static [&'static str],
    values: crate::value::Record,
}

impl AttributeBag {
    #[must_use]
    pub fn new(names: &'static [&'static str]) -> Self {
        Self {
            names,
            values: crate::value::Record::new(),
        }
    }
}

impl Target for AttributeBag {
    fn type_name(&self) -> &'static str {
        "AttributeBag"
    }

    fn attribute_names(&self) -> &'static [&'static str] {
        self.names
    }

    fn get_attribute(&self, name: &str) -> Result<Value> {
        if !self.has_attribute(name) {
            return Err(MapperError::unknown_attribute(self.type_name(), name));
        }
        Ok(self.values.get(name).cloned().unwrap_or_default())
    }

    fn set_attribute(&mut self, name: &str, value: Value) -> Result<()> {
        if !self.has_attribute(name) {
            return Err(MapperError::unknown_attribute(self.type_name(), name));
        }
        self.values.insert(name.to_string(), value);
        Ok(())
    }
}
