//! Named accessors on a mapper
//!
//! `Mapper::get` and `Mapper::set` address mappings by their external field
//! name. The accessor table behind them is built once per mapper, for all of
//! its mappings at the same time, by the first access whose name matches a
//! mapping. Until then the mapper has no accessors; afterwards the table is
//! fixed. Lookups that match nothing fail with `MapperError::NoSuchProperty`
//! and leave the mapper as it was.

use rustc_hash::FxHashMap;

use super::{realize, Mapper};
use crate::error::{MapperError, Result};
use crate::mapping::Mapping;
use crate::target::Target;
use crate::value::Value;

/// Probe names used to test a value for sequence or map coercion
///
/// They never resolve to a mapping and never trigger accessor installation.
pub const COERCION_PROBES: &[&str] = &["to_ary", "to_a", "to_str", "to_hash"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    Read,
    Write,
}

/// Getter and setter entries for every mapping of one mapper
///
/// Getters are keyed by full name, setters by `full_name=`. For duplicate
/// full names the later declared mapping owns the entry.
#[derive(Debug, Default)]
pub struct AccessorTable {
    getters: FxHashMap<String, usize>,
    setters: FxHashMap<String, usize>,
}

impl AccessorTable {
    fn build<T>(mappings: &[Mapping<T>]) -> Self {
        let mut table = Self::default();
        for (index, mapping) in mappings.iter().enumerate() {
            table.getters.insert(mapping.full_name().to_string(), index);
            table.setters.insert(setter_name(mapping.full_name()), index);
        }
        table
    }

    /// Index of the mapping read by `name`
    #[must_use]
    pub fn getter(&self, name: &str) -> Option<usize> {
        self.getters.get(name).copied()
    }

    /// Index of the mapping written by `name`, with or without the trailing `=`
    #[must_use]
    pub fn setter(&self, name: &str) -> Option<usize> {
        self.setters.get(&setter_name(name)).copied()
    }

    /// All accessor names, getters and setters, in no particular order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.getters.keys().chain(self.setters.keys()).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.getters.len() + self.setters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.getters.is_empty()
    }

    fn lookup(&self, name: &str, access: Access) -> Option<usize> {
        match access {
            Access::Read => self.getter(name),
            Access::Write => self.setter(name),
        }
    }
}

fn setter_name(name: &str) -> String {
    if name.ends_with('=') {
        name.to_string()
    } else {
        format!("{name}=")
    }
}

fn matches_mapping<T>(mapping: &Mapping<T>, name: &str, access: Access) -> bool {
    let full_name = mapping.full_name();
    match access {
        Access::Read => name == full_name,
        Access::Write => {
            name == full_name
                || name
                    .strip_suffix('=')
                    .is_some_and(|stripped| stripped == full_name)
        }
    }
}

impl<T: Target> Mapper<T> {
    /// Read a mapping by its external field name
    pub fn get(&self, name: &str) -> Result<Value> {
        self.get_with(name, &[])
    }

    /// Read a mapping, passing arguments to its format
    pub fn get_with(&self, name: &str, args: &[Value]) -> Result<Value> {
        let index = self.resolve(name, Access::Read)?;
        self.mappings()[index].read_with(&self.target, args)
    }

    /// Write a mapping by its external field name (`email` or `email=`)
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let index = self.resolve(name, Access::Write)?;
        let mappings = realize(&self.mappings, &self.schema, &self.config);
        mappings[index].write(&mut self.target, value.into())
    }

    /// Whether the accessor table has been installed
    pub fn accessors_installed(&self) -> bool {
        self.accessors.get().is_some()
    }

    pub fn accessors(&self) -> Option<&AccessorTable> {
        self.accessors.get()
    }

    /// Whether `name` resolves to a getter or setter, without installing anything
    pub fn responds_to(&self, name: &str) -> bool {
        if let Some(table) = self.accessors.get() {
            return table.getter(name).is_some() || table.setter(name).is_some();
        }
        if COERCION_PROBES.contains(&name) {
            return false;
        }
        self.mappings().iter().any(|mapping| {
            matches_mapping(mapping, name, Access::Read)
                || matches_mapping(mapping, name, Access::Write)
        })
    }

    fn resolve(&self, name: &str, access: Access) -> Result<usize> {
        let no_such_property = || MapperError::NoSuchProperty(name.to_string());

        if let Some(table) = self.accessors.get() {
            return table.lookup(name, access).ok_or_else(no_such_property);
        }
        if COERCION_PROBES.contains(&name) {
            return Err(no_such_property());
        }

        let mappings = self.mappings();
        if !mappings
            .iter()
            .any(|mapping| matches_mapping(mapping, name, access))
        {
            return Err(no_such_property());
        }

        let table = self.accessors.get_or_init(|| {
            log::debug!(
                "Installing accessors for {} mappings of {}",
                mappings.len(),
                self.schema.name()
            );
            AccessorTable::build(mappings)
        });
        table.lookup(name, access).ok_or_else(no_such_property)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::MapperSchema;
    use crate::target::AttributeBag;

    fn mapper() -> Mapper<AttributeBag> {
        let schema = MapperSchema::builder("PostMapper")
            .map(["title", "body"])
            .build()
            .unwrap();
        Mapper::new(AttributeBag::new(&["title", "body"]), &schema)
    }

    #[test]
    fn test_setter_names() {
        assert_eq!(setter_name("title"), "title=");
        assert_eq!(setter_name("title="), "title=");
    }

    #[test]
    fn test_first_match_installs_all_accessors() {
        let mut mapper = mapper();
        assert!(!mapper.accessors_installed());

        mapper.set("title=", "Hello").unwrap();
        assert!(mapper.accessors_installed());

        let table = mapper.accessors().unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.getter("body"), Some(1));
        assert_eq!(table.setter("body"), Some(1));
        assert_eq!(mapper.get("title").unwrap(), Value::from("Hello"));
    }

    #[test]
    fn test_misses_install_nothing() {
        let mapper = mapper();

        let err = mapper.get("author").unwrap_err();
        assert!(matches!(err, MapperError::NoSuchProperty(ref name) if name == "author"));
        assert!(!mapper.accessors_installed());

        assert!(mapper.get("to_ary").is_err());
        assert!(mapper.get("title=").is_err());
        assert!(!mapper.accessors_installed());
    }

    #[test]
    fn test_responds_to_has_no_side_effects() {
        let mapper = mapper();
        assert!(mapper.responds_to("title"));
        assert!(mapper.responds_to("body="));
        assert!(!mapper.responds_to("author"));
        assert!(!mapper.responds_to("to_ary"));
        assert!(!mapper.accessors_installed());
    }
}
