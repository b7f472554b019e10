//! Mapper schemas
//!
//! A `MapperSchema` is the ordered, immutable list of mapping factories a
//! kind of mapper is declared with. Declaration order is read/write order.

use std::sync::Arc;

use rustc_hash::FxHashSet;

use super::factory::{MappingFactory, MappingName, MappingOptions};
use crate::error::{MapperError, Result};
use crate::target::Target;

/// The declared mappings of one kind of mapper
pub struct MapperSchema<T> {
    name: Arc<str>,
    factories: Arc<[Arc<MappingFactory<T>>]>,
}

impl<T> Clone for MapperSchema<T> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            factories: Arc::clone(&self.factories),
        }
    }
}

impl<T: 'static> MapperSchema<T> {
    /// Start declaring a schema
    ///
    /// ```rust
    /// use field_mapper::{AttributeBag, MapperSchema, MappingOptions, Multiparam};
    ///
    /// let schema = MapperSchema::<AttributeBag>::builder("PostMapper")
    ///     .map(["title", "body"])
    ///     .map([("published_on", "publication_date")])
    ///     .map_with(["born_on"], MappingOptions::new().with_multiparam(Multiparam::Date))
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(schema.names(), ["title", "body", "published_on", "born_on"]);
    /// ```
    #[must_use]
    pub fn builder(name: impl Into<String>) -> SchemaBuilder<T> {
        SchemaBuilder::new(name.into(), Vec::new())
    }

    /// Start a schema that inherits every mapping of `self`
    ///
    /// The parent's factories are copied into the new schema; declarations on
    /// the child never show up in the parent.
    #[must_use]
    pub fn extend(&self, name: impl Into<String>) -> SchemaBuilder<T> {
        SchemaBuilder::new(name.into(), self.factories.to_vec())
    }
}

impl<T> MapperSchema<T> {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Factories in declaration order
    #[must_use]
    pub fn factories(&self) -> &[Arc<MappingFactory<T>>] {
        &self.factories
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Declared mapping names in declaration order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.factories.iter().map(|factory| factory.name()).collect()
    }

    /// The factory declared under `name`; the last one wins for duplicates
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<MappingFactory<T>>> {
        self.factories.iter().rev().find(|factory| factory.name() == name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

impl<T: Target> MapperSchema<T> {
    /// Check that `target` has every attribute the default strategies touch
    ///
    /// Mappings with custom readers or writers are skipped, their strategies
    /// decide what they access.
    pub fn validate(&self, target: &T) -> Result<()> {
        for factory in self.factories.iter() {
            if factory.uses_default_strategies()
                && !target.has_attribute(factory.target_attribute())
            {
                return Err(MapperError::unknown_attribute(
                    target.type_name(),
                    factory.target_attribute(),
                ));
            }
        }
        Ok(())
    }
}

impl<T> std::fmt::Debug for MapperSchema<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapperSchema")
            .field("name", &self.name)
            .field("mappings", &self.names())
            .finish()
    }
}

/// Collects mapping declarations for a `MapperSchema`
///
/// The first invalid declaration is remembered and reported by `build`.
pub struct SchemaBuilder<T> {
    name: String,
    factories: Vec<Arc<MappingFactory<T>>>,
    strict_names: bool,
    error: Option<MapperError>,
}

impl<T: 'static> SchemaBuilder<T> {
    fn new(name: String, factories: Vec<Arc<MappingFactory<T>>>) -> Self {
        Self {
            name,
            factories,
            strict_names: false,
            error: None,
        }
    }

    /// Declare mappings with default options
    ///
    /// Each entry is either a name (mapped to the attribute of the same name)
    /// or a `(name, target_attribute)` pair.
    #[must_use]
    pub fn map<I>(self, names: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<MappingName>,
    {
        self.map_with(names, MappingOptions::default())
    }

    /// Declare mappings that share one set of options
    #[must_use]
    pub fn map_with<I>(mut self, names: I, options: MappingOptions<T>) -> Self
    where
        I: IntoIterator,
        I::Item: Into<MappingName>,
    {
        for name in names {
            let MappingName {
                name,
                target_attribute,
            } = name.into();
            match MappingFactory::new(name, target_attribute, options.clone()) {
                Ok(factory) => self.factories.push(Arc::new(factory)),
                Err(err) => {
                    self.error.get_or_insert(err);
                }
            }
        }
        self
    }

    /// Reject duplicate mapping names instead of letting the last one win
    #[must_use]
    pub fn strict_names(mut self, strict: bool) -> Self {
        self.strict_names = strict;
        self
    }

    /// Finish the declaration
    pub fn build(self) -> Result<MapperSchema<T>> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let mut seen = FxHashSet::default();
        for factory in &self.factories {
            if !seen.insert(factory.name()) {
                if self.strict_names {
                    return Err(MapperError::DuplicateName(factory.name().to_string()));
                }
                log::warn!(
                    "Mapping {} is declared more than once in {}; the last declaration wins",
                    factory.name(),
                    self.name
                );
            }
        }

        log::debug!("Built schema {} with {} mappings", self.name, self.factories.len());
        Ok(MapperSchema {
            name: Arc::from(self.name),
            factories: Arc::from(self.factories),
        })
    }
}
