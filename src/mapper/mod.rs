//! The mapper: a target plus the live mappings of its schema
//!
//! Constructing a `Mapper` is cheap. The schema is realized into live
//! `Mapping`s the first time they are needed (by `read`, `write` or an
//! accessor) and cached for the mapper's lifetime.

pub mod dispatch;

use std::sync::{Arc, OnceLock};

use crate::config::MapperConfig;
use crate::error::Result;
use crate::mapping::Mapping;
use crate::schema::MapperSchema;
use crate::target::Target;
use crate::value::{params_from_json, Params};

pub use dispatch::{AccessorTable, COERCION_PROBES};

/// Moves values between flat parameters and a target through a schema's mappings
///
/// ```rust
/// use field_mapper::{params, Mapper, MapperSchema, Target, Value};
///
/// #[derive(Debug, Default, Target)]
/// struct User {
///     name: String,
///     last_name: Option<String>,
/// }
///
/// let schema = MapperSchema::<User>::builder("UserMapper")
///     .map(["name"])
///     .map([("surname", "last_name")])
///     .build()
///     .unwrap();
///
/// let mut mapper = Mapper::new(User::default(), &schema);
/// mapper.write(&params! { "name" => "Ann", "surname" => "Smith" }).unwrap();
///
/// assert_eq!(mapper.target().last_name.as_deref(), Some("Smith"));
/// assert_eq!(mapper.get("surname").unwrap(), Value::from("Smith"));
/// assert_eq!(mapper.read().unwrap(), params! { "name" => "Ann", "surname" => "Smith" });
/// ```
pub struct Mapper<T> {
    target: T,
    schema: MapperSchema<T>,
    config: Arc<MapperConfig>,
    mappings: OnceLock<Vec<Mapping<T>>>,
    accessors: OnceLock<AccessorTable>,
}

impl<T: Target> Mapper<T> {
    /// Create a mapper with the default configuration
    pub fn new(target: T, schema: &MapperSchema<T>) -> Self {
        Self::build(target, schema, MapperConfig::default())
    }

    /// Create a mapper with an explicit configuration, rejecting invalid date formats
    pub fn with_config(
        target: T,
        schema: &MapperSchema<T>,
        config: MapperConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(target, schema, config))
    }

    fn build(target: T, schema: &MapperSchema<T>, config: MapperConfig) -> Self {
        Self {
            target,
            schema: schema.clone(),
            config: Arc::new(config),
            mappings: OnceLock::new(),
            accessors: OnceLock::new(),
        }
    }

    pub const fn target(&self) -> &T {
        &self.target
    }

    /// Direct access to the target; mappings never cache values, so changes
    /// made here are what the next `read` sees
    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    pub fn into_target(self) -> T {
        self.target
    }

    pub const fn schema(&self) -> &MapperSchema<T> {
        &self.schema
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Live mappings in declaration order, realized on first call
    pub fn mappings(&self) -> &[Mapping<T>] {
        realize(&self.mappings, &self.schema, &self.config)
    }

    /// Whether the schema has been realized into live mappings yet
    pub fn is_realized(&self) -> bool {
        self.mappings.get().is_some()
    }

    /// The live mapping for an external field name; the last one wins for duplicates
    pub fn mapping(&self, full_name: &str) -> Option<&Mapping<T>> {
        self.mappings()
            .iter()
            .rev()
            .find(|mapping| mapping.full_name() == full_name)
    }

    /// External field names in declaration order
    pub fn full_names(&self) -> Vec<&str> {
        self.mappings().iter().map(Mapping::full_name).collect()
    }

    /// Write every mapping's value out of `params`, in declaration order
    ///
    /// Keys that are absent leave their attributes untouched. The first
    /// failing mapping aborts the write and its error is returned as is.
    /// Returns `params` for chaining.
    pub fn write<'p>(&mut self, params: &'p Params) -> Result<&'p Params> {
        let mappings = realize(&self.mappings, &self.schema, &self.config);
        for mapping in mappings {
            if let Err(err) = mapping.write_from_params(&mut self.target, params) {
                log::debug!(
                    "Write of {} aborted at {}: {err}",
                    self.schema.name(),
                    mapping.full_name()
                );
                return Err(err);
            }
        }
        Ok(params)
    }

    /// Write a decoded JSON object of parameters
    pub fn write_json(&mut self, json: serde_json::Value) -> Result<Params> {
        let params = params_from_json(json)?;
        self.write(&params)?;
        Ok(params)
    }

    /// Read every mapping into one flat parameter set
    ///
    /// When full names collide, the later declared mapping wins.
    pub fn read(&self) -> Result<Params> {
        let mut params = Params::new();
        for mapping in self.mappings() {
            params.extend(mapping.read_as_params(&self.target)?);
        }
        Ok(params)
    }
}

fn realize<'m, T>(
    cell: &'m OnceLock<Vec<Mapping<T>>>,
    schema: &MapperSchema<T>,
    config: &Arc<MapperConfig>,
) -> &'m [Mapping<T>] {
    cell.get_or_init(|| {
        log::trace!("Realizing {} mappings of {}", schema.len(), schema.name());
        schema
            .factories()
            .iter()
            .map(|factory| Mapping::new(Arc::clone(factory), Arc::clone(config)))
            .collect()
    })
}

impl<T: std::fmt::Debug> std::fmt::Debug for Mapper<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mapper")
            .field("schema", &self.schema.name())
            .field("target", &self.target)
            .field("realized", &self.mappings.get().is_some())
            .field("accessors_installed", &self.accessors.get().is_some())
            .finish()
    }
}
