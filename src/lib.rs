//! A Rust library for mapping flat parameter sets, such as form submissions,
//! onto structured target objects and back.
//!
//! Mappings are declared once per kind of mapper in a `MapperSchema`. Each
//! `Mapper` binds a schema to one target, realizes its mappings lazily, and
//! exposes them through `read`/`write` and named accessors.

extern crate self as field_mapper;

pub mod config;
pub mod error;
pub mod mapper;
pub mod mapping;
pub mod schema;
pub mod target;
pub mod value;

// Re-export the most common types for easier use
pub use config::{FormatConfig, MapperConfig};
pub use error::{ConversionError, MapperError, Result};
pub use mapper::{AccessorTable, Mapper};
pub use mapping::{
    FnReader, FnWriter, Format, FormatFn, Mapping, Multiparam, ReadStrategy, WriteStrategy,
};
pub use schema::{MapperSchema, MappingFactory, MappingOptions, SchemaBuilder};
pub use target::{AttributeBag, Target};
pub use value::{params_from_json, FromValue, Params, Record, Value};

// Derive macro for `Target`
pub use macros::Target;
