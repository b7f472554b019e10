//! Mapping declarations and the schemas that collect them

pub mod factory;
pub mod registry;

pub use factory::{
    FormatSpec, MappingFactory, MappingName, MappingOptions, ReaderOption, WriterOption,
    OPTION_KEYS,
};
pub use registry::{MapperSchema, SchemaBuilder};
