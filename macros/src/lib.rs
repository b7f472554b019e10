//! Procedural macros for the field-mapper crate
//!
//! This crate provides the `Target` derive, which generates name-based
//! attribute access for plain structs so they can be driven by mappers.

use proc_macro::TokenStream;

mod target_impl;

/// Derive macro for `field_mapper::Target`
///
/// Every named field becomes an attribute. Reads clone the field into a
/// `Value`, writes coerce the incoming `Value` with `FromValue`.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Target)]
/// #[target(name = "User")]
/// struct User {
///     name: String,
///
///     #[target(rename = "last_name")]
///     surname: Option<String>,
///
///     #[target(readonly)]
///     id: i64,
///
///     #[target(skip)]
///     password_hash: String,
/// }
/// ```
#[proc_macro_derive(Target, attributes(target))]
pub fn derive_target(input: TokenStream) -> TokenStream {
    target_impl::process_derive_target(input)
}
