//! Target derive macro implementation

use darling::{ast, FromDeriveInput, FromField};
use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

/// Receiver for the struct that derives Target
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(target), supports(struct_named))]
pub struct TargetReceiver {
    ident: syn::Ident,
    generics: syn::Generics,
    data: ast::Data<(), TargetFieldReceiver>,
    /// Name used in error messages, defaults to the struct name
    #[darling(default)]
    name: Option<String>,
}

/// Receiver for the fields in the struct
#[derive(Debug, FromField)]
#[darling(attributes(target))]
pub struct TargetFieldReceiver {
    ident: Option<syn::Ident>,
    ty: syn::Type,
    /// Attribute name, defaults to the field name
    #[darling(default)]
    rename: Option<String>,
    /// Leave the field out of the attribute set
    #[darling(default)]
    skip: bool,
    /// Allow reads but reject writes
    #[darling(default)]
    readonly: bool,
}

/// A field that ends up as an attribute
struct Attribute<'a> {
    name: String,
    ident: &'a syn::Ident,
    ty: &'a syn::Type,
    readonly: bool,
}

pub fn process_derive_target(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let receiver = match TargetReceiver::from_derive_input(&input) {
        Ok(receiver) => receiver,
        Err(err) => return err.write_errors().into(),
    };

    let ast::Data::Struct(fields) = &receiver.data else {
        unreachable!("Darling ensures this is a struct")
    };

    let attributes: Vec<Attribute<'_>> = fields
        .iter()
        .filter(|field| !field.skip)
        .filter_map(|field| {
            let ident = field.ident.as_ref()?;
            Some(Attribute {
                name: field.rename.clone().unwrap_or_else(|| ident.to_string()),
                ident,
                ty: &field.ty,
                readonly: field.readonly,
            })
        })
        .collect();

    TokenStream::from(generate_target_impl(&receiver, &attributes))
}

fn generate_target_impl(
    receiver: &TargetReceiver,
    attributes: &[Attribute<'_>],
) -> proc_macro2::TokenStream {
    let struct_name = &receiver.ident;
    let type_name = receiver
        .name
        .clone()
        .unwrap_or_else(|| struct_name.to_string());
    let (impl_generics, ty_generics, where_clause) = receiver.generics.split_for_impl();

    let names: Vec<&str> = attributes.iter().map(|attr| attr.name.as_str()).collect();

    let getters = attributes.iter().map(|attr| {
        let name = &attr.name;
        let ident = attr.ident;
        quote! {
            #name => ::std::result::Result::Ok(::field_mapper::Value::from(
                ::std::clone::Clone::clone(&self.#ident),
            )),
        }
    });

    let setters = attributes.iter().map(|attr| {
        let name = &attr.name;
        let ident = attr.ident;
        let ty = attr.ty;
        if attr.readonly {
            quote! {
                #name => ::std::result::Result::Err(
                    ::field_mapper::MapperError::read_only_attribute(#type_name, name),
                ),
            }
        } else {
            quote! {
                #name => {
                    self.#ident = <#ty as ::field_mapper::FromValue>::from_value(value)
                        .map_err(|source| {
                            ::field_mapper::MapperError::invalid_value(#type_name, name, source)
                        })?;
                    ::std::result::Result::Ok(())
                }
            }
        }
    });

    quote! {
        impl #impl_generics ::field_mapper::Target for #struct_name #ty_generics #where_clause {
            fn type_name(&self) -> &'static str {
                #type_name
            }

            fn attribute_names(&self) -> &'static [&'static str] {
                &[#(#names),*]
            }

            fn get_attribute(&self, name: &str) -> ::field_mapper::Result<::field_mapper::Value> {
                match name {
                    #(#getters)*
                    _ => ::std::result::Result::Err(
                        ::field_mapper::MapperError::unknown_attribute(#type_name, name),
                    ),
                }
            }

            #[allow(unused_variables)]
            fn set_attribute(
                &mut self,
                name: &str,
                value: ::field_mapper::Value,
            ) -> ::field_mapper::Result<()> {
                match name {
                    #(#setters)*
                    _ => ::std::result::Result::Err(
                        ::field_mapper::MapperError::unknown_attribute(#type_name, name),
                    ),
                }
            }
        }
    }
}
