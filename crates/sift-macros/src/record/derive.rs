//! Implementation of the `#[derive(Record)]` macro.
//!
//! This macro generates an implementation of the `Record` trait and one
//! attribute-name constant per exposed field.

use std::collections::HashSet;

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{parse_quote, spanned::Spanned, Data, DeriveInput, Error, Fields, Result, Type};

use super::attrs::parse_record_attrs;

/// Main implementation of the Record derive macro.
pub fn record_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Record can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Record can only be derived for structs",
            ))
        }
    };

    let mut attribute_arms: Vec<TokenStream> = Vec::new();
    let mut attribute_constants: Vec<TokenStream> = Vec::new();
    let mut field_types: Vec<&Type> = Vec::new();
    let mut seen = HashSet::new();

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let attrs = parse_record_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }

        let attribute = attrs
            .rename
            .unwrap_or_else(|| field_name.to_string().trim_start_matches("r#").to_string());

        if !seen.insert(attribute.clone()) {
            return Err(Error::new(
                field.span(),
                format!("duplicate record attribute name '{attribute}'"),
            ));
        }

        let const_name = format_ident!("{}", to_screaming_snake_case(&attribute));

        attribute_constants.push(quote! {
            /// Attribute name constant for filters and orderings.
            pub const #const_name: &'static str = #attribute;
        });

        attribute_arms.push(quote! {
            #attribute => ::sift::AttributeValue::attribute_value(&self.#field_name),
        });
        field_types.push(&field.ty);
    }

    // Generic field types need an explicit AttributeValue bound
    let mut bounded = input.generics.clone();
    if !bounded.params.is_empty() {
        let predicates = &mut bounded.make_where_clause().predicates;
        for ty in field_types {
            predicates.push(parse_quote!(#ty: ::sift::AttributeValue));
        }
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let (record_impl_generics, _, record_where_clause) = bounded.split_for_impl();

    let expanded = quote! {
        impl #impl_generics #struct_name #ty_generics #where_clause {
            #(#attribute_constants)*
        }

        impl #record_impl_generics ::sift::Record for #struct_name #ty_generics #record_where_clause {
            fn attribute(&self, name: &str) -> ::sift::Value<'_> {
                match name {
                    #(#attribute_arms)*
                    _ => ::sift::Value::Null,
                }
            }
        }
    };

    Ok(expanded)
}

/// Convert an attribute name to SCREAMING_SNAKE_CASE.
///
/// Characters that cannot appear in an identifier become underscores.
fn to_screaming_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_was_lower = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_was_lower {
                result.push('_');
            }
            result.extend(c.to_uppercase());
            prev_was_lower = false;
        } else if c.is_alphanumeric() {
            result.extend(c.to_uppercase());
            prev_was_lower = true;
        } else {
            result.push('_');
            prev_was_lower = false;
        }
    }

    if result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert(0, '_');
    }

    result
}
