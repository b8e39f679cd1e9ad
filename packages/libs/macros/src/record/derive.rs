//! `#[derive(Record)]` 구현
//!
//! `Record` / `Columns` 구현과 컬럼명 프록시 구조체(`<Name>Columns`)를 생성합니다.

use heck::ToSnakeCase;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Result};

use super::attrs::{parse_field_attrs, parse_record_attrs};

pub fn record_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let vis = &input.vis;

    if !input.generics.params.is_empty() {
        return Err(Error::new(
            input.generics.span(),
            "Record cannot be derived for generic structs",
        ));
    }

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

    let record_attr = parse_record_attrs(&input.attrs)?;
    let table = record_attr
        .table
        .unwrap_or_else(|| struct_name.to_string().to_snake_case());

    let mut field_defs: Vec<TokenStream> = Vec::new();
    let mut proxy_fields: Vec<TokenStream> = Vec::new();
    let mut proxy_values: Vec<TokenStream> = Vec::new();

    for field in fields.iter() {
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let attr = parse_field_attrs(&field.attrs)?;
        if attr.skip {
            continue;
        }

        let name = ident.to_string();
        let name = name.strip_prefix("r#").unwrap_or(&name).to_string();
        let column = attr.column.clone().unwrap_or_else(|| name.to_snake_case());

        let mut def = quote! { ::gp_sql::record::Field::new(#name) };
        if let Some(explicit) = &attr.column {
            def = quote! { #def.column(#explicit) };
        }
        if attr.primary_key {
            def = quote! { #def.primary_key() };
        }
        field_defs.push(def);

        proxy_fields.push(quote! { pub #ident: &'static str });
        proxy_values.push(quote! { #ident: #column });
    }

    let proxy_name = format_ident!("{}Columns", struct_name);

    let expanded = quote! {
        impl ::gp_sql::record::Record for #struct_name {
            const TABLE: &'static str = #table;

            fn fields() -> &'static [::gp_sql::record::Field] {
                const FIELDS: &[::gp_sql::record::Field] = &[#(#field_defs),*];
                FIELDS
            }
        }

        /// 물리 컬럼명 프록시
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #vis struct #proxy_name {
            #(#proxy_fields,)*
        }

        impl ::gp_sql::record::Columns for #struct_name {
            type Proxy = #proxy_name;

            fn columns() -> #proxy_name {
                #proxy_name {
                    #(#proxy_values,)*
                }
            }
        }
    };

    Ok(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_tuple_struct() {
        let input: DeriveInput = syn::parse_str("struct Pair(i32, i32);").unwrap();
        assert!(record_derive_impl(input).is_err());
    }

    #[test]
    fn test_rejects_generics() {
        let input: DeriveInput = syn::parse_str("struct Wrap<T> { inner: T }").unwrap();
        assert!(record_derive_impl(input).is_err());
    }

    #[test]
    fn test_generates_table_and_proxy() {
        let input: DeriveInput = syn::parse_str(
            r#"
            #[record(table = "users")]
            struct User {
                #[record(primary_key)]
                id: i64,
                #[record(column = "nick")]
                userName: String,
                #[record(skip)]
                cache: Vec<u8>,
            }
            "#,
        )
        .unwrap();

        let out = record_derive_impl(input).unwrap().to_string();
        assert!(out.contains("\"users\""));
        assert!(out.contains("UserColumns"));
        assert!(out.contains("\"nick\""));
        assert!(out.contains("primary_key ()"));
        assert!(!out.contains("cache"));
    }
}
