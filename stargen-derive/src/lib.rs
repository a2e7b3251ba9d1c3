//! Derive macros for the stargen galaxy generator.
//!
//! This crate provides one derive macro:
//!
//! - [`Parameters`] - Generates validated accessors and key-based updates
//!   for a galaxy parameter struct
//!
//! # Usage
//!
//! The macro is re-exported from the main `stargen` crate. You don't need
//! to add this crate directly:
//!
//! ```ignore
//! use stargen::prelude::*;
//!
//! #[derive(Parameters, Clone, Debug)]
//! struct Ring {
//!     #[param(positive, min = 100, max = 1_000_000, step = 100, label = "Number of Stars")]
//!     count: u32,
//!     #[param(finite)]
//!     tilt: f32,
//! }
//! ```
//!
//! # Field Checks
//!
//! Each check named in `#[param(...)]` maps to a function in
//! `stargen::params::check` and runs before every assignment:
//!
//! | Check | Accepts |
//! |-------|---------|
//! | `positive` | finite values `> 0` |
//! | `non_negative` | finite values `>= 0` |
//! | `finite` | any finite value |
//! | `color` | RGB with every channel in `[0, 1]` |
//!
//! Fields without checks (enums such as blend modes) are assigned as-is.
//!
//! `limit = expr` adds a hard upper bound, checked like the named checks.
//! `min`/`max`/`step` are editor metadata only.
//!
//! # Cross-Field Checks
//!
//! A struct-level `#[param(validate_with = path)]` names a
//! `fn(&Self) -> Result<(), String>` that runs after every assignment. If it
//! fails, the field is restored and the setter returns
//! `ParameterError::Conflict`.
//!
//! # Keys
//!
//! Every field is addressable by its own name and by its camelCase form,
//! so `randomness_power` also answers to `randomnessPower`.

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Expr, Fields, Ident, LitStr};

/// Derive macro for galaxy parameter structs.
///
/// # Generated Items
///
/// For a struct `Ring` with a field `count: u32`:
///
/// - `Ring::count(&self) -> u32` - getter
/// - `Ring::set_count(&mut self, value: u32) -> Result<(), ParameterError>` -
///   validated setter, leaves the field unchanged on error
/// - `impl stargen::Parameters for Ring` - key table, key-based assignment
///   and whole-struct validation
///
/// # Requirements
///
/// - Named-field struct
/// - Every field type is `Copy` and implements `serde::Deserialize`
///
/// # Panics
///
/// The macro panics at compile time if:
/// - Applied to an enum or tuple struct
/// - A `#[param(...)]` entry is not a recognized check or metadata key
#[proc_macro_derive(Parameters, attributes(param))]
pub fn derive_parameters(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => panic!("Parameters derive only supports structs with named fields"),
        },
        _ => panic!("Parameters derive only supports structs"),
    };

    let struct_check = match parse_struct_check(&input.attrs) {
        Ok(check) => check,
        Err(e) => return e.to_compile_error().into(),
    };
    let struct_key = name.to_string();

    let mut accessors = Vec::new();
    let mut field_entries = Vec::new();
    let mut match_arms = Vec::new();
    let mut validations = Vec::new();

    for field in fields.iter() {
        let field_name = field.ident.as_ref().unwrap();
        let field_type = &field.ty;
        let key = field_name.to_string();
        let alias = camel_case(&key);
        let setter = Ident::new(&format!("set_{}", key), Span::call_site());

        let attrs = match parse_param_attrs(field) {
            Ok(attrs) => attrs,
            Err(e) => return e.to_compile_error().into(),
        };

        let mut checks: Vec<_> = attrs
            .checks
            .iter()
            .map(|check| quote! { ::stargen::params::check::#check(#key, &value)?; })
            .collect();
        if let Some(limit) = &attrs.limit {
            checks.push(quote! { ::stargen::params::check::at_most(#key, &value, (#limit) as f64)?; });
        }

        let assign = match &struct_check {
            Some(check) => quote! {
                let previous = ::std::mem::replace(&mut self.#field_name, value);
                if let Err(reason) = #check(self) {
                    self.#field_name = previous;
                    return Err(::stargen::ParameterError::Conflict { key: #key, reason });
                }
            },
            None => quote! { self.#field_name = value; },
        };

        let getter_doc = format!("Current `{}` value.", key);
        let setter_doc = format!(
            "Set `{}`, rejecting the value if it fails validation. The previous value is kept on error.",
            key
        );

        accessors.push(quote! {
            #[doc = #getter_doc]
            #[inline]
            pub fn #field_name(&self) -> #field_type {
                self.#field_name
            }

            #[doc = #setter_doc]
            pub fn #setter(&mut self, value: #field_type) -> ::std::result::Result<(), ::stargen::ParameterError> {
                #(#checks)*
                #assign
                Ok(())
            }
        });

        let field_checks = attrs.checks.iter().map(|check| {
            quote! { ::stargen::params::check::#check(#key, &self.#field_name)?; }
        });
        let limit_check = attrs.limit.as_ref().map(|limit| {
            quote! { ::stargen::params::check::at_most(#key, &self.#field_name, (#limit) as f64)?; }
        });
        validations.push(quote! { #(#field_checks)* #limit_check });

        let label_expr = match &attrs.label {
            Some(label) => quote! { Some(#label) },
            None => quote! { None },
        };
        let range_expr = match (&attrs.min, &attrs.max) {
            (Some(min), Some(max)) => {
                let step = match &attrs.step {
                    Some(step) => quote! { Some((#step) as f64) },
                    None => quote! { None },
                };
                quote! {
                    Some(::stargen::params::ParameterRange {
                        min: (#min) as f64,
                        max: (#max) as f64,
                        step: #step,
                    })
                }
            }
            (None, None) => quote! { None },
            _ => {
                return syn::Error::new_spanned(field_name, "`min` and `max` must be given together")
                    .to_compile_error()
                    .into()
            }
        };

        field_entries.push(quote! {
            ::stargen::params::ParameterField {
                key: #key,
                alias: #alias,
                label: #label_expr,
                range: #range_expr,
            }
        });

        let pattern = if alias == key {
            quote! { #key }
        } else {
            quote! { #key | #alias }
        };
        match_arms.push(quote! {
            #pattern => {
                let value: #field_type = ::stargen::params::decode(#key, value)?;
                self.#setter(value)?;
                Ok(true)
            }
        });
    }

    let struct_validation = struct_check.as_ref().map(|check| {
        quote! {
            #check(self).map_err(|reason| ::stargen::ParameterError::Conflict { key: #struct_key, reason })?;
        }
    });

    let expanded = quote! {
        impl #name {
            #(#accessors)*
        }

        impl ::stargen::Parameters for #name {
            const FIELDS: &'static [::stargen::params::ParameterField] = &[
                #(#field_entries),*
            ];

            fn set_value(
                &mut self,
                key: &str,
                value: &::stargen::params::Value,
            ) -> ::std::result::Result<bool, ::stargen::ParameterError> {
                match key {
                    #(#match_arms)*
                    _ => Ok(false),
                }
            }

            fn validate(&self) -> ::std::result::Result<(), ::stargen::ParameterError> {
                #(#validations)*
                #struct_validation
                Ok(())
            }
        }
    };

    TokenStream::from(expanded)
}

/// Parsed contents of the `#[param(...)]` attributes on one field.
#[derive(Default)]
struct ParamAttrs {
    /// Check functions to run before assignment, in declaration order.
    checks: Vec<Ident>,
    /// Human-readable widget label.
    label: Option<LitStr>,
    /// Editor range lower bound.
    min: Option<Expr>,
    /// Editor range upper bound.
    max: Option<Expr>,
    /// Editor slider step.
    step: Option<Expr>,
    /// Hard upper bound, enforced on assignment.
    limit: Option<Expr>,
}

const CHECKS: &[&str] = &["positive", "non_negative", "finite", "color"];

fn parse_param_attrs(field: &syn::Field) -> syn::Result<ParamAttrs> {
    let mut attrs = ParamAttrs::default();

    for attr in &field.attrs {
        if !attr.path().is_ident("param") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("label") {
                attrs.label = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("min") {
                attrs.min = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("max") {
                attrs.max = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("step") {
                attrs.step = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("limit") {
                attrs.limit = Some(meta.value()?.parse()?);
            } else if let Some(ident) = meta.path.get_ident() {
                if !CHECKS.contains(&ident.to_string().as_str()) {
                    return Err(meta.error(format!(
                        "unknown parameter check `{}`, expected one of {:?}",
                        ident, CHECKS
                    )));
                }
                attrs.checks.push(ident.clone());
            } else {
                return Err(meta.error("expected a check name or `key = value`"));
            }
            Ok(())
        })?;
    }

    Ok(attrs)
}

/// Reads the struct-level `#[param(validate_with = path)]`, if any.
fn parse_struct_check(attrs: &[syn::Attribute]) -> syn::Result<Option<syn::Path>> {
    let mut check = None;

    for attr in attrs {
        if !attr.path().is_ident("param") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("validate_with") {
                check = Some(meta.value()?.parse()?);
                Ok(())
            } else {
                Err(meta.error("expected `validate_with = path` on the struct"))
            }
        })?;
    }

    Ok(check)
}

/// `randomness_power` -> `randomnessPower`.
fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for ch in name.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}
