use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

mod feature_meta;
use feature_meta::{parse_feature_info, validate_tag};

/// Registers a feature kind with the crate's built-in registry.
///
/// The struct must implement `crate::registry::FromDescription`. The derive
/// implements `crate::registry::TypeTag` and submits a
/// `crate::registry::FeatureRegistration` to the inventory collection that
/// `Registry::with_builtins` reads.
#[proc_macro_derive(RegisterFeature, attributes(feature_meta))]
pub fn derive_register_feature(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let feature_info = match parse_feature_info(&input) {
        Ok(info) => info,
        Err(e) => return e.write_errors().into(),
    };

    let struct_name = &input.ident;
    let tag = feature_info.tag.unwrap_or_else(|| struct_name.to_string());
    if let Err(e) = validate_tag(&tag, struct_name) {
        return e.write_errors().into();
    }

    let mod_name = syn::Ident::new(
        &format!(
            "__feature_registration_{}",
            struct_name.to_string().to_lowercase()
        ),
        struct_name.span(),
    );

    if !input.generics.params.is_empty() {
        return syn::Error::new_spanned(
            &input.generics,
            "RegisterFeature cannot be derived for generic types",
        )
        .to_compile_error()
        .into();
    }

    let expanded = quote! {
        impl crate::registry::TypeTag for #struct_name {
            const TYPE_TAG: &'static str = #tag;
        }

        #[doc(hidden)]
        mod #mod_name {
            use super::*;

            ::inventory::submit! {
                crate::registry::FeatureRegistration {
                    type_tag: #tag,
                    deserialize: <#struct_name as crate::registry::FromDescription>::from_description,
                }
            }
        }
    };

    TokenStream::from(expanded)
}
