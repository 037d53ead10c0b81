use proc_macro::TokenStream;
use proc_macro2::{Ident, Span, TokenStream as TokenStream2};
use proc_macro_crate::{FoundCrate, crate_name};
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Fields, Type, parse_macro_input};

#[proc_macro_derive(FormModel)]
pub fn derive_form_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    if !input.generics.params.is_empty() {
        return syn::Error::new_spanned(
            input.ident,
            "FormModel derive currently supports only non-generic structs",
        )
        .to_compile_error()
        .into();
    }

    let model_ident = input.ident;
    let fields_struct_ident = format_ident!("{model_ident}Fields");

    let named_fields = match input.data {
        Data::Struct(data) => match data.fields {
            Fields::Named(fields) => fields.named,
            _ => {
                return syn::Error::new(
                    Span::call_site(),
                    "FormModel derive requires a struct with named fields",
                )
                .to_compile_error()
                .into();
            }
        },
        _ => {
            return syn::Error::new(
                Span::call_site(),
                "FormModel derive is only supported on structs",
            )
            .to_compile_error()
            .into();
        }
    };

    let krate = jobboard_auth_path();
    let mut key_accessors = Vec::new();
    let mut key_consts = Vec::new();
    let mut from_set = Vec::new();
    let mut to_set = Vec::new();

    for field in named_fields {
        let Some(field_ident) = field.ident else {
            continue;
        };
        if !is_string(&field.ty) {
            return syn::Error::new_spanned(
                field.ty,
                "FormModel fields must be `String`; inputs carry text values",
            )
            .to_compile_error()
            .into();
        }
        let field_name = field_ident.to_string();

        key_accessors.push(quote! {
            pub const fn #field_ident(&self) -> #krate::form::FieldKey {
                #krate::form::FieldKey::new(#field_name)
            }
        });
        key_consts.push(quote! {
            #krate::form::FieldKey::new(#field_name)
        });
        from_set.push(quote! {
            #field_ident: fields.value(#field_name).to_owned()
        });
        to_set.push(quote! {
            set.set_field(#krate::form::FieldKey::new(#field_name), self.#field_ident.clone());
        });
    }

    quote! {
        #[derive(Clone, Copy, Debug, Default)]
        pub struct #fields_struct_ident;

        impl #fields_struct_ident {
            #(#key_accessors)*
        }

        impl #krate::form::FormModel for #model_ident {
            type Fields = #fields_struct_ident;

            fn fields() -> Self::Fields {
                #fields_struct_ident
            }

            fn field_keys() -> &'static [#krate::form::FieldKey] {
                const KEYS: &[#krate::form::FieldKey] = &[#(#key_consts),*];
                KEYS
            }

            fn from_field_set(fields: &#krate::form::FieldSet) -> Self {
                Self {
                    #(#from_set,)*
                }
            }

            fn to_field_set(&self) -> #krate::form::FieldSet {
                let mut set = #krate::form::FieldSet::new();
                #(#to_set)*
                set
            }
        }
    }
    .into()
}

fn jobboard_auth_path() -> TokenStream2 {
    match crate_name("jobboard_auth") {
        Ok(FoundCrate::Name(name)) => {
            let ident = Ident::new(&name, Span::call_site());
            quote!(::#ident)
        }
        Ok(FoundCrate::Itself) => quote!(crate),
        Err(_) => quote!(::jobboard_auth),
    }
}

fn is_string(ty: &Type) -> bool {
    let Type::Path(path) = ty else {
        return false;
    };
    path.qself.is_none()
        && path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "String" && segment.arguments.is_empty())
}
