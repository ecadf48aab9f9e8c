use proc_macro::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, LitStr, Visibility, parse_macro_input};

#[proc_macro_derive(Record, attributes(utcode))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    derive_record_expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn derive_record_expand(input: DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;

    match &input.data {
        Data::Struct(data_struct) => impl_record_struct(name, data_struct),
        Data::Enum(_) => Err(syn::Error::new_spanned(
            name,
            "Enum types are not supported",
        )),
        Data::Union(_) => Err(syn::Error::new_spanned(
            name,
            "Union types are not supported",
        )),
    }
}

struct FieldAttrs {
    skip: bool,
    rename: Option<LitStr>,
}

fn parse_field_attrs(field: &syn::Field) -> syn::Result<FieldAttrs> {
    let mut attrs = FieldAttrs {
        skip: false,
        rename: None,
    };

    for attr in &field.attrs {
        if !attr.path().is_ident("utcode") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                attrs.skip = true;
                Ok(())
            } else if meta.path.is_ident("rename") {
                attrs.rename = Some(meta.value()?.parse()?);
                Ok(())
            } else {
                Err(meta.error("expected `skip` or `rename = \"...\"`"))
            }
        })?;
    }

    Ok(attrs)
}

/// Mirrors `utcode::wire_key` so duplicate keys are rejected at compile time.
fn wire_key(declared: &str, rename: Option<&LitStr>) -> String {
    if let Some(rename) = rename {
        return rename.value();
    }
    let mut chars = declared.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() => first.to_lowercase().chain(chars).collect(),
        _ => declared.to_string(),
    }
}

fn impl_record_struct(
    name: &syn::Ident,
    data: &syn::DataStruct,
) -> syn::Result<proc_macro2::TokenStream> {
    let fields = match &data.fields {
        Fields::Named(fields) => &fields.named,
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "Only named fields are supported",
            ));
        }
    };

    let mut field_info = Vec::new();
    let mut skipped_fields = Vec::new();
    let mut seen_keys: Vec<(String, &syn::Ident)> = Vec::new();

    for field in fields {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "Field must be named"))?;
        let attrs = parse_field_attrs(field)?;

        if attrs.skip || !matches!(field.vis, Visibility::Public(_)) {
            skipped_fields.push(field_name);
            continue;
        }

        let declared = field_name.unraw().to_string();
        let key = wire_key(&declared, attrs.rename.as_ref());
        if let Some((_, other)) = seen_keys.iter().find(|(seen, _)| *seen == key) {
            return Err(syn::Error::new_spanned(
                field_name,
                format!("Duplicate wire key \"{key}\", also used by field '{other}'"),
            ));
        }
        seen_keys.push((key, field_name));

        field_info.push((field_name, declared, attrs.rename));
    }

    let descriptors = field_info.iter().map(|(_, declared, rename)| {
        let rename = match rename {
            Some(lit) => quote! { Some(#lit) },
            None => quote! { None },
        };
        quote! {
            utcode::FieldDescriptor::new(#declared, #rename)
        }
    });

    let field_names: Vec<_> = field_info.iter().map(|(name, _, _)| *name).collect();
    let field_indices: Vec<usize> = (0..field_info.len()).collect();

    let skipped_field_init = skipped_fields.iter().map(|name| {
        quote! {
            #name: Default::default()
        }
    });

    let expanded = quote! {
        impl utcode::Record for #name {
            const FIELDS: &'static [utcode::FieldDescriptor] = &[
                #(#descriptors),*
            ];

            fn absent() -> Self {
                Self {
                    #(#field_names: utcode::Decode::absent(),)*
                    #(#skipped_field_init,)*
                }
            }

            fn encode_field(
                &self,
                index: usize,
                writer: &mut utcode::Writer<'_>,
            ) -> utcode::EncodeResult<()> {
                match index {
                    #(#field_indices => utcode::Encode::encode(&self.#field_names, writer),)*
                    _ => Ok(()),
                }
            }

            fn decode_field(
                &mut self,
                index: usize,
                reader: &mut utcode::Reader<'_>,
            ) -> utcode::DecodeResult<()> {
                match index {
                    #(#field_indices => utcode::Decode::decode_into(&mut self.#field_names, reader),)*
                    _ => reader.skip_value(),
                }
            }
        }

        impl utcode::Encode for #name {
            fn encode(&self, writer: &mut utcode::Writer<'_>) -> utcode::EncodeResult<()> {
                utcode::encode_record(self, writer)
            }
        }

        impl utcode::Decode for #name {
            fn absent() -> Self {
                <Self as utcode::Record>::absent()
            }

            fn decode_into(&mut self, reader: &mut utcode::Reader<'_>) -> utcode::DecodeResult<()> {
                utcode::decode_record_into(self, reader)
            }
        }
    };

    Ok(expanded)
}
