use proc_macro::TokenStream;
use quote::quote;
use syn::*;

macro_rules! error {
    ($($tt:tt)*) => {
        return Err(syn::Error::new(proc_macro::Span::call_site().into(), format!($($tt)*)))
    };
}

pub fn composite(input: DeriveInput) -> Result<TokenStream> {
    let DeriveInput { attrs, vis: _, ident, generics, data } = input;
    let Data::Struct(data) = data else {
        error!("only struct are currently supported")
    };

    let mut name = ident.to_string().to_lowercase();
    for attr in attrs.iter().filter(|e| e.path().is_ident("pg")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                name = meta.value()?.parse::<LitStr>()?.value();
                Ok(())
            } else {
                Err(meta.error("unsupported attribute, expected `name`"))
            }
        })?;
    }

    // member to access the field, and its type
    let fields: Vec<(Member, Type)> = match data.fields {
        Fields::Named(FieldsNamed { named, .. }) => named
            .into_iter()
            .filter_map(|e| Some((Member::Named(e.ident?), e.ty)))
            .collect(),
        Fields::Unnamed(FieldsUnnamed { unnamed, .. }) => unnamed
            .into_iter()
            .enumerate()
            .map(|(i, e)| (Member::Unnamed(Index::from(i)), e.ty))
            .collect(),
        Fields::Unit => error!("unit struct have no composite fields"),
    };

    let count = fields.len();

    let defaults = fields
        .iter()
        .map(|(id, ty)| quote! { #id: <#ty as ::pgfield::Nullable>::default_value(), });
    let reads = fields
        .iter()
        .map(|(id, _)| quote! { record::read_field(&mut buffer, &mut value.#id, categories)?; });
    let writes = fields
        .iter()
        .map(|(id, _)| quote! { record::write_field(types, buffer, &self.#id)?; });

    let (g1, g2, g3) = generics.split_for_impl();

    Ok(quote! {
        impl #g1 ::pgfield::postgres::PgType for #ident #g2 #g3 {
            const OID: ::pgfield::postgres::Oid = ::pgfield::postgres::INVALID_OID;

            fn oid(types: &::pgfield::UserTypes) -> ::pgfield::postgres::Oid {
                types.find_oid(#name).unwrap_or(::pgfield::postgres::INVALID_OID)
            }

            fn array_oid(types: &::pgfield::UserTypes) -> ::pgfield::postgres::Oid {
                types.find_array_oid(#name).unwrap_or(::pgfield::postgres::INVALID_OID)
            }
        }

        impl #g1 ::pgfield::Nullable for #ident #g2 #g3 {
            fn default_value() -> Self {
                Self { #(#defaults)* }
            }
        }

        impl #g1 ::pgfield::BinaryRead for #ident #g2 #g3 {
            fn read_binary(&mut self, buffer: ::pgfield::FieldBuffer<'_>) -> ::pgfield::Result<()> {
                self.read_binary_with_categories(buffer, ::pgfield::TypeBufferCategory::builtin_ref())
            }

            fn read_binary_with_categories(
                &mut self,
                mut buffer: ::pgfield::FieldBuffer<'_>,
                categories: &::pgfield::TypeBufferCategory,
            ) -> ::pgfield::Result<()> {
                use ::pgfield::types::record;
                let mut value = <Self as ::pgfield::Nullable>::default_value();
                record::read_header(&mut buffer, #count)?;
                #(#reads)*
                record::finish(&buffer)?;
                *self = value;
                Ok(())
            }
        }

        impl #g1 ::pgfield::BinaryWrite for #ident #g2 #g3 {
            fn write_binary<B: ::pgfield::WriteBuffer>(
                &self,
                types: &::pgfield::UserTypes,
                buffer: &mut B,
            ) -> ::pgfield::Result<()> {
                use ::pgfield::types::record;
                if types.find_oid(#name).is_none() {
                    return Err(::pgfield::format::EncodeError::UnknownOid(#name).into());
                }
                record::write_header(buffer, #count)?;
                #(#writes)*
                Ok(())
            }
        }
    }.into())
}
