use proc_macro::TokenStream;
use syn::DeriveInput;

mod composite;

/// Derive postgres composite type codec.
///
/// Generates `PgType`, `Nullable`, `BinaryRead` and `BinaryWrite`, fields
/// are encoded in declaration order.
///
/// The composite oid is resolved by name from `UserTypes`, which default to
/// the lowercased struct name, `#[pg(name = "schema.type")]` overrides it.
#[proc_macro_derive(Composite, attributes(pg))]
pub fn composite(input: TokenStream) -> TokenStream {
    match composite::composite(syn::parse_macro_input!(input as DeriveInput)) {
        Ok(ok) => ok,
        Err(err) => err.into_compile_error().into(),
    }
}
