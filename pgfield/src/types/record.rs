//! Composite value.
//!
//! Binary layout is a field count, followed by each field as its oid and
//! length prefixed payload.
//!
//! Helpers in this module are used by anonymous record as tuples, and by
//! `#[derive(Composite)]`.

use crate::{
    BinaryRead, BinaryWrite, Nullable, Result,
    buffer::FieldBuffer,
    category::TypeBufferCategory,
    common::verbose,
    format::DecodeError,
    output::WriteBuffer,
    postgres::{Oid, PgType, oid},
    raw::write_raw_binary,
    types::UserTypes,
};

/// Read composite header, field count must equal to `expected`.
pub fn read_header(buffer: &mut FieldBuffer<'_>, expected: usize) -> Result<()> {
    buffer.binary_bytes()?;
    let actual = buffer.read_scalar::<i32>()?;
    verbose!(actual, expected, "composite fields");
    if usize::try_from(actual).ok() != Some(expected) {
        return Err(DecodeError::FieldCount { expected, actual }.into());
    }
    Ok(())
}

/// Read one composite field into `value`.
///
/// The field category is resolved from its oid.
pub fn read_field<T: BinaryRead>(
    buffer: &mut FieldBuffer<'_>,
    value: &mut T,
    categories: &TypeBufferCategory,
) -> Result<()> {
    let oid = buffer.read_scalar::<Oid>()?;
    let category = categories.category(oid)?;
    buffer.read_raw(value, categories, category)?;
    Ok(())
}

/// All fields must be consumed.
pub fn finish(buffer: &FieldBuffer<'_>) -> Result<()> {
    match buffer.len() {
        0 => Ok(()),
        len => Err(DecodeError::TrailingBytes(len).into()),
    }
}

pub fn write_header<B: WriteBuffer>(buffer: &mut B, count: usize) -> Result<()> {
    let count = i32::try_from(count)
        .map_err(|_| crate::format::EncodeError::OutOfRange("composite field count".into()))?;
    buffer.put_i32(count);
    Ok(())
}

/// Write one composite field, stamped with its resolved oid.
pub fn write_field<T, B>(types: &UserTypes, buffer: &mut B, value: &T) -> Result<()>
where
    T: BinaryWrite + PgType,
    B: WriteBuffer,
{
    buffer.put_u32(T::oid(types));
    write_raw_binary(types, buffer, value)
}

macro_rules! record_tuple {
    ($len:literal; $($t:ident $i:tt),*) => {
        impl<$($t),*> PgType for ($($t,)*) {
            const OID: Oid = oid::RECORD;
            const ARRAY_OID: Oid = oid::RECORD_ARRAY;
        }

        impl<$($t: Nullable),*> Nullable for ($($t,)*) {
            fn default_value() -> Self {
                ($($t::default_value(),)*)
            }
        }

        impl<$($t: BinaryRead),*> BinaryRead for ($($t,)*) {
            fn read_binary(&mut self, buffer: FieldBuffer<'_>) -> Result<()> {
                self.read_binary_with_categories(buffer, TypeBufferCategory::builtin_ref())
            }

            fn read_binary_with_categories(
                &mut self,
                mut buffer: FieldBuffer<'_>,
                categories: &TypeBufferCategory,
            ) -> Result<()> {
                let mut value = Self::default_value();
                read_header(&mut buffer, $len)?;
                $(read_field(&mut buffer, &mut value.$i, categories)?;)*
                finish(&buffer)?;
                *self = value;
                Ok(())
            }
        }

        impl<$($t: BinaryWrite + PgType),*> BinaryWrite for ($($t,)*) {
            fn write_binary<B: WriteBuffer>(&self, types: &UserTypes, buffer: &mut B) -> Result<()> {
                write_header(buffer, $len)?;
                $(write_field(types, buffer, &self.$i)?;)*
                Ok(())
            }
        }
    };
}

record_tuple!(1; T0 0);
record_tuple!(2; T0 0, T1 1);
record_tuple!(3; T0 0, T1 1, T2 2);
record_tuple!(4; T0 0, T1 1, T2 2, T3 3);
record_tuple!(5; T0 0, T1 1, T2 2, T3 3, T4 4);
record_tuple!(6; T0 0, T1 1, T2 2, T3 3, T4 4, T5 5);
