use crate::{
    BinaryRead, BinaryWrite, Result, buffer::FieldBuffer, nullable::nullable_default,
    output::WriteBuffer, types::UserTypes,
};

nullable_default!(bool, i8, i16, i32, i64, u32, f32, f64);

impl BinaryRead for bool {
    fn read_binary(&mut self, buffer: FieldBuffer<'_>) -> Result<()> {
        let [byte] = buffer.binary_array::<1>()?;
        *self = byte != 0;
        Ok(())
    }
}

impl BinaryWrite for bool {
    fn write_binary<B: WriteBuffer>(&self, _: &UserTypes, buffer: &mut B) -> Result<()> {
        buffer.put_u8(*self as u8);
        Ok(())
    }
}

/// Big endian fixed size number.
macro_rules! number {
    ($($ty:ty),*) => {
        $(
            impl BinaryRead for $ty {
                fn read_binary(&mut self, buffer: FieldBuffer<'_>) -> Result<()> {
                    *self = <$ty>::from_be_bytes(buffer.binary_array::<{ size_of::<$ty>() }>()?);
                    Ok(())
                }
            }

            impl BinaryWrite for $ty {
                fn write_binary<B: WriteBuffer>(&self, _: &UserTypes, buffer: &mut B) -> Result<()> {
                    buffer.put_slice(&self.to_be_bytes());
                    Ok(())
                }
            }
        )*
    };
}

number!(i8, i16, i32, i64, u32, f32, f64);
